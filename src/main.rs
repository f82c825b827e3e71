// 该文件是 Danqing （丹青） 项目的一部分。
// src/main.rs - 项目主程序
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Danqing Authors

mod args;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use danqing::config::RunConfig;
use danqing::output::Viewer;
use danqing::{detector, pipeline};

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = args::Args::parse();
  let config = RunConfig::new(
    args.image_path,
    args.model_path,
    args.precision,
    args.save_image,
    args.output_image_path,
  )?;

  info!("输入图像: {}", config.image_path);
  info!("模型文件: {}", config.model_path);
  info!("推理精度: {}", config.precision);
  info!("输出图像: {}", config.output_image_path);

  let mut detector = detector::create_detector(&config.model_path, config.precision)?;

  #[cfg(feature = "display-window")]
  let window = danqing::output::WindowViewer::new();
  #[cfg(feature = "display-window")]
  let viewer: Option<&dyn Viewer> = Some(&window);
  #[cfg(not(feature = "display-window"))]
  let viewer: Option<&dyn Viewer> = None;

  pipeline::run(&config, detector.as_mut(), viewer)?;

  info!("运行完成");
  Ok(())
}
