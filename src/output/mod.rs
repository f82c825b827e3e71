// 该文件是 Danqing （丹青） 项目的一部分。
// src/output/mod.rs - 输出路由
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

#[cfg(feature = "display-window")]
mod window;

#[cfg(feature = "display-window")]
pub use window::WindowViewer;

use anyhow::Result;
use image::RgbImage;
use tracing::info;

use crate::config::RunConfig;
use crate::error::PipelineError;

/// 预览窗口标题
pub const WINDOW_TITLE: &str = "inference image";

/// 交互式查看器：显示一张图像并阻塞到用户关闭
///
/// 等待没有超时，时长完全由人决定。
pub trait Viewer {
  fn show(&self, title: &str, image: &RgbImage) -> Result<()>;
}

/// 输出路由：决定交互显示与落盘
///
/// 两路输出互不排斥：`save_image` 为假时先弹出预览，
/// 之后两种情况下都把标注结果写入目标路径。
#[derive(Debug, Default)]
pub struct OutputRouter;

impl OutputRouter {
  pub fn new() -> Self {
    Self
  }

  /// 路由标注完成的图像
  ///
  /// 需要预览而查看器不可用时，在写盘之前即报错。
  pub fn route(
    &self,
    image: &RgbImage,
    config: &RunConfig,
    viewer: Option<&dyn Viewer>,
  ) -> Result<()> {
    if !config.save_image {
      let viewer = viewer.ok_or(PipelineError::ViewerUnavailable)?;
      info!("弹出预览窗口，等待关闭...");
      viewer.show(WINDOW_TITLE, image)?;
    }

    image
      .save(&config.output_image_path)
      .map_err(|source| PipelineError::OutputWrite {
        path: config.output_image_path.clone(),
        source,
      })?;
    info!("标注结果已写入: {}", config.output_image_path);

    Ok(())
  }
}
