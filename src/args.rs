// 该文件是 Danqing （丹青） 项目的一部分。
// src/args.rs - 命令行参数
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

use clap::Parser;

use danqing::config::Precision;

/// Danqing 单幅图像检测标注工具参数
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 输入图像路径（必需；为空报配置错误）
  #[arg(long, value_name = "FILE", default_value = "")]
  pub image_path: String,

  /// 模型文件路径（原样传递给推理后端）
  #[arg(long, value_name = "FILE", default_value = "")]
  pub model_path: String,

  /// 推理精度（原样传递给推理后端）
  #[arg(long, value_enum, default_value_t = Precision::Fp32)]
  pub precision: Precision,

  /// 仅保存结果，不弹出预览窗口
  #[arg(long)]
  pub save_image: bool,

  /// 输出图像路径（缺省时由输入路径派生：主干 + "_detect" + 扩展名）
  #[arg(long, value_name = "FILE")]
  pub output_image_path: Option<String>,
}
