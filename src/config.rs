// 该文件是 Danqing （丹青） 项目的一部分。
// src/config.rs - 运行配置
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

use std::fmt;
use std::path::Path;

use clap::ValueEnum;

use crate::error::PipelineError;

/// 推理精度，原样传递给推理后端
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Precision {
  /// 32 位浮点
  Fp32,
  /// 16 位浮点
  Fp16,
  /// 8 位整型
  Int8,
}

impl fmt::Display for Precision {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Precision::Fp32 => write!(f, "fp32"),
      Precision::Fp16 => write!(f, "fp16"),
      Precision::Int8 => write!(f, "int8"),
    }
  }
}

/// 单次运行的完整配置
///
/// 启动时构造一次，之后不再修改。
#[derive(Debug, Clone)]
pub struct RunConfig {
  /// 输入图像路径
  pub image_path: String,
  /// 模型文件路径
  pub model_path: String,
  /// 推理精度
  pub precision: Precision,
  /// 为真时仅落盘，不弹出预览窗口
  pub save_image: bool,
  /// 输出图像路径
  pub output_image_path: String,
}

impl RunConfig {
  /// 构造运行配置
  ///
  /// `image_path` 为空视为配置错误，在任何 IO 发生之前直接失败；
  /// `output_image_path` 缺省时由输入路径派生。
  pub fn new(
    image_path: String,
    model_path: String,
    precision: Precision,
    save_image: bool,
    output_image_path: Option<String>,
  ) -> Result<Self, PipelineError> {
    if image_path.is_empty() {
      return Err(PipelineError::MissingImagePath);
    }

    let output_image_path =
      output_image_path.unwrap_or_else(|| derive_output_path(&image_path));

    Ok(Self {
      image_path,
      model_path,
      precision,
      save_image,
      output_image_path,
    })
  }
}

/// 由输入路径派生默认输出路径：主干 + "_detect" + 原扩展名
///
/// 纯字符串变换，不访问文件系统。
pub fn derive_output_path(image_path: &str) -> String {
  let path = Path::new(image_path);
  let ext = path
    .extension()
    .map(|e| format!(".{}", e.to_string_lossy()))
    .unwrap_or_default();
  let stem = path.with_extension("");
  format!("{}_detect{}", stem.display(), ext)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn derives_output_path_beside_input() {
    assert_eq!(derive_output_path("foo/bar.png"), "foo/bar_detect.png");
  }

  #[test]
  fn derives_output_path_without_directory() {
    assert_eq!(derive_output_path("img.jpeg"), "img_detect.jpeg");
  }

  #[test]
  fn derives_output_path_without_extension() {
    assert_eq!(derive_output_path("snapshot"), "snapshot_detect");
  }

  #[test]
  fn derivation_only_touches_the_last_extension() {
    assert_eq!(derive_output_path("a/b.tar.gz"), "a/b.tar_detect.gz");
  }

  #[test]
  fn empty_image_path_fails_before_any_io() {
    let err = RunConfig::new(
      String::new(),
      "model.onnx".to_string(),
      Precision::Fp32,
      false,
      None,
    )
    .unwrap_err();
    assert!(matches!(err, PipelineError::MissingImagePath));
  }

  #[test]
  fn default_output_path_is_derived() {
    let config = RunConfig::new(
      "photos/cat.png".to_string(),
      String::new(),
      Precision::Fp32,
      true,
      None,
    )
    .unwrap();
    assert_eq!(config.output_image_path, "photos/cat_detect.png");
  }

  #[test]
  fn explicit_output_path_is_kept_as_is() {
    let config = RunConfig::new(
      "photos/cat.png".to_string(),
      String::new(),
      Precision::Int8,
      true,
      Some("out/result.png".to_string()),
    )
    .unwrap();
    assert_eq!(config.output_image_path, "out/result.png");
  }

  #[test]
  fn precision_displays_in_lowercase() {
    assert_eq!(Precision::Fp32.to_string(), "fp32");
    assert_eq!(Precision::Fp16.to_string(), "fp16");
    assert_eq!(Precision::Int8.to_string(), "int8");
  }
}
