// 该文件是 Danqing （丹青） 项目的一部分。
// src/detector/mod.rs - 检测结果类型与推理能力接口
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

#[cfg(feature = "yolox-onnx")]
mod yolox_onnx;

#[cfg(feature = "yolox-onnx")]
pub use yolox_onnx::YoloxOnnxDetector;

use anyhow::Result;
use image::RgbImage;

use crate::config::Precision;

/// 一个检测结果：边界框、类别编号与置信度
///
/// 近角坐标可以为负，远角可以超出图像范围；
/// 这是正常输入，由标注阶段处理，不在此处拒绝。
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
  /// 边界框左上角 x 坐标
  pub x_offset: i32,
  /// 边界框左上角 y 坐标
  pub y_offset: i32,
  /// 边界框宽度（非负）
  pub width: i32,
  /// 边界框高度（非负）
  pub height: i32,
  /// 类别编号
  pub class_id: usize,
  /// 置信度
  pub score: f32,
}

/// 一张图像的全部检测结果，顺序即推理产出顺序
pub type DetectionSet = Vec<Detection>;

/// 推理能力：一批图像映射为等长的一批检测结果组
///
/// 同步阻塞调用，单次运行只调用一次，失败不重试。
pub trait Detector {
  fn infer(&mut self, images: &[RgbImage]) -> Result<Vec<DetectionSet>>;
}

/// 按编译进来的后端创建推理器
#[cfg(feature = "yolox-onnx")]
pub fn create_detector(model_path: &str, precision: Precision) -> Result<Box<dyn Detector>> {
  Ok(Box::new(YoloxOnnxDetector::new(model_path, precision)?))
}

/// 按编译进来的后端创建推理器
#[cfg(not(feature = "yolox-onnx"))]
pub fn create_detector(_model_path: &str, _precision: Precision) -> Result<Box<dyn Detector>> {
  anyhow::bail!("本构建未启用任何推理后端（需要 yolox-onnx 特性）")
}
