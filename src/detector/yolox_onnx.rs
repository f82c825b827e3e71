// 该文件是 Danqing （丹青） 项目的一部分。
// src/detector/yolox_onnx.rs - YOLOX ONNX Runtime 推理后端
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

use anyhow::{Context, Result};
use image::RgbImage;
use ndarray::Array4;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::TensorRef;
use tracing::{debug, info};

use super::{Detection, DetectionSet, Detector};
use crate::config::Precision;

/// 模型输入边长（标准 YOLOX 导出为 640x640）
const INPUT_SIZE: u32 = 640;
/// letterbox 填充灰度
const PAD_VALUE: f32 = 114.0;
/// 置信度阈值
const SCORE_THRESHOLD: f32 = 0.3;
/// NMS IOU 阈值
const NMS_THRESHOLD: f32 = 0.45;
/// 各输出特征图的步长
const STRIDES: [u32; 3] = [8, 16, 32];

/// 基于 ONNX Runtime 的 YOLOX 检测器
///
/// 按导出图原样执行，不做引擎级重建或量化标定；
/// 精度参数接受后仅记录，由支持它的执行提供方解释。
pub struct YoloxOnnxDetector {
  session: Session,
  input_name: String,
  output_name: String,
}

impl YoloxOnnxDetector {
  pub fn new(model_path: &str, precision: Precision) -> Result<Self> {
    let session = Session::builder()?
      .with_optimization_level(GraphOptimizationLevel::Level3)?
      .commit_from_file(model_path)
      .with_context(|| format!("无法加载模型: {model_path}"))?;

    let input_name = session.inputs[0].name.clone();
    let output_name = session.outputs[0].name.clone();
    info!(
      "模型加载完成: {} (输入张量 {}, 输出张量 {})",
      model_path, input_name, output_name
    );
    debug!("推理精度参数: {}", precision);

    Ok(Self {
      session,
      input_name,
      output_name,
    })
  }

  /// letterbox 预处理：等比缩放、灰边填充，BGR 通道序、NCHW f32
  ///
  /// 返回输入张量与缩放比，后者用于把检测框还原到原图坐标。
  fn preprocess(&self, image: &RgbImage) -> (Array4<f32>, f32) {
    let ratio = (INPUT_SIZE as f32 / image.width() as f32)
      .min(INPUT_SIZE as f32 / image.height() as f32);
    let new_width = ((image.width() as f32 * ratio) as u32).max(1);
    let new_height = ((image.height() as f32 * ratio) as u32).max(1);

    let resized = image::imageops::resize(
      image,
      new_width,
      new_height,
      image::imageops::FilterType::Triangle,
    );

    let mut input = Array4::<f32>::from_elem(
      (1, 3, INPUT_SIZE as usize, INPUT_SIZE as usize),
      PAD_VALUE,
    );
    for (x, y, pixel) in resized.enumerate_pixels() {
      // YOLOX 导出按 BGR、无归一化训练输入
      input[[0, 0, y as usize, x as usize]] = pixel[2] as f32;
      input[[0, 1, y as usize, x as usize]] = pixel[1] as f32;
      input[[0, 2, y as usize, x as usize]] = pixel[0] as f32;
    }

    (input, ratio)
  }
}

impl Detector for YoloxOnnxDetector {
  fn infer(&mut self, images: &[RgbImage]) -> Result<Vec<DetectionSet>> {
    let input_name = self.input_name.clone();
    let output_name = self.output_name.clone();
    let mut results = Vec::with_capacity(images.len());

    for image in images {
      let (input, ratio) = self.preprocess(image);
      let outputs = self
        .session
        .run(ort::inputs![input_name.as_str() => TensorRef::from_array_view(&input)?])?;
      let (shape, data) = outputs[output_name.as_str()].try_extract_tensor::<f32>()?;
      let channels = shape[shape.len() - 1] as usize;

      let raw = decode_predictions(data, channels, ratio);
      let kept = nms(raw, NMS_THRESHOLD);
      debug!("图像 {}x{}: 保留 {} 个检测", image.width(), image.height(), kept.len());
      results.push(kept);
    }

    Ok(results)
  }
}

/// 解码无锚框网格输出
///
/// 行顺序与导出一致：按步长 8、16、32 依次展开网格；
/// xy = (pred + grid) * stride，wh = exp(pred) * stride，
/// 置信度 = objectness * 最高类别分。
fn decode_predictions(data: &[f32], channels: usize, ratio: f32) -> Vec<Detection> {
  let mut detections = Vec::new();
  let mut row = 0usize;

  for stride in STRIDES {
    let grid = (INPUT_SIZE / stride) as usize;
    for gy in 0..grid {
      for gx in 0..grid {
        let base = row * channels;
        row += 1;
        if base + channels > data.len() {
          return detections;
        }

        let objectness = data[base + 4];
        if objectness < SCORE_THRESHOLD {
          continue;
        }

        let mut best_class = 0usize;
        let mut best_score = 0.0f32;
        for (class_id, class_score) in data[base + 5..base + channels].iter().enumerate() {
          if *class_score > best_score {
            best_score = *class_score;
            best_class = class_id;
          }
        }

        let score = objectness * best_score;
        if score < SCORE_THRESHOLD {
          continue;
        }

        let cx = (data[base] + gx as f32) * stride as f32;
        let cy = (data[base + 1] + gy as f32) * stride as f32;
        let w = data[base + 2].exp() * stride as f32;
        let h = data[base + 3].exp() * stride as f32;

        // 还原到原图像素坐标；近角允许为负，远角允许越界
        let x = (cx - w / 2.0) / ratio;
        let y = (cy - h / 2.0) / ratio;

        detections.push(Detection {
          x_offset: x.round() as i32,
          y_offset: y.round() as i32,
          width: (w / ratio).round().max(0.0) as i32,
          height: (h / ratio).round().max(0.0) as i32,
          class_id: best_class,
          score,
        });
      }
    }
  }

  detections
}

/// 类内非极大值抑制，按置信度降序保留
fn nms(mut detections: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
  detections.sort_by(|a, b| {
    b.score
      .partial_cmp(&a.score)
      .unwrap_or(std::cmp::Ordering::Equal)
  });

  let mut kept: Vec<Detection> = Vec::new();
  for candidate in detections {
    let suppressed = kept
      .iter()
      .any(|k| k.class_id == candidate.class_id && iou(k, &candidate) >= iou_threshold);
    if !suppressed {
      kept.push(candidate);
    }
  }

  kept
}

/// 两个边界框的交并比
fn iou(a: &Detection, b: &Detection) -> f32 {
  let x1 = a.x_offset.max(b.x_offset) as f32;
  let y1 = a.y_offset.max(b.y_offset) as f32;
  let x2 = (a.x_offset + a.width).min(b.x_offset + b.width) as f32;
  let y2 = (a.y_offset + a.height).min(b.y_offset + b.height) as f32;

  let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
  let area_a = (a.width * a.height) as f32;
  let area_b = (b.width * b.height) as f32;
  let union = area_a + area_b - intersection;

  if union > 0.0 { intersection / union } else { 0.0 }
}

#[cfg(test)]
mod tests {
  use super::*;

  /// 640 输入、步长 8/16/32 时的网格行数
  const TOTAL_ROWS: usize = 80 * 80 + 40 * 40 + 20 * 20;

  #[test]
  fn all_zero_tensor_decodes_to_nothing() {
    let data = vec![0.0f32; TOTAL_ROWS * 6];
    assert!(decode_predictions(&data, 6, 1.0).is_empty());
  }

  #[test]
  fn single_cell_decodes_to_centered_box() {
    // 单类模型（5 + 1 通道），只点亮第一个网格（步长 8，gx=gy=0）
    let mut data = vec![0.0f32; TOTAL_ROWS * 6];
    data[0] = 0.5; // cx = (0.5 + 0) * 8 = 4
    data[1] = 0.5; // cy = 4
    data[2] = (4.0f32).ln(); // w = 4 * 8 = 32
    data[3] = (4.0f32).ln(); // h = 32
    data[4] = 0.9; // objectness
    data[5] = 0.8; // 类别分

    let detections = decode_predictions(&data, 6, 1.0);
    assert_eq!(detections.len(), 1);
    let det = &detections[0];
    assert_eq!(det.class_id, 0);
    assert!((det.score - 0.72).abs() < 1e-5);
    assert_eq!((det.x_offset, det.y_offset), (-12, -12));
    assert_eq!((det.width, det.height), (32, 32));
  }

  #[test]
  fn identical_boxes_have_unit_iou() {
    let a = Detection {
      x_offset: 10,
      y_offset: 10,
      width: 20,
      height: 20,
      class_id: 0,
      score: 0.9,
    };
    assert!((iou(&a, &a) - 1.0).abs() < 1e-6);
  }

  #[test]
  fn nms_keeps_the_highest_scored_of_overlapping_same_class_boxes() {
    let strong = Detection {
      x_offset: 10,
      y_offset: 10,
      width: 20,
      height: 20,
      class_id: 1,
      score: 0.9,
    };
    let weak = Detection {
      x_offset: 12,
      y_offset: 12,
      width: 20,
      height: 20,
      class_id: 1,
      score: 0.6,
    };
    let other_class = Detection {
      class_id: 2,
      ..weak.clone()
    };

    let kept = nms(vec![weak.clone(), strong.clone(), other_class.clone()], 0.45);
    assert_eq!(kept.len(), 2);
    assert_eq!(kept[0], strong);
    assert_eq!(kept[1], other_class);
  }
}
