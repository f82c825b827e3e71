// 该文件是 Danqing （丹青） 项目的一部分。
// src/pipeline.rs - 单次运行的流水线驱动
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

use anyhow::Result;
use image::{ImageReader, RgbImage};
use tracing::info;

use crate::annotator::Annotator;
use crate::config::RunConfig;
use crate::detector::Detector;
use crate::error::PipelineError;
use crate::output::{OutputRouter, Viewer};

/// 读取输入图像
///
/// 打开与解码失败统一归为图像读取错误，不会带着无效图像继续。
fn load_image(path: &str) -> Result<RgbImage, PipelineError> {
  let image = ImageReader::open(path)
    .map_err(|e| PipelineError::ImageLoad {
      path: path.to_string(),
      source: image::ImageError::IoError(e),
    })?
    .decode()
    .map_err(|e| PipelineError::ImageLoad {
      path: path.to_string(),
      source: e,
    })?
    .to_rgb8();
  Ok(image)
}

/// 单次端到端运行：读图 → 推理 → 标注 → 输出
///
/// 图像缓冲在整个运行期间由本函数独占，标注阶段就地修改。
/// 推理以单图成批的方式调用一次，结果取第一组；
/// 空结果集是致命错误，而不是对空序列的越界索引。
pub fn run(
  config: &RunConfig,
  detector: &mut dyn Detector,
  viewer: Option<&dyn Viewer>,
) -> Result<()> {
  let mut image = load_image(&config.image_path)?;
  info!(
    "图像读取完成: {} ({}x{})",
    config.image_path,
    image.width(),
    image.height()
  );

  let started = std::time::Instant::now();
  let mut batches = detector.infer(std::slice::from_ref(&image))?;
  info!("推理完成，耗时: {:.2?}", started.elapsed());

  if batches.is_empty() {
    return Err(PipelineError::EmptyInference.into());
  }
  let detections = batches.swap_remove(0);
  info!("检测到 {} 个目标", detections.len());

  Annotator::new().annotate(&mut image, &detections)?;

  OutputRouter::new().route(&image, config, viewer)?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use image::Rgb;

  use super::*;
  use crate::config::Precision;
  use crate::detector::{Detection, DetectionSet};

  /// 返回固定结果并记录调用的桩推理器
  struct StubDetector {
    batches: Vec<DetectionSet>,
    calls: usize,
    last_batch_len: usize,
  }

  impl StubDetector {
    fn returning(batches: Vec<DetectionSet>) -> Self {
      Self {
        batches,
        calls: 0,
        last_batch_len: 0,
      }
    }
  }

  impl Detector for StubDetector {
    fn infer(&mut self, images: &[RgbImage]) -> Result<Vec<DetectionSet>> {
      self.calls += 1;
      self.last_batch_len = images.len();
      Ok(self.batches.clone())
    }
  }

  fn temp_path(name: &str, ext: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
      "danqing-pipeline-{}-{}.{}",
      std::process::id(),
      name,
      ext
    ))
  }

  fn write_input_image(name: &str) -> PathBuf {
    let path = temp_path(name, "png");
    RgbImage::from_pixel(64, 48, Rgb([0, 0, 0]))
      .save(&path)
      .unwrap();
    path
  }

  fn config(input: &PathBuf, output: &PathBuf) -> RunConfig {
    RunConfig::new(
      input.display().to_string(),
      String::new(),
      Precision::Fp32,
      true,
      Some(output.display().to_string()),
    )
    .unwrap()
  }

  #[test]
  fn happy_path_annotates_and_writes_the_output() {
    let input = write_input_image("happy-in");
    let output = temp_path("happy-out", "png");
    let detections = vec![Detection {
      x_offset: 5,
      y_offset: 5,
      width: 20,
      height: 20,
      class_id: 0,
      score: 0.9,
    }];
    let mut detector = StubDetector::returning(vec![detections]);

    run(&config(&input, &output), &mut detector, None).unwrap();

    // 单图成批，恰好一次推理调用
    assert_eq!(detector.calls, 1);
    assert_eq!(detector.last_batch_len, 1);

    let written = image::open(&output).unwrap().to_rgb8();
    assert_eq!(*written.get_pixel(5, 5), Rgb([255, 255, 255]));

    std::fs::remove_file(&input).unwrap();
    std::fs::remove_file(&output).unwrap();
  }

  #[test]
  fn empty_inference_result_is_fatal() {
    let input = write_input_image("empty-in");
    let output = temp_path("empty-out", "png");
    let mut detector = StubDetector::returning(Vec::new());

    let err = run(&config(&input, &output), &mut detector, None).unwrap_err();
    let err = err
      .downcast_ref::<PipelineError>()
      .expect("应为 PipelineError");
    assert!(matches!(err, PipelineError::EmptyInference));
    assert!(!output.exists());

    std::fs::remove_file(&input).unwrap();
  }

  #[test]
  fn unreadable_input_image_fails_with_the_path() {
    let input = PathBuf::from("no/such/input.png");
    let output = temp_path("unreadable-out", "png");
    let mut detector = StubDetector::returning(vec![Vec::new()]);

    let err = run(&config(&input, &output), &mut detector, None).unwrap_err();
    let err = err
      .downcast_ref::<PipelineError>()
      .expect("应为 PipelineError");
    match err {
      PipelineError::ImageLoad { path, .. } => assert_eq!(path, "no/such/input.png"),
      other => panic!("unexpected error: {other}"),
    }
    // 图像读不出来就不会推理
    assert_eq!(detector.calls, 0);
  }

  #[test]
  fn detection_free_run_copies_the_input_through() {
    let input = write_input_image("passthrough-in");
    let output = temp_path("passthrough-out", "png");
    let mut detector = StubDetector::returning(vec![Vec::new()]);

    run(&config(&input, &output), &mut detector, None).unwrap();

    let original = image::open(&input).unwrap().to_rgb8();
    let written = image::open(&output).unwrap().to_rgb8();
    assert_eq!(original.as_raw(), written.as_raw());

    std::fs::remove_file(&input).unwrap();
    std::fs::remove_file(&output).unwrap();
  }
}
