// 该文件是 Danqing （丹青） 项目的一部分。
// src/annotator/mod.rs - 检测结果标注
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

mod font;

use anyhow::Result;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use tracing::debug;

use crate::detector::Detection;
use crate::palette::Palette;

/// 边框线宽（像素）
const BOX_THICKNESS: i32 = 2;
/// 置信度文本的字体缩放
const FONT_SCALE: f32 = 0.7;
/// 置信度文本的笔画线宽
const TEXT_THICKNESS: u32 = 2;

/// 标注器：把检测结果以边框加置信度文本的形式画到图像上
#[derive(Debug, Default)]
pub struct Annotator {
  palette: Palette,
}

impl Annotator {
  pub fn new() -> Self {
    Self {
      palette: Palette::new(),
    }
  }

  /// 按输入顺序就地绘制全部检测结果
  ///
  /// 后绘制的结果在重叠像素上覆盖先绘制的。空结果集不触碰像素缓冲。
  /// 类别编号越界直接报错，不做默认色替代。
  pub fn annotate(&self, image: &mut RgbImage, detections: &[Detection]) -> Result<()> {
    for detection in detections {
      let (left, top, right, bottom) = box_corners(detection, image.width(), image.height());
      let color = self.palette.color_for(detection.class_id)?;
      debug!(
        "绘制检测框: 类别 {} 置信度 {:.3} 角点 ({}, {}) - ({}, {})",
        detection.class_id, detection.score, left, top, right, bottom
      );

      draw_box(image, left, top, right, bottom, color);

      let label = format_score(detection.score);
      let (_, text_height) = font::text_size(&label, FONT_SCALE);
      font::draw_text_mut(
        image,
        color,
        left,
        top + text_height,
        FONT_SCALE,
        TEXT_THICKNESS,
        &label,
      );
    }

    Ok(())
  }
}

/// 计算绘制用角点
///
/// 只钳制远角：`right`/`bottom` 被限制在 `[0, 图像尺寸]` 内，
/// `left`/`top` 保持原样。负的或越界的近角使矩形退化或部分离开画布，
/// 可见结果交由绘制原语的裁剪行为决定。这一不对称是有意保留的。
pub fn box_corners(detection: &Detection, cols: u32, rows: u32) -> (i32, i32, i32, i32) {
  let left = detection.x_offset;
  let top = detection.y_offset;
  let right = (detection.x_offset + detection.width).clamp(0, cols as i32);
  let bottom = (detection.y_offset + detection.height).clamp(0, rows as i32);
  (left, top, right, bottom)
}

/// 置信度文本：定点三位小数
pub fn format_score(score: f32) -> String {
  format!("{score:.3}")
}

/// 绘制空心矩形，两角取含端点语义
///
/// 先归一化两角再绘制；线宽 2 通过外圈加内缩 1 像素的第二圈实现。
fn draw_box(image: &mut RgbImage, left: i32, top: i32, right: i32, bottom: i32, color: Rgb<u8>) {
  let (x0, x1) = (left.min(right), left.max(right));
  let (y0, y1) = (top.min(bottom), top.max(bottom));
  let width = (x1 - x0 + 1) as u32;
  let height = (y1 - y0 + 1) as u32;

  for inset in 0..BOX_THICKNESS {
    let w = width.saturating_sub(2 * inset as u32);
    let h = height.saturating_sub(2 * inset as u32);
    if w == 0 || h == 0 {
      break;
    }
    draw_hollow_rect_mut(image, Rect::at(x0 + inset, y0 + inset).of_size(w, h), color);
  }
}
