// 该文件是 Danqing （丹青） 项目的一部分。
// src/annotator/font.rs - 置信度文本的内置笔画字体
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

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

/// 字形格高度（单位坐标，0 为顶端，21 为基线）
const EM_HEIGHT: f32 = 21.0;
/// 数字字形的步进宽度（单位坐标）
const DIGIT_ADVANCE: f32 = 20.0;

/// 单个字形：步进宽度加若干条折线
///
/// 置信度文本只会出现数字与小数点，字表也只覆盖这些字符。
struct Glyph {
  advance: f32,
  strokes: &'static [&'static [(f32, f32)]],
}

const GLYPH_0: Glyph = Glyph {
  advance: DIGIT_ADVANCE,
  strokes: &[&[(2.0, 0.0), (16.0, 0.0), (16.0, 21.0), (2.0, 21.0), (2.0, 0.0)]],
};
const GLYPH_1: Glyph = Glyph {
  advance: DIGIT_ADVANCE,
  strokes: &[&[(5.0, 4.0), (9.0, 0.0), (9.0, 21.0)]],
};
const GLYPH_2: Glyph = Glyph {
  advance: DIGIT_ADVANCE,
  strokes: &[&[
    (2.0, 0.0),
    (16.0, 0.0),
    (16.0, 10.0),
    (2.0, 10.0),
    (2.0, 21.0),
    (16.0, 21.0),
  ]],
};
const GLYPH_3: Glyph = Glyph {
  advance: DIGIT_ADVANCE,
  strokes: &[
    &[(2.0, 0.0), (16.0, 0.0), (16.0, 21.0), (2.0, 21.0)],
    &[(6.0, 10.0), (16.0, 10.0)],
  ],
};
const GLYPH_4: Glyph = Glyph {
  advance: DIGIT_ADVANCE,
  strokes: &[
    &[(2.0, 0.0), (2.0, 10.0), (16.0, 10.0)],
    &[(16.0, 0.0), (16.0, 21.0)],
  ],
};
const GLYPH_5: Glyph = Glyph {
  advance: DIGIT_ADVANCE,
  strokes: &[&[
    (16.0, 0.0),
    (2.0, 0.0),
    (2.0, 10.0),
    (16.0, 10.0),
    (16.0, 21.0),
    (2.0, 21.0),
  ]],
};
const GLYPH_6: Glyph = Glyph {
  advance: DIGIT_ADVANCE,
  strokes: &[&[
    (16.0, 0.0),
    (2.0, 0.0),
    (2.0, 21.0),
    (16.0, 21.0),
    (16.0, 10.0),
    (2.0, 10.0),
  ]],
};
const GLYPH_7: Glyph = Glyph {
  advance: DIGIT_ADVANCE,
  strokes: &[&[(2.0, 0.0), (16.0, 0.0), (8.0, 21.0)]],
};
const GLYPH_8: Glyph = Glyph {
  advance: DIGIT_ADVANCE,
  strokes: &[
    &[(2.0, 0.0), (16.0, 0.0), (16.0, 21.0), (2.0, 21.0), (2.0, 0.0)],
    &[(2.0, 10.0), (16.0, 10.0)],
  ],
};
const GLYPH_9: Glyph = Glyph {
  advance: DIGIT_ADVANCE,
  strokes: &[&[
    (16.0, 10.0),
    (2.0, 10.0),
    (2.0, 0.0),
    (16.0, 0.0),
    (16.0, 21.0),
    (2.0, 21.0),
  ]],
};
const GLYPH_DOT: Glyph = Glyph {
  advance: 10.0,
  strokes: &[&[(4.0, 19.0), (6.0, 19.0), (6.0, 21.0), (4.0, 21.0), (4.0, 19.0)]],
};

fn glyph_for(c: char) -> Option<&'static Glyph> {
  match c {
    '0' => Some(&GLYPH_0),
    '1' => Some(&GLYPH_1),
    '2' => Some(&GLYPH_2),
    '3' => Some(&GLYPH_3),
    '4' => Some(&GLYPH_4),
    '5' => Some(&GLYPH_5),
    '6' => Some(&GLYPH_6),
    '7' => Some(&GLYPH_7),
    '8' => Some(&GLYPH_8),
    '9' => Some(&GLYPH_9),
    '.' => Some(&GLYPH_DOT),
    _ => None,
  }
}

/// 按给定缩放测量文本的渲染尺寸（宽、高，像素）
///
/// 字表外的字符按数字宽度占位。
pub fn text_size(text: &str, scale: f32) -> (i32, i32) {
  let width: f32 = text
    .chars()
    .map(|c| glyph_for(c).map(|g| g.advance).unwrap_or(DIGIT_ADVANCE))
    .sum::<f32>()
    * scale;
  let height = EM_HEIGHT * scale;
  (width.round() as i32, height.round() as i32)
}

/// 以基线锚点绘制文本
///
/// `(x, y_baseline)` 是首字符的左端基线位置；线宽通过按像素偏移重绘实现。
/// 越界的笔画由线段绘制原语裁剪。
pub fn draw_text_mut(
  image: &mut RgbImage,
  color: Rgb<u8>,
  x: i32,
  y_baseline: i32,
  scale: f32,
  thickness: u32,
  text: &str,
) {
  let top = y_baseline as f32 - EM_HEIGHT * scale;
  let mut pen = x as f32;

  for c in text.chars() {
    let Some(glyph) = glyph_for(c) else {
      // 字表外字符：只占位，不绘制
      pen += DIGIT_ADVANCE * scale;
      continue;
    };

    for stroke in glyph.strokes {
      for pair in stroke.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        for dx in 0..thickness {
          for dy in 0..thickness {
            draw_line_segment_mut(
              image,
              (pen + x0 * scale + dx as f32, top + y0 * scale + dy as f32),
              (pen + x1 * scale + dx as f32, top + y1 * scale + dy as f32),
              color,
            );
          }
        }
      }
    }

    pen += glyph.advance * scale;
  }
}
