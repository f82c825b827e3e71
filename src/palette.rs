// 该文件是 Danqing （丹青） 项目的一部分。
// src/palette.rs - 类别调色板
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

use image::Rgb;

use crate::error::PipelineError;

/// 固定的类别配色表：下标即类别编号
///
/// 颜色只用于区分类别，顺序是固定的视觉约定：0 号为白色，7 号为粉色。
const LABEL_COLORS: [[u8; 3]; 8] = [
  [255, 255, 255], // 白
  [30, 144, 255],  // 蓝
  [255, 30, 144],  // 品红
  [144, 255, 30],  // 黄绿
  [119, 11, 32],   // 暗红
  [32, 11, 119],   // 藏蓝
  [255, 255, 255], // 白
  [255, 192, 203], // 粉
];

/// 类别调色板
///
/// 查询是纯函数：同一编号永远得到同一颜色。
#[derive(Debug, Default, Clone, Copy)]
pub struct Palette;

impl Palette {
  /// 调色板条目数
  pub const LEN: usize = LABEL_COLORS.len();

  pub fn new() -> Self {
    Self
  }

  /// 按类别编号取颜色
  ///
  /// 编号越界不做回绕或默认色替代，直接携带违规编号报错。
  pub fn color_for(&self, class_id: usize) -> Result<Rgb<u8>, PipelineError> {
    LABEL_COLORS
      .get(class_id)
      .map(|c| Rgb(*c))
      .ok_or(PipelineError::PaletteIndex {
        class_id,
        palette_len: LABEL_COLORS.len(),
      })
  }
}
