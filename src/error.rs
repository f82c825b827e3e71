// 该文件是 Danqing （丹青） 项目的一部分。
// src/error.rs - 错误类型定义
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

use thiserror::Error;

/// 流水线错误分类
///
/// 每一类错误都携带定位问题所需的上下文（路径、编号等），
/// 单次运行内不做重试，全部直接上抛。
#[derive(Error, Debug)]
pub enum PipelineError {
  /// 必需的输入图像路径缺失或为空
  #[error("未指定输入图像路径（image_path 为空）")]
  MissingImagePath,

  /// 输入路径无法解析为可读图像
  #[error("无法读取图像 {path}: {source}")]
  ImageLoad {
    path: String,
    source: image::ImageError,
  },

  /// 推理能力对提交的图像返回了零组检测结果
  #[error("推理结果为空：后端未返回任何检测结果组")]
  EmptyInference,

  /// 检测结果的类别编号超出调色板范围
  #[error("类别编号 {class_id} 超出调色板范围（共 {palette_len} 种颜色）")]
  PaletteIndex { class_id: usize, palette_len: usize },

  /// 标注结果无法写入目标路径
  #[error("无法保存图像 {path}: {source}")]
  OutputWrite {
    path: String,
    source: image::ImageError,
  },

  /// 需要弹出预览窗口，但当前构建没有可用的查看器
  #[error("本构建没有可用的交互式查看器（启用 display-window 特性，或改用 --save-image）")]
  ViewerUnavailable,
}
