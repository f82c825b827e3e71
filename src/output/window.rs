// 该文件是 Danqing （丹青） 项目的一部分。
// src/output/window.rs - 基于 OpenCV highgui 的预览窗口
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
use opencv::highgui;
use opencv::prelude::*;

use super::Viewer;

/// 阻塞式预览窗口
///
/// 显示后等待任意按键，无超时。
#[derive(Debug, Default)]
pub struct WindowViewer;

impl WindowViewer {
  pub fn new() -> Self {
    Self
  }
}

impl Viewer for WindowViewer {
  fn show(&self, title: &str, image: &RgbImage) -> Result<()> {
    let (width, height) = image.dimensions();

    // highgui 按 BGR 解释三通道数据
    let mut bgr = Vec::with_capacity((width * height * 3) as usize);
    for pixel in image.pixels() {
      bgr.push(pixel[2]);
      bgr.push(pixel[1]);
      bgr.push(pixel[0]);
    }

    let mat = Mat::from_slice(&bgr).context("无法构造显示缓冲")?;
    let mat = mat.reshape(3, height as i32).context("无法重排显示缓冲")?;

    highgui::imshow(title, &mat).context("无法创建预览窗口")?;
    highgui::wait_key(0).context("等待按键失败")?;

    Ok(())
  }
}
