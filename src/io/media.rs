// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scan image loading.
//!
//! Decodes PNG/JPEG scans into RGBA pixels ready to be uploaded as an egui
//! texture.

use crate::error::Result;
use std::path::Path;

/// Decoded RGBA image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA, 4 bytes per pixel
    pub pixels: Vec<u8>,
}

impl LoadedImage {
    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied(
            [self.width as usize, self.height as usize],
            &self.pixels,
        )
    }
}

/// Load an image file from disk.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let img = image::open(path)?;
    Ok(into_loaded(img))
}

/// Decode an image from memory, guessing the format from its header.
pub fn load_image_bytes(bytes: &[u8]) -> Result<LoadedImage> {
    let img = image::load_from_memory(bytes)?;
    Ok(into_loaded(img))
}

fn into_loaded(img: image::DynamicImage) -> LoadedImage {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    LoadedImage {
        width,
        height,
        pixels: rgba.into_raw(),
    }
}
