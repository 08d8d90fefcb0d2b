//! Synthetic image fixtures shared by the integration tests.

#![allow(dead_code)]

use image::{DynamicImage, GrayImage, ImageBuffer, ImageFormat, Luma};
use std::f32::consts::PI;
use std::path::Path;

/// 8x8 blocks of pseudo-random brightness with a fine checker texture on top.
///
/// Different seeds give unrelated block layouts, hence far-apart hashes; the
/// texture keeps the Laplacian variance in the thousands.
pub fn sharp_image(seed: u32) -> GrayImage {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(12_345);
    let mut blocks = [0u8; 64];
    for block in blocks.iter_mut() {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        *block = (state >> 16) as u8;
    }

    ImageBuffer::from_fn(64, 64, |x, y| {
        let base = i32::from(blocks[((y / 8) * 8 + x / 8) as usize]);
        let texture = if (x + y) % 2 == 0 { 40 } else { -40 };
        Luma([(base + texture).clamp(0, 255) as u8])
    })
}

/// Smooth low-frequency wave; Laplacian variance stays near zero
pub fn blurry_image(phase: f32) -> GrayImage {
    ImageBuffer::from_fn(64, 64, |x, y| {
        let fx = x as f32 / 64.0 * PI + phase;
        let fy = y as f32 / 64.0 * 2.0 * PI + phase;
        Luma([(128.0 + 90.0 * fx.sin() * fy.cos()) as u8])
    })
}

/// Top half like [`sharp_image`], bottom half like [`blurry_image`]
pub fn half_sharp_image(seed: u32) -> GrayImage {
    let top = sharp_image(seed);
    let bottom = blurry_image(0.3);
    ImageBuffer::from_fn(64, 64, |x, y| {
        if y < 32 {
            *top.get_pixel(x, y)
        } else {
            *bottom.get_pixel(x, y)
        }
    })
}

pub fn save(image: &GrayImage, path: &Path) {
    image.save(path).unwrap();
}

/// Save as an RGB JPEG, whatever the file name says
pub fn save_jpeg(image: &GrayImage, path: &Path) {
    DynamicImage::ImageLuma8(image.clone())
        .to_rgb8()
        .save_with_format(path, ImageFormat::Jpeg)
        .unwrap();
}

/// Save as a TIFF container, the layout NEF raw files share
pub fn save_tiff(image: &GrayImage, path: &Path) {
    DynamicImage::ImageLuma8(image.clone())
        .to_rgb8()
        .save_with_format(path, ImageFormat::Tiff)
        .unwrap();
}
