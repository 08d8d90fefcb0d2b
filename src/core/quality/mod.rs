//! # Quality Analysis Module
//!
//! Focus measurement using the variance of the Laplacian.
//!
//! The Laplacian operator responds to edges. Sharp images have strong,
//! well-defined edges and therefore a widely spread Laplacian response;
//! blurred images produce a flat response with low variance.
//!
//! Scores are computed at full resolution so they stay comparable with
//! a fixed blur threshold (100.0 by default).

use image::GrayImage;

/// Axis-aligned pixel rectangle inside an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Clip a possibly out-of-bounds rectangle (detectors may report negative
    /// origins) to the image. Returns `None` when nothing is left.
    pub fn clipped(x: i64, y: i64, width: i64, height: i64, bounds: (u32, u32)) -> Option<Self> {
        let (img_w, img_h) = (i64::from(bounds.0), i64::from(bounds.1));
        let x0 = x.clamp(0, img_w);
        let y0 = y.clamp(0, img_h);
        let x1 = (x + width).clamp(0, img_w);
        let y1 = (y + height).clamp(0, img_h);

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some(Self {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }
}

/// Variance of the Laplacian over the whole grayscale image
///
/// Kernel: `[0, 1, 0; 1, -4, 1; 0, 1, 0]`, evaluated on interior pixels.
/// Images smaller than 3x3 score 0.0.
pub fn laplacian_variance(gray: &GrayImage) -> f64 {
    let (width, height) = gray.dimensions();
    laplacian_variance_in(
        gray,
        Region {
            x: 0,
            y: 0,
            width,
            height,
        },
    )
}

/// Variance of the Laplacian restricted to one region
///
/// Only pixels whose full 3x3 neighbourhood lies inside the region contribute,
/// so a face crop is scored independently of the surrounding frame.
pub fn laplacian_variance_in(gray: &GrayImage, region: Region) -> f64 {
    let (img_w, img_h) = gray.dimensions();
    let x_end = region.x.saturating_add(region.width).min(img_w);
    let y_end = region.y.saturating_add(region.height).min(img_h);

    if x_end < region.x.saturating_add(3) || y_end < region.y.saturating_add(3) {
        return 0.0;
    }

    let mut sum = 0i64;
    let mut sum_sq = 0i64;
    let mut count = 0u64;

    for y in region.y + 1..y_end - 1 {
        for x in region.x + 1..x_end - 1 {
            let center = i64::from(gray.get_pixel(x, y)[0]);
            let top = i64::from(gray.get_pixel(x, y - 1)[0]);
            let bottom = i64::from(gray.get_pixel(x, y + 1)[0]);
            let left = i64::from(gray.get_pixel(x - 1, y)[0]);
            let right = i64::from(gray.get_pixel(x + 1, y)[0]);

            let laplacian = top + bottom + left + right - 4 * center;
            sum += laplacian;
            sum_sq += laplacian * laplacian;
            count += 1;
        }
    }

    if count == 0 {
        return 0.0;
    }

    // Variance = E[X^2] - E[X]^2
    let n = count as f64;
    let mean = sum as f64 / n;
    (sum_sq as f64 / n - mean * mean).max(0.0)
}
