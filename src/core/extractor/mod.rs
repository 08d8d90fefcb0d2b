//! # Extractor Module
//!
//! Turns one decoded image into the metrics every later stage works from.
//!
//! The extractor takes pixels, never a path: the pipeline decodes each file
//! exactly once and both the hash and the blur metrics come from that decode.

use crate::core::faces::{summarize_faces, FaceBlurSummary, FaceDetector};
use crate::core::hasher::{FastDecoder, HashAlgorithm, ImageHashValue, PerceptualHasher};
use crate::core::quality::laplacian_variance;
use crate::core::scanner::PhotoFile;
use crate::error::ReadError;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Metrics derived from one decoded image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageMetrics {
    pub hash: ImageHashValue,
    /// Variance of the Laplacian over the whole frame (higher = sharper)
    pub focus_score: f64,
    /// Present only when a face detector ran
    pub faces: Option<FaceBlurSummary>,
}

/// Everything the engine knows about one successfully read file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    pub hash: ImageHashValue,
    pub focus_score: f64,
    pub faces: Option<FaceBlurSummary>,
}

impl ImageRecord {
    pub fn from_metrics(photo: &PhotoFile, metrics: ImageMetrics) -> Self {
        Self {
            path: photo.path.clone(),
            size: photo.size,
            hash: metrics.hash,
            focus_score: metrics.focus_score,
            faces: metrics.faces,
        }
    }
}

/// Computes hash, focus score and face blur summary
pub struct MetricExtractor {
    hasher: PerceptualHasher,
    blur_threshold: f64,
}

impl MetricExtractor {
    /// Create an extractor classifying faces against `blur_threshold`
    pub fn new(blur_threshold: f64) -> Self {
        Self {
            hasher: PerceptualHasher::default(),
            blur_threshold,
        }
    }

    /// Extract metrics from an already-decoded image
    ///
    /// Face analysis runs only when a detector is supplied.
    pub fn extract(
        &self,
        image: &DynamicImage,
        detector: Option<&mut dyn FaceDetector>,
    ) -> ImageMetrics {
        let hash = self.hasher.hash_image(image);
        let gray = image.to_luma8();
        let focus_score = laplacian_variance(&gray);

        let faces = detector.map(|detector| {
            let regions = detector.detect(&gray);
            summarize_faces(&gray, &regions, self.blur_threshold)
        });

        ImageMetrics {
            hash,
            focus_score,
            faces,
        }
    }

    /// Decode a discovered file once and extract its record
    pub fn extract_file(
        &self,
        photo: &PhotoFile,
        detector: Option<&mut dyn FaceDetector>,
    ) -> Result<ImageRecord, ReadError> {
        let image = FastDecoder::decode(&photo.path)?;
        let metrics = self.extract(&image, detector);
        Ok(ImageRecord::from_metrics(photo, metrics))
    }
}
