//! # Faces Module
//!
//! Face detection and per-face sharpness.
//!
//! Detection sits behind the [`FaceDetector`] trait. Detectors are not shared
//! between threads: every extraction worker builds its own instance from a
//! [`FaceDetectorFactory`], which only holds immutable model data.
//!
//! The bundled detector runs the SeetaFace frontal cascade through `rustface`.

use crate::core::quality::{laplacian_variance_in, Region};
use crate::error::FaceError;
use image::GrayImage;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File name of the SeetaFace frontal detection model
pub const DEFAULT_MODEL_FILE: &str = "seeta_fd_frontal_v1.0.bin";

/// Detects face regions in a grayscale image
pub trait FaceDetector {
    /// Return every detected face. An empty list is a valid outcome.
    fn detect(&mut self, gray: &GrayImage) -> Vec<Region>;
}

/// Builds detectors for extraction; each parallel job gets its own instance
pub trait FaceDetectorFactory: Send + Sync {
    /// Create a fresh detector instance
    fn create(&self) -> Result<Box<dyn FaceDetector>, FaceError>;
}

/// Outcome of face-scoped blur measurement for one image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FaceBlurSummary {
    /// Faces detected
    pub total: u32,
    /// Faces whose sharpness fell below the blur threshold
    pub blurred: u32,
}

impl FaceBlurSummary {
    pub fn new(total: u32, blurred: u32) -> Self {
        Self { total, blurred }
    }
}

/// Score every face region independently and count the blurred ones
///
/// A face is blurred when its Laplacian variance is strictly below
/// `blur_threshold`, the same rule used for whole images.
pub fn summarize_faces(gray: &GrayImage, faces: &[Region], blur_threshold: f64) -> FaceBlurSummary {
    let blurred = faces
        .iter()
        .filter(|face| laplacian_variance_in(gray, **face) < blur_threshold)
        .count();

    FaceBlurSummary {
        total: faces.len() as u32,
        blurred: blurred as u32,
    }
}

/// Default location of the face model: `<data dir>/snapsort/seeta_fd_frontal_v1.0.bin`
pub fn default_model_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("snapsort").join(DEFAULT_MODEL_FILE))
}

/// Tuning for the SeetaFace detector
#[derive(Debug, Clone, Copy)]
pub struct SeetaFaceSettings {
    pub min_face_size: u32,
    pub score_threshold: f64,
    pub pyramid_scale_factor: f32,
    pub window_step: u32,
}

impl Default for SeetaFaceSettings {
    fn default() -> Self {
        Self {
            min_face_size: 20,
            score_threshold: 2.0,
            pyramid_scale_factor: 0.8,
            window_step: 4,
        }
    }
}

/// Factory for SeetaFace detectors backed by an in-memory model file
#[derive(Clone)]
pub struct SeetaFaceFactory {
    model: Arc<Vec<u8>>,
    settings: SeetaFaceSettings,
}

impl std::fmt::Debug for SeetaFaceFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeetaFaceFactory")
            .field("model_bytes", &self.model.len())
            .field("settings", &self.settings)
            .finish()
    }
}

impl SeetaFaceFactory {
    /// Load and validate a model file
    pub fn load(path: &Path) -> Result<Self, FaceError> {
        if !path.is_file() {
            return Err(FaceError::ModelNotFound {
                path: path.to_path_buf(),
            });
        }

        let bytes = fs::read(path).map_err(|e| FaceError::ModelInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        rustface::read_model(Cursor::new(bytes.as_slice())).map_err(|e| {
            FaceError::ModelInvalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            model: Arc::new(bytes),
            settings: SeetaFaceSettings::default(),
        })
    }

    /// Load from an explicit path, or from [`default_model_path`]
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, FaceError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let path = default_model_path().ok_or(FaceError::NoModelLocation)?;
                Self::load(&path)
            }
        }
    }
}

impl FaceDetectorFactory for SeetaFaceFactory {
    fn create(&self) -> Result<Box<dyn FaceDetector>, FaceError> {
        let model = rustface::read_model(Cursor::new(self.model.as_slice())).map_err(|e| {
            FaceError::ModelInvalid {
                path: PathBuf::from(DEFAULT_MODEL_FILE),
                reason: e.to_string(),
            }
        })?;

        let mut inner = rustface::create_detector_with_model(model);
        inner.set_min_face_size(self.settings.min_face_size);
        inner.set_score_thresh(self.settings.score_threshold);
        inner.set_pyramid_scale_factor(self.settings.pyramid_scale_factor);
        inner.set_slide_window_step(self.settings.window_step, self.settings.window_step);

        Ok(Box::new(SeetaFaceDetector { inner }))
    }
}

/// SeetaFace frontal face detector
pub struct SeetaFaceDetector {
    inner: Box<dyn rustface::Detector>,
}

impl FaceDetector for SeetaFaceDetector {
    fn detect(&mut self, gray: &GrayImage) -> Vec<Region> {
        let (width, height) = gray.dimensions();
        let data = rustface::ImageData::new(gray.as_raw(), width, height);

        self.inner
            .detect(&data)
            .iter()
            .filter_map(|face| {
                let bbox = face.bbox();
                Region::clipped(
                    i64::from(bbox.x()),
                    i64::from(bbox.y()),
                    i64::from(bbox.width()),
                    i64::from(bbox.height()),
                    (width, height),
                )
            })
            .collect()
    }
}
