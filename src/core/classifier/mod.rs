//! # Classifier Module
//!
//! Maps measured sharpness to a discrete blur verdict.
//!
//! ## Modes
//! - `image` - one whole-frame focus score against the blur threshold
//! - `faces` - per-face counts against the partial-blur percentage
//!
//! Percentages are compared by cross-multiplying integers, so 2 of 4 faces at
//! 50% is exactly PARTIAL with no floating point rounding involved.

use crate::core::extractor::ImageRecord;
use crate::core::faces::FaceBlurSummary;
use serde::{Deserialize, Serialize};

/// Which signal drives blur classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlurMode {
    /// Blur is judged on detected faces only
    #[default]
    Faces,
    /// Blur is judged on the whole frame
    Image,
}

impl std::fmt::Display for BlurMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlurMode::Faces => write!(f, "faces"),
            BlurMode::Image => write!(f, "image"),
        }
    }
}

/// Whole-image verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusVerdict {
    NotBlurred,
    Blurred,
}

/// Face-scoped verdict, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceBlurVerdict {
    None,
    Slight,
    Partial,
    Full,
}

/// Blur verdict for one image in either mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "verdict", rename_all = "lowercase")]
pub enum BlurVerdict {
    Image(FocusVerdict),
    Faces(FaceBlurVerdict),
}

/// Severity bucket shared by both modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlurSeverity {
    Full,
    Partial,
    Slight,
}

impl BlurVerdict {
    /// `None` when the image is not considered blurred at all.
    ///
    /// A simple-mode BLURRED lands in the same bucket as face-mode FULL.
    pub fn severity(&self) -> Option<BlurSeverity> {
        match self {
            BlurVerdict::Image(FocusVerdict::NotBlurred) => None,
            BlurVerdict::Image(FocusVerdict::Blurred) => Some(BlurSeverity::Full),
            BlurVerdict::Faces(FaceBlurVerdict::None) => None,
            BlurVerdict::Faces(FaceBlurVerdict::Slight) => Some(BlurSeverity::Slight),
            BlurVerdict::Faces(FaceBlurVerdict::Partial) => Some(BlurSeverity::Partial),
            BlurVerdict::Faces(FaceBlurVerdict::Full) => Some(BlurSeverity::Full),
        }
    }

    pub fn is_blurred(&self) -> bool {
        self.severity().is_some()
    }
}

/// Whole-image rule: sharp enough when the score reaches the threshold
pub fn classify_focus(focus_score: f64, blur_threshold: f64) -> FocusVerdict {
    if focus_score >= blur_threshold {
        FocusVerdict::NotBlurred
    } else {
        FocusVerdict::Blurred
    }
}

/// Face rule over `blurred` of `total` faces
pub fn classify_faces(summary: FaceBlurSummary, partial_min_percent: u32) -> FaceBlurVerdict {
    let FaceBlurSummary { total, blurred } = summary;
    let (total, blurred) = (u64::from(total), u64::from(blurred.min(total)));

    if total == 0 || blurred == 0 {
        FaceBlurVerdict::None
    } else if blurred == total {
        FaceBlurVerdict::Full
    } else if blurred * 100 >= u64::from(partial_min_percent) * total {
        FaceBlurVerdict::Partial
    } else {
        FaceBlurVerdict::Slight
    }
}

/// Applies the configured blur rules to extracted records
#[derive(Debug, Clone, Copy)]
pub struct BlurClassifier {
    mode: BlurMode,
    blur_threshold: f64,
    partial_min_percent: u32,
    image_fallback_without_faces: bool,
}

impl BlurClassifier {
    pub fn new(mode: BlurMode, blur_threshold: f64, partial_min_percent: u32) -> Self {
        Self {
            mode,
            blur_threshold,
            partial_min_percent,
            image_fallback_without_faces: false,
        }
    }

    /// Judge zero-face images on the whole frame instead of abstaining
    pub fn with_image_fallback(mut self, enabled: bool) -> Self {
        self.image_fallback_without_faces = enabled;
        self
    }

    /// Classify from raw measurements.
    ///
    /// In face mode a missing summary means detection did not run for this
    /// image; it is treated like zero faces.
    pub fn classify_metrics(&self, focus_score: f64, faces: Option<FaceBlurSummary>) -> BlurVerdict {
        match self.mode {
            BlurMode::Image => BlurVerdict::Image(classify_focus(focus_score, self.blur_threshold)),
            BlurMode::Faces => {
                let summary = faces.unwrap_or_default();
                if summary.total == 0 && self.image_fallback_without_faces {
                    let verdict = match classify_focus(focus_score, self.blur_threshold) {
                        FocusVerdict::Blurred => FaceBlurVerdict::Full,
                        FocusVerdict::NotBlurred => FaceBlurVerdict::None,
                    };
                    return BlurVerdict::Faces(verdict);
                }
                BlurVerdict::Faces(classify_faces(summary, self.partial_min_percent))
            }
        }
    }

    pub fn classify(&self, record: &ImageRecord) -> BlurVerdict {
        self.classify_metrics(record.focus_score, record.faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faces(total: u32, blurred: u32) -> FaceBlurSummary {
        FaceBlurSummary::new(total, blurred)
    }

    #[test]
    fn focus_threshold_is_inclusive_on_sharp_side() {
        assert_eq!(classify_focus(40.0, 100.0), FocusVerdict::Blurred);
        assert_eq!(classify_focus(99.999, 100.0), FocusVerdict::Blurred);
        assert_eq!(classify_focus(100.0, 100.0), FocusVerdict::NotBlurred);
        assert_eq!(classify_focus(150.0, 100.0), FocusVerdict::NotBlurred);
    }

    #[test]
    fn four_face_scenarios() {
        assert_eq!(classify_faces(faces(4, 2), 50), FaceBlurVerdict::Partial);
        assert_eq!(classify_faces(faces(4, 1), 50), FaceBlurVerdict::Slight);
        assert_eq!(classify_faces(faces(4, 4), 50), FaceBlurVerdict::Full);
        assert_eq!(classify_faces(faces(4, 0), 50), FaceBlurVerdict::None);
        assert_eq!(classify_faces(faces(0, 0), 50), FaceBlurVerdict::None);
    }

    #[test]
    fn partial_boundary_uses_exact_integer_math() {
        // 1/3 = 33.33..% sits just above 33 and just below 34
        assert_eq!(classify_faces(faces(3, 1), 33), FaceBlurVerdict::Partial);
        assert_eq!(classify_faces(faces(3, 1), 34), FaceBlurVerdict::Slight);
    }

    #[test]
    fn zero_percent_makes_any_blurred_face_partial() {
        assert_eq!(classify_faces(faces(10, 1), 0), FaceBlurVerdict::Partial);
    }

    #[test]
    fn hundred_percent_leaves_only_full_or_slight() {
        assert_eq!(classify_faces(faces(10, 9), 100), FaceBlurVerdict::Slight);
        assert_eq!(classify_faces(faces(10, 10), 100), FaceBlurVerdict::Full);
    }

    #[test]
    fn image_mode_ignores_faces() {
        let classifier = BlurClassifier::new(BlurMode::Image, 100.0, 50);
        let verdict = classifier.classify_metrics(40.0, Some(faces(2, 0)));

        assert_eq!(verdict, BlurVerdict::Image(FocusVerdict::Blurred));
        assert_eq!(verdict.severity(), Some(BlurSeverity::Full));
    }

    #[test]
    fn face_mode_abstains_without_faces() {
        let classifier = BlurClassifier::new(BlurMode::Faces, 100.0, 50);

        let verdict = classifier.classify_metrics(1.0, Some(faces(0, 0)));
        assert_eq!(verdict, BlurVerdict::Faces(FaceBlurVerdict::None));
        assert!(!verdict.is_blurred());

        let verdict = classifier.classify_metrics(1.0, None);
        assert_eq!(verdict, BlurVerdict::Faces(FaceBlurVerdict::None));
    }

    #[test]
    fn zero_face_fallback_uses_whole_image() {
        let classifier = BlurClassifier::new(BlurMode::Faces, 100.0, 50).with_image_fallback(true);

        assert_eq!(
            classifier.classify_metrics(40.0, Some(faces(0, 0))),
            BlurVerdict::Faces(FaceBlurVerdict::Full)
        );
        assert_eq!(
            classifier.classify_metrics(400.0, Some(faces(0, 0))),
            BlurVerdict::Faces(FaceBlurVerdict::None)
        );
        // Faces present: fallback does not apply
        assert_eq!(
            classifier.classify_metrics(40.0, Some(faces(2, 0))),
            BlurVerdict::Faces(FaceBlurVerdict::None)
        );
    }

    #[test]
    fn severity_mapping() {
        assert_eq!(BlurVerdict::Faces(FaceBlurVerdict::Slight).severity(), Some(BlurSeverity::Slight));
        assert_eq!(BlurVerdict::Faces(FaceBlurVerdict::Partial).severity(), Some(BlurSeverity::Partial));
        assert_eq!(BlurVerdict::Image(FocusVerdict::NotBlurred).severity(), None);
    }

    #[test]
    fn blur_mode_parses_lowercase() {
        let mode: BlurMode = serde_json::from_str("\"image\"").unwrap();
        assert_eq!(mode, BlurMode::Image);
        assert_eq!(BlurMode::default().to_string(), "faces");
    }
}
