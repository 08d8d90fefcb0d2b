//! Run configuration.

use crate::core::classifier::BlurMode;
use crate::core::comparator::CanonicalPolicy;
use crate::core::organize::TransferMode;
use crate::core::reporter::ListingFormat;
use crate::core::resolver::FolderNames;
use crate::core::scanner::normalize_extensions;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Size of the extraction worker pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "WorkersRepr", into = "WorkersRepr")]
pub enum Workers {
    /// One worker per available core
    #[default]
    Auto,
    Fixed(usize),
}

impl Workers {
    /// Concrete thread count
    pub fn resolve(&self) -> usize {
        match self {
            Workers::Auto => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            Workers::Fixed(n) => (*n).max(1),
        }
    }
}

impl FromStr for Workers {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Workers::Auto);
        }
        match trimmed.parse::<usize>() {
            Ok(n) if n > 0 => Ok(Workers::Fixed(n)),
            _ => Err(ConfigError::InvalidWorkers {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Workers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Workers::Auto => write!(f, "auto"),
            Workers::Fixed(n) => write!(f, "{}", n),
        }
    }
}

/// JSON accepts either `"auto"` or a number
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WorkersRepr {
    Count(usize),
    Name(String),
}

impl TryFrom<WorkersRepr> for Workers {
    type Error = ConfigError;

    fn try_from(repr: WorkersRepr) -> Result<Self, Self::Error> {
        match repr {
            WorkersRepr::Count(0) => Err(ConfigError::InvalidWorkers {
                value: "0".to_string(),
            }),
            WorkersRepr::Count(n) => Ok(Workers::Fixed(n)),
            WorkersRepr::Name(name) => name.parse(),
        }
    }
}

impl From<Workers> for WorkersRepr {
    fn from(workers: Workers) -> Self {
        match workers {
            Workers::Auto => WorkersRepr::Name("auto".to_string()),
            Workers::Fixed(n) => WorkersRepr::Count(n),
        }
    }
}

/// Optional listings written to the log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingOptions {
    /// Successfully read files, grouped by extension
    pub print_scanned: bool,
    /// Focus score, face count and outcome per file
    pub print_metrics: bool,
    /// Planned transfers, grouped by extension
    pub print_ready: bool,
    pub format: ListingFormat,
}

/// Everything one run needs to know
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input_dir: PathBuf,
    /// Base for category folders; the input directory when unset
    pub output_dir: Option<PathBuf>,
    /// Maximum Hamming distance (inclusive) between near-duplicates
    pub duplicate_threshold: u32,
    /// Laplacian variance below which an image or face is blurred
    pub blur_threshold: f64,
    pub blur_mode: BlurMode,
    /// Share of blurred faces (0-100) from which an image is PARTIAL
    pub partial_blur_min_percent: u32,
    pub prefer_duplicate_over_blur: bool,
    /// In face mode, judge images without faces on the whole frame
    pub image_fallback_without_faces: bool,
    pub canonical_policy: CanonicalPolicy,
    pub workers: Workers,
    pub extensions: Vec<String>,
    pub recursive: bool,
    pub include_hidden: bool,
    pub dry_run: bool,
    /// Copy instead of move
    pub keep_originals: bool,
    pub folders: FolderNames,
    /// SeetaFace model file; a per-user data location when unset
    pub face_model: Option<PathBuf>,
    pub listings: ListingOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: None,
            duplicate_threshold: 5,
            blur_threshold: 100.0,
            blur_mode: BlurMode::Faces,
            partial_blur_min_percent: 50,
            prefer_duplicate_over_blur: true,
            image_fallback_without_faces: false,
            canonical_policy: CanonicalPolicy::FirstEncountered,
            workers: Workers::Auto,
            extensions: vec![".jpg".to_string(), ".jpeg".to_string(), ".nef".to_string()],
            recursive: false,
            include_hidden: false,
            dry_run: false,
            keep_originals: false,
            folders: FolderNames::default(),
            face_model: None,
            listings: ListingOptions::default(),
        }
    }
}

impl PipelineConfig {
    /// Load a JSON config file; missing keys keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::File {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::File {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Reject values no run could use
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.duplicate_threshold > 64 {
            return Err(ConfigError::InvalidThreshold {
                value: self.duplicate_threshold,
            });
        }
        if !self.blur_threshold.is_finite() || self.blur_threshold <= 0.0 {
            return Err(ConfigError::InvalidBlurThreshold {
                value: self.blur_threshold,
            });
        }
        if self.partial_blur_min_percent > 100 {
            return Err(ConfigError::InvalidPercent {
                value: self.partial_blur_min_percent,
            });
        }
        if let Workers::Fixed(0) = self.workers {
            return Err(ConfigError::InvalidWorkers {
                value: "0".to_string(),
            });
        }
        if self.normalized_extensions().is_empty() {
            return Err(ConfigError::NoExtensions);
        }
        self.folders.validate()
    }

    /// Extensions in lower case without leading dots
    pub fn normalized_extensions(&self) -> Vec<String> {
        normalize_extensions(&self.extensions)
    }

    pub fn transfer_mode(&self) -> TransferMode {
        TransferMode::from_keep_originals(self.keep_originals)
    }
}
