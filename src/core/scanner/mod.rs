//! # Scanner Module
//!
//! Discovers candidate image files under an input directory.
//!
//! ## Guarantees
//! - Paths are absolute (the root is canonicalized first)
//! - Only files whose extension is on the allow-list are returned (case-insensitive)
//! - Output is sorted by lower-cased path, so repeated runs see the same order
//! - Category folders inside the input tree can be excluded so moved files
//!   are not picked up again
//!
//! ## Example
//! ```rust,ignore
//! use snapsort::core::scanner::{PhotoScanner, ScanConfig, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::new(ScanConfig::default());
//! let result = scanner.scan(Path::new("/Users/me/Pictures"))?;
//! ```

mod filter;
mod walker;

pub use filter::{normalize_extensions, ImageFilter};
pub use walker::{ScanConfig, WalkDirScanner};

use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Represents a discovered photo file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoFile {
    /// Absolute path to the photo file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl PhotoFile {
    /// Lower-cased extension with a leading dot, or an empty string
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()))
            .unwrap_or_default()
    }
}

/// Result of a scan operation
#[derive(Debug)]
pub struct ScanResult {
    /// Successfully discovered photos, in discovery order
    pub photos: Vec<PhotoFile>,
    /// Errors that occurred during scanning (non-fatal)
    pub errors: Vec<ScanError>,
}

/// Trait for photo scanners
///
/// Implement this trait to create custom scanners (e.g., for testing).
pub trait PhotoScanner: Send + Sync {
    /// Scan one root directory.
    ///
    /// A missing or unreadable root is an error; problems with individual
    /// entries below it are collected in [`ScanResult::errors`].
    fn scan(&self, root: &Path) -> Result<ScanResult, ScanError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased_with_dot() {
        let photo = PhotoFile {
            path: PathBuf::from("/photos/IMG_0001.JPG"),
            size: 1,
        };
        assert_eq!(photo.extension(), ".jpg");
    }

    #[test]
    fn missing_extension_is_empty() {
        let photo = PhotoFile {
            path: PathBuf::from("/photos/README"),
            size: 1,
        };
        assert_eq!(photo.extension(), "");
    }
}
