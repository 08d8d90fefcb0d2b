//! # Error Module
//!
//! Error types for snapsort.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Only input errors are fatal** - per-file failures are counted and the run continues

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
///
/// Only failures that stop a run end up here. Per-file read, face and
/// transfer errors are counted in the run summary instead.
#[derive(Error, Debug)]
pub enum SnapsortError {
    #[error("Input error: {0}")]
    Input(#[from] ScanError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to write output: {0}")]
    Output(String),
}

/// Fatal errors about the input tree, raised before any file is analyzed
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Input directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Input path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Output directory is not writable: {path}. Use --output-dir to pick a writable location or fix permissions.")]
    OutputNotWritable { path: PathBuf },

    #[error("Input directory is not writable for moving files: {path}. Fix permissions or use --keep-originals.")]
    InputNotWritable { path: PathBuf },
}

/// A single file could not be read or decoded
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Failed to decode image {path}: {reason}")]
    DecodeError { path: PathBuf, reason: String },

    #[error("Image is empty or corrupted: {path}")]
    EmptyImage { path: PathBuf },

    #[error("Failed to open image file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReadError {
    /// Path of the file that failed
    pub fn path(&self) -> &PathBuf {
        match self {
            ReadError::DecodeError { path, .. }
            | ReadError::EmptyImage { path }
            | ReadError::IoError { path, .. } => path,
        }
    }
}

/// Face detector could not be initialised
#[derive(Error, Debug)]
pub enum FaceError {
    #[error("Face model not found at {path}")]
    ModelNotFound { path: PathBuf },

    #[error("Failed to load face model {path}: {reason}")]
    ModelInvalid { path: PathBuf, reason: String },

    #[error("No face model path configured and no default location available")]
    NoModelLocation,
}

/// A move or copy into a category folder failed
#[derive(Error, Debug)]
pub enum MaterializeError {
    #[error("Source file not found: {path}")]
    SourceMissing { path: PathBuf },

    #[error("Failed to create folder {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to transfer {source_path} -> {destination}: {source}")]
    Transfer {
        source_path: PathBuf,
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No free file name for {file_name} in {folder} after {attempts} attempts")]
    CollisionExhausted {
        folder: PathBuf,
        file_name: String,
        attempts: u32,
    },
}

/// Invalid configuration values
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid duplicate threshold: {value} (must be 0-64)")]
    InvalidThreshold { value: u32 },

    #[error("Invalid blur threshold: {value} (must be a positive number)")]
    InvalidBlurThreshold { value: f64 },

    #[error("Invalid partial blur percent: {value} (must be 0-100)")]
    InvalidPercent { value: u32 },

    #[error("Invalid worker count: {value}")]
    InvalidWorkers { value: String },

    #[error("Invalid folder name {name:?}: must be a single non-empty path component")]
    InvalidFolderName { name: String },

    #[error("No file extensions configured")]
    NoExtensions,

    #[error("Failed to read config file {path}: {reason}")]
    File { path: PathBuf, reason: String },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, SnapsortError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_error_includes_path() {
        let error = ScanError::DirectoryNotFound {
            path: PathBuf::from("/photos/vacation"),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/vacation"));
    }

    #[test]
    fn read_error_includes_path_and_reason() {
        let error = ReadError::DecodeError {
            path: PathBuf::from("/photos/broken.jpg"),
            reason: "invalid JPEG".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/broken.jpg"));
        assert!(message.contains("invalid JPEG"));
        assert_eq!(error.path(), &PathBuf::from("/photos/broken.jpg"));
    }

    #[test]
    fn output_error_suggests_recovery() {
        let error = ScanError::OutputNotWritable {
            path: PathBuf::from("/readonly"),
        };
        assert!(error.to_string().contains("--output-dir"));
    }

    #[test]
    fn collision_error_reports_attempts() {
        let error = MaterializeError::CollisionExhausted {
            folder: PathBuf::from("/out/duplicate"),
            file_name: "IMG_1.jpg".to_string(),
            attempts: 10_000,
        };
        let message = error.to_string();
        assert!(message.contains("IMG_1.jpg"));
        assert!(message.contains("10000"));
    }

    #[test]
    fn input_error_converts_into_top_level() {
        let error: SnapsortError = ScanError::NotADirectory {
            path: PathBuf::from("/photos/a.jpg"),
        }
        .into();
        assert!(matches!(error, SnapsortError::Input(_)));
    }

    #[test]
    fn only_run_stopping_errors_convert_into_top_level() {
        let error: SnapsortError = ConfigError::NoExtensions.into();
        assert!(matches!(error, SnapsortError::Config(_)));
        assert!(error.to_string().starts_with("Configuration error"));
    }
}
