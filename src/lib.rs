//! # snapsort
//!
//! Sorts a folder of photos into `duplicate`, `blurred`, `partialBlurred` and
//! `slightlyBlurred` folders.
//!
//! ## How It Works
//! - Every image is decoded once and reduced to a perceptual hash, a focus score
//!   (variance of the Laplacian) and optionally per-face sharpness
//! - Near-duplicates are grouped incrementally in discovery order
//! - Blur and duplicate verdicts are merged into one category per file
//! - Files are then moved or copied into category folders (or just logged in dry-run)
//!
//! ## Architecture
//! - `core` - The classification and clustering engine plus its collaborators
//! - `error` - Error types

pub mod core;
pub mod error;

// Re-export commonly used types at the crate root
pub use error::{Result, SnapsortError};

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the binary
///
/// `RUST_LOG` takes precedence; otherwise `default_level` (e.g. "info") is used.
/// Calling this twice is harmless: the second subscriber is ignored.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level.to_lowercase()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
