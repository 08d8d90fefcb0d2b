//! # Core Module
//!
//! The photo sorting engine, independent of the command line front end.
//!
//! ## Modules
//! - `scanner` - Discovers photos in directories
//! - `hasher` - Decodes images and computes perceptual hashes
//! - `quality` - Laplacian variance focus metric
//! - `faces` - Face detection and per-face sharpness
//! - `extractor` - Computes all metrics from one decode
//! - `comparator` - Clusters near-duplicates by hash distance
//! - `classifier` - Turns sharpness into a blur verdict
//! - `resolver` - Picks one category per file
//! - `organize` - Moves or copies files into category folders
//! - `reporter` - Optional text and CSV listings
//! - `pipeline` - Orchestrates the full workflow

pub mod classifier;
pub mod comparator;
pub mod extractor;
pub mod faces;
pub mod hasher;
pub mod organize;
pub mod pipeline;
pub mod quality;
pub mod reporter;
pub mod resolver;
pub mod scanner;

// Re-export commonly used types
pub use classifier::{BlurMode, BlurVerdict};
pub use comparator::{CanonicalPolicy, ClusterId, DuplicateClusterer};
pub use extractor::ImageRecord;
pub use hasher::{ImageHashValue, PerceptualHash};
pub use pipeline::{Pipeline, PipelineConfig, PipelineResult, RunSummary};
pub use resolver::{Category, FinalDecision};
pub use scanner::PhotoFile;
