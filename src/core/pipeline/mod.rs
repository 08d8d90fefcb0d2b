//! # Pipeline Module
//!
//! Orchestrates a full sorting run.
//!
//! ## Pipeline Stages
//! 1. **Check** - Validate the input and, unless dry-run, that results can be written
//! 2. **Scan** - Discover candidate photos in discovery order
//! 3. **Extract** - Decode each file once and compute hash, focus score and faces
//! 4. **Cluster** - Group near-duplicates sequentially, in discovery order
//! 5. **Resolve** - Classify blur and pick one category per file
//! 6. **Materialize** - Move or copy into category folders (logged only in dry-run)
//!
//! ## Parallelism
//! Only extraction runs in parallel, on a dedicated rayon pool. Results are
//! collected index-aligned with the discovery order, so clustering sees the
//! same sequence regardless of which worker finished first.

pub mod config;
mod executor;

pub use config::{ListingOptions, PipelineConfig, Workers};
pub use executor::{Pipeline, PipelineBuilder, PipelineResult, RunContext, RunSummary};
