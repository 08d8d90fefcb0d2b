//! # Comparator Module
//!
//! Groups near-identical images by Hamming distance between perceptual hashes.
//!
//! ## Algorithm
//! Clustering is incremental and single pass:
//! 1. Each record is compared against the representative of every existing
//!    cluster (the first member's hash)
//! 2. If the smallest distance is within the threshold, the record joins that
//!    cluster; ties go to the lowest cluster id
//! 3. Otherwise a new cluster is created with the record as representative
//!
//! One member of each cluster is canonical and stays in place; the others
//! are duplicates.
//!
//! ## Example
//! ```rust,ignore
//! use snapsort::core::comparator::{CanonicalPolicy, DuplicateClusterer, ThresholdStrategy};
//!
//! let mut clusterer = DuplicateClusterer::new(ThresholdStrategy::new(5), CanonicalPolicy::default());
//! for record in records {
//!     clusterer.assign(record);
//! }
//! ```

mod clusterer;
mod traits;

pub use clusterer::{
    CanonicalPolicy, ClusterId, DuplicateCluster, DuplicateClusterer, DuplicateVerdict,
};
pub use traits::{ComparisonStrategy, ThresholdStrategy};
