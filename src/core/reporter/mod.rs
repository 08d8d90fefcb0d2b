//! # Reporter Module
//!
//! Optional listings of what a run saw and what it is about to do.
//!
//! ## Listings
//! 1. **Scanned**: successfully read files, grouped by extension
//! 2. **Metrics**: focus score, face count and outcome per file
//! 3. **Ready**: planned transfers, grouped by extension
//!
//! Each listing renders as indented text or as CSV with a header row.

mod listing;

pub use listing::{log_listing, write_metrics, write_ready, write_scanned, PlannedTransfer};

use serde::{Deserialize, Serialize};

/// Listing output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingFormat {
    #[default]
    Text,
    Csv,
}
