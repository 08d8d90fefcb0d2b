//! Types for the organize module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How a file reaches its category folder
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransferMode {
    /// Move the file, leaving nothing at the source
    #[default]
    Move,
    /// Copy the file (keep originals)
    Copy,
}

impl TransferMode {
    pub fn from_keep_originals(keep_originals: bool) -> Self {
        if keep_originals {
            TransferMode::Copy
        } else {
            TransferMode::Move
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            TransferMode::Move => "move",
            TransferMode::Copy => "copy",
        }
    }
}

/// One completed transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub mode: TransferMode,
}
