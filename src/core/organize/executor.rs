//! Filesystem materializer.

use super::types::TransferMode;
use crate::error::MaterializeError;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Collision suffixes tried before giving up
pub const MAX_COLLISION_ATTEMPTS: u32 = 10_000;

/// Places one file into a target directory
pub trait Materializer {
    /// Move or copy `source` into `target_dir`, returning the final path
    fn materialize(
        &mut self,
        source: &Path,
        target_dir: &Path,
        mode: TransferMode,
    ) -> Result<PathBuf, MaterializeError>;
}

/// First free path for `file_name` inside `target_dir`.
///
/// Tries the plain name, then `stem_1.ext`, `stem_2.ext`, ... up to
/// [`MAX_COLLISION_ATTEMPTS`].
pub fn unique_destination(target_dir: &Path, file_name: &OsStr) -> Result<PathBuf, MaterializeError> {
    let candidate = target_dir.join(file_name);
    if !candidate.exists() {
        return Ok(candidate);
    }

    let as_path = Path::new(file_name);
    let stem = as_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    let ext = as_path.extension().map(|e| e.to_string_lossy().into_owned());

    for counter in 1..=MAX_COLLISION_ATTEMPTS {
        let new_name = match &ext {
            Some(ext) => format!("{}_{}.{}", stem, counter, ext),
            None => format!("{}_{}", stem, counter),
        };
        let new_path = target_dir.join(new_name);
        if !new_path.exists() {
            return Ok(new_path);
        }
    }

    Err(MaterializeError::CollisionExhausted {
        folder: target_dir.to_path_buf(),
        file_name: file_name.to_string_lossy().into_owned(),
        attempts: MAX_COLLISION_ATTEMPTS,
    })
}

/// Materializer writing to the local filesystem
#[derive(Debug, Default)]
pub struct FsMaterializer {
    created_dirs: HashSet<PathBuf>,
}

impl FsMaterializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Category folders this materializer has ensured exist
    pub fn folders_created(&self) -> usize {
        self.created_dirs.len()
    }

    fn ensure_dir(&mut self, dir: &Path) -> Result<(), MaterializeError> {
        if self.created_dirs.contains(dir) {
            return Ok(());
        }
        fs::create_dir_all(dir).map_err(|e| MaterializeError::CreateDir {
            path: dir.to_path_buf(),
            source: e,
        })?;
        self.created_dirs.insert(dir.to_path_buf());
        Ok(())
    }
}

/// Move by rename; across filesystems fall back to copy, verify, delete
fn move_file(source: &Path, destination: &Path) -> std::io::Result<()> {
    fs::rename(source, destination).or_else(|_| {
        let source_size = fs::metadata(source)?.len();
        fs::copy(source, destination)?;

        // Never delete the source unless the copy is complete
        let dest_size = fs::metadata(destination)?.len();
        if dest_size != source_size {
            let _ = fs::remove_file(destination);
            return Err(std::io::Error::other(format!(
                "Copy verification failed: source {} bytes, dest {} bytes",
                source_size, dest_size
            )));
        }

        fs::remove_file(source)
    })
}

impl Materializer for FsMaterializer {
    fn materialize(
        &mut self,
        source: &Path,
        target_dir: &Path,
        mode: TransferMode,
    ) -> Result<PathBuf, MaterializeError> {
        let file_name = match source.file_name() {
            Some(name) if source.is_file() => name,
            _ => {
                return Err(MaterializeError::SourceMissing {
                    path: source.to_path_buf(),
                })
            }
        };

        self.ensure_dir(target_dir)?;
        let destination = unique_destination(target_dir, file_name)?;

        let result = match mode {
            TransferMode::Copy => fs::copy(source, &destination).map(|_| ()),
            TransferMode::Move => move_file(source, &destination),
        };

        result.map_err(|e| MaterializeError::Transfer {
            source_path: source.to_path_buf(),
            destination: destination.clone(),
            source: e,
        })?;

        debug!(
            source = %source.display(),
            destination = %destination.display(),
            mode = mode.verb(),
            "Transferred file"
        );

        Ok(destination)
    }
}
