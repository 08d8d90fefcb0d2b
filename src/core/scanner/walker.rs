//! Directory walking implementation using walkdir.

use super::filter::{normalize_extensions, ImageFilter, DEFAULT_EXTENSIONS};
use super::{PhotoFile, PhotoScanner, ScanResult};
use crate::error::ScanError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Configuration for the directory scanner
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Descend into subdirectories
    pub recursive: bool,
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Extensions to include (any case, dot optional)
    pub extensions: Vec<String>,
    /// Directories whose contents are never returned
    pub exclude_dirs: Vec<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            recursive: false,
            follow_symlinks: false,
            include_hidden: false,
            extensions: normalize_extensions(DEFAULT_EXTENSIONS),
            exclude_dirs: Vec::new(),
        }
    }
}

/// Scanner implementation using the walkdir crate
pub struct WalkDirScanner {
    config: ScanConfig,
    filter: ImageFilter,
}

impl WalkDirScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        let filter = ImageFilter::new()
            .with_hidden(config.include_hidden)
            .with_extensions(&config.extensions);

        Self { config, filter }
    }

    /// Resolve the root to an absolute directory path
    pub fn resolve_root(root: &Path) -> Result<PathBuf, ScanError> {
        let resolved = fs::canonicalize(root).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => ScanError::PermissionDenied {
                path: root.to_path_buf(),
            },
            _ => ScanError::DirectoryNotFound {
                path: root.to_path_buf(),
            },
        })?;

        if !resolved.is_dir() {
            return Err(ScanError::NotADirectory { path: resolved });
        }

        // An unreadable root is fatal, unlike unreadable entries below it
        fs::read_dir(&resolved).map_err(|e| ScanError::ReadDirectory {
            path: resolved.clone(),
            source: e,
        })?;

        Ok(resolved)
    }

    fn resolved_excludes(&self) -> Vec<PathBuf> {
        self.config
            .exclude_dirs
            .iter()
            .map(|dir| fs::canonicalize(dir).unwrap_or_else(|_| dir.clone()))
            .collect()
    }
}

impl PhotoScanner for WalkDirScanner {
    fn scan(&self, root: &Path) -> Result<ScanResult, ScanError> {
        let root = Self::resolve_root(root)?;
        let excludes = self.resolved_excludes();
        let include_hidden = self.config.include_hidden;

        let mut walker = WalkDir::new(&root).follow_links(self.config.follow_symlinks);
        if !self.config.recursive {
            walker = walker.max_depth(1);
        }

        let mut photos = Vec::new();
        let mut errors = Vec::new();

        let entries = walker.into_iter().filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            if !entry.file_type().is_dir() {
                return true;
            }
            if excludes.iter().any(|ex| entry.path().starts_with(ex)) {
                debug!(path = %entry.path().display(), "Skipping excluded folder");
                return false;
            }
            include_hidden
                || !entry
                    .file_name()
                    .to_str()
                    .map(|name| name.starts_with('.'))
                    .unwrap_or(false)
        });

        for entry_result in entries {
            match entry_result {
                Ok(entry) => {
                    if !entry.file_type().is_file() && !entry.path().is_file() {
                        continue;
                    }

                    let path = entry.path();
                    if !self.filter.should_include(path) {
                        continue;
                    }

                    match entry.metadata() {
                        Ok(metadata) => photos.push(PhotoFile {
                            path: path.to_path_buf(),
                            size: metadata.len(),
                        }),
                        Err(e) => {
                            warn!(path = %path.display(), error = %e, "Failed to read file metadata");
                            errors.push(ScanError::ReadDirectory {
                                path: path.to_path_buf(),
                                source: std::io::Error::other(e.to_string()),
                            });
                        }
                    }
                }
                Err(e) => {
                    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();

                    let error = if e.io_error().map(|e| e.kind())
                        == Some(std::io::ErrorKind::PermissionDenied)
                    {
                        ScanError::PermissionDenied { path }
                    } else {
                        ScanError::ReadDirectory {
                            path,
                            source: std::io::Error::other(e.to_string()),
                        }
                    };

                    warn!(error = %error, "Skipping unreadable entry");
                    errors.push(error);
                }
            }
        }

        // Deterministic ordering
        photos.sort_by_cached_key(|p| p.path.to_string_lossy().to_lowercase());

        Ok(ScanResult { photos, errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_test_photo(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
        path
    }

    fn names(result: &ScanResult) -> Vec<String> {
        result
            .photos
            .iter()
            .map(|p| p.path.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn scan_empty_directory_returns_empty_vec() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = WalkDirScanner::new(ScanConfig::default());

        let result = scanner.scan(temp_dir.path()).unwrap();

        assert!(result.photos.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn scan_returns_absolute_sorted_paths() {
        let temp_dir = TempDir::new().unwrap();
        create_test_photo(temp_dir.path(), "b.jpg");
        create_test_photo(temp_dir.path(), "A.JPG");
        create_test_photo(temp_dir.path(), "c.jpeg");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(temp_dir.path()).unwrap();

        assert_eq!(names(&result), vec!["A.JPG", "b.jpg", "c.jpeg"]);
        assert!(result.photos.iter().all(|p| p.path.is_absolute()));
        assert!(result.photos.iter().all(|p| p.size == 4));
    }

    #[test]
    fn scan_excludes_non_image_files() {
        let temp_dir = TempDir::new().unwrap();
        create_test_photo(temp_dir.path(), "photo.jpg");
        File::create(temp_dir.path().join("document.txt")).unwrap();
        File::create(temp_dir.path().join("image.png")).unwrap();

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(temp_dir.path()).unwrap();

        assert_eq!(names(&result), vec!["photo.jpg"]);
    }

    #[test]
    fn non_recursive_scan_ignores_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();
        create_test_photo(temp_dir.path(), "root.jpg");
        create_test_photo(&subdir, "nested.jpg");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(temp_dir.path()).unwrap();

        assert_eq!(names(&result), vec!["root.jpg"]);
    }

    #[test]
    fn recursive_scan_traverses_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();
        create_test_photo(temp_dir.path(), "root.jpg");
        create_test_photo(&subdir, "nested.jpg");

        let config = ScanConfig {
            recursive: true,
            ..Default::default()
        };
        let result = WalkDirScanner::new(config).scan(temp_dir.path()).unwrap();

        assert_eq!(result.photos.len(), 2);
    }

    #[test]
    fn excluded_folders_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let dup_dir = temp_dir.path().join("duplicate");
        fs::create_dir(&dup_dir).unwrap();
        create_test_photo(temp_dir.path(), "keep.jpg");
        create_test_photo(&dup_dir, "moved.jpg");

        let config = ScanConfig {
            recursive: true,
            exclude_dirs: vec![dup_dir],
            ..Default::default()
        };
        let result = WalkDirScanner::new(config).scan(temp_dir.path()).unwrap();

        assert_eq!(names(&result), vec!["keep.jpg"]);
    }

    #[test]
    fn scan_excludes_hidden_files_by_default() {
        let temp_dir = TempDir::new().unwrap();
        create_test_photo(temp_dir.path(), "visible.jpg");
        create_test_photo(temp_dir.path(), ".hidden.jpg");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(temp_dir.path()).unwrap();

        assert_eq!(names(&result), vec!["visible.jpg"]);
    }

    #[test]
    fn custom_extensions_are_honoured() {
        let temp_dir = TempDir::new().unwrap();
        create_test_photo(temp_dir.path(), "a.png");
        create_test_photo(temp_dir.path(), "b.jpg");

        let config = ScanConfig {
            extensions: vec![".PNG".to_string()],
            ..Default::default()
        };
        let result = WalkDirScanner::new(config).scan(temp_dir.path()).unwrap();

        assert_eq!(names(&result), vec!["a.png"]);
    }

    #[test]
    fn scan_nonexistent_directory_is_fatal() {
        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(Path::new("/nonexistent/path/12345"));

        assert!(matches!(result, Err(ScanError::DirectoryNotFound { .. })));
    }

    #[test]
    fn scan_file_as_root_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let file = create_test_photo(temp_dir.path(), "photo.jpg");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(&file);

        assert!(matches!(result, Err(ScanError::NotADirectory { .. })));
    }
}
