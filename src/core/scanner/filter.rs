//! File filtering logic for the scanner.

use std::collections::HashSet;
use std::path::Path;

/// Default allow-list: JPEG plus Nikon RAW
pub const DEFAULT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "nef"];

/// Normalize user supplied extensions.
///
/// Accepts `".JPG"`, `"jpg"` or `" .jpeg "`; returns lower-case entries without
/// the leading dot, de-duplicated in first-seen order.
pub fn normalize_extensions<I, S>(extensions: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    extensions
        .into_iter()
        .filter_map(|ext| {
            let ext = ext.as_ref().trim().trim_start_matches('.').to_lowercase();
            if ext.is_empty() || !seen.insert(ext.clone()) {
                None
            } else {
                Some(ext)
            }
        })
        .collect()
}

/// Filters files to determine if they are candidate images
pub struct ImageFilter {
    /// File extensions to include (lower case, no dot)
    extensions: HashSet<String>,
    /// Whether to include hidden files
    include_hidden: bool,
}

impl ImageFilter {
    /// Create a new filter with the default extensions
    pub fn new() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            include_hidden: false,
        }
    }

    /// Include hidden files (starting with .)
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Override the list of extensions to accept
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = normalize_extensions(extensions).into_iter().collect();
        self
    }

    /// Check if a file should be included
    pub fn should_include(&self, path: &Path) -> bool {
        if !self.include_hidden {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    return false;
                }
            }
        }

        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }
}

impl Default for ImageFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_includes_jpeg_any_case() {
        let filter = ImageFilter::new();
        assert!(filter.should_include(Path::new("/photos/image.jpg")));
        assert!(filter.should_include(Path::new("/photos/image.JPEG")));
        assert!(filter.should_include(Path::new("/photos/DSC_0001.NEF")));
    }

    #[test]
    fn filter_excludes_other_extensions_by_default() {
        let filter = ImageFilter::new();
        assert!(!filter.should_include(Path::new("/photos/image.png")));
        assert!(!filter.should_include(Path::new("/photos/document.pdf")));
    }

    #[test]
    fn custom_extensions_accept_dots_and_case() {
        let filter = ImageFilter::new().with_extensions([".PNG", "tif"]);
        assert!(filter.should_include(Path::new("/photos/a.png")));
        assert!(filter.should_include(Path::new("/photos/b.TIF")));
        assert!(!filter.should_include(Path::new("/photos/c.jpg")));
    }

    #[test]
    fn filter_excludes_hidden_by_default() {
        let filter = ImageFilter::new();
        assert!(!filter.should_include(Path::new("/photos/.hidden.jpg")));
    }

    #[test]
    fn filter_can_include_hidden() {
        let filter = ImageFilter::new().with_hidden(true);
        assert!(filter.should_include(Path::new("/photos/.hidden.jpg")));
    }

    #[test]
    fn filter_handles_no_extension() {
        let filter = ImageFilter::new();
        assert!(!filter.should_include(Path::new("/photos/no_extension")));
    }

    #[test]
    fn normalize_dedupes_in_order() {
        let normalized = normalize_extensions([".JPG", "jpg", " .jpeg ", "", "."]);
        assert_eq!(normalized, vec!["jpg".to_string(), "jpeg".to_string()]);
    }
}
