//! # Resolver Module
//!
//! Combines the duplicate verdict and the blur verdict into one final
//! category per file. Pure: no filesystem access.
//!
//! ## Priority
//! | duplicate | blurred | prefer duplicate | result        |
//! |-----------|---------|------------------|---------------|
//! | yes       | yes     | true             | DUPLICATE     |
//! | yes       | yes     | false            | blur category |
//! | yes       | no      | -                | DUPLICATE     |
//! | no        | yes     | -                | blur category |
//! | no        | no      | -                | KEEP          |
//!
//! "duplicate" always means a non-canonical member of a multi-member cluster.

use crate::core::classifier::{BlurSeverity, BlurVerdict};
use crate::core::comparator::{ClusterId, DuplicateVerdict};
use crate::core::extractor::ImageRecord;
use crate::core::faces::FaceBlurSummary;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Final placement of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Duplicate,
    BlurFull,
    BlurPartial,
    BlurSlight,
    Keep,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Duplicate => "duplicate",
            Category::BlurFull => "blur_full",
            Category::BlurPartial => "blur_partial",
            Category::BlurSlight => "blur_slight",
            Category::Keep => "keep",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<BlurSeverity> for Category {
    fn from(severity: BlurSeverity) -> Self {
        match severity {
            BlurSeverity::Full => Category::BlurFull,
            BlurSeverity::Partial => Category::BlurPartial,
            BlurSeverity::Slight => Category::BlurSlight,
        }
    }
}

/// Names of the category folders under the output base
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderNames {
    pub duplicate: String,
    pub blurred: String,
    pub partial_blurred: String,
    pub slightly_blurred: String,
}

impl Default for FolderNames {
    fn default() -> Self {
        Self {
            duplicate: "duplicate".to_string(),
            blurred: "blurred".to_string(),
            partial_blurred: "partialBlurred".to_string(),
            slightly_blurred: "slightlyBlurred".to_string(),
        }
    }
}

impl FolderNames {
    /// Folder for a category; `None` for KEEP
    pub fn folder_for(&self, category: Category) -> Option<&str> {
        match category {
            Category::Duplicate => Some(&self.duplicate),
            Category::BlurFull => Some(&self.blurred),
            Category::BlurPartial => Some(&self.partial_blurred),
            Category::BlurSlight => Some(&self.slightly_blurred),
            Category::Keep => None,
        }
    }

    /// All four folder names
    pub fn all(&self) -> [&str; 4] {
        [
            &self.duplicate,
            &self.blurred,
            &self.partial_blurred,
            &self.slightly_blurred,
        ]
    }

    /// Each folder name must be one plain path component
    pub fn validate(&self) -> Result<(), ConfigError> {
        for name in self.all() {
            let mut components = Path::new(name).components();
            let single_normal = matches!(
                (components.next(), components.next()),
                (Some(Component::Normal(_)), None)
            );
            if name.trim().is_empty() || !single_normal {
                return Err(ConfigError::InvalidFolderName {
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Absolute folder paths under `base`
    pub fn resolve_under(&self, base: &Path) -> Vec<PathBuf> {
        self.all().iter().map(|name| base.join(name)).collect()
    }
}

/// Resolved outcome for one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalDecision {
    pub path: PathBuf,
    pub category: Category,
    /// Category folder name, `None` for KEEP
    pub target_folder: Option<String>,
    pub cluster: ClusterId,
    pub is_canonical: bool,
    pub blur: BlurVerdict,
    pub focus_score: f64,
    pub faces: Option<FaceBlurSummary>,
    pub size: u64,
}

impl FinalDecision {
    pub fn is_keep(&self) -> bool {
        self.category == Category::Keep
    }
}

/// Applies the duplicate/blur priority rule
#[derive(Debug, Clone)]
pub struct VerdictResolver {
    prefer_duplicate_over_blur: bool,
    folders: FolderNames,
}

impl Default for VerdictResolver {
    fn default() -> Self {
        Self::new(true, FolderNames::default())
    }
}

impl VerdictResolver {
    pub fn new(prefer_duplicate_over_blur: bool, folders: FolderNames) -> Self {
        Self {
            prefer_duplicate_over_blur,
            folders,
        }
    }

    /// Category from the two verdicts alone
    pub fn category(&self, duplicate: &DuplicateVerdict, blur: &BlurVerdict) -> Category {
        // A canonical member is never moved as a duplicate
        let is_duplicate = duplicate.is_duplicate();

        match (is_duplicate, blur.severity()) {
            (true, Some(severity)) if !self.prefer_duplicate_over_blur => severity.into(),
            (true, _) => Category::Duplicate,
            (false, Some(severity)) => severity.into(),
            (false, None) => Category::Keep,
        }
    }

    pub fn resolve(
        &self,
        record: &ImageRecord,
        duplicate: &DuplicateVerdict,
        blur: BlurVerdict,
    ) -> FinalDecision {
        let category = self.category(duplicate, &blur);
        FinalDecision {
            path: record.path.clone(),
            category,
            target_folder: self.folders.folder_for(category).map(str::to_string),
            cluster: duplicate.cluster,
            is_canonical: duplicate.is_canonical,
            blur,
            focus_score: record.focus_score,
            faces: record.faces,
            size: record.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classifier::{FaceBlurVerdict, FocusVerdict};

    fn dup(is_canonical: bool, size: usize) -> DuplicateVerdict {
        DuplicateVerdict {
            cluster: ClusterId(0),
            is_canonical,
            cluster_size: size,
        }
    }

    const FULL: BlurVerdict = BlurVerdict::Faces(FaceBlurVerdict::Full);
    const NONE: BlurVerdict = BlurVerdict::Faces(FaceBlurVerdict::None);

    #[test]
    fn duplicate_wins_over_blur_by_default() {
        let resolver = VerdictResolver::default();
        assert_eq!(resolver.category(&dup(false, 2), &FULL), Category::Duplicate);
    }

    #[test]
    fn blur_wins_when_preference_is_off() {
        let resolver = VerdictResolver::new(false, FolderNames::default());
        assert_eq!(resolver.category(&dup(false, 2), &FULL), Category::BlurFull);
        assert_eq!(
            resolver.category(&dup(false, 2), &BlurVerdict::Faces(FaceBlurVerdict::Slight)),
            Category::BlurSlight
        );
    }

    #[test]
    fn canonical_member_is_never_duplicate() {
        for prefer in [true, false] {
            let resolver = VerdictResolver::new(prefer, FolderNames::default());
            assert_eq!(resolver.category(&dup(true, 5), &NONE), Category::Keep);
            assert_eq!(resolver.category(&dup(true, 5), &FULL), Category::BlurFull);
        }
    }

    #[test]
    fn duplicate_only_and_blur_only() {
        let resolver = VerdictResolver::default();
        assert_eq!(resolver.category(&dup(false, 2), &NONE), Category::Duplicate);
        assert_eq!(
            resolver.category(&dup(true, 1), &BlurVerdict::Faces(FaceBlurVerdict::Partial)),
            Category::BlurPartial
        );
    }

    #[test]
    fn simple_mode_blurred_goes_to_blurred_folder() {
        let resolver = VerdictResolver::default();
        let record = ImageRecord {
            path: PathBuf::from("/photos/a.jpg"),
            size: 10,
            hash: crate::core::hasher::ImageHashValue::from_u64(0),
            focus_score: 40.0,
            faces: None,
        };

        let decision = resolver.resolve(&record, &dup(true, 1), BlurVerdict::Image(FocusVerdict::Blurred));

        assert_eq!(decision.category, Category::BlurFull);
        assert_eq!(decision.target_folder.as_deref(), Some("blurred"));

        let keep = resolver.resolve(&record, &dup(true, 1), BlurVerdict::Image(FocusVerdict::NotBlurred));
        assert!(keep.is_keep());
        assert_eq!(keep.target_folder, None);
    }

    #[test]
    fn default_folder_names() {
        let folders = FolderNames::default();
        assert_eq!(folders.folder_for(Category::Duplicate), Some("duplicate"));
        assert_eq!(folders.folder_for(Category::BlurFull), Some("blurred"));
        assert_eq!(folders.folder_for(Category::BlurPartial), Some("partialBlurred"));
        assert_eq!(folders.folder_for(Category::BlurSlight), Some("slightlyBlurred"));
        assert_eq!(folders.folder_for(Category::Keep), None);
    }

    #[test]
    fn folder_names_must_be_single_components() {
        let mut folders = FolderNames::default();
        assert!(folders.validate().is_ok());

        folders.duplicate = "a/b".to_string();
        assert!(matches!(folders.validate(), Err(ConfigError::InvalidFolderName { .. })));

        folders.duplicate = "..".to_string();
        assert!(folders.validate().is_err());

        folders.duplicate = "  ".to_string();
        assert!(folders.validate().is_err());
    }
}
