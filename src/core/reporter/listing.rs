//! Text and CSV listings.

use super::ListingFormat;
use crate::core::organize::TransferMode;
use crate::core::resolver::FinalDecision;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// A transfer the run intends to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTransfer {
    pub source: PathBuf,
    /// Destination before collision renaming
    pub destination: PathBuf,
    /// Category folder name
    pub reason: String,
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Group items by lower-cased extension, keeping order within a group
fn by_extension<'a, T>(items: impl IntoIterator<Item = &'a T>, path: impl Fn(&T) -> &Path) -> BTreeMap<String, Vec<&'a T>>
where
    T: 'a,
{
    let mut groups: BTreeMap<String, Vec<&T>> = BTreeMap::new();
    for item in items {
        groups.entry(extension_of(path(item))).or_default().push(item);
    }
    groups
}

/// Successfully read files grouped by extension
pub fn write_scanned<W: Write>(paths: &[PathBuf], format: ListingFormat, mut writer: W) -> std::io::Result<()> {
    let groups = by_extension(paths, |p| p.as_path());

    match format {
        ListingFormat::Csv => {
            writeln!(writer, "ext,path")?;
            for (ext, paths) in &groups {
                for path in paths {
                    writeln!(writer, "{},{}", ext, path.display())?;
                }
            }
        }
        ListingFormat::Text => {
            for (ext, paths) in &groups {
                writeln!(writer, "Scanned OK [{}]: {}", ext, paths.len())?;
                for path in paths {
                    writeln!(writer, "  {}", path.display())?;
                }
            }
        }
    }

    Ok(())
}

/// Per-file focus score, face count and destination folder
pub fn write_metrics<W: Write>(
    decisions: &[FinalDecision],
    format: ListingFormat,
    mut writer: W,
) -> std::io::Result<()> {
    match format {
        ListingFormat::Csv => {
            writeln!(writer, "ext,path,blur_var,faces,reason")?;
            for decision in decisions {
                writeln!(
                    writer,
                    "{},{},{:.6},{},{}",
                    extension_of(&decision.path),
                    decision.path.display(),
                    decision.focus_score,
                    decision.faces.map(|f| f.total).unwrap_or(0),
                    decision.target_folder.as_deref().unwrap_or("")
                )?;
            }
        }
        ListingFormat::Text => {
            writeln!(writer, "Per-file metrics (variance of Laplacian; faces; reason):")?;
            for decision in decisions {
                writeln!(
                    writer,
                    "  {}  var={:.2}  faces={}  reason={}",
                    decision.path.display(),
                    decision.focus_score,
                    decision.faces.map(|f| f.total).unwrap_or(0),
                    decision.target_folder.as_deref().unwrap_or("-")
                )?;
            }
        }
    }

    Ok(())
}

/// Planned transfers grouped by extension
pub fn write_ready<W: Write>(
    planned: &[PlannedTransfer],
    mode: TransferMode,
    format: ListingFormat,
    mut writer: W,
) -> std::io::Result<()> {
    let groups = by_extension(planned, |p| p.source.as_path());

    match format {
        ListingFormat::Csv => {
            writeln!(writer, "ext,reason,src,dest")?;
            for (ext, items) in &groups {
                for item in items {
                    writeln!(
                        writer,
                        "{},{},{},{}",
                        ext,
                        item.reason,
                        item.source.display(),
                        item.destination.display()
                    )?;
                }
            }
        }
        ListingFormat::Text => {
            for (ext, items) in &groups {
                writeln!(writer, "Ready to {} [{}]: {}", mode.verb(), ext, items.len())?;
                for item in items {
                    writeln!(
                        writer,
                        "  {:<15}: {} -> {}",
                        item.reason,
                        item.source.display(),
                        item.destination.display()
                    )?;
                }
            }
        }
    }

    Ok(())
}

/// Render a listing into memory and emit it line by line through the log
pub fn log_listing<F>(render: F)
where
    F: FnOnce(&mut Vec<u8>) -> std::io::Result<()>,
{
    let mut buffer = Vec::new();
    if render(&mut buffer).is_err() {
        return;
    }
    for line in String::from_utf8_lossy(&buffer).lines() {
        info!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classifier::{BlurVerdict, FaceBlurVerdict};
    use crate::core::comparator::ClusterId;
    use crate::core::faces::FaceBlurSummary;
    use crate::core::resolver::Category;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> std::io::Result<()>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn decision(path: &str, folder: Option<&str>) -> FinalDecision {
        FinalDecision {
            path: PathBuf::from(path),
            category: if folder.is_some() { Category::Duplicate } else { Category::Keep },
            target_folder: folder.map(str::to_string),
            cluster: ClusterId(0),
            is_canonical: folder.is_none(),
            blur: BlurVerdict::Faces(FaceBlurVerdict::None),
            focus_score: 123.456,
            faces: Some(FaceBlurSummary::new(2, 0)),
            size: 10,
        }
    }

    #[test]
    fn scanned_text_groups_by_extension() {
        let paths = vec![
            PathBuf::from("/p/b.NEF"),
            PathBuf::from("/p/a.jpg"),
            PathBuf::from("/p/c.JPG"),
        ];

        let text = render(|w| write_scanned(&paths, ListingFormat::Text, w));

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Scanned OK [.jpg]: 2");
        assert_eq!(lines[1], "  /p/a.jpg");
        assert_eq!(lines[2], "  /p/c.JPG");
        assert_eq!(lines[3], "Scanned OK [.nef]: 1");
    }

    #[test]
    fn scanned_csv_has_header() {
        let paths = vec![PathBuf::from("/p/a.jpg")];
        let csv = render(|w| write_scanned(&paths, ListingFormat::Csv, w));

        assert_eq!(csv, "ext,path\n.jpg,/p/a.jpg\n");
    }

    #[test]
    fn metrics_show_reason_or_placeholder() {
        let decisions = vec![decision("/p/a.jpg", None), decision("/p/b.jpg", Some("duplicate"))];

        let text = render(|w| write_metrics(&decisions, ListingFormat::Text, w));
        assert!(text.contains("/p/a.jpg  var=123.46  faces=2  reason=-"));
        assert!(text.contains("reason=duplicate"));

        let csv = render(|w| write_metrics(&decisions, ListingFormat::Csv, w));
        assert!(csv.starts_with("ext,path,blur_var,faces,reason\n"));
        assert!(csv.contains(".jpg,/p/a.jpg,123.456000,2,\n"));
    }

    #[test]
    fn ready_listing_names_the_verb() {
        let planned = vec![PlannedTransfer {
            source: PathBuf::from("/p/a.jpg"),
            destination: PathBuf::from("/p/duplicate/a.jpg"),
            reason: "duplicate".to_string(),
        }];

        let text = render(|w| write_ready(&planned, TransferMode::Copy, ListingFormat::Text, w));
        assert!(text.starts_with("Ready to copy [.jpg]: 1"));
        assert!(text.contains("/p/a.jpg -> /p/duplicate/a.jpg"));

        let csv = render(|w| write_ready(&planned, TransferMode::Move, ListingFormat::Csv, w));
        assert_eq!(csv, "ext,reason,src,dest\n.jpg,duplicate,/p/a.jpg,/p/duplicate/a.jpg\n");
    }
}
