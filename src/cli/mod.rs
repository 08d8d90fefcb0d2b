//! # CLI Module
//!
//! Command-line interface for snapsort.
//!
//! ## Usage
//! ```bash
//! # Sort a folder in place (moves into duplicate/ blurred/ ...)
//! snapsort sort ~/Pictures/trip
//!
//! # Preview only
//! snapsort sort ~/Pictures/trip --dry-run --print-ready
//!
//! # Whole-image blur, copy into another folder
//! snapsort sort ~/Pictures/trip --blur-on image --keep-originals --output-dir ~/Sorted
//!
//! # Settings from a JSON file, flags still win
//! snapsort sort --config snapsort.json --duplicate-threshold 8
//!
//! # JSON output
//! snapsort sort ~/Pictures/trip --output json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use snapsort::core::classifier::BlurMode;
use snapsort::core::comparator::CanonicalPolicy;
use snapsort::core::pipeline::{Pipeline, PipelineConfig, PipelineResult, Workers};
use snapsort::core::reporter::ListingFormat;
use snapsort::error::{Result, SnapsortError};
use std::path::PathBuf;

/// snapsort - Sort photos into duplicate and blurred folders
#[derive(Parser, Debug)]
#[command(name = "snapsort")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a folder and move or copy files into category folders
    Sort(SortArgs),
}

#[derive(clap::Args, Debug)]
struct SortArgs {
    /// Directory containing the photos
    #[arg(required_unless_present = "config")]
    input_dir: Option<PathBuf>,

    /// JSON config file; command-line flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Hamming distance threshold for near-duplicates (0-64)
    #[arg(long)]
    duplicate_threshold: Option<u32>,

    /// Variance of Laplacian below which an image or face is blurred
    #[arg(long)]
    blur_threshold: Option<f64>,

    /// What blur is judged on
    #[arg(long, value_enum)]
    blur_on: Option<BlurTarget>,

    /// Minimum percent of blurred faces for partially blurred (0-100)
    #[arg(long)]
    partial_blur_min_percent: Option<u32>,

    /// Judge images without faces on the whole frame in face mode
    #[arg(long)]
    image_fallback_without_faces: bool,

    /// Put blurred duplicates in the blur folder instead of the duplicate folder
    #[arg(long)]
    prefer_blur: bool,

    /// Which member of a duplicate group stays in place
    #[arg(long, value_enum)]
    keep: Option<KeepPolicy>,

    /// Comma-separated file extensions (e.g. .jpg,.jpeg,.nef)
    #[arg(long, value_delimiter = ',')]
    extensions: Option<Vec<String>>,

    /// Include subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Include hidden files
    #[arg(long)]
    include_hidden: bool,

    /// Log planned moves without touching any file
    #[arg(long)]
    dry_run: bool,

    /// Copy instead of move
    #[arg(long)]
    keep_originals: bool,

    /// Base directory for category folders (defaults to the input directory)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Worker threads for analysis: a number or "auto"
    #[arg(long, alias = "max-workers")]
    workers: Option<Workers>,

    /// SeetaFace model file for face detection
    #[arg(long)]
    face_model: Option<PathBuf>,

    /// Folder name for duplicates
    #[arg(long)]
    duplicate_folder: Option<String>,

    /// Folder name for blurred images
    #[arg(long)]
    blur_folder: Option<String>,

    /// Folder name for partially blurred images
    #[arg(long)]
    partial_blur_folder: Option<String>,

    /// Folder name for slightly blurred images
    #[arg(long)]
    slight_blur_folder: Option<String>,

    /// Log files read successfully, grouped by extension
    #[arg(long)]
    print_scanned: bool,

    /// Log files planned to move or copy, grouped by extension
    #[arg(long)]
    print_ready: bool,

    /// Log per-file blur metrics and face counts
    #[arg(long)]
    print_metrics: bool,

    /// Format of the printed lists
    #[arg(long, value_enum)]
    print_format: Option<PrintFormat>,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output format of the final report
    #[arg(short, long, value_enum, default_value = "pretty")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BlurTarget {
    /// Detected faces only (default)
    Faces,
    /// The whole image
    Image,
}

impl From<BlurTarget> for BlurMode {
    fn from(target: BlurTarget) -> Self {
        match target {
            BlurTarget::Faces => BlurMode::Faces,
            BlurTarget::Image => BlurMode::Image,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KeepPolicy {
    /// First file in discovery order (default)
    First,
    /// Largest file
    Largest,
}

impl From<KeepPolicy> for CanonicalPolicy {
    fn from(policy: KeepPolicy) -> Self {
        match policy {
            KeepPolicy::First => CanonicalPolicy::FirstEncountered,
            KeepPolicy::Largest => CanonicalPolicy::LargestSize,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PrintFormat {
    Text,
    Csv,
}

impl From<PrintFormat> for ListingFormat {
    fn from(format: PrintFormat) -> Self {
        match format {
            PrintFormat::Text => ListingFormat::Text,
            PrintFormat::Csv => ListingFormat::Csv,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary with colors
    Pretty,
    /// JSON summary and decisions for scripting
    Json,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sort(args) => run_sort(args),
    }
}

impl SortArgs {
    /// Start from the config file (or defaults) and apply explicit flags
    fn into_config(self) -> Result<(PipelineConfig, OutputFormat)> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(input_dir) = self.input_dir {
            config.input_dir = input_dir;
        }
        if let Some(output_dir) = self.output_dir {
            config.output_dir = Some(output_dir);
        }
        if let Some(threshold) = self.duplicate_threshold {
            config.duplicate_threshold = threshold;
        }
        if let Some(threshold) = self.blur_threshold {
            config.blur_threshold = threshold;
        }
        if let Some(target) = self.blur_on {
            config.blur_mode = target.into();
        }
        if let Some(percent) = self.partial_blur_min_percent {
            config.partial_blur_min_percent = percent;
        }
        if let Some(policy) = self.keep {
            config.canonical_policy = policy.into();
        }
        if let Some(extensions) = self.extensions {
            config.extensions = extensions;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(model) = self.face_model {
            config.face_model = Some(model);
        }
        if let Some(name) = self.duplicate_folder {
            config.folders.duplicate = name;
        }
        if let Some(name) = self.blur_folder {
            config.folders.blurred = name;
        }
        if let Some(name) = self.partial_blur_folder {
            config.folders.partial_blurred = name;
        }
        if let Some(name) = self.slight_blur_folder {
            config.folders.slightly_blurred = name;
        }
        if let Some(format) = self.print_format {
            config.listings.format = format.into();
        }

        // Switches can only turn behaviour on
        config.image_fallback_without_faces |= self.image_fallback_without_faces;
        config.prefer_duplicate_over_blur &= !self.prefer_blur;
        config.recursive |= self.recursive;
        config.include_hidden |= self.include_hidden;
        config.dry_run |= self.dry_run;
        config.keep_originals |= self.keep_originals;
        config.listings.print_scanned |= self.print_scanned;
        config.listings.print_ready |= self.print_ready;
        config.listings.print_metrics |= self.print_metrics;

        Ok((config, self.output))
    }
}

fn run_sort(args: SortArgs) -> Result<()> {
    snapsort::init_tracing(&args.log_level);
    let term = Term::stderr();

    let (config, output) = args.into_config()?;

    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("snapsort").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        if config.dry_run {
            term.write_line(&format!("{}", style("Dry run: no files will be changed").yellow()))
                .ok();
        }
        term.write_line("").ok();
    }

    let pipeline = Pipeline::builder().config(config).build()?;
    let result = pipeline.run()?;

    match output {
        OutputFormat::Pretty => print_pretty_results(&term, &result),
        OutputFormat::Json => print_json_results(&result)?,
    }

    Ok(())
}

fn print_pretty_results(term: &Term, result: &PipelineResult) {
    let s = &result.summary;

    term.write_line("").ok();
    term.write_line(&format!("{} Sort Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} photos scanned in {:.1}s ({} blur mode)",
        style(s.scanned).cyan(),
        result.duration_ms as f64 / 1000.0,
        s.blur_mode
    ))
    .ok();
    term.write_line(&format!(
        "  category folders in {}",
        style(result.output_base.display()).dim()
    ))
    .ok();

    let verb = if s.dry_run { "would move" } else { "moved" };
    let rows = [
        ("duplicates", s.duplicates),
        ("blurred", s.blurred),
        ("partially blurred", s.partial),
        ("slightly blurred", s.slight),
    ];
    for (label, count) in rows {
        term.write_line(&format!("  {} {} {}", style(count).cyan(), label, style(verb).dim()))
            .ok();
    }

    term.write_line(&format!(
        "  {} duplicate groups, {} kept in place",
        style(s.duplicate_groups).cyan(),
        style(s.kept).green()
    ))
    .ok();

    if s.errors > 0 {
        term.write_line(&format!("  {} errors", style(s.errors).red().bold()))
            .ok();
        for error in &result.errors {
            term.write_line(&format!("    {} {}", style("✗").red(), error)).ok();
        }
    }

    term.write_line("").ok();
}

fn print_json_results(result: &PipelineResult) -> Result<()> {
    let output = serde_json::json!({
        "summary": result.summary,
        "duration_ms": result.duration_ms,
        "output_base": result.output_base,
        "decisions": result.decisions,
        "transfers": result.transfers,
        "errors": result.errors,
    });

    let rendered =
        serde_json::to_string_pretty(&output).map_err(|e| SnapsortError::Output(e.to_string()))?;
    println!("{}", rendered);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> SortArgs {
        let mut argv = vec!["snapsort", "sort"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Sort(args) => args,
        }
    }

    #[test]
    fn defaults_come_through_unchanged() {
        let (config, _) = parse(&["/photos"]).into_config().unwrap();

        assert_eq!(config.input_dir, PathBuf::from("/photos"));
        assert_eq!(config.duplicate_threshold, 5);
        assert_eq!(config.blur_mode, BlurMode::Faces);
        assert!(config.prefer_duplicate_over_blur);
        assert!(!config.dry_run);
    }

    #[test]
    fn flags_override_defaults() {
        let (config, _) = parse(&[
            "/photos",
            "--duplicate-threshold",
            "9",
            "--blur-on",
            "image",
            "--extensions",
            ".png,.JPG",
            "--workers",
            "3",
            "--keep",
            "largest",
            "--prefer-blur",
            "--dry-run",
            "--blur-folder",
            "soft",
        ])
        .into_config()
        .unwrap();

        assert_eq!(config.duplicate_threshold, 9);
        assert_eq!(config.blur_mode, BlurMode::Image);
        assert_eq!(config.normalized_extensions(), vec!["png", "jpg"]);
        assert_eq!(config.workers, Workers::Fixed(3));
        assert_eq!(config.canonical_policy, CanonicalPolicy::LargestSize);
        assert!(!config.prefer_duplicate_over_blur);
        assert!(config.dry_run);
        assert_eq!(config.folders.blurred, "soft");
    }

    #[test]
    fn max_workers_alias_and_auto() {
        let (config, _) = parse(&["/photos", "--max-workers", "auto"]).into_config().unwrap();
        assert_eq!(config.workers, Workers::Auto);
    }

    #[test]
    fn input_dir_required_without_config() {
        assert!(Cli::try_parse_from(["snapsort", "sort"]).is_err());
        assert!(Cli::try_parse_from(["snapsort", "sort", "--workers", "0", "/photos"]).is_err());
    }
}
