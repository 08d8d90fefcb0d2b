//! Pipeline execution implementation.

use super::config::PipelineConfig;
use crate::core::classifier::{BlurClassifier, BlurMode};
use crate::core::comparator::{ComparisonStrategy, DuplicateClusterer, ThresholdStrategy};
use crate::core::extractor::{ImageRecord, MetricExtractor};
use crate::core::faces::{FaceDetector, FaceDetectorFactory, SeetaFaceFactory};
use crate::core::organize::{FsMaterializer, Materializer, TransferMode, TransferRecord};
use crate::core::reporter::{self, PlannedTransfer};
use crate::core::resolver::{Category, FinalDecision, VerdictResolver};
use crate::core::scanner::{PhotoFile, PhotoScanner, ScanConfig, WalkDirScanner};
use crate::error::{ConfigError, FaceError, ReadError, ScanError, SnapsortError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Counts reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Files discovered
    pub scanned: usize,
    /// Files read and analyzed successfully
    pub analyzed: usize,
    pub duplicates: usize,
    /// Clusters with more than one member
    pub duplicate_groups: usize,
    pub blurred: usize,
    pub partial: usize,
    pub slight: usize,
    pub kept: usize,
    /// Read, scan and transfer failures
    pub errors: usize,
    pub dry_run: bool,
    /// Blur mode actually used (face mode may fall back to image mode)
    pub blur_mode: BlurMode,
}

impl RunSummary {
    fn count(&mut self, category: Category) {
        match category {
            Category::Duplicate => self.duplicates += 1,
            Category::BlurFull => self.blurred += 1,
            Category::BlurPartial => self.partial += 1,
            Category::BlurSlight => self.slight += 1,
            Category::Keep => self.kept += 1,
        }
    }
}

/// Result of pipeline execution
#[derive(Debug)]
pub struct PipelineResult {
    /// One decision per analyzed file, in discovery order
    pub decisions: Vec<FinalDecision>,
    /// Transfers performed (empty in dry-run)
    pub transfers: Vec<TransferRecord>,
    /// Non-fatal errors, one message each
    pub errors: Vec<String>,
    pub summary: RunSummary,
    /// Resolved directory the category folders live in
    pub output_base: PathBuf,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// State owned by a single run
pub struct RunContext {
    clusterer: DuplicateClusterer,
    errors: Vec<String>,
    transfers: Vec<TransferRecord>,
    summary: RunSummary,
}

impl RunContext {
    pub fn new(config: &PipelineConfig) -> Self {
        let strategy = ThresholdStrategy::new(config.duplicate_threshold);
        info!("{}", strategy.description());

        Self {
            clusterer: DuplicateClusterer::new(strategy, config.canonical_policy),
            errors: Vec::new(),
            transfers: Vec::new(),
            summary: RunSummary {
                dry_run: config.dry_run,
                blur_mode: config.blur_mode,
                ..Default::default()
            },
        }
    }

    fn record_error(&mut self, message: String) {
        self.summary.errors += 1;
        self.errors.push(message);
    }

    fn finish(self, decisions: Vec<FinalDecision>, output_base: PathBuf, start: Instant) -> PipelineResult {
        PipelineResult {
            decisions,
            transfers: self.transfers,
            errors: self.errors,
            summary: self.summary,
            output_base,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
    face_factory: Option<Arc<dyn FaceDetectorFactory>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            face_factory: None,
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn input_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.input_dir = path.into();
        self
    }

    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(path.into());
        self
    }

    /// Set the duplicate threshold (Hamming distance, inclusive)
    pub fn duplicate_threshold(mut self, threshold: u32) -> Self {
        self.config.duplicate_threshold = threshold;
        self
    }

    pub fn blur_threshold(mut self, threshold: f64) -> Self {
        self.config.blur_threshold = threshold;
        self
    }

    pub fn blur_mode(mut self, mode: BlurMode) -> Self {
        self.config.blur_mode = mode;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.config.dry_run = dry_run;
        self
    }

    /// Copy instead of move
    pub fn keep_originals(mut self, keep: bool) -> Self {
        self.config.keep_originals = keep;
        self
    }

    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Use this factory instead of loading the SeetaFace model
    pub fn face_detector_factory(mut self, factory: Arc<dyn FaceDetectorFactory>) -> Self {
        self.face_factory = Some(factory);
        self
    }

    /// Validate the configuration and build the pipeline
    pub fn build(self) -> Result<Pipeline, ConfigError> {
        self.config.validate()?;
        Ok(Pipeline {
            config: self.config,
            face_factory: self.face_factory,
        })
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Writability check that actually creates a file
fn probe_writable(dir: &Path) -> bool {
    let probe = dir.join(format!(".snapsort-write-probe-{}", std::process::id()));
    match fs::OpenOptions::new().write(true).create_new(true).open(&probe) {
        Ok(_) => {
            let _ = fs::remove_file(&probe);
            true
        }
        Err(_) => false,
    }
}

/// Fail before any work if results could not be written
fn preflight(input: &Path, output_base: &Path, mode: TransferMode) -> Result<(), ScanError> {
    if !output_base.is_dir() && fs::create_dir_all(output_base).is_err() {
        return Err(ScanError::OutputNotWritable {
            path: output_base.to_path_buf(),
        });
    }
    if !probe_writable(output_base) {
        return Err(ScanError::OutputNotWritable {
            path: output_base.to_path_buf(),
        });
    }
    // Moving removes entries from the input directory
    if mode == TransferMode::Move && !probe_writable(input) {
        return Err(ScanError::InputNotWritable {
            path: input.to_path_buf(),
        });
    }
    Ok(())
}

fn detector_ref(detector: &mut Option<Box<dyn FaceDetector>>) -> Option<&mut dyn FaceDetector> {
    match detector {
        Some(detector) => Some(&mut **detector),
        None => None,
    }
}

/// The photo sorting pipeline
pub struct Pipeline {
    config: PipelineConfig,
    face_factory: Option<Arc<dyn FaceDetectorFactory>>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run against the local filesystem
    pub fn run(&self) -> Result<PipelineResult, SnapsortError> {
        let mut materializer = FsMaterializer::new();
        self.run_with(&mut materializer)
    }

    /// Run with a caller-supplied materializer
    pub fn run_with(&self, materializer: &mut dyn Materializer) -> Result<PipelineResult, SnapsortError> {
        let start = Instant::now();
        let config = &self.config;

        // Phase 1: input checks, fatal
        let input = WalkDirScanner::resolve_root(&config.input_dir)?;
        let output_base = config.output_dir.clone().unwrap_or_else(|| input.clone());
        if !config.dry_run {
            preflight(&input, &output_base, config.transfer_mode())?;
        }

        // Phase 2: discovery
        let scanner = WalkDirScanner::new(ScanConfig {
            recursive: config.recursive,
            follow_symlinks: false,
            include_hidden: config.include_hidden,
            extensions: config.normalized_extensions(),
            exclude_dirs: config.folders.resolve_under(&output_base),
        });
        let scan = scanner.scan(&input)?;

        let mut ctx = RunContext::new(config);
        for error in &scan.errors {
            ctx.record_error(error.to_string());
        }

        let photos = scan.photos;
        ctx.summary.scanned = photos.len();
        if photos.is_empty() {
            info!(
                "No images found in {} matching extensions {:?}",
                input.display(),
                config.normalized_extensions()
            );
            return Ok(ctx.finish(Vec::new(), output_base, start));
        }
        info!("Scanning {} images...", photos.len());

        // Phase 3: parallel extraction
        let (blur_mode, factory) = self.face_setup();
        ctx.summary.blur_mode = blur_mode;
        let results = self.extract_all(&photos, factory.as_deref())?;

        // Phase 4: clustering in discovery order
        for result in results {
            match result {
                Ok(record) => {
                    ctx.clusterer.assign(record);
                }
                Err(e) => {
                    warn!(path = %e.path().display(), error = %e, "Skipping unreadable image");
                    ctx.record_error(e.to_string());
                }
            }
        }
        ctx.summary.analyzed = ctx.clusterer.len();
        ctx.summary.duplicate_groups = ctx.clusterer.duplicate_groups();

        if config.listings.print_scanned {
            let paths: Vec<PathBuf> = ctx.clusterer.records().iter().map(|r| r.path.clone()).collect();
            reporter::log_listing(|w| reporter::write_scanned(&paths, config.listings.format, w));
        }

        // Phase 5: classification and resolution
        let decisions = self.decide(&ctx, blur_mode);

        if config.listings.print_metrics {
            reporter::log_listing(|w| reporter::write_metrics(&decisions, config.listings.format, w));
        }

        let mode = config.transfer_mode();
        if config.listings.print_ready {
            let planned = plan_transfers(&decisions, &output_base);
            reporter::log_listing(|w| reporter::write_ready(&planned, mode, config.listings.format, w));
        }

        // Phase 6: materialization
        for decision in &decisions {
            let Some(folder) = decision.target_folder.as_deref() else {
                ctx.summary.count(Category::Keep);
                continue;
            };
            let target_dir = output_base.join(folder);

            if config.dry_run {
                info!(
                    "[DRY-RUN] {:<15}: {} -> {}",
                    folder,
                    decision.path.display(),
                    target_dir.join(decision.path.file_name().unwrap_or_default()).display()
                );
                ctx.summary.count(decision.category);
                continue;
            }

            match materializer.materialize(&decision.path, &target_dir, mode) {
                Ok(destination) => {
                    debug!(source = %decision.path.display(), destination = %destination.display(), "Placed file");
                    ctx.summary.count(decision.category);
                    ctx.transfers.push(TransferRecord {
                        source: decision.path.clone(),
                        destination,
                        mode,
                    });
                }
                Err(e) => {
                    warn!(source = %decision.path.display(), error = %e, "Failed to {} file", mode.verb());
                    ctx.record_error(e.to_string());
                }
            }
        }

        let s = &ctx.summary;
        info!(
            "Summary: scanned={}, blurred={}, partial={}, slight={}, duplicates={} (groups={}), errors={}",
            s.scanned, s.blurred, s.partial, s.slight, s.duplicates, s.duplicate_groups, s.errors
        );

        Ok(ctx.finish(decisions, output_base, start))
    }

    /// Resolve the face detector factory, falling back to image mode once
    fn face_setup(&self) -> (BlurMode, Option<Arc<dyn FaceDetectorFactory>>) {
        if self.config.blur_mode != BlurMode::Faces {
            return (BlurMode::Image, None);
        }

        let factory: Result<Arc<dyn FaceDetectorFactory>, FaceError> = match &self.face_factory {
            Some(factory) => Ok(Arc::clone(factory)),
            None => SeetaFaceFactory::load_or_default(self.config.face_model.as_deref())
                .map(|f| Arc::new(f) as Arc<dyn FaceDetectorFactory>),
        };

        // Probe one instance so a broken factory is caught before workers start
        match factory.and_then(|f| f.create().map(|_| f)) {
            Ok(factory) => (BlurMode::Faces, Some(factory)),
            Err(e) => {
                warn!(error = %e, "Face detection unavailable, falling back to whole-image blur");
                (BlurMode::Image, None)
            }
        }
    }

    /// Decode and extract every photo; results line up with `photos`
    fn extract_all(
        &self,
        photos: &[PhotoFile],
        factory: Option<&dyn FaceDetectorFactory>,
    ) -> Result<Vec<Result<ImageRecord, ReadError>>, SnapsortError> {
        let workers = self.config.workers.resolve();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| ConfigError::InvalidWorkers {
                value: format!("{} ({})", self.config.workers, e),
            })?;
        debug!(workers, faces = factory.is_some(), "Starting extraction");

        let extractor = MetricExtractor::new(self.config.blur_threshold);

        Ok(pool.install(|| {
            photos
                .par_iter()
                .map_init(
                    || {
                        factory.and_then(|f| match f.create() {
                            Ok(detector) => Some(detector),
                            Err(e) => {
                                warn!(error = %e, "Worker could not create a face detector");
                                None
                            }
                        })
                    },
                    |detector, photo| extractor.extract_file(photo, detector_ref(detector)),
                )
                .collect::<Vec<_>>()
        }))
    }

    fn decide(&self, ctx: &RunContext, blur_mode: BlurMode) -> Vec<FinalDecision> {
        let classifier = BlurClassifier::new(
            blur_mode,
            self.config.blur_threshold,
            self.config.partial_blur_min_percent,
        )
        .with_image_fallback(self.config.image_fallback_without_faces);
        let resolver = VerdictResolver::new(
            self.config.prefer_duplicate_over_blur,
            self.config.folders.clone(),
        );

        ctx.clusterer
            .records()
            .iter()
            .enumerate()
            .filter_map(|(index, record)| {
                let duplicate = ctx.clusterer.verdict(index)?;
                Some(resolver.resolve(record, &duplicate, classifier.classify(record)))
            })
            .collect()
    }
}

/// Destinations before collision renaming, for listings
fn plan_transfers(decisions: &[FinalDecision], output_base: &Path) -> Vec<PlannedTransfer> {
    decisions
        .iter()
        .filter_map(|decision| {
            let folder = decision.target_folder.as_deref()?;
            let file_name = decision.path.file_name()?;
            Some(PlannedTransfer {
                source: decision.path.clone(),
                destination: output_base.join(folder).join(file_name),
                reason: folder.to_string(),
            })
        })
        .collect()
}
