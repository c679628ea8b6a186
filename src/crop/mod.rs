//! # Feature Card Cropper
//!
//! Cuts fixed regions out of app screenshots and writes them as web-sized JPEG cards.
//!
//! For every [`CropJob`]:
//! 1. a missing source is skipped (expected when optional screenshots are absent)
//! 2. the source is decoded and flattened to RGB8 (alpha dropped)
//! 3. the rectangle is checked against the decoded size and staged into a packed buffer
//! 4. the region is resized with Lanczos3 to the target width, height following the aspect ratio
//! 5. the card is JPEG-encoded at the configured quality into the output directory
//!
//! Jobs are independent: a failed job is recorded and the batch moves on.

mod jobs;
mod rounded;

pub use jobs::{CropJob, CropRect, FEATURE_CARD_JOBS};
pub use rounded::apply_rounded_corners;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use card_scale::cpu::{scale_rgb_cpu, stage_region, Staging};
use card_scale::presets::{build_plan, ScaleTarget, Size};
use fast_image_resize::Resizer;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, RgbImage};
use tracing::{debug, error, warn};

use crate::config::CropConfig;
use crate::error::{AssetError, HasSeverity, Result};

/// What happened to one job.
#[derive(Debug)]
pub enum CropOutcome {
    Written {
        path: PathBuf,
        size: Size,
        rounded: Option<PathBuf>,
    },
    /// Source file not present.
    Skipped,
    Failed(AssetError),
}

#[derive(Debug)]
pub struct CropRecord {
    pub job: CropJob,
    pub outcome: CropOutcome,
}

/// Per-job records in job order.
#[derive(Debug, Default)]
pub struct CropSummary {
    pub records: Vec<CropRecord>,
}

impl CropSummary {
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, CropOutcome::Written { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, CropOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, CropOutcome::Failed(_)))
    }

    /// Skips are expected; only failed jobs make the run unsuccessful.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&CropOutcome) -> bool) -> usize {
        self.records.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Reusable resize state for a batch.
pub struct Cropper {
    config: CropConfig,
    resizer: Resizer,
    staging: Staging,
}

impl Cropper {
    pub fn new(config: CropConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            resizer: Resizer::new(),
            staging: Staging::with_capacity(0),
        })
    }

    /// Run every job, printing one progress line per job.
    pub fn run(&mut self, jobs: &[CropJob]) -> CropSummary {
        let mut summary = CropSummary::default();
        for job in jobs {
            let outcome = self.run_job(job);
            match &outcome {
                CropOutcome::Written { size, .. } => {
                    println!("  OK: {} -> {} ({}x{})", job.source, job.output, size.w, size.h)
                }
                CropOutcome::Skipped => {
                    warn!(source = job.source, "crop source missing");
                    println!("  SKIP: {} not found", job.source);
                }
                CropOutcome::Failed(err) => {
                    error!(
                        source = job.source,
                        category = err.category(),
                        severity = ?err.severity(),
                        "crop job failed: {}",
                        err
                    );
                    println!("  FAIL: {} ({})", job.source, err);
                }
            }
            summary.records.push(CropRecord { job: *job, outcome });
        }
        summary
    }

    /// Process a single job. Never panics on bad input; failures become `Failed`.
    pub fn run_job(&mut self, job: &CropJob) -> CropOutcome {
        let src_path = self.config.source_dir.join(job.source);
        if !src_path.is_file() {
            return CropOutcome::Skipped;
        }
        match self.crop_to_card(job, &src_path) {
            Ok(outcome) => outcome,
            Err(err) => CropOutcome::Failed(err.with_operation(format!("cropping {}", job.output))),
        }
    }

    fn crop_to_card(&mut self, job: &CropJob, src_path: &Path) -> Result<CropOutcome> {
        let decoded = image::open(src_path).map_err(|e| AssetError::codec(src_path, e))?;
        let rgb = decoded.to_rgb8();
        let src_size = Size {
            w: rgb.width(),
            h: rgb.height(),
        };

        let region = job.rect.to_rect().ok_or_else(|| {
            AssetError::geometry(job.source, format!("empty or inverted crop rectangle {:?}", job.rect))
        })?;
        if !region.fits_within(src_size) {
            return Err(AssetError::geometry(
                job.source,
                format!(
                    "crop rectangle {:?} exceeds the {}x{} source",
                    job.rect, src_size.w, src_size.h
                ),
            )
            .with_recovery_suggestion("Update the crop table for the new screenshot size"));
        }

        stage_region(rgb.as_raw(), src_size, region, &mut self.staging)?;
        let plan = build_plan(region.size(), ScaleTarget::FixedWidth(self.config.target_width));
        let mut out = vec![0u8; plan.out.pixel_bytes()];
        scale_rgb_cpu(
            &mut self.resizer,
            self.staging.as_slice(),
            region.size(),
            &plan,
            &mut out,
        )?;
        debug!(
            source = job.source,
            from = ?region.size(),
            to = ?plan.out,
            "resized crop region"
        );

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| AssetError::io_at("creating output directory", &self.config.output_dir, e))?;
        let out_path = self.config.output_dir.join(job.output);
        write_jpeg(&out_path, &out, plan.out, self.config.jpeg_quality)?;

        let rounded = match self.config.rounded_radius {
            Some(radius) => {
                let card = RgbImage::from_raw(plan.out.w, plan.out.h, out).ok_or_else(|| {
                    AssetError::geometry(job.output, "scaled buffer does not match the planned size")
                })?;
                let path = out_path.with_file_name(rounded_name(job.output));
                apply_rounded_corners(&card, radius)
                    .save(&path)
                    .map_err(|e| AssetError::codec(&path, e))?;
                Some(path)
            }
            None => None,
        };

        Ok(CropOutcome::Written {
            path: out_path,
            size: plan.out,
            rounded,
        })
    }
}

/// Crop every job in `jobs` with a fresh [`Cropper`].
pub fn run_crop_batch(config: CropConfig, jobs: &[CropJob]) -> Result<CropSummary> {
    let mut cropper = Cropper::new(config)?;
    Ok(cropper.run(jobs))
}

fn write_jpeg(path: &Path, rgb: &[u8], size: Size, quality: u8) -> Result<()> {
    let file = File::create(path).map_err(|e| AssetError::io_at("creating card", path, e))?;
    let mut writer = BufWriter::new(file);
    JpegEncoder::new_with_quality(&mut writer, quality)
        .encode(rgb, size.w, size.h, ExtendedColorType::Rgb8)
        .map_err(|e| AssetError::codec(path, e))?;
    writer
        .flush()
        .map_err(|e| AssetError::io_at("writing card", path, e))
}

/// `feat-search.jpg` → `feat-search-rounded.png`
fn rounded_name(output: &str) -> String {
    let stem = Path::new(output)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(output);
    format!("{stem}-rounded.png")
}
