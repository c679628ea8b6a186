//! Batch runner for the label validator.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::config::ValidateConfig;
use crate::error::{AssetError, ErrorSeverity, HasSeverity, Result};

use super::classifier::{select_classifier, Classifier};
use super::matcher::{evaluate, Status};
use super::report::{ImageReport, ValidationReport};
use super::table::ExpectedLabelTable;

/// Extensions picked up by the validator, in listing order.
pub const IMAGE_EXTENSIONS: [&str; 2] = ["jpg", "png"];

/// List images in `dir`: all `.jpg` files sorted by name, then all `.png` files sorted by name.
/// Extensions match case-insensitively.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        AssetError::io_at("listing images", dir, e)
            .with_severity(ErrorSeverity::Fatal)
            .with_recovery_suggestion("Run from the site root or pass --images-dir")
    })?;

    let mut groups: [Vec<PathBuf>; IMAGE_EXTENSIONS.len()] = Default::default();
    for entry in entries {
        let path = entry.map_err(|e| AssetError::io_at("listing images", dir, e))?.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if let Some(i) = IMAGE_EXTENSIONS.iter().position(|known| ext.eq_ignore_ascii_case(known)) {
            groups[i].push(path);
        }
    }

    Ok(groups
        .into_iter()
        .flat_map(|mut group| {
            group.sort();
            group
        })
        .collect())
}

/// Classifies images and judges them against an [`ExpectedLabelTable`].
pub struct Validator<'a> {
    classifier: &'a dyn Classifier,
    table: &'a ExpectedLabelTable,
    threshold: f64,
}

impl<'a> Validator<'a> {
    pub fn new(classifier: &'a dyn Classifier, table: &'a ExpectedLabelTable, threshold: f64) -> Self {
        Self {
            classifier,
            table,
            threshold,
        }
    }

    /// Judge one image. Classifier failures become an `error` entry.
    pub fn check_image(&self, path: &Path) -> ImageReport {
        let name = file_name(path);
        let labels = match self.classifier.classify(path) {
            Ok(labels) => labels,
            Err(err) => {
                error!(
                    image = %name,
                    category = err.category(),
                    severity = ?err.severity(),
                    "classification failed: {}",
                    err
                );
                return ImageReport::failed(err.to_string());
            }
        };
        debug!(image = %name, count = labels.len(), "classified");

        match self.table.get(&name) {
            None => ImageReport::skipped(&labels),
            Some(expected) => {
                let verdict = evaluate(&labels, expected, self.threshold);
                ImageReport::judged(&labels, expected, verdict)
            }
        }
    }

    /// Judge every image, printing a progress block per image.
    pub fn run(&self, images: &[PathBuf]) -> ValidationReport {
        let mut report = ValidationReport::new(self.classifier.name());
        for path in images {
            let name = file_name(path);
            let entry = self.check_image(path);
            print_entry(&name, &entry);
            report.images.insert(name, entry);
        }
        report
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_entry(name: &str, entry: &ImageReport) {
    println!("\n  {}", name);
    println!("  {}", "─".repeat(40));
    match entry.status {
        Status::Error => {
            println!("    CLASSIFICATION ERROR: {}", entry.error.as_deref().unwrap_or("unknown"));
            return;
        }
        _ => println!("    Labels: {}", entry.labels.join(", ")),
    }
    if entry.status == Status::Skip {
        println!("    STATUS: SKIP (no expected labels defined)");
        return;
    }
    if let (Some(expected), Some(matched), Some(ratio)) = (&entry.expected, &entry.matched, entry.match_ratio) {
        println!("    Expected keywords: {:?}", expected);
        println!("    Matched: {:?} ({:.0}%)", matched, ratio * 100.0);
    }
    println!("    STATUS: {}", entry.status.as_str().to_uppercase());
}

/// Full validator run: load the table, pick the classifier, judge every image and
/// write the report.
pub fn run_validation(config: &ValidateConfig) -> Result<ValidationReport> {
    config.validate()?;

    let table = match &config.expected_labels {
        Some(path) => ExpectedLabelTable::load(path)?,
        None => ExpectedLabelTable::builtin(),
    };

    let images = list_images(&config.images_dir)?;
    if images.is_empty() {
        return Err(AssetError::config(
            "images_dir",
            config.images_dir.display().to_string(),
            "no .jpg or .png images found",
        ));
    }

    let classifier = select_classifier(&config.vision);
    println!("Using {} classifier", classifier.name());
    println!("Found {} images in {}\n", images.len(), config.images_dir.display());
    println!("{}", "=".repeat(70));

    let validator = Validator::new(classifier.as_ref(), &table, config.pass_threshold);
    let report = validator.run(&images);

    report.write(&config.report_path)?;
    info!(path = %config.report_path.display(), "report written");
    Ok(report)
}
