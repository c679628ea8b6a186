//! JSON validation report.
//!
//! Layout: an object keyed by image filename (sorted), each value holding `status`,
//! `labels` and, when a verdict was computed, `expected`, `matched` and `match_ratio`.
//! Classifier failures carry an `error` message instead.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AssetError, Result};

use super::classifier::Label;
use super::matcher::{Status, Verdict};

/// Number of labels kept in the report per image.
pub const REPORTED_LABELS: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageReport {
    pub status: Status,
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImageReport {
    pub fn skipped(labels: &[Label]) -> Self {
        Self {
            status: Status::Skip,
            labels: display_labels(labels),
            expected: None,
            matched: None,
            match_ratio: None,
            error: None,
        }
    }

    pub fn judged(labels: &[Label], expected: &[String], verdict: Verdict) -> Self {
        Self {
            status: verdict.status,
            labels: display_labels(labels),
            expected: Some(expected.to_vec()),
            matched: Some(verdict.matched),
            match_ratio: Some(verdict.match_ratio),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            labels: Vec::new(),
            expected: None,
            matched: None,
            match_ratio: None,
            error: Some(message.into()),
        }
    }
}

fn display_labels(labels: &[Label]) -> Vec<String> {
    labels.iter().take(REPORTED_LABELS).map(Label::display).collect()
}

/// Counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub pass: usize,
    pub fail: usize,
    pub skip: usize,
    pub error: usize,
}

impl Tally {
    pub fn total(&self) -> usize {
        self.pass + self.fail + self.skip + self.error
    }
}

/// Results of one validation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// Classifier backend used for the whole run.
    pub classifier: String,
    pub images: BTreeMap<String, ImageReport>,
}

impl ValidationReport {
    pub fn new(classifier: impl Into<String>) -> Self {
        Self {
            classifier: classifier.into(),
            images: BTreeMap::new(),
        }
    }

    pub fn tally(&self) -> Tally {
        self.images.values().fold(Tally::default(), |mut t, r| {
            match r.status {
                Status::Pass => t.pass += 1,
                Status::Fail => t.fail += 1,
                Status::Skip => t.skip += 1,
                Status::Error => t.error += 1,
            }
            t
        })
    }

    /// 1 if any image failed its keyword check (or errored, when `strict`), else 0.
    pub fn exit_code(&self, strict: bool) -> i32 {
        let tally = self.tally();
        if tally.fail > 0 || (strict && tally.error > 0) { 1 } else { 0 }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.images)?)
    }

    /// Write the report, creating the parent directory if needed.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| AssetError::io_at("creating report directory", parent, e))?;
        }
        fs::write(path, self.to_json()?).map_err(|e| AssetError::io_at("writing report", path, e))
    }
}
