//! Keyword matching between classifier labels and expected keywords.
//!
//! Matching is deliberately loose: classifier vocabularies are uncontrolled free text,
//! so an image passes when a small fraction of its expected keywords appear anywhere
//! in the joined label text.

use serde::{Deserialize, Serialize};

use super::classifier::Label;

/// Default minimum match ratio for a pass.
pub const DEFAULT_PASS_THRESHOLD: f64 = 0.15;

/// Per-image outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Fail,
    /// No expected keywords for this file.
    Skip,
    /// The classifier failed on this file.
    Error,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "pass",
            Status::Fail => "fail",
            Status::Skip => "skip",
            Status::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub status: Status,
    /// Expected keywords found, in table order.
    pub matched: Vec<String>,
    /// `matched.len() / expected.len()`, in `[0, 1]`.
    pub match_ratio: f64,
}

/// All label texts, lowercased and space-joined. Confidence is ignored.
pub fn joined_label_text(labels: &[Label]) -> String {
    labels
        .iter()
        .map(|l| l.label.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Compare `labels` against `expected` keywords.
///
/// An empty `expected` list never passes (ratio 0).
pub fn evaluate(labels: &[Label], expected: &[String], threshold: f64) -> Verdict {
    let text = joined_label_text(labels);
    let matched: Vec<String> = expected
        .iter()
        .filter(|kw| text.contains(kw.to_lowercase().as_str()))
        .cloned()
        .collect();

    let match_ratio = if expected.is_empty() {
        0.0
    } else {
        matched.len() as f64 / expected.len() as f64
    };
    let status = if !expected.is_empty() && match_ratio >= threshold {
        Status::Pass
    } else {
        Status::Fail
    };

    Verdict {
        status,
        matched,
        match_ratio,
    }
}
