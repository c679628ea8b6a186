//! Classifier seam: the vision model and the pixel-statistics fallback both produce
//! an ordered list of `(label, confidence)` pairs per image.

use std::cmp::Ordering;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::VisionConfig;
use crate::error::Result;

use super::pixel_stats::PixelStatsClassifier;
use super::vision::VisionClassifier;

/// One label returned by a classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub label: String,
    /// In `[0, 1]`.
    pub confidence: f32,
}

impl Label {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// `"Bus Stop (90.0%)"`, the form stored in reports.
    pub fn display(&self) -> String {
        format!("{} ({:.1}%)", self.label, self.confidence * 100.0)
    }
}

/// Sort by descending confidence, keeping the original order for ties.
pub fn sort_by_confidence(labels: &mut [Label]) {
    labels.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });
}

/// Produces labels for an image file.
pub trait Classifier {
    /// Short backend name used in logs and the report.
    fn name(&self) -> &str;

    /// Labels ordered by descending confidence.
    fn classify(&self, path: &Path) -> Result<Vec<Label>>;
}

/// Choose the classifier for a whole run.
///
/// The vision model is used when an endpoint is configured and answers the probe;
/// otherwise the pixel-statistics fallback keeps the batch running.
pub fn select_classifier(config: &VisionConfig) -> Box<dyn Classifier> {
    let Some(endpoint) = config.endpoint.as_deref() else {
        warn!("no vision endpoint configured, using pixel-statistics fallback");
        return Box::new(PixelStatsClassifier);
    };

    match VisionClassifier::new(config).and_then(|c| c.probe().map(|_| c)) {
        Ok(classifier) => {
            info!(endpoint, model = %config.model, "using vision classifier");
            Box::new(classifier)
        }
        Err(err) => {
            warn!(endpoint, "vision classifier unavailable ({}), using pixel-statistics fallback", err);
            Box::new(PixelStatsClassifier)
        }
    }
}
