//! Low-fidelity fallback classifier built from pixel statistics.
//!
//! It cannot produce the vocabulary the keyword table expects; verdicts made with it
//! are advisory only. It exists so a run without a vision endpoint still yields a
//! complete report.

use std::path::Path;

use image::imageops::FilterType;
use tracing::debug;

use crate::error::{AssetError, Result};
use crate::stats::image_means;

use super::classifier::{sort_by_confidence, Classifier, Label};

/// Mean brightness below this is reported as `dark_scene`.
pub const DARK_BELOW: f64 = 80.0;
/// Mean brightness above this is reported as `bright_scene`.
pub const BRIGHT_ABOVE: f64 = 180.0;

const SAMPLE_SIDE: u32 = 50;

#[derive(Debug, Clone, Copy, Default)]
pub struct PixelStatsClassifier;

impl Classifier for PixelStatsClassifier {
    fn name(&self) -> &str {
        "pixel-stats"
    }

    fn classify(&self, path: &Path) -> Result<Vec<Label>> {
        let img = image::open(path).map_err(|e| AssetError::codec(path, e))?;
        let color = img.color();

        let mut labels = vec![
            Label::new("image_loaded", 1.0),
            Label::new(format!("size_{}x{}", img.width(), img.height()), 1.0),
            Label::new(format!("mode_{:?}", color).to_lowercase(), 1.0),
        ];

        if color.has_color() {
            let sample = img
                .resize_exact(SAMPLE_SIDE, SAMPLE_SIDE, FilterType::Triangle)
                .to_rgb8();
            if let Some(means) = image_means(&sample) {
                let brightness = means.brightness();
                debug!(path = %path.display(), brightness, "sampled brightness");
                if brightness < DARK_BELOW {
                    labels.push(Label::new("dark_scene", 0.8));
                } else if brightness > BRIGHT_ABOVE {
                    labels.push(Label::new("bright_scene", 0.8));
                }
                labels.push(Label::new(format!("brightness_{:.0}", brightness), 1.0));
            }
        }

        sort_by_confidence(&mut labels);
        Ok(labels)
    }
}
