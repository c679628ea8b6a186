//! Face-region scan used to pick a CSS `object-position` for portrait crops.
//!
//! The image is sampled on a percentage grid; each sample averages a square window
//! and scores warm, bright regions highest.

use std::fmt;

use card_scale::presets::Rect;
use image::RgbImage;
use tracing::debug;

use crate::config::FaceScanConfig;
use crate::error::{AssetError, Result};
use crate::stats::region_means;

/// Horizontal grid positions, percent of width (10, 12, .. 88).
pub const X_PERCENTS: std::ops::Range<u32> = 10..90;
/// Vertical grid positions, percent of height (5, 7, .. 59).
pub const Y_PERCENTS: std::ops::Range<u32> = 5..60;
pub const GRID_STEP: usize = 2;

/// Best-scoring grid point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceCandidate {
    pub x_pct: u32,
    pub y_pct: u32,
    pub px: u32,
    pub py: u32,
    pub brightness: f64,
    pub warmth: f64,
    pub score: f64,
}

impl FaceCandidate {
    /// CSS value for the candidate, e.g. `34% 17%`.
    pub fn object_position(&self) -> String {
        format!("{}% {}%", self.x_pct, self.y_pct)
    }
}

impl fmt::Display for FaceCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}% x, {}% y (px {},{}) brightness {:.1}, skin warmth {:.1}",
            self.x_pct, self.y_pct, self.px, self.py, self.brightness, self.warmth
        )
    }
}

/// `warmth * brightness / 100` for warm windows, 0 otherwise.
pub fn skin_score(brightness: f64, warmth: f64) -> f64 {
    if warmth > 0.0 { warmth * (brightness / 100.0) } else { 0.0 }
}

/// Square window of side `window` centred on `(cx, cy)`, clipped at the top/left edge.
/// The far edge saturates; `region_means` clips it to the image.
fn window_at(cx: u32, cy: u32, window: u32) -> Rect {
    let half = window / 2;
    let x = cx.saturating_sub(half);
    let y = cy.saturating_sub(half);
    Rect {
        x,
        y,
        w: cx.saturating_add(half) - x,
        h: cy.saturating_add(half) - y,
    }
}

/// Scan the grid and return the highest positive score. The first grid point wins ties;
/// `None` when no window is warm.
pub fn scan_face_region(img: &RgbImage, window: u32) -> Option<FaceCandidate> {
    let (w, h) = img.dimensions();
    let mut best: Option<FaceCandidate> = None;

    for x_pct in X_PERCENTS.step_by(GRID_STEP) {
        for y_pct in Y_PERCENTS.step_by(GRID_STEP) {
            let px = (u64::from(w) * u64::from(x_pct) / 100) as u32;
            let py = (u64::from(h) * u64::from(y_pct) / 100) as u32;
            let Some(means) = region_means(img, window_at(px, py, window)) else {
                continue;
            };
            let (brightness, warmth) = (means.brightness(), means.warmth());
            let score = skin_score(brightness, warmth);
            if score > best.map_or(0.0, |b| b.score) {
                best = Some(FaceCandidate {
                    x_pct,
                    y_pct,
                    px,
                    py,
                    brightness,
                    warmth,
                    score,
                });
            }
        }
    }

    if let Some(b) = &best {
        debug!(x = b.x_pct, y = b.y_pct, score = b.score, "face candidate");
    }
    best
}

/// Decode the configured image and scan it.
pub fn run_face_scan(config: &FaceScanConfig) -> Result<(u32, u32, Option<FaceCandidate>)> {
    config.validate()?;
    let img = image::open(&config.image_path)
        .map_err(|e| AssetError::codec(&config.image_path, e))?
        .to_rgb8();
    let (w, h) = img.dimensions();
    Ok((w, h, scan_face_region(&img, config.window)))
}
