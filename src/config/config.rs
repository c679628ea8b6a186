//! # Configuration Structures
//!
//! Typed configuration for every tool in this crate. Each struct has a `Default`
//! carrying the paths and constants the tools were first written against, so every
//! command runs without flags from the site root. `validate()` performs the range
//! checks and names the first offending field in a [`ConfigViolation`].
//!
//! | Tool | Struct | Key defaults |
//! |------|--------|--------------|
//! | crop | [`CropConfig`] | `App Screenshots incomplete` → `assets/images/feat-cards`, 540px, JPEG q90 |
//! | validate | [`ValidateConfig`] | `assets/images`, report `scripts/image_report.json`, threshold 0.15 |
//! | check-html | [`HtmlCheckConfig`] | `index-premium.html` |
//! | face-scan | [`FaceScanConfig`] | `assets/images/earphones-commuter.jpg` |
//!
//! ```rust
//! use site_assets::config::CropConfig;
//!
//! let config = CropConfig::default();
//! assert_eq!(config.target_width, 540);
//! assert!(config.validate().is_ok());
//! ```

use std::path::PathBuf;
use std::time::Duration;

/// First field that failed validation, with the rejected value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigViolation {
    pub field: &'static str,
    pub value: String,
    pub reason: String,
}

impl ConfigViolation {
    fn new(field: &'static str, value: impl ToString, reason: impl Into<String>) -> Self {
        Self {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Configuration for the feature card crop batch.
#[derive(Debug, Clone)]
pub struct CropConfig {
    /// Directory holding the source screenshots.
    pub source_dir: PathBuf,
    /// Directory the feature cards are written to (created if missing).
    pub output_dir: PathBuf,
    /// Output width of every card; height follows the crop's aspect ratio.
    pub target_width: u32,
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
    /// When set, also write a `<stem>-rounded.png` with corners of this radius.
    pub rounded_radius: Option<u32>,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("App Screenshots incomplete"),
            output_dir: PathBuf::from("assets/images/feat-cards"),
            target_width: 540,
            jpeg_quality: 90,
            rounded_radius: None,
        }
    }
}

impl CropConfig {
    pub fn validate(&self) -> Result<(), ConfigViolation> {
        if self.target_width == 0 {
            return Err(ConfigViolation::new(
                "target_width",
                self.target_width,
                "Target width must be greater than 0",
            ));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigViolation::new(
                "jpeg_quality",
                self.jpeg_quality,
                "JPEG quality must be between 1 and 100",
            ));
        }
        if self.rounded_radius == Some(0) {
            return Err(ConfigViolation::new(
                "rounded_radius",
                0,
                "Rounded corner radius must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Settings for the remote vision classifier.
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// Base URL of an OpenAI-compatible API, e.g. `http://127.0.0.1:8001/v1`.
    /// `None` selects the pixel-statistics fallback.
    pub endpoint: Option<String>,
    /// Model name sent with each request.
    pub model: String,
    /// Maximum number of labels kept per image.
    pub max_labels: usize,
    /// Bound on each classification request.
    pub timeout: Duration,
    /// Longest side of the image sent to the model.
    pub upload_max_side: u32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            model: "qwen3-vl".to_string(),
            max_labels: 10,
            timeout: Duration::from_secs(30),
            upload_max_side: 1024,
        }
    }
}

/// Configuration for the image label validator.
#[derive(Debug, Clone)]
pub struct ValidateConfig {
    /// Directory of site images to check.
    pub images_dir: PathBuf,
    /// Where the JSON report is written (parent created if missing).
    pub report_path: PathBuf,
    /// Optional JSON file replacing the built-in expected-label table.
    pub expected_labels: Option<PathBuf>,
    /// Minimum fraction of expected keywords that must appear in the labels.
    pub pass_threshold: f64,
    /// Treat classifier errors as failures for the exit code.
    pub strict: bool,
    pub vision: VisionConfig,
}

impl Default for ValidateConfig {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from("assets/images"),
            report_path: PathBuf::from("scripts/image_report.json"),
            expected_labels: None,
            pass_threshold: 0.15,
            strict: false,
            vision: VisionConfig::default(),
        }
    }
}

impl ValidateConfig {
    pub fn validate(&self) -> Result<(), ConfigViolation> {
        if !(0.0..=1.0).contains(&self.pass_threshold) {
            return Err(ConfigViolation::new(
                "pass_threshold",
                self.pass_threshold,
                "Pass threshold must be between 0.0 and 1.0",
            ));
        }
        self.vision.validate()
    }
}

impl VisionConfig {
    pub fn validate(&self) -> Result<(), ConfigViolation> {
        if self.max_labels == 0 {
            return Err(ConfigViolation::new(
                "vision.max_labels",
                self.max_labels,
                "Max labels must be greater than 0",
            ));
        }
        if self.timeout.is_zero() {
            return Err(ConfigViolation::new(
                "vision.timeout",
                format!("{:?}", self.timeout),
                "Classifier timeout must be greater than 0",
            ));
        }
        if self.upload_max_side < 64 {
            return Err(ConfigViolation::new(
                "vision.upload_max_side",
                self.upload_max_side,
                "Upload size must be at least 64 pixels",
            ));
        }
        if let Some(endpoint) = &self.endpoint {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(ConfigViolation::new(
                    "vision.endpoint",
                    endpoint,
                    "Vision endpoint must be an http(s) URL",
                ));
            }
        }
        Ok(())
    }
}

/// Configuration for the HTML asset reference checker.
#[derive(Debug, Clone)]
pub struct HtmlCheckConfig {
    /// Page to check.
    pub html_path: PathBuf,
    /// Directory asset references are resolved against.
    pub site_root: PathBuf,
    /// Identifiers that should no longer appear in the page.
    pub leftover_patterns: Vec<String>,
}

impl Default for HtmlCheckConfig {
    fn default() -> Self {
        Self {
            html_path: PathBuf::from("index-premium.html"),
            site_root: PathBuf::from("."),
            leftover_patterns: ["floatImgs", "sh-float", "stickyPhotos", "sticky-photo"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl HtmlCheckConfig {
    pub fn validate(&self) -> Result<(), ConfigViolation> {
        if let Some(i) = self.leftover_patterns.iter().position(|p| p.is_empty()) {
            return Err(ConfigViolation::new(
                "leftover_patterns",
                format!("[{i}] = \"\""),
                "Leftover patterns must not be empty strings",
            ));
        }
        Ok(())
    }
}

/// Configuration for the face-region brightness scan.
#[derive(Debug, Clone)]
pub struct FaceScanConfig {
    pub image_path: PathBuf,
    /// Side of the square window averaged at each grid point.
    pub window: u32,
}

impl Default for FaceScanConfig {
    fn default() -> Self {
        Self {
            image_path: PathBuf::from("assets/images/earphones-commuter.jpg"),
            window: 60,
        }
    }
}

impl FaceScanConfig {
    pub fn validate(&self) -> Result<(), ConfigViolation> {
        if self.window < 2 {
            return Err(ConfigViolation::new(
                "window",
                self.window,
                "Scan window must be at least 2 pixels",
            ));
        }
        Ok(())
    }
}
