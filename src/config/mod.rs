//! # Configuration Module
//!
//! Configuration structures for the crop, validate, HTML check and face scan tools.

pub mod config;

pub use config::{ConfigViolation, CropConfig, FaceScanConfig, HtmlCheckConfig, ValidateConfig, VisionConfig};
