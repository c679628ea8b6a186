//! # Site Asset Tooling
//!
//! Developer tools for preparing and checking the images of a marketing landing page.
//!
//! ## Architecture
//!
//! - `crop`: cut feature-card regions out of app screenshots and scale them to card width
//! - `labels`: classify site images and check that they show what their names promise
//! - `html`: asset references, block-tag balance and leftovers in the landing page
//! - `face`: locate the warmest bright region of a portrait for `object-position`
//! - `config`: per-tool configuration with defaults and validation
//! - `error`: shared error type with context and severity
//!
//! Pixel geometry, CPU scaling and corner masks live in the `card-scale` crate.
//!
//! ## Example
//!
//! ```rust,no_run
//! use site_assets::config::CropConfig;
//! use site_assets::crop::{run_crop_batch, FEATURE_CARD_JOBS};
//!
//! # fn example() -> site_assets::error::Result<()> {
//! let summary = run_crop_batch(CropConfig::default(), &FEATURE_CARD_JOBS)?;
//! println!("{} written, {} skipped", summary.written(), summary.skipped());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crop;
pub mod error;
pub mod face;
pub mod html;
pub mod labels;
pub mod stats;
pub mod telemetry;

pub use error::{AssetError, Result};
