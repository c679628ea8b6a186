//! # Image Label Validator
//!
//! Sanity-checks that every site image shows what its file name promises.
//!
//! ## Flow
//!
//! 1. [`validate::list_images`] enumerates `.jpg` then `.png` files, sorted by name
//! 2. [`classifier::select_classifier`] picks one [`Classifier`] for the run: the remote
//!    vision model when reachable, otherwise the pixel-statistics fallback
//! 3. [`matcher::evaluate`] checks the lowercase joined labels for the keywords listed in
//!    the [`ExpectedLabelTable`]; a match ratio of at least 0.15 passes
//! 4. [`ValidationReport`] collects one entry per image and is written as JSON
//!
//! Files without table entries are skipped and classifier failures are recorded as
//! `error`; neither affects the exit code unless strict mode is on.

pub mod classifier;
pub mod matcher;
pub mod pixel_stats;
pub mod report;
pub mod table;
pub mod validate;
pub mod vision;

pub use classifier::{select_classifier, Classifier, Label};
pub use matcher::{evaluate, Status, Verdict, DEFAULT_PASS_THRESHOLD};
pub use pixel_stats::PixelStatsClassifier;
pub use report::{ImageReport, Tally, ValidationReport};
pub use table::ExpectedLabelTable;
pub use validate::{list_images, run_validation, Validator};
pub use vision::VisionClassifier;
