// SPDX-License-Identifier: MIT
//! # Scaling Plan Computation
//!
//! Computes output dimensions for the two scaling strategies the asset tools need:
//!
//! 1. **FixedWidth**: feature cards share one output width; height follows the aspect ratio
//! 2. **MaxLongSide**: uploads to the vision model clamp the longest side, never upscaling
//!
//! All computations use floating-point and round to the nearest integer, clamped to 1px.

/// Represents a 2D size with width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    /// Byte length of a tightly packed RGB8 buffer of this size.
    pub fn pixel_bytes(&self) -> usize {
        (self.w as usize) * (self.h as usize) * 3
    }
}

/// Rectangle in source pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn size(&self) -> Size {
        Size { w: self.w, h: self.h }
    }

    /// True when the rectangle is non-empty and lies inside `bounds`.
    pub fn fits_within(&self, bounds: Size) -> bool {
        self.w > 0
            && self.h > 0
            && u64::from(self.x) + u64::from(self.w) <= u64::from(bounds.w)
            && u64::from(self.y) + u64::from(self.h) <= u64::from(bounds.h)
    }
}

/// Defines the target size constraint for scaling operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleTarget {
    /// Force the output width, derive the height proportionally. May upscale.
    FixedWidth(u32),
    /// Clamp the longest side to a maximum value, derive the other side proportionally.
    /// Images already within the limit keep their size.
    MaxLongSide(u32),
}

/// Complete scaling plan computed from input parameters.
#[derive(Clone, Copy, Debug)]
pub struct ScalePlan {
    /// Original input dimensions
    pub input: Size,
    /// Target size constraint used for planning
    pub target: ScaleTarget,
    /// Final computed output dimensions
    pub out: Size,
}

impl ScalePlan {
    /// True when the plan leaves the image untouched.
    pub fn is_identity(&self) -> bool {
        self.input == self.out
    }
}

/// Compute a scaling plan for `input` under `target`.
pub fn build_plan(input: Size, target: ScaleTarget) -> ScalePlan {
    let (w, h) = match target {
        ScaleTarget::FixedWidth(width) => fit_width(input, width),
        ScaleTarget::MaxLongSide(max_side) => fit_preserve(input, max_side),
    };
    ScalePlan {
        input,
        target,
        out: Size { w, h },
    }
}

/// Scale to an exact width: `h' = round(h * width / w)`.
fn fit_width(input: Size, width: u32) -> (u32, u32) {
    let width = width.max(1);
    let s = width as f64 / (input.w.max(1)) as f64;
    (width, ((input.h as f64 * s).round() as u32).max(1))
}

/// Fit image within max_side constraint while preserving aspect ratio.
/// Never upscales.
fn fit_preserve(input: Size, max_long: u32) -> (u32, u32) {
    let (w, h) = (input.w as f64, input.h as f64);
    let long = w.max(h).max(1.0);
    let s = (max_long as f64 / long).min(1.0);
    (
        ((w * s).round() as u32).max(1),
        ((h * s).round() as u32).max(1),
    )
}
