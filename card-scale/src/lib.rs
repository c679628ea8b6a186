// SPDX-License-Identifier: MIT
//! # card-scale: Feature Card Scaling
//!
//! Small CPU scaling toolkit used by the site asset tools. It turns a region of an
//! app screenshot into a web-sized feature card and prepares downscaled copies of
//! photos before they are sent to a vision model.
//!
//! ## Key Components
//!
//! - [`presets`]: Size planning (fixed output width, longest-side clamp)
//! - [`cpu`]: Region staging and Lanczos3 resizing of packed RGB8 buffers using fast_image_resize
//! - [`mask`]: Rounded-corner opacity masks
//!
//! ## Usage Example
//!
//! ```rust
//! use card_scale::{cpu::{scale_rgb_cpu, stage_region, Staging}, presets::{build_plan, Rect, ScaleTarget, Size}};
//!
//! let src = vec![128u8; 1080 * 2376 * 3];
//! let region = Rect { x: 0, y: 80, w: 1080, h: 1270 };
//!
//! let mut staging = Staging::with_capacity(0);
//! stage_region(&src, Size { w: 1080, h: 2376 }, region, &mut staging).unwrap();
//!
//! let plan = build_plan(region.size(), ScaleTarget::FixedWidth(540));
//! let mut out = vec![0u8; plan.out.pixel_bytes()];
//! let mut resizer = fast_image_resize::Resizer::new();
//! scale_rgb_cpu(&mut resizer, staging.as_slice(), region.size(), &plan, &mut out).unwrap();
//! assert_eq!((plan.out.w, plan.out.h), (540, 635));
//! ```

pub mod cpu;
pub mod mask;
pub mod presets;
