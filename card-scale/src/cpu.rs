// SPDX-License-Identifier: MIT
// CPU scaler built on fast_image_resize (SIMD-accelerated).
// RGB8 in → RGB8 out, direct write into caller-provided dst buffer.

use fast_image_resize as fir;
use fir::images::{TypedImage, TypedImageRef};
use fir::pixels::U8x3;
use fir::{ResizeAlg, ResizeOptions, Resizer};

use crate::presets::{Rect, ScalePlan, Size};

#[derive(Debug)]
pub enum ScaleError {
    BufferTooSmall,
    RegionOutOfBounds { region: Rect, bounds: Size },
    Fir(fir::ResizeError),
    ImageBuf(fir::ImageBufferError),
}

impl From<fir::ResizeError> for ScaleError { fn from(e: fir::ResizeError) -> Self { Self::Fir(e) } }
impl From<fir::ImageBufferError> for ScaleError { fn from(e: fir::ImageBufferError) -> Self { Self::ImageBuf(e) } }

impl std::fmt::Display for ScaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleError::BufferTooSmall => write!(f, "Buffer too small for the requested dimensions"),
            ScaleError::RegionOutOfBounds { region, bounds } => write!(
                f,
                "Region ({}, {}, {}x{}) does not fit inside a {}x{} image",
                region.x, region.y, region.w, region.h, bounds.w, bounds.h
            ),
            ScaleError::Fir(e) => write!(f, "Fast image resize error: {}", e),
            ScaleError::ImageBuf(e) => write!(f, "Image buffer error: {}", e),
        }
    }
}

impl std::error::Error for ScaleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScaleError::Fir(e) => Some(e),
            ScaleError::ImageBuf(e) => Some(e),
            _ => None,
        }
    }
}

/// Reusable scratch holding a tightly packed copy of a source region.
pub struct Staging {
    pub(crate) buf: Vec<u8>,
}
impl Staging {
    pub fn with_capacity(cap: usize) -> Self { Self { buf: Vec::with_capacity(cap) } }
    pub fn ensure_len(&mut self, len: usize) { if self.buf.len() < len { self.buf.resize(len, 0); } }
    pub fn as_slice(&self) -> &[u8] { &self.buf }
}

/// Copy `region` of a packed RGB8 image into `staging`, rows tightly packed.
/// After the call `staging.as_slice()` starts with exactly `region.w * region.h * 3` bytes.
pub fn stage_region(src_rgb: &[u8], src: Size, region: Rect, staging: &mut Staging) -> Result<(), ScaleError> {
    if !region.fits_within(src) {
        return Err(ScaleError::RegionOutOfBounds { region, bounds: src });
    }
    if src_rgb.len() < src.pixel_bytes() {
        return Err(ScaleError::BufferTooSmall);
    }

    let src_pitch = (src.w as usize) * 3;
    let row_bytes = (region.w as usize) * 3;
    let len = row_bytes * (region.h as usize);
    staging.buf.clear();
    staging.ensure_len(len);

    let mut off = 0usize;
    for r in 0..region.h as usize {
        let row_off = (region.y as usize + r) * src_pitch + (region.x as usize) * 3;
        staging.buf[off..off + row_bytes].copy_from_slice(&src_rgb[row_off..row_off + row_bytes]);
        off += row_bytes;
    }
    Ok(())
}

/// Resize a packed RGB8 image according to `plan` using Lanczos3.
/// `dst` must hold at least `plan.out.w * plan.out.h * 3` bytes.
pub fn scale_rgb_cpu(
    resizer: &mut Resizer,
    src_rgb: &[u8],
    src: Size,
    plan: &ScalePlan,
    dst: &mut [u8],
) -> Result<(), ScaleError> {
    let src_len = src.pixel_bytes();
    let dst_len = plan.out.pixel_bytes();
    if src_rgb.len() < src_len || dst.len() < dst_len {
        return Err(ScaleError::BufferTooSmall);
    }

    if plan.is_identity() {
        dst[..dst_len].copy_from_slice(&src_rgb[..src_len]);
        return Ok(());
    }

    let src_view = TypedImageRef::<U8x3>::from_buffer(src.w, src.h, &src_rgb[..src_len])?;
    let mut dst_image = TypedImage::<U8x3>::from_buffer(plan.out.w, plan.out.h, &mut dst[..dst_len])?;

    let opts = ResizeOptions::new()
        .resize_alg(ResizeAlg::Convolution(fir::FilterType::Lanczos3))
        .use_alpha(false);
    resizer.resize_typed::<U8x3>(&src_view, &mut dst_image, &opts)?;

    Ok(())
}
