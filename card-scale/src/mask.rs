// SPDX-License-Identifier: MIT
//! # Rounded-Corner Masks
//!
//! Builds a single-channel opacity mask (0 = transparent, 255 = opaque) that clips the
//! four corners of a rectangle to quarter-circle arcs of radius `R`.
//!
//! The mask is painted in two passes and the order matters:
//! 1. the four `R×R` corner squares are painted transparent
//! 2. four discs of radius `R`, each centred on the inner corner of its square, are painted opaque
//!
//! What remains transparent is "corner square minus quarter disc". Pixel coverage is decided
//! at the pixel centre, and each corner is painted through a reflection of the top-left one,
//! so the mask is exactly symmetric.

/// Opacity of a pixel outside the clipped corners.
pub const OPAQUE: u8 = 255;
/// Opacity of a clipped corner pixel.
pub const TRANSPARENT: u8 = 0;

/// Build a `w * h` row-major mask with rounded corners of radius `radius`.
///
/// The radius is clamped to `min(w, h) / 2`; a radius of 0 yields a fully opaque mask.
pub fn rounded_mask(w: u32, h: u32, radius: u32) -> Vec<u8> {
    let mut mask = vec![OPAQUE; (w as usize) * (h as usize)];
    let r = radius.min(w.min(h) / 2);
    if r == 0 {
        return mask;
    }

    for_each_corner(w, h, r, |x, y, _, _| mask[(y as usize) * (w as usize) + x as usize] = TRANSPARENT);
    for_each_corner(w, h, r, |x, y, lx, ly| {
        if inside_disc(lx, ly, r) {
            mask[(y as usize) * (w as usize) + x as usize] = OPAQUE;
        }
    });

    mask
}

/// Visit every pixel of the four corner squares. `lx, ly` are the coordinates
/// reflected into the top-left square.
fn for_each_corner(w: u32, h: u32, r: u32, mut paint: impl FnMut(u32, u32, u32, u32)) {
    for ly in 0..r {
        for lx in 0..r {
            let (rx, by) = (w - 1 - lx, h - 1 - ly);
            paint(lx, ly, lx, ly);
            if rx != lx {
                paint(rx, ly, lx, ly);
            }
            if by != ly {
                paint(lx, by, lx, ly);
                if rx != lx {
                    paint(rx, by, lx, ly);
                }
            }
        }
    }
}

/// Disc of radius `r` centred at `(r, r)` in continuous coordinates.
fn inside_disc(lx: u32, ly: u32, r: u32) -> bool {
    let dx = f64::from(lx) + 0.5 - f64::from(r);
    let dy = f64::from(ly) + 0.5 - f64::from(r);
    dx * dx + dy * dy <= f64::from(r) * f64::from(r)
}
