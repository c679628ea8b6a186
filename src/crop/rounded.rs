//! Rounded-corner rendering on top of [`card_scale::mask`].

use card_scale::mask::rounded_mask;
use image::{Rgba, RgbaImage, RgbImage};

/// Attach a rounded-corner mask of radius `radius` as the alpha channel of `img`.
pub fn apply_rounded_corners(img: &RgbImage, radius: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    let mask = rounded_mask(w, h, radius);
    RgbaImage::from_fn(w, h, |x, y| {
        let [r, g, b] = img.get_pixel(x, y).0;
        Rgba([r, g, b, mask[(y as usize) * (w as usize) + x as usize]])
    })
}
