//! Channel averages over image regions.

use card_scale::presets::Rect;
use image::RgbImage;

/// Mean channel values of a region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelMeans {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl ChannelMeans {
    /// Unweighted average of the three channels, 0-255.
    pub fn brightness(&self) -> f64 {
        (self.r + self.g + self.b) / 3.0
    }

    /// Red minus green; positive for warm, skin-like tones.
    pub fn warmth(&self) -> f64 {
        self.r - self.g
    }
}

/// Average over `region`, clipped to the image. `None` if nothing remains after clipping.
pub fn region_means(img: &RgbImage, region: Rect) -> Option<ChannelMeans> {
    let x1 = region.x.saturating_add(region.w).min(img.width());
    let y1 = region.y.saturating_add(region.h).min(img.height());
    if region.x >= x1 || region.y >= y1 {
        return None;
    }

    let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
    for y in region.y..y1 {
        for x in region.x..x1 {
            let [pr, pg, pb] = img.get_pixel(x, y).0;
            r += u64::from(pr);
            g += u64::from(pg);
            b += u64::from(pb);
        }
    }
    let n = (u64::from(x1 - region.x) * u64::from(y1 - region.y)) as f64;
    Some(ChannelMeans {
        r: r as f64 / n,
        g: g as f64 / n,
        b: b as f64 / n,
    })
}

/// Average over the whole image.
pub fn image_means(img: &RgbImage) -> Option<ChannelMeans> {
    region_means(
        img,
        Rect {
            x: 0,
            y: 0,
            w: img.width(),
            h: img.height(),
        },
    )
}
