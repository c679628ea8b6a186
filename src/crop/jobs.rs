//! Static crop table for the feature cards.

use card_scale::presets::Rect;

/// Crop rectangle as absolute pixel edges in the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropRect {
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Origin + size form, or `None` when the edges are inverted or empty.
    pub fn to_rect(&self) -> Option<Rect> {
        if self.right <= self.left || self.bottom <= self.top {
            return None;
        }
        Some(Rect {
            x: self.left,
            y: self.top,
            w: self.right - self.left,
            h: self.bottom - self.top,
        })
    }
}

/// One source-to-output transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropJob {
    /// Screenshot file name inside the source directory.
    pub source: &'static str,
    pub rect: CropRect,
    /// Card file name inside the output directory.
    pub output: &'static str,
}

/// Feature cards cut from the 1080x2376 Android screenshots.
pub const FEATURE_CARD_JOBS: [CropJob; 6] = [
    // map area with the pin
    CropJob {
        source: "app-map-pinned-location.jpg",
        rect: CropRect::new(0, 80, 1080, 1350),
        output: "feat-map-location.jpg",
    },
    // search bar + dropdown
    CropJob {
        source: "app-search-autocomplete.jpg",
        rect: CropRect::new(0, 80, 1080, 1350),
        output: "feat-search.jpg",
    },
    // config panel with the radius slider
    CropJob {
        source: "app-new-alarm-config.jpg",
        rect: CropRect::new(0, 450, 1080, 1720),
        output: "feat-alarm-config.jpg",
    },
    CropJob {
        source: "app-alarm-display-slide.jpg",
        rect: CropRect::new(0, 300, 1080, 1570),
        output: "feat-alarm-display.jpg",
    },
    CropJob {
        source: "app-alarm-emoji-picker.jpg",
        rect: CropRect::new(0, 600, 1080, 1870),
        output: "feat-emoji-picker.jpg",
    },
    CropJob {
        source: "app-settings-color-themes.jpg",
        rect: CropRect::new(0, 350, 1080, 1620),
        output: "feat-color-themes.jpg",
    },
];
