// Region masking: paint solid rectangles over volatile page content before comparison.

use std::sync::Arc;

use image::{Pixel, Rgba};

use super::RasterSequence;

/// Fill colors available for region masks.
///
/// `White` is fully transparent and leaves the page untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightColor {
    Red,
    Green,
    Blue,
    White,
    Cyan,
    Magenta,
    Yellow,
    Black,
    Gray,
}

impl HighlightColor {
    /// The color as `0xRRGGBBAA`.
    pub fn to_rgba_u32(self) -> u32 {
        match self {
            HighlightColor::Red => 0xff0000ff,
            HighlightColor::Green => 0x00ff00ff,
            HighlightColor::Blue => 0x0000ffff,
            HighlightColor::White => 0x00000000,
            HighlightColor::Cyan => 0x00ffffff,
            HighlightColor::Magenta => 0xff00ffff,
            HighlightColor::Yellow => 0xffff00ff,
            HighlightColor::Black => 0x000000ff,
            HighlightColor::Gray => 0xbfbfbfff,
        }
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba(self.to_rgba_u32().to_be_bytes())
    }
}

/// A filled rectangle in page pixel coordinates, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionMask {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub color: HighlightColor,
}

impl RegionMask {
    pub fn rectangle(x: u32, y: u32, width: u32, height: u32, color: HighlightColor) -> Self {
        Self {
            x,
            y,
            width,
            height,
            color,
        }
    }
}

/// Maps a 1-based page number to the masks for that page.
pub type MaskRegions = Arc<dyn Fn(u32) -> Option<Vec<RegionMask>> + Send + Sync>;

/// A [`MaskRegions`] that masks nothing.
pub fn no_masks() -> MaskRegions {
    Arc::new(|_| None)
}

/// Applies `mask_regions` to every page.
///
/// Takes the sequence by value and hands it back once every page is masked,
/// so no caller can observe a partially masked sequence. Rectangles are
/// alpha-composited onto the page and clipped to its bounds.
pub fn apply_masks(
    mut pages: RasterSequence,
    mask_regions: &(dyn Fn(u32) -> Option<Vec<RegionMask>> + Send + Sync),
) -> RasterSequence {
    for (idx, page) in pages.iter_mut().enumerate() {
        let page_number = idx as u32 + 1;
        let Some(masks) = mask_regions(page_number) else {
            continue;
        };

        for mask in &masks {
            let color = mask.color.to_rgba();
            if color[3] == 0 {
                continue;
            }

            let x_end = mask.x.saturating_add(mask.width).min(page.width());
            let y_end = mask.y.saturating_add(mask.height).min(page.height());
            for y in mask.y..y_end {
                for x in mask.x..x_end {
                    page.get_pixel_mut(x, y).blend(&color);
                }
            }
        }
    }
    pages
}
