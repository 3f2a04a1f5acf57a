pub mod compositor;
pub mod diff;
pub mod mask;
pub mod png;

use image::RgbaImage;

/// One rendered PDF page as an owned RGBA buffer.
pub type RasterPage = RgbaImage;

/// Rendered pages in PDF order: index `i` holds page `i + 1`.
pub type RasterSequence = Vec<RasterPage>;
