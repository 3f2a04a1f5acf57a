// Page viewport sizing: native page size in points -> target pixel size.

use super::units::{Dpi, PDF_DPI, convert_mm_to_px, convert_px_to_mm};

/// Pixel dimensions a page is rendered at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub scale: f64,
}

/// Computes the render viewport for a page of `width_pts` x `height_pts`.
///
/// At [`Dpi::Low`] the native point-to-pixel ratio is used unmodified. For any
/// other resolution the native size is converted to whole millimeters and back
/// to pixels at the target DPI; the smaller of the two axis ratios becomes the
/// scale so the aspect ratio is preserved.
pub fn page_viewport(width_pts: f64, height_pts: f64, dpi: Dpi) -> Viewport {
    let dpi_value = dpi.value();
    if dpi_value == PDF_DPI {
        return Viewport {
            width: to_px(width_pts),
            height: to_px(height_pts),
            scale: 1.0,
        };
    }

    if !(width_pts > 0.0) || !(height_pts > 0.0) {
        return Viewport {
            width: 0,
            height: 0,
            scale: 0.0,
        };
    }

    let native = PDF_DPI as f64;
    let target = dpi_value as f64;
    let width_mm = convert_px_to_mm(width_pts, native) as f64;
    let height_mm = convert_px_to_mm(height_pts, native) as f64;
    let target_width = convert_mm_to_px(width_mm, target) as f64;
    let target_height = convert_mm_to_px(height_mm, target) as f64;
    let scale = (target_width / width_pts).min(target_height / height_pts);

    Viewport {
        width: to_px(width_pts * scale),
        height: to_px(height_pts * scale),
        scale,
    }
}

fn to_px(size: f64) -> u32 {
    if size > 0.0 { size.round() as u32 } else { 0 }
}
