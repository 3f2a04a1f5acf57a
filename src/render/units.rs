// Millimeter <-> pixel conversion at a given resolution.

const MM_PER_INCH: f64 = 25.4;

/// Native PDF resolution: one point per pixel.
pub const PDF_DPI: u32 = 72;

/// Rasterization resolution.
///
/// `Low` renders at the native PDF resolution (one point per pixel), `High`
/// at twice that. Any other value is carried as `Custom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dpi {
    Low,
    #[default]
    High,
    Custom(u32),
}

impl Dpi {
    pub fn value(self) -> u32 {
        match self {
            Dpi::Low => PDF_DPI,
            Dpi::High => 144,
            Dpi::Custom(dpi) => dpi,
        }
    }
}

impl From<u32> for Dpi {
    fn from(dpi: u32) -> Self {
        match dpi {
            72 => Dpi::Low,
            144 => Dpi::High,
            other => Dpi::Custom(other),
        }
    }
}

/// Converts a size in millimeters to pixels at `dpi`.
///
/// Returns 0 when either `size_mm` or `dpi` is not positive.
pub fn convert_mm_to_px(size_mm: f64, dpi: f64) -> u32 {
    if !(size_mm > 0.0) || !(dpi > 0.0) {
        return 0;
    }
    (size_mm / MM_PER_INCH * dpi).round() as u32
}

/// Converts a size in pixels at `dpi` to whole millimeters.
///
/// Returns 0 when either `size_px` or `dpi` is not positive.
pub fn convert_px_to_mm(size_px: f64, dpi: f64) -> u32 {
    if !(size_px > 0.0) || !(dpi > 0.0) {
        return 0;
    }
    (size_px / dpi * MM_PER_INCH).round() as u32
}
