pub mod units;
pub mod viewport;

#[cfg(feature = "pdfium")]
pub mod pdfium;

use crate::raster::RasterSequence;
use units::Dpi;

/// Turns a PDF document into one raster page per PDF page.
///
/// Page `i` of the returned sequence is PDF page `i + 1`. Implementations
/// render one document at a time; callers wanting parallelism across
/// documents use one rasterizer per thread.
pub trait PageRasterizer {
    /// Rasterizes every page of `pdf` at `dpi`.
    ///
    /// # Errors
    /// Returns `SnapshotError::MalformedInput` when `pdf` cannot be parsed.
    fn rasterize(&self, pdf: &[u8], dpi: Dpi) -> crate::error::Result<RasterSequence>;
}

impl<R: PageRasterizer + ?Sized> PageRasterizer for &R {
    fn rasterize(&self, pdf: &[u8], dpi: Dpi) -> crate::error::Result<RasterSequence> {
        (**self).rasterize(pdf, dpi)
    }
}
