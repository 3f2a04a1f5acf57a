//! Visual regression testing for PDFs.
//!
//! A PDF is rasterized page by page, optionally masked, stacked into one
//! image (or kept per page) and compared pixel by pixel against a PNG
//! baseline stored in a `__snapshots__` directory. Mismatches leave a
//! `.new.png` render and a `.diff.png` visualization next to the baseline.

pub mod cli;
pub mod config;
pub mod error;
pub mod raster;
pub mod render;
pub mod snapshot;

pub use config::options::CompareOptions;
pub use config::settings::{SNAPSHOTS_DIR_NAME, Settings};
pub use error::{Result, SnapshotError};
pub use raster::mask::{HighlightColor, MaskRegions, RegionMask};
pub use render::PageRasterizer;
pub use render::units::{Dpi, convert_mm_to_px, convert_px_to_mm};
pub use snapshot::lifecycle::SnapshotManager;
pub use snapshot::source::PdfSource;

#[cfg(feature = "pdfium")]
pub use render::pdfium::{PdfiumRasterizer, RasterizerConfig};
#[cfg(feature = "pdfium")]
pub use snapshot::lifecycle::compare_pdf_to_snapshot;
