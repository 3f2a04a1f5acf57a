// pdfium-render backed rasterizer: PDF bytes -> RasterSequence (in-memory only)

use std::path::{Path, PathBuf};

use pdfium_render::prelude::*;
use tracing::debug;

use super::PageRasterizer;
use super::units::Dpi;
use super::viewport::page_viewport;
use crate::error::SnapshotError;
use crate::raster::RasterSequence;

/// Where to find the pdfium shared library.
#[derive(Debug, Clone, Default)]
pub struct RasterizerConfig {
    /// Directory containing the pdfium shared library, or the library file itself.
    pub library_path: Option<PathBuf>,
}

/// Resolves the path to the pdfium shared library.
///
/// Search order:
/// 1. `library_path` from the rasterizer config
/// 2. `PDFIUM_DYNAMIC_LIB_PATH` environment variable
/// 3. `vendor/pdfium/lib/` relative to the project root (for development)
///
/// Returns `Ok(None)` when nothing is configured, in which case the system
/// library search path is used.
fn resolve_pdfium_lib_path(config: &RasterizerConfig) -> crate::error::Result<Option<PathBuf>> {
    if let Some(path) = &config.library_path {
        if path.exists() {
            return Ok(Some(path.clone()));
        }
        return Err(SnapshotError::config(format!(
            "pdfium library path '{}' does not exist",
            path.display()
        )));
    }

    if let Ok(path) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Ok(Some(p));
        }
        return Err(SnapshotError::config(format!(
            "PDFIUM_DYNAMIC_LIB_PATH is set to '{}' but the path does not exist",
            path
        )));
    }

    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let vendor_path = PathBuf::from(&manifest_dir).join("vendor/pdfium/lib");
        if vendor_path.exists() {
            return Ok(Some(vendor_path));
        }
    }

    Ok(None)
}

fn bind_library(path: &Path) -> crate::error::Result<Box<dyn PdfiumLibraryBindings>> {
    let library = if path.is_dir() {
        let dir = path.to_str().ok_or_else(|| {
            SnapshotError::config("pdfium library path contains non-UTF-8 characters")
        })?;
        Pdfium::pdfium_platform_library_name_at_path(dir)
    } else {
        path.to_path_buf()
    };
    Ok(Pdfium::bind_to_library(library)?)
}

/// Renders PDF pages with pdfium.
///
/// One instance owns one loaded pdfium library. Pages of a document are
/// rendered one after another; create one rasterizer per thread to render
/// several documents in parallel.
pub struct PdfiumRasterizer {
    pdfium: Pdfium,
}

impl PdfiumRasterizer {
    /// Loads pdfium according to `config`.
    ///
    /// # Errors
    /// Returns `SnapshotError::ConfigError` if a configured library path does
    /// not exist, or `SnapshotError::RenderError` if binding fails.
    pub fn new(config: &RasterizerConfig) -> crate::error::Result<Self> {
        let bindings = match resolve_pdfium_lib_path(config)? {
            Some(path) => bind_library(&path)?,
            None => Pdfium::bind_to_system_library().map_err(|e| {
                SnapshotError::render(format!(
                    "pdfium library not found: set PDFIUM_DYNAMIC_LIB_PATH or place libpdfium in vendor/pdfium/lib/ ({e})"
                ))
            })?,
        };
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn rasterize(&self, pdf: &[u8], dpi: Dpi) -> crate::error::Result<RasterSequence> {
        if dpi.value() == 0 {
            return Err(SnapshotError::render("dpi must be greater than 0"));
        }

        let document = self
            .pdfium
            .load_pdf_from_byte_slice(pdf, None)
            .map_err(|e| SnapshotError::malformed_input(e.to_string()))?;

        let pages = document.pages();
        debug!(pages = pages.len(), dpi = dpi.value(), "rasterizing PDF");

        let mut rendered = RasterSequence::with_capacity(pages.len() as usize);
        for (idx, page) in pages.iter().enumerate() {
            let viewport = page_viewport(
                page.width().value as f64,
                page.height().value as f64,
                dpi,
            );
            if viewport.width == 0 || viewport.height == 0 {
                return Err(SnapshotError::render(format!(
                    "page {} has an empty viewport",
                    idx + 1
                )));
            }

            let config = PdfRenderConfig::new()
                .set_target_width(viewport.width as i32)
                .set_target_height(viewport.height as i32);

            let bitmap = page.render_with_config(&config)?;
            rendered.push(bitmap.as_image().to_rgba8());
        }

        Ok(rendered)
    }
}
