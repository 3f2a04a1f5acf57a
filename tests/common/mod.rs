// Shared helpers: an in-memory rasterizer and small image builders.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use image::{Rgba, RgbaImage};
use pdf_snapshot::raster::RasterSequence;
use pdf_snapshot::{Dpi, PageRasterizer, SnapshotError};
use sha2::{Digest, Sha256};

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Rasterizer returning pre-registered pages for known "PDF" byte strings.
///
/// Unknown input is reported as malformed, like an unparsable PDF.
#[derive(Default)]
pub struct FakeRasterizer {
    documents: HashMap<Vec<u8>, RasterSequence>,
    calls: Mutex<Vec<Dpi>>,
}

impl FakeRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, pdf: &[u8], pages: RasterSequence) -> Self {
        self.documents.insert(pdf.to_vec(), pages);
        self
    }

    /// Resolutions requested so far, in call order.
    pub fn calls(&self) -> Vec<Dpi> {
        self.calls.lock().unwrap().clone()
    }
}

impl PageRasterizer for FakeRasterizer {
    fn rasterize(&self, pdf: &[u8], dpi: Dpi) -> pdf_snapshot::Result<RasterSequence> {
        self.calls.lock().unwrap().push(dpi);
        self.documents
            .get(pdf)
            .cloned()
            .ok_or_else(|| SnapshotError::malformed_input("not a PDF"))
    }
}

/// A white page with an optional black rectangle `(x, y, w, h)`.
pub fn page(width: u32, height: u32, mark: Option<(u32, u32, u32, u32)>) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(width, height, WHITE);
    if let Some((x, y, w, h)) = mark {
        for py in y..(y + h).min(height) {
            for px in x..(x + w).min(width) {
                img.put_pixel(px, py, BLACK);
            }
        }
    }
    img
}

/// Sorted file names in `dir` (empty when the directory does not exist).
pub fn file_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// SHA-256 over every file name and content in `dir`, in name order.
pub fn dir_fingerprint(dir: &Path) -> String {
    let mut hasher = Sha256::new();
    for name in file_names(dir) {
        hasher.update(name.as_bytes());
        hasher.update(fs::read(dir.join(&name)).unwrap());
    }
    hex::encode(hasher.finalize())
}

/// In-memory sink for log output.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a WARN-level subscriber on the current thread and returns
/// its result with everything logged from this thread.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (result, logs)
}
