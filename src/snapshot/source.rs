use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// A PDF given either as bytes or as a path to read.
#[derive(Debug, Clone)]
pub enum PdfSource {
    Bytes(Vec<u8>),
    Path(PathBuf),
}

impl PdfSource {
    /// The PDF bytes, reading the file for [`PdfSource::Path`].
    pub fn load(&self) -> crate::error::Result<Cow<'_, [u8]>> {
        match self {
            PdfSource::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
            PdfSource::Path(path) => Ok(Cow::Owned(std::fs::read(path)?)),
        }
    }
}

impl From<Vec<u8>> for PdfSource {
    fn from(bytes: Vec<u8>) -> Self {
        PdfSource::Bytes(bytes)
    }
}

impl From<&[u8]> for PdfSource {
    fn from(bytes: &[u8]) -> Self {
        PdfSource::Bytes(bytes.to_vec())
    }
}

impl From<PathBuf> for PdfSource {
    fn from(path: PathBuf) -> Self {
        PdfSource::Path(path)
    }
}

impl From<&Path> for PdfSource {
    fn from(path: &Path) -> Self {
        PdfSource::Path(path.to_path_buf())
    }
}

impl From<&PathBuf> for PdfSource {
    fn from(path: &PathBuf) -> Self {
        PdfSource::Path(path.clone())
    }
}
