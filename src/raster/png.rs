// PNG read/write for snapshot artifacts.

use std::fs;
use std::path::Path;

use image::ImageFormat;

use super::RasterPage;
use crate::error::SnapshotError;

/// Decodes the image at `path` into an RGBA buffer.
pub fn read_png(path: &Path) -> crate::error::Result<RasterPage> {
    let img = image::open(path)?;
    Ok(img.to_rgba8())
}

/// Encodes `page` as PNG at `path`, replacing any existing file.
///
/// The image is written to a sibling temporary file first and renamed into
/// place, so readers never see a half-written PNG.
pub fn write_png(path: &Path, page: &RasterPage) -> crate::error::Result<()> {
    if page.width() == 0 || page.height() == 0 {
        return Err(SnapshotError::image(format!(
            "refusing to write empty image to {}",
            path.display()
        )));
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    if let Err(e) = page.save_with_format(tmp_path, ImageFormat::Png) {
        let _ = fs::remove_file(tmp_path);
        return Err(e.into());
    }
    fs::rename(tmp_path, path)?;
    Ok(())
}
