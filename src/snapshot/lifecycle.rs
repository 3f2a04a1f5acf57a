// Snapshot lifecycle: create-vs-compare-vs-fail and the on-disk artifact transitions.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::context::{
    PageBaselines, SnapshotContext, discover_page_artifacts, discover_page_baselines, ensure_dir,
    snapshots_dir, validate_snapshot_name,
};
use super::source::PdfSource;
use crate::config::options::{CompareOptions, MergedOptions};
use crate::config::settings::Settings;
use crate::error::SnapshotError;
use crate::raster::compositor::PageGroup;
use crate::raster::diff::{self, PageDiff, Verdict};
use crate::raster::mask::apply_masks;
use crate::raster::png::{read_png, write_png};
use crate::raster::{RasterPage, RasterSequence};
use crate::render::PageRasterizer;

/// Whether a usable baseline exists for a snapshot name.
enum BaselineState {
    /// Nothing to compare against. `stale` lists leftovers of an incomplete
    /// per-page set that must go before a fresh set is written.
    Missing { stale: Vec<PathBuf> },
    Present(Vec<SnapshotContext>),
}

/// Compares rendered PDFs against persisted snapshots and maintains the
/// baseline/new/diff files next to them.
///
/// Callers running comparisons concurrently must use distinct snapshot names;
/// there is no locking on the snapshot directory.
pub struct SnapshotManager<R> {
    rasterizer: R,
    settings: Settings,
}

impl<R: PageRasterizer> SnapshotManager<R> {
    pub fn new(rasterizer: R) -> Self {
        Self::with_settings(rasterizer, Settings::default())
    }

    pub fn with_settings(rasterizer: R, settings: Settings) -> Self {
        Self {
            rasterizer,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Compares `pdf` to the snapshot `snapshot_name` stored under
    /// `<snapshot_dir>/__snapshots__/`.
    ///
    /// - No baseline, `fail_on_missing_snapshot` unset: the render is saved as
    ///   the new baseline and `true` is returned.
    /// - No baseline, `fail_on_missing_snapshot` set: `false`, nothing written.
    /// - Baseline matches within tolerance: stale `.new.png`/`.diff.png` files
    ///   are removed and `true` is returned.
    /// - Baseline differs: the render is written to `.new.png`, the diff
    ///   visualization to `.diff.png`, and `false` is returned.
    ///
    /// With `combine_pages` off every page is its own snapshot. If some but not
    /// all page baselines exist, the whole set counts as missing.
    ///
    /// # Errors
    /// `MalformedInput` if the PDF cannot be parsed or has no pages, `IoError`/`ImageError` if
    /// snapshot files cannot be read or written. A mismatch is not an error.
    pub fn compare_pdf_to_snapshot(
        &self,
        pdf: impl Into<PdfSource>,
        snapshot_dir: &Path,
        snapshot_name: &str,
        options: &CompareOptions,
    ) -> crate::error::Result<bool> {
        validate_snapshot_name(snapshot_name)?;
        let pdf = pdf.into();
        let opts = options.merged(&self.settings);
        let dir_path = snapshots_dir(snapshot_dir, &opts.snapshots_dir_name);

        match baseline_state(&dir_path, snapshot_name, opts.combine_pages)? {
            BaselineState::Missing { stale } => {
                if opts.fail_on_missing_snapshot {
                    info!(
                        snapshot = snapshot_name,
                        dir = %dir_path.display(),
                        "snapshot missing and fail_on_missing_snapshot is set"
                    );
                    return Ok(false);
                }
                let candidate = self.render(&pdf, &opts)?;
                create_baseline(&dir_path, snapshot_name, &candidate, &stale)?;
                Ok(true)
            }
            BaselineState::Present(contexts) => {
                let candidate = self.render(&pdf, &opts)?;
                compare_with_baseline(&dir_path, snapshot_name, &contexts, &candidate, &opts)
            }
        }
    }

    /// Rasterize -> mask -> group.
    fn render(&self, pdf: &PdfSource, opts: &MergedOptions) -> crate::error::Result<PageGroup> {
        let bytes = pdf.load()?;
        let pages = self.rasterizer.rasterize(&bytes, opts.dpi)?;
        if pages.is_empty() {
            return Err(SnapshotError::malformed_input("PDF has no pages"));
        }
        debug!(pages = pages.len(), dpi = opts.dpi.value(), "rendered PDF");
        let pages = apply_masks(pages, &*opts.mask_regions);
        Ok(PageGroup::from_pages(pages, opts.combine_pages))
    }
}

fn baseline_state(
    dir_path: &Path,
    name: &str,
    combine_pages: bool,
) -> crate::error::Result<BaselineState> {
    if combine_pages {
        let ctx = SnapshotContext::combined(dir_path, name);
        return Ok(if ctx.baseline_path.is_file() {
            BaselineState::Present(vec![ctx])
        } else {
            BaselineState::Missing { stale: Vec::new() }
        });
    }

    Ok(match discover_page_baselines(dir_path, name)? {
        PageBaselines::Missing => BaselineState::Missing { stale: Vec::new() },
        PageBaselines::Complete(contexts) => BaselineState::Present(contexts),
        PageBaselines::Partial(stale) => {
            warn!(
                snapshot = name,
                found = stale.len(),
                "incomplete per-page baseline set, regenerating all pages"
            );
            BaselineState::Missing { stale }
        }
    })
}

fn create_baseline(
    dir_path: &Path,
    name: &str,
    candidate: &PageGroup,
    stale: &[PathBuf],
) -> crate::error::Result<()> {
    ensure_dir(dir_path)?;
    for path in stale {
        remove_if_exists(path)?;
    }

    match candidate {
        PageGroup::Combined(image) => {
            let ctx = SnapshotContext::combined(dir_path, name);
            remove_if_exists(&ctx.new_path)?;
            remove_if_exists(&ctx.diff_path)?;
            write_png(&ctx.baseline_path, image)?;
            info!(snapshot = name, path = %ctx.baseline_path.display(), "created baseline");
        }
        PageGroup::PerPage(pages) => {
            // Pending artifacts belong to the set being replaced.
            for path in discover_page_artifacts(dir_path, name)? {
                remove_if_exists(&path)?;
            }
            let results: Vec<crate::error::Result<()>> = pages
                .par_iter()
                .enumerate()
                .map(|(idx, page)| {
                    let ctx = SnapshotContext::page(dir_path, name, idx as u32 + 1, pages.len());
                    write_png(&ctx.baseline_path, page)
                })
                .collect();
            results.into_iter().collect::<crate::error::Result<Vec<()>>>()?;
            info!(snapshot = name, pages = pages.len(), "created per-page baselines");
        }
    }
    Ok(())
}

fn load_baseline(contexts: &[SnapshotContext], combine_pages: bool) -> crate::error::Result<PageGroup> {
    let pages: Vec<crate::error::Result<RasterPage>> = contexts
        .par_iter()
        .map(|ctx| read_png(&ctx.baseline_path))
        .collect();
    let mut pages = pages.into_iter().collect::<crate::error::Result<RasterSequence>>()?;

    if combine_pages && pages.len() == 1 {
        Ok(PageGroup::Combined(pages.remove(0)))
    } else {
        Ok(PageGroup::PerPage(pages))
    }
}

fn compare_with_baseline(
    dir_path: &Path,
    name: &str,
    contexts: &[SnapshotContext],
    candidate: &PageGroup,
    opts: &MergedOptions,
) -> crate::error::Result<bool> {
    let baseline = load_baseline(contexts, opts.combine_pages)?;
    let verdict = diff::compare(&baseline, candidate, opts.tolerance);

    let failing: HashMap<u32, &PageDiff> = match &verdict {
        Verdict::Equal => HashMap::new(),
        Verdict::NotEqual { diffs } => diffs.iter().map(|d| (d.page, d)).collect(),
    };

    let candidate_pages = candidate.images();
    let page_count = contexts.len().max(candidate_pages.len());
    // Extra pages keep the padding of the existing set.
    let padding_count = contexts.len();

    // Every page settles its own artifacts, even after another page failed.
    let results: Vec<crate::error::Result<()>> = (0..page_count)
        .into_par_iter()
        .map(|idx| {
            let page = idx as u32 + 1;
            let ctx = contexts
                .get(idx)
                .cloned()
                .unwrap_or_else(|| SnapshotContext::page(dir_path, name, page, padding_count));

            match failing.get(&page) {
                None => {
                    remove_if_exists(&ctx.new_path)?;
                    remove_if_exists(&ctx.diff_path)
                }
                Some(page_diff) => {
                    match candidate_pages.get(idx) {
                        Some(image) if image.width() > 0 && image.height() > 0 => {
                            write_png(&ctx.new_path, image)?
                        }
                        _ => remove_if_exists(&ctx.new_path)?,
                    }
                    write_png(&ctx.diff_path, &page_diff.diff_image)?;
                    info!(
                        snapshot = name,
                        page,
                        diff_ratio = page_diff.diff_ratio,
                        tolerance = opts.tolerance,
                        diff = %ctx.diff_path.display(),
                        "snapshot mismatch"
                    );
                    Ok(())
                }
            }
        })
        .collect();
    results.into_iter().collect::<crate::error::Result<Vec<()>>>()?;

    for orphan in contexts.iter().skip(candidate_pages.len()) {
        warn!(
            snapshot = name,
            baseline = %orphan.baseline_path.display(),
            "baseline page no longer rendered; delete it to accept the shorter PDF"
        );
    }

    if verdict.is_equal() {
        debug!(snapshot = name, "snapshot matches baseline");
    }
    Ok(verdict.is_equal())
}

fn remove_if_exists(path: &Path) -> crate::error::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Compares `pdf` to a snapshot using the pdfium rasterizer.
///
/// Project settings are read from `pdf_snapshot.yaml` in `snapshot_dir` when
/// present. See [`SnapshotManager::compare_pdf_to_snapshot`] for the file
/// effects.
#[cfg(feature = "pdfium")]
pub fn compare_pdf_to_snapshot(
    pdf: impl Into<PdfSource>,
    snapshot_dir: &Path,
    snapshot_name: &str,
    options: &CompareOptions,
) -> crate::error::Result<bool> {
    use crate::render::pdfium::{PdfiumRasterizer, RasterizerConfig};

    let settings = crate::config::load_settings_for_dir(snapshot_dir)?;
    let rasterizer = PdfiumRasterizer::new(&RasterizerConfig {
        library_path: settings.pdfium_library_path.clone(),
    })?;
    SnapshotManager::with_settings(rasterizer, settings).compare_pdf_to_snapshot(
        pdf,
        snapshot_dir,
        snapshot_name,
        options,
    )
}
