// Diff engine: tolerance-based pixel comparison of baseline vs candidate.

use image::Rgba;
use rayon::prelude::*;

use super::RasterPage;
use super::compositor::PageGroup;

const DIFF_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Opacity of the baseline shown behind highlighted differences.
const CONTEXT_ALPHA: f64 = 0.1;

/// Pixel-level comparison of one baseline/candidate pair.
#[derive(Debug, Clone)]
pub struct PageComparison {
    /// Fraction of pixels that differ, in `[0, 1]`.
    pub diff_ratio: f64,
    pub dimensions_match: bool,
    /// Red where pixels differ, a faded baseline elsewhere.
    pub diff_image: RasterPage,
}

impl PageComparison {
    /// Whether the pair counts as equal at `tolerance`.
    ///
    /// Images of different sizes are never equal.
    pub fn is_within(&self, tolerance: f64) -> bool {
        self.dimensions_match && self.diff_ratio <= tolerance
    }
}

/// A mismatching page and its diff visualization.
#[derive(Debug, Clone)]
pub struct PageDiff {
    /// 1-based page number (always 1 for a combined image).
    pub page: u32,
    pub diff_ratio: f64,
    pub diff_image: RasterPage,
}

#[derive(Debug, Clone)]
pub enum Verdict {
    Equal,
    NotEqual { diffs: Vec<PageDiff> },
}

impl Verdict {
    pub fn is_equal(&self) -> bool {
        matches!(self, Verdict::Equal)
    }
}

/// Clamps a tolerance into `[0, 1]`; NaN becomes 0.
pub fn clamp_tolerance(tolerance: f64) -> f64 {
    if tolerance.is_nan() {
        0.0
    } else {
        tolerance.clamp(0.0, 1.0)
    }
}

/// Compares `candidate` against `baseline` pixel by pixel.
///
/// The comparison covers the union of both images' bounds. A pixel counts as
/// different when its RGBA values differ or when it lies inside only one of
/// the two images, so a size mismatch shows up as a diff area instead of an
/// error.
pub fn measure(baseline: &RasterPage, candidate: &RasterPage) -> PageComparison {
    let width = baseline.width().max(candidate.width());
    let height = baseline.height().max(candidate.height());
    let dimensions_match = baseline.dimensions() == candidate.dimensions();

    let mut diff_image = RasterPage::new(width, height);
    let mut differing: u64 = 0;

    for y in 0..height {
        for x in 0..width {
            let expected = pixel_at(baseline, x, y);
            let actual = pixel_at(candidate, x, y);
            let out = match (expected, actual) {
                (Some(e), Some(a)) if e == a => faded(e),
                _ => {
                    differing += 1;
                    DIFF_COLOR
                }
            };
            diff_image.put_pixel(x, y, out);
        }
    }

    let total = width as u64 * height as u64;
    let diff_ratio = if total == 0 {
        0.0
    } else {
        differing as f64 / total as f64
    };

    PageComparison {
        diff_ratio,
        dimensions_match,
        diff_image,
    }
}

/// Compares two grouped renders within `tolerance`.
///
/// A combined pair yields at most one diff. Per-page groups are compared page
/// by page in parallel; every failing page contributes a diff, and a page
/// present on only one side compares against an empty image.
pub fn compare(baseline: &PageGroup, candidate: &PageGroup, tolerance: f64) -> Verdict {
    let tolerance = clamp_tolerance(tolerance);
    let baseline_pages = baseline.images();
    let candidate_pages = candidate.images();
    let page_count = baseline_pages.len().max(candidate_pages.len());
    let empty = RasterPage::new(0, 0);

    let diffs: Vec<PageDiff> = (0..page_count)
        .into_par_iter()
        .filter_map(|idx| {
            let expected = baseline_pages.get(idx).unwrap_or(&empty);
            let actual = candidate_pages.get(idx).unwrap_or(&empty);
            let comparison = measure(expected, actual);
            if comparison.is_within(tolerance) {
                None
            } else {
                Some(PageDiff {
                    page: idx as u32 + 1,
                    diff_ratio: comparison.diff_ratio,
                    diff_image: comparison.diff_image,
                })
            }
        })
        .collect();

    if diffs.is_empty() {
        Verdict::Equal
    } else {
        Verdict::NotEqual { diffs }
    }
}

fn pixel_at(img: &RasterPage, x: u32, y: u32) -> Option<Rgba<u8>> {
    if x < img.width() && y < img.height() {
        Some(*img.get_pixel(x, y))
    } else {
        None
    }
}

/// The pixel's luminance blended toward white, for context in diff images.
fn faded(px: Rgba<u8>) -> Rgba<u8> {
    let [r, g, b, a] = px.0;
    let luma = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
    let alpha = CONTEXT_ALPHA * a as f64 / 255.0;
    let v = (255.0 + (luma - 255.0) * alpha).round() as u8;
    Rgba([v, v, v, 255])
}
