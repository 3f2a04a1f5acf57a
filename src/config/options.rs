use std::fmt;
use std::sync::Arc;

use super::settings::Settings;
use crate::raster::diff::clamp_tolerance;
use crate::raster::mask::{MaskRegions, RegionMask, no_masks};
use crate::render::units::Dpi;

/// Per-call comparison options.
///
/// Every field left as `None` is filled from [`Settings`] when the options are
/// merged, so `CompareOptions::default()` means "use the project defaults".
#[derive(Clone, Default)]
pub struct CompareOptions {
    /// Stack all pages into one image (`true`) or snapshot each page separately.
    pub combine_pages: Option<bool>,
    /// Largest fraction of differing pixels still considered equal, in `[0, 1]`.
    pub tolerance: Option<f64>,
    pub mask_regions: Option<MaskRegions>,
    pub dpi: Option<Dpi>,
    /// Return `false` instead of creating a baseline when none exists.
    pub fail_on_missing_snapshot: Option<bool>,
}

impl fmt::Debug for CompareOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompareOptions")
            .field("combine_pages", &self.combine_pages)
            .field("tolerance", &self.tolerance)
            .field("mask_regions", &self.mask_regions.as_ref().map(|_| ".."))
            .field("dpi", &self.dpi)
            .field("fail_on_missing_snapshot", &self.fail_on_missing_snapshot)
            .finish()
    }
}

impl CompareOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn combine_pages(mut self, combine: bool) -> Self {
        self.combine_pages = Some(combine);
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn dpi(mut self, dpi: Dpi) -> Self {
        self.dpi = Some(dpi);
        self
    }

    pub fn fail_on_missing_snapshot(mut self, fail: bool) -> Self {
        self.fail_on_missing_snapshot = Some(fail);
        self
    }

    /// Masks returned by `f` for a 1-based page number are painted before comparison.
    pub fn mask_regions<F>(mut self, f: F) -> Self
    where
        F: Fn(u32) -> Option<Vec<RegionMask>> + Send + Sync + 'static,
    {
        self.mask_regions = Some(Arc::new(f));
        self
    }

    /// OptionsのSome値を優先し、Noneの項目はSettingsの値で埋める。
    pub fn merged(&self, settings: &Settings) -> MergedOptions {
        MergedOptions {
            combine_pages: self.combine_pages.unwrap_or(settings.combine_pages),
            tolerance: clamp_tolerance(self.tolerance.unwrap_or(settings.tolerance)),
            mask_regions: self.mask_regions.clone().unwrap_or_else(no_masks),
            dpi: self.dpi.unwrap_or_else(|| Dpi::from(settings.dpi)),
            fail_on_missing_snapshot: self
                .fail_on_missing_snapshot
                .unwrap_or(settings.fail_on_missing_snapshot),
            snapshots_dir_name: settings.snapshots_dir_name.clone(),
        }
    }
}

/// Fully resolved options for one comparison.
#[derive(Clone)]
pub struct MergedOptions {
    pub combine_pages: bool,
    pub tolerance: f64,
    pub mask_regions: MaskRegions,
    pub dpi: Dpi,
    pub fail_on_missing_snapshot: bool,
    pub snapshots_dir_name: String,
}

impl fmt::Debug for MergedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergedOptions")
            .field("combine_pages", &self.combine_pages)
            .field("tolerance", &self.tolerance)
            .field("dpi", &self.dpi)
            .field("fail_on_missing_snapshot", &self.fail_on_missing_snapshot)
            .field("snapshots_dir_name", &self.snapshots_dir_name)
            .finish_non_exhaustive()
    }
}
