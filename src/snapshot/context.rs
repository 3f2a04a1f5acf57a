// Snapshot file layout: baseline/new/diff paths and per-page baseline discovery.
//
// Combined:  <dir>/<name>.png, <name>.new.png, <name>.diff.png
// Per page:  <dir>/<name>.page-<NN>.png, <name>.page-<NN>.new.png, <name>.page-<NN>.diff.png
//            (NN = 1-based page number, zero-padded to the page count's width)

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::SnapshotError;

const PNG_EXT: &str = ".png";
const NEW_SUFFIX: &str = ".new.png";
const DIFF_SUFFIX: &str = ".diff.png";
const PAGE_MARKER: &str = ".page-";

/// Paths for one logical snapshot image. Derived on every call, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotContext {
    pub name: String,
    pub dir_path: PathBuf,
    pub baseline_path: PathBuf,
    pub diff_path: PathBuf,
    pub new_path: PathBuf,
}

impl SnapshotContext {
    /// Builds the context for files named `<stem>.png` inside `dir_path`.
    fn from_stem(dir_path: &Path, name: &str, stem: &str) -> Self {
        Self {
            name: name.to_string(),
            dir_path: dir_path.to_path_buf(),
            baseline_path: dir_path.join(format!("{stem}{PNG_EXT}")),
            diff_path: dir_path.join(format!("{stem}{DIFF_SUFFIX}")),
            new_path: dir_path.join(format!("{stem}{NEW_SUFFIX}")),
        }
    }

    /// Context of a snapshot whose pages are stacked into one image.
    pub fn combined(dir_path: &Path, name: &str) -> Self {
        Self::from_stem(dir_path, name, name)
    }

    /// Context of page `page` (1-based) in a snapshot of `page_count` pages.
    pub fn page(dir_path: &Path, name: &str, page: u32, page_count: usize) -> Self {
        let width = digit_count(page_count);
        Self::from_stem(dir_path, name, &format!("{name}{PAGE_MARKER}{page:0width$}"))
    }

    /// Context for an existing per-page baseline file.
    fn for_baseline_file(dir_path: &Path, name: &str, file_name: &str) -> Self {
        let stem = file_name.strip_suffix(PNG_EXT).unwrap_or(file_name);
        Self::from_stem(dir_path, name, stem)
    }
}

/// Per-page baselines found on disk for one snapshot name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageBaselines {
    /// No per-page baseline exists.
    Missing,
    /// Pages `1..=n` each have exactly one baseline, in page order.
    Complete(Vec<SnapshotContext>),
    /// Some pages are missing or duplicated; these are the files found.
    Partial(Vec<PathBuf>),
}

/// Checks that `name` can be used as a file name stem.
///
/// Names containing `.page-` or ending in `.new`/`.diff` are rejected: their
/// files would be indistinguishable from another snapshot's pages or artifacts.
pub fn validate_snapshot_name(name: &str) -> crate::error::Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(SnapshotError::config(format!(
            "snapshot name must be a non-empty file name without path separators, got '{name}'"
        )));
    }
    if name.contains(PAGE_MARKER) || name.ends_with(".new") || name.ends_with(".diff") {
        return Err(SnapshotError::config(format!(
            "snapshot name '{name}' collides with reserved snapshot file names"
        )));
    }
    Ok(())
}

/// `<snapshot_dir>/<dir_name>`.
pub fn snapshots_dir(snapshot_dir: &Path, dir_name: &str) -> PathBuf {
    snapshot_dir.join(dir_name)
}

/// Creates `dir_path` if it does not exist yet.
pub fn ensure_dir(dir_path: &Path) -> crate::error::Result<()> {
    match fs::create_dir_all(dir_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && dir_path.is_dir() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Lists the per-page baselines of `name` in `dir_path`.
///
/// Only files named exactly `<name>.page-<digits>.png` count; `.new`/`.diff`
/// artifacts and other snapshots sharing the prefix are ignored.
pub fn discover_page_baselines(dir_path: &Path, name: &str) -> crate::error::Result<PageBaselines> {
    let entries = match fs::read_dir(dir_path) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(PageBaselines::Missing),
        Err(e) => return Err(e.into()),
    };

    let mut found: Vec<(u32, String)> = Vec::new();
    for entry in entries {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        if let Some(page) = parse_page_number(file_name, name, PNG_EXT) {
            found.push((page, file_name.to_string()));
        }
    }

    if found.is_empty() {
        return Ok(PageBaselines::Missing);
    }

    found.sort();
    let complete = found
        .iter()
        .enumerate()
        .all(|(idx, (page, _))| *page as usize == idx + 1);

    if complete {
        Ok(PageBaselines::Complete(
            found
                .iter()
                .map(|(_, file_name)| SnapshotContext::for_baseline_file(dir_path, name, file_name))
                .collect(),
        ))
    } else {
        Ok(PageBaselines::Partial(
            found
                .into_iter()
                .map(|(_, file_name)| dir_path.join(file_name))
                .collect(),
        ))
    }
}

/// Per-page `.new.png`/`.diff.png` artifacts of `name` in `dir_path`, sorted.
pub fn discover_page_artifacts(dir_path: &Path, name: &str) -> crate::error::Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir_path) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        let is_artifact = [NEW_SUFFIX, DIFF_SUFFIX]
            .iter()
            .any(|suffix| parse_page_number(file_name, name, suffix).is_some());
        if is_artifact {
            found.push(entry.path());
        }
    }
    found.sort();
    Ok(found)
}

/// Extracts `N` from `<name>.page-<N><suffix>`.
fn parse_page_number(file_name: &str, name: &str, suffix: &str) -> Option<u32> {
    let digits = file_name
        .strip_prefix(name)?
        .strip_prefix(PAGE_MARKER)?
        .strip_suffix(suffix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|&page| page > 0)
}

fn digit_count(n: usize) -> usize {
    n.max(1).to_string().len()
}

/// Baseline path that a `.new.png` artifact would be promoted to.
pub fn new_to_baseline_path(new_path: &Path) -> Option<PathBuf> {
    replace_suffix(new_path, NEW_SUFFIX, PNG_EXT)
}

/// Diff artifact paired with a `.new.png` artifact.
pub fn new_to_diff_path(new_path: &Path) -> Option<PathBuf> {
    replace_suffix(new_path, NEW_SUFFIX, DIFF_SUFFIX)
}

fn replace_suffix(path: &Path, from: &str, to: &str) -> Option<PathBuf> {
    let file_name = path.file_name()?.to_str()?;
    let stem = file_name.strip_suffix(from)?;
    if stem.is_empty() {
        return None;
    }
    Some(path.with_file_name(format!("{stem}{to}")))
}
