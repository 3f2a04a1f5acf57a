// Test assertion helpers behind `assert_pdf_snapshot!`.

use std::path::{Path, PathBuf};

/// Snapshot name derived from the running test.
///
/// libtest names each test thread after the test path (`module::test_name`);
/// path separators and spaces become underscores. Returns `None` outside a
/// named thread or on the main thread.
pub fn test_snapshot_name() -> Option<String> {
    let current = std::thread::current();
    let name = current.name()?;
    if name == "main" {
        return None;
    }
    Some(name.replace("::", "_").replace(' ', "_"))
}

/// Directory of the source file `file` (as given by `file!()`).
///
/// `file!()` is relative to the workspace root, which may be an ancestor of
/// the package's manifest directory, so each ancestor is tried in turn.
pub fn caller_snapshot_dir(manifest_dir: &str, file: &str) -> PathBuf {
    let file = Path::new(file);
    if file.is_absolute() {
        return parent_or_self(file);
    }

    Path::new(manifest_dir)
        .ancestors()
        .map(|base| base.join(file))
        .find(|candidate| candidate.exists())
        .map(|found| parent_or_self(&found))
        .unwrap_or_else(|| parent_or_self(&Path::new(manifest_dir).join(file)))
}

fn parent_or_self(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_else(|| path.to_path_buf())
}

/// Panics unless `pdf` matches the snapshot named after the running test.
#[cfg(feature = "pdfium")]
#[track_caller]
pub fn assert_matches_snapshot(
    pdf: impl Into<super::source::PdfSource>,
    snapshot_dir: &Path,
    options: &crate::config::options::CompareOptions,
) {
    let Some(name) = test_snapshot_name() else {
        panic!("assert_pdf_snapshot! must run inside a named test thread");
    };
    match super::lifecycle::compare_pdf_to_snapshot(pdf, snapshot_dir, &name, options) {
        Ok(true) => {}
        Ok(false) => panic!(
            "PDF does not match snapshot '{name}' in {}",
            snapshot_dir.display()
        ),
        Err(e) => panic!("failed to compare PDF to snapshot '{name}': {e}"),
    }
}

/// Asserts that a PDF matches the snapshot named after the current test.
///
/// Snapshots live in `__snapshots__/` next to the calling source file.
///
/// ```ignore
/// #[test]
/// fn invoice_layout() {
///     let pdf = render_invoice();
///     pdf_snapshot::assert_pdf_snapshot!(pdf);
/// }
/// ```
#[cfg(feature = "pdfium")]
#[macro_export]
macro_rules! assert_pdf_snapshot {
    ($pdf:expr $(,)?) => {
        $crate::assert_pdf_snapshot!($pdf, &$crate::config::options::CompareOptions::default())
    };
    ($pdf:expr, $options:expr $(,)?) => {
        $crate::snapshot::assert::assert_matches_snapshot(
            $pdf,
            &$crate::snapshot::assert::caller_snapshot_dir(env!("CARGO_MANIFEST_DIR"), file!()),
            $options,
        )
    };
}
