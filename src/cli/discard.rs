use std::fs;
use std::io::{BufRead, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use super::{ArtifactKind, ask_for_confirmation, display_path, find_snapshot_images};

/// Deletes the given artifacts. Files already gone are skipped.
pub fn discard_artifacts(files: &[PathBuf]) -> crate::error::Result<usize> {
    let mut removed = 0;
    for path in files {
        match fs::remove_file(path) {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        info!(path = %path.display(), "discarded snapshot artifact");
    }
    Ok(removed)
}

/// Lists new and diff images under `root`, asks for confirmation unless
/// `assume_yes`, then deletes them.
pub fn run<R: BufRead, W: Write>(
    root: &Path,
    snapshots_dir_name: &str,
    assume_yes: bool,
    input: &mut R,
    output: &mut W,
) -> crate::error::Result<usize> {
    let files = find_snapshot_images(
        root,
        snapshots_dir_name,
        &[ArtifactKind::New, ArtifactKind::Diff],
    )?;
    if files.is_empty() {
        writeln!(output, "No new snapshots or diff images found.")?;
        return Ok(0);
    }

    let cwd = std::env::current_dir()?;
    let listing: Vec<String> = files.iter().map(|f| display_path(f, &cwd)).collect();
    writeln!(output, "\nNew snapshots and diff images:\n{}", listing.join("\n"))?;

    let confirmed = assume_yes
        || ask_for_confirmation(input, output, "Are you sure you want to remove them all?")?;
    if !confirmed {
        writeln!(output, "Command was discarded! No changes were made.")?;
        return Ok(0);
    }

    let removed = discard_artifacts(&files)?;
    writeln!(output, "Success! New snapshots and diff images removed.")?;
    Ok(removed)
}
