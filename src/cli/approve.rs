use std::fs;
use std::io::{BufRead, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use super::{ArtifactKind, ask_for_confirmation, display_path, find_snapshot_images};
use crate::error::SnapshotError;
use crate::snapshot::context::{new_to_baseline_path, new_to_diff_path};

/// Promotes each `.new.png` to its baseline and deletes the paired diff.
///
/// A missing diff is not an error. Returns the baselines written.
pub fn approve_snapshots(new_files: &[PathBuf]) -> crate::error::Result<Vec<PathBuf>> {
    let mut approved = Vec::with_capacity(new_files.len());
    for new_path in new_files {
        let (Some(baseline), Some(diff)) = (new_to_baseline_path(new_path), new_to_diff_path(new_path))
        else {
            return Err(SnapshotError::config(format!(
                "not a new snapshot file: {}",
                new_path.display()
            )));
        };

        fs::rename(new_path, &baseline)?;
        match fs::remove_file(&diff) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        info!(baseline = %baseline.display(), "approved snapshot");
        approved.push(baseline);
    }
    Ok(approved)
}

/// Lists new snapshots under `root`, asks for confirmation unless
/// `assume_yes`, then approves them.
pub fn run<R: BufRead, W: Write>(
    root: &Path,
    snapshots_dir_name: &str,
    assume_yes: bool,
    input: &mut R,
    output: &mut W,
) -> crate::error::Result<usize> {
    let files = find_snapshot_images(root, snapshots_dir_name, &[ArtifactKind::New])?;
    if files.is_empty() {
        writeln!(output, "No new snapshots found.")?;
        return Ok(0);
    }

    let cwd = std::env::current_dir()?;
    let listing: Vec<String> = files.iter().map(|f| display_path(f, &cwd)).collect();
    writeln!(output, "\nNew snapshots:\n{}", listing.join("\n"))?;

    let confirmed = assume_yes
        || ask_for_confirmation(
            input,
            output,
            "Are you sure you want to overwrite current snapshots?",
        )?;
    if !confirmed {
        writeln!(output, "Command was discarded! No changes were made.")?;
        return Ok(0);
    }

    let approved = approve_snapshots(&files)?;
    writeln!(output, "Success! Snapshots are overwritten.")?;
    Ok(approved.len())
}
