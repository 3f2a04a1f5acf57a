// Snapshot maintenance commands: approve and discard pending `.new.png` artifacts.

pub mod approve;
pub mod discard;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Kinds of per-run artifacts left next to a baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    New,
    Diff,
}

impl ArtifactKind {
    fn suffix(self) -> &'static str {
        match self {
            ArtifactKind::New => ".new.png",
            ArtifactKind::Diff => ".diff.png",
        }
    }
}

/// Finds artifacts of the given kinds in every `snapshots_dir_name`
/// directory below `root`. Results are sorted.
pub fn find_snapshot_images(
    root: &Path,
    snapshots_dir_name: &str,
    kinds: &[ArtifactKind],
) -> crate::error::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let in_snapshots_dir = path
            .parent()
            .and_then(Path::file_name)
            .is_some_and(|dir| dir == snapshots_dir_name);
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let matches_kind = kinds.iter().any(|kind| {
            file_name
                .strip_suffix(kind.suffix())
                .is_some_and(|stem| !stem.is_empty())
        });

        if in_snapshots_dir && matches_kind {
            found.push(path.to_path_buf());
        }
    }
    found.sort();
    Ok(found)
}

/// Asks a yes/no question, defaulting to yes on an empty answer.
///
/// Re-asks on anything other than y/yes/n/no. End of input counts as no.
pub fn ask_for_confirmation<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> crate::error::Result<bool> {
    loop {
        write!(output, "{question} [Y/n]: ")?;
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            return Ok(false);
        }

        match answer.trim().to_lowercase().as_str() {
            "" | "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(
                output,
                "\nInvalid Response. Please answer with yes(y) or no(n)\n"
            )?,
        }
    }
}

/// `path` relative to `base` when it lies below it, for listing.
pub(crate) fn display_path(path: &Path, base: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(rel) => format!(".{}{}", std::path::MAIN_SEPARATOR, rel.display()),
        Err(_) => path.display().to_string(),
    }
}
