use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use pdf_snapshot::SNAPSHOTS_DIR_NAME;
use pdf_snapshot::cli::{approve, discard};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: pdf_snapshot <command> [options]

Commands:
  approve   Promote new snapshots (*.new.png) to baselines
  discard   Remove new snapshots and diff images
  compare   Compare a PDF against a snapshot: compare <pdf> <snapshot-dir> <name>

Options (approve, discard):
  -p, --path <dir>                 Root to search (default: .)
  -s, --snapshots-dir-name <name>  Snapshot directory name (default: __snapshots__)
  -y, --yes                        Do not ask for confirmation

Options (compare):
  --dpi <n>          Rendering resolution (default: 144)
  --tolerance <t>    Allowed fraction of differing pixels, 0..1 (default: 0)
  --no-combine       Snapshot each page separately
  --fail-on-missing  Fail instead of creating a missing snapshot

  -h, --help         Show this help
  -V, --version      Show version";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("{USAGE}");
        return if args.is_empty() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        eprintln!("pdf_snapshot {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let (command, rest) = (args[0].as_str(), &args[1..]);
    match command {
        "approve" | "discard" => run_maintenance(command, rest),
        "compare" => run_compare(rest),
        other => {
            eprintln!("ERROR: Unknown command '{other}'");
            eprintln!("{USAGE}");
            ExitCode::FAILURE
        }
    }
}

struct MaintenanceArgs {
    path: PathBuf,
    snapshots_dir_name: String,
    assume_yes: bool,
}

fn parse_maintenance_args(args: &[String]) -> Result<MaintenanceArgs, String> {
    let mut parsed = MaintenanceArgs {
        path: PathBuf::from("."),
        snapshots_dir_name: SNAPSHOTS_DIR_NAME.to_string(),
        assume_yes: false,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-p" | "--path" => {
                let value = iter.next().ok_or("--path requires a value")?;
                parsed.path = PathBuf::from(value);
            }
            "-s" | "--snapshots-dir-name" => {
                let value = iter.next().ok_or("--snapshots-dir-name requires a value")?;
                parsed.snapshots_dir_name = value.clone();
            }
            "-y" | "--yes" => parsed.assume_yes = true,
            other => return Err(format!("Unexpected argument '{other}'")),
        }
    }
    Ok(parsed)
}

fn run_maintenance(command: &str, args: &[String]) -> ExitCode {
    let parsed = match parse_maintenance_args(args) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    let result = if command == "approve" {
        approve::run(
            &parsed.path,
            &parsed.snapshots_dir_name,
            parsed.assume_yes,
            &mut input,
            &mut output,
        )
    } else {
        discard::run(
            &parsed.path,
            &parsed.snapshots_dir_name,
            parsed.assume_yes,
            &mut input,
            &mut output,
        )
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {command} failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Exit codes: 0 = match, 1 = mismatch, 2 = error.
#[cfg(feature = "pdfium")]
fn run_compare(args: &[String]) -> ExitCode {
    use pdf_snapshot::{CompareOptions, Dpi, compare_pdf_to_snapshot};

    let mut positional: Vec<&String> = Vec::new();
    let mut options = CompareOptions::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--dpi" => match iter.next().map(|v| v.parse::<u32>()) {
                Some(Ok(dpi)) if dpi > 0 => options = options.dpi(Dpi::from(dpi)),
                _ => {
                    eprintln!("ERROR: --dpi requires a positive integer");
                    return ExitCode::from(2);
                }
            },
            "--tolerance" => match iter.next().map(|v| v.parse::<f64>()) {
                Some(Ok(t)) => options = options.tolerance(t),
                _ => {
                    eprintln!("ERROR: --tolerance requires a number");
                    return ExitCode::from(2);
                }
            },
            "--no-combine" => options = options.combine_pages(false),
            "--fail-on-missing" => options = options.fail_on_missing_snapshot(true),
            _ => positional.push(arg),
        }
    }

    let [pdf, snapshot_dir, name] = positional.as_slice() else {
        eprintln!("ERROR: compare expects <pdf> <snapshot-dir> <name>");
        return ExitCode::from(2);
    };

    match compare_pdf_to_snapshot(
        PathBuf::from(pdf.as_str()),
        &PathBuf::from(snapshot_dir.as_str()),
        name,
        &options,
    ) {
        Ok(true) => {
            eprintln!("OK: {pdf} matches snapshot '{name}'");
            ExitCode::SUCCESS
        }
        Ok(false) => {
            eprintln!("FAIL: {pdf} does not match snapshot '{name}'");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("ERROR: {pdf}: {e}");
            ExitCode::from(2)
        }
    }
}

#[cfg(not(feature = "pdfium"))]
fn run_compare(_args: &[String]) -> ExitCode {
    eprintln!("ERROR: compare requires the `pdfium` feature");
    ExitCode::from(2)
}
