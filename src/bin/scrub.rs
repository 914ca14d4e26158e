//! Library filename scrubber.
//!
//! Lecture files sometimes arrive with a vendor spam marker embedded in
//! their names. This tool walks a directory tree and renames every file
//! whose name contains the marker, deleting the marker from the name,
//! before the files are placed under the library root.
//!
//! Usage: `scrub <directory> <marker>`

use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let (dir, marker) = match (args.get(1), args.get(2)) {
        (Some(dir), Some(marker)) if !marker.is_empty() => (dir, marker),
        _ => {
            eprintln!("Usage: scrub <directory> <marker>");
            return ExitCode::from(2);
        }
    };

    match scrub_names(Path::new(dir), marker) {
        Ok(renamed) => {
            println!("Renamed {renamed} file(s)");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("scrub failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Recursively rename files whose name contains `marker`, removing every
/// occurrence of it. Returns the number of files renamed.
fn scrub_names(dir: &Path, marker: &str) -> io::Result<usize> {
    let mut renamed = 0;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if entry.file_type()?.is_dir() {
            renamed += scrub_names(&path, marker)?;
            continue;
        }

        // Non-UTF-8 names cannot contain the marker; leave them alone
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.contains(marker) {
            continue;
        }

        let new_name = name.replace(marker, "");
        fs::rename(&path, path.with_file_name(new_name))?;
        renamed += 1;
    }

    Ok(renamed)
}
