use std::fs;
use std::path::{Path, PathBuf};

use eqlink_merge::{MergeError, MergeStatus, merge_document, reorder_document_text};
use eqlink_profile::{Catalog, ProfileError};

use crate::error::CliError;

/// Exit code for a merge pass that found and collapsed duplicate groups,
/// diff-style; 0 means the catalog was already duplicate-free.
pub const EXIT_MERGED: i32 = 1;

pub fn run_merge(input: &Path, output: Option<PathBuf>) -> Result<i32, CliError> {
    let raw = read_input(input)?;
    let outcome = merge_document(&raw).map_err(merge_error_to_cli)?;

    // The output must load as a catalog before anything lands on disk.
    Catalog::from_yaml_str(&outcome.output)
        .map_err(|e| CliError::processing(format!("merged output failed verification: {e}")))?;

    let output_path = resolve_output(input, output, "merged")?;
    write_output(&output_path, &outcome.output)?;

    print!("{}", outcome.report.render());
    println!("Wrote {}", output_path.display());
    match outcome.status {
        MergeStatus::Unchanged => Ok(0),
        MergeStatus::Merged(groups) => {
            println!("Merged {groups} duplicate groups");
            Ok(EXIT_MERGED)
        }
    }
}

pub fn run_reorder(input: &Path, output: Option<PathBuf>) -> Result<i32, CliError> {
    let raw = read_input(input)?;
    let (reordered, count) = reorder_document_text(&raw).map_err(merge_error_to_cli)?;

    Catalog::from_yaml_str(&reordered)
        .map_err(|e| CliError::processing(format!("reordered output failed verification: {e}")))?;

    let output_path = resolve_output(input, output, "reordered")?;
    write_output(&output_path, &reordered)?;

    println!("Reordered {count} equipment definitions");
    println!("Wrote {}", output_path.display());
    Ok(0)
}

fn read_input(input: &Path) -> Result<String, CliError> {
    fs::read_to_string(input)
        .map_err(|e| CliError::input(format!("could not read {}: {e}", input.display())))
}

fn write_output(path: &Path, contents: &str) -> Result<(), CliError> {
    fs::write(path, contents)
        .map_err(|e| CliError::processing(format!("could not write {}: {e}", path.display())))
}

/// Passes always land in a new file; clobbering the input in place is
/// refused.
fn resolve_output(
    input: &Path,
    output: Option<PathBuf>,
    suffix: &str,
) -> Result<PathBuf, CliError> {
    let path = output.unwrap_or_else(|| default_output_path(input, suffix));
    if path == input {
        return Err(CliError::usage(
            "output must be a new file, not the input itself",
        ));
    }
    Ok(path)
}

fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("catalog");
    let ext = input
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("yaml");
    input.with_file_name(format!("{stem}.{suffix}.{ext}"))
}

fn merge_error_to_cli(err: MergeError) -> CliError {
    match err {
        MergeError::Profile(profile) => match profile {
            ProfileError::Integrity { .. } => CliError::processing(profile.to_string()),
            other => CliError::input(other.to_string()),
        },
        other @ MergeError::DuplicateId { .. } => CliError::processing(other.to_string()),
    }
}
