//! Line-oriented editing helpers shared by the file-based targets.
//!
//! All helpers treat a missing file as empty rather than as an error, so
//! detection and removal work unchanged on freshly installed systems.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::{Result, TargetError};

/// Read a file's content, mapping a missing file to the empty string.
pub(crate) fn read_optional(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(TargetError::Read {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Create a directory and its parents, tolerating ones that exist.
pub(crate) fn create_dir_if_missing(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| TargetError::CreateDir {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Delete a file, treating a missing file as already deleted.
pub(crate) fn remove_file_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!("Deleted {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(TargetError::Delete {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Whether any line of the file contains any of the phrases as a substring.
///
/// A missing file contains nothing.
pub fn contains_any_phrase(path: &Path, phrases: &[&str]) -> Result<bool> {
    let content = read_optional(path)?;
    Ok(content
        .lines()
        .any(|line| phrases.iter().any(|phrase| line.contains(phrase))))
}

/// Rewrite the file keeping only lines that contain none of the phrases.
///
/// Runs of trailing blank lines collapse to at most one and the file ends
/// with a single final newline. Removing every line leaves the file empty.
pub fn remove_matching_lines(path: &Path, phrases: &[&str]) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let content = read_optional(path)?;

    let mut kept: Vec<&str> = content
        .lines()
        .filter(|line| !phrases.iter().any(|phrase| line.contains(phrase)))
        .collect();
    while kept.len() > 1 && kept[kept.len() - 1].is_empty() && kept[kept.len() - 2].is_empty() {
        kept.pop();
    }

    let output = if kept.is_empty() {
        String::new()
    } else {
        let mut joined = kept.join("\n");
        joined.push('\n');
        joined
    };
    std::fs::write(path, output).map_err(|e| TargetError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!("Stripped matching lines from {}", path.display());
    Ok(())
}

/// Append `block` (newline-terminated) to the file, creating it if absent.
///
/// A blank separator line is inserted first unless the file already ends
/// with one. Empty and missing files also get the leading separator.
pub fn append_block(path: &Path, block: &str) -> Result<()> {
    let existing = read_optional(path)?;
    let separator = if existing.lines().last() == Some("") {
        ""
    } else {
        "\n"
    };

    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|e| TargetError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
    writeln!(file, "{}{}", separator, block).map_err(|e| TargetError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

/// Append `block` unless some line already satisfies `line_matches`.
///
/// Creates the file if absent. Calling this twice never duplicates the
/// block, which is what the sourcing and include directives rely on.
pub fn ensure_block<F>(path: &Path, line_matches: F, block: &str) -> Result<()>
where
    F: Fn(&str) -> bool,
{
    let content = read_optional(path)?;
    if content.lines().any(|line| line_matches(line)) {
        return Ok(());
    }
    append_block(path, block)
}
