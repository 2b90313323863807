//! File and directory ignore pattern handling for template trees.
//! Processes the `.setupignore` file at the template root to exclude
//! specific paths from expansion, similar to .gitignore functionality.

use crate::constants::{DEFAULT_IGNORE_PATTERNS, IGNORE_FILE};
use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use std::{fs::read_to_string, path::Path};

/// Reads the `.setupignore` file of `template_root` into a set of glob patterns.
///
/// # Notes
/// - A missing ignore file yields only the default patterns
/// - Blank lines and lines starting with `#` are skipped
/// - The ignore file itself is always excluded
///
/// # Example
/// ```ignore
/// # Contents of .setupignore:
/// *.orig
/// drafts/**
/// ```
pub fn parse_ignore_file<P: AsRef<Path>>(template_root: P) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();

    for pattern in DEFAULT_IGNORE_PATTERNS.iter().chain([IGNORE_FILE].iter()) {
        builder.add(compile(pattern)?);
    }

    let ignore_path = template_root.as_ref().join(IGNORE_FILE);
    if let Ok(contents) = read_to_string(&ignore_path) {
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            builder.add(compile(line)?);
        }
    } else {
        debug!("{} does not exist", ignore_path.display());
    }

    builder
        .build()
        .map_err(|e| Error::IgnoreError(format!("{} loading failed: {}", IGNORE_FILE, e)))
}

fn compile(pattern: &str) -> Result<Glob> {
    Glob::new(pattern)
        .map_err(|e| Error::IgnoreError(format!("{} loading failed: {}", IGNORE_FILE, e)))
}
