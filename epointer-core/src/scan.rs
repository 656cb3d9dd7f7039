//! Deterministic discovery of the Go files that make up one package.
//!
//! A package is a single directory; subdirectories are separate packages and
//! are never descended into. Files are returned sorted by file name so every
//! downstream stage sees the same order on every run.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{EpointerError, EpointerResult};

/// Name of the generated file when no output path is given.
pub const DEFAULT_OUTPUT_NAME: &str = "epointer_gen.go";

/// Checks whether a file name is a candidate Go source file.
///
/// Test files and files the go tool ignores (leading `_` or `.`) are excluded.
#[inline]
pub fn is_go_source_name(name: &str) -> bool {
    name.ends_with(".go")
        && !name.ends_with("_test.go")
        && !name.starts_with('_')
        && !name.starts_with('.')
}

/// Gathers the candidate `.go` files directly inside `dir`, sorted by name.
pub fn gather_go_files(dir: &Path) -> EpointerResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
            match e.into_io_error() {
                Some(io) => EpointerError::io(path, io),
                None => EpointerError::invalid_argument(format!(
                    "cannot read directory {}",
                    path.display()
                )),
            }
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_str().is_some_and(is_go_source_name) {
            files.push(entry.into_path());
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Resolves command-line patterns into the package directory and its files.
///
/// Accepts either one directory, or a list of `.go` files that must all live
/// in the same directory.
pub fn resolve_patterns(patterns: &[String]) -> EpointerResult<(PathBuf, Vec<PathBuf>)> {
    let patterns: Vec<&str> = if patterns.is_empty() {
        vec!["."]
    } else {
        patterns.iter().map(String::as_str).collect()
    };

    if let [single] = patterns.as_slice() {
        let path = Path::new(single);
        if path.is_dir() {
            return Ok((path.to_path_buf(), gather_go_files(path)?));
        }
    }

    let mut dir: Option<PathBuf> = None;
    let mut files = Vec::with_capacity(patterns.len());
    for pattern in patterns {
        let path = PathBuf::from(pattern);
        if path.is_dir() {
            return Err(EpointerError::invalid_argument(format!(
                "{} is a directory; pass a single directory or a list of files",
                pattern
            )));
        }
        if !pattern.ends_with(".go") {
            return Err(EpointerError::invalid_argument(format!(
                "{} is not a Go source file",
                pattern
            )));
        }
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        match &dir {
            None => dir = Some(parent),
            Some(d) if *d != parent => {
                return Err(EpointerError::invalid_argument(format!(
                    "named files must all be in one directory; have {} and {}",
                    d.display(),
                    parent.display()
                )));
            }
            Some(_) => {}
        }
        files.push(path);
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    files.dedup();

    Ok((dir.unwrap_or_else(|| PathBuf::from(".")), files))
}
