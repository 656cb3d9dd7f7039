//! Package loading: file selection, build constraints and parallel parsing.
//!
//! Performance characteristics:
//! - Files are read, constraint-checked and parsed in parallel via Rayon
//! - The indexed parallel collect keeps the file-name order established by
//!   [`crate::scan`], so results are identical on every run

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::constraint::BuildContext;
use crate::error::{EpointerError, EpointerResult, IoResultExt};
use crate::scan::{resolve_patterns, DEFAULT_OUTPUT_NAME};
use crate::syntax::{parse_source, SourceFile};

/// One parsed file of the package.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub ast: SourceFile,
}

/// A loaded compilation unit.
#[derive(Debug, Clone)]
pub struct Package {
    /// Package name from the package clauses
    pub name: String,
    /// Directory holding the package
    pub dir: PathBuf,
    /// Parsed files, ordered by file name
    pub files: Vec<ParsedFile>,
}

/// Options controlling which files are loaded.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Extra build tags to treat as satisfied
    pub tags: Vec<String>,
    /// A file that is never part of the unit (the generated output).
    /// Defaults to `epointer_gen.go` in the package directory.
    pub skip: Option<PathBuf>,
}

/// Loads the package named by `patterns` (a directory, or a list of files).
pub fn load_package(patterns: &[String], options: &LoadOptions) -> EpointerResult<Package> {
    let (dir, files) = resolve_patterns(patterns)?;
    let ctx = BuildContext::host(&options.tags);
    let skip = options
        .skip
        .clone()
        .unwrap_or_else(|| dir.join(DEFAULT_OUTPUT_NAME));
    load_files(&dir, &files, &ctx, Some(&skip))
}

/// Loads an explicit set of files belonging to `dir`.
pub fn load_files(
    dir: &Path,
    files: &[PathBuf],
    ctx: &BuildContext,
    skip: Option<&Path>,
) -> EpointerResult<Package> {
    let skip = skip.map(normalized);
    let candidates: Vec<&PathBuf> = files
        .iter()
        .filter(|f| skip.as_ref().map_or(true, |s| normalized(f) != *s))
        .collect();

    let parsed = candidates
        .par_iter()
        .map(|path| load_one(path, ctx))
        .collect::<EpointerResult<Vec<Option<ParsedFile>>>>()?;
    let parsed: Vec<ParsedFile> = parsed.into_iter().flatten().collect();

    let package = assemble(dir, parsed)?;
    info!(
        package = %package.name,
        dir = %package.dir.display(),
        files = package.files.len(),
        "loaded package"
    );
    Ok(package)
}

/// Reads one file; `None` when its build constraints exclude it.
fn load_one(path: &Path, ctx: &BuildContext) -> EpointerResult<Option<ParsedFile>> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let content = fs::read_to_string(path).with_path(path)?;

    let included = ctx
        .includes(&file_name, &content)
        .map_err(|msg| EpointerError::parse(path, msg))?;
    if !included {
        debug!(file = %path.display(), "excluded by build constraints");
        return Ok(None);
    }

    let ast = parse_source(&content)
        .map_err(|e| EpointerError::parse_at(path, e.message, e.pos.line, e.pos.column))?;
    debug!(file = %path.display(), decls = ast.decls.len(), "parsed");
    Ok(Some(ParsedFile {
        path: path.to_path_buf(),
        file_name,
        ast,
    }))
}

/// Builds a package from in-memory sources, e.g. `("day.go", "package p ...")`.
///
/// Build constraints are not applied; files are ordered by name.
pub fn package_from_sources(dir: impl Into<PathBuf>, sources: &[(&str, &str)]) -> EpointerResult<Package> {
    let dir = dir.into();
    let mut parsed = Vec::with_capacity(sources.len());
    for (name, content) in sources {
        let path = dir.join(name);
        let ast = parse_source(content)
            .map_err(|e| EpointerError::parse_at(&path, e.message, e.pos.line, e.pos.column))?;
        parsed.push(ParsedFile {
            path,
            file_name: name.to_string(),
            ast,
        });
    }
    parsed.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    assemble(&dir, parsed)
}

fn assemble(dir: &Path, files: Vec<ParsedFile>) -> EpointerResult<Package> {
    let Some(first) = files.first() else {
        return Err(EpointerError::NoSourceFiles {
            path: dir.to_path_buf(),
        });
    };
    let name = first.ast.package.name.clone();
    if let Some(other) = files.iter().find(|f| f.ast.package.name != name) {
        return Err(EpointerError::PackageMismatch {
            path: dir.to_path_buf(),
            expected: format!("{} ({})", name, first.file_name),
            found: format!("{} ({})", other.ast.package.name, other.file_name),
        });
    }
    Ok(Package {
        name,
        dir: dir.to_path_buf(),
        files,
    })
}

/// Canonical form of a path for equality checks, falling back to the path itself.
fn normalized(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
