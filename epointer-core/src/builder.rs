//! Builder pattern API for generating `Pointer()` accessors.
//!
//! Provides a fluent interface for configuring and running generation:
//!
//! ```rust,ignore
//! use epointer_core::prelude::*;
//!
//! let generation = Epointer::new(["./status"])
//!     .tags(["integration"])
//!     .invocation("-tags integration ./status")
//!     .write()?;
//!
//! println!("types: {:?}", generation.groups.type_names());
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::consts::{group_by_type, resolve_groups, scan_declarations, TypeGroups};
use crate::emit::emit_file;
use crate::error::{EpointerResult, IoResultExt};
use crate::loader::{load_package, LoadOptions, Package};
use crate::oracle::PackageOracle;
use crate::scan::DEFAULT_OUTPUT_NAME;

/// Builder for configuring one generator run.
#[derive(Debug, Clone)]
pub struct Epointer {
    /// Directory or file patterns naming the package
    patterns: Vec<String>,

    /// Extra build tags
    tags: Vec<String>,

    /// Explicit output path; defaults to `<package dir>/epointer_gen.go`
    output: Option<PathBuf>,

    /// Arguments echoed in the generated-code marker
    invocation: String,
}

impl Epointer {
    /// Create a builder for the package named by `patterns`.
    ///
    /// An empty pattern list means the current directory.
    pub fn new(patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
            tags: Vec::new(),
            output: None,
            invocation: String::new(),
        }
    }

    /// Add build tags that count as satisfied.
    pub fn tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        for tag in tags {
            let tag: String = tag.into();
            let tag = tag.trim();
            if !tag.is_empty() {
                self.tags.push(tag.to_string());
            }
        }
        self
    }

    /// Set the output file.
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Set the argument string written into the generated-code marker.
    pub fn invocation(mut self, args: impl Into<String>) -> Self {
        self.invocation = args.into();
        self
    }

    /// Run the pipeline without touching the file system beyond reading.
    pub fn generate(&self) -> EpointerResult<Generation> {
        let options = LoadOptions {
            tags: self.tags.clone(),
            skip: self.output.clone(),
        };
        let package = load_package(&self.patterns, &options)?;
        let output_path = self
            .output
            .clone()
            .unwrap_or_else(|| package.dir.join(DEFAULT_OUTPUT_NAME));
        let groups = analyze_package(&package)?;
        let source = emit_file(&package.name, &self.invocation, &groups);

        info!(
            package = %package.name,
            types = groups.len(),
            constants = groups.constant_count(),
            "generated accessors"
        );

        Ok(Generation {
            package: package.name,
            groups,
            source,
            output_path,
        })
    }

    /// Generate and write the output file.
    ///
    /// Nothing is written when generation fails.
    pub fn write(&self) -> EpointerResult<Generation> {
        let generation = self.generate()?;
        generation.write_to_disk()?;
        Ok(generation)
    }
}

/// Result of one generator run.
#[derive(Debug, Clone)]
pub struct Generation {
    /// Package name of the analyzed unit
    pub package: String,

    /// Qualifying constants grouped by type
    pub groups: TypeGroups,

    /// Complete generated file
    pub source: String,

    /// Where the file goes
    pub output_path: PathBuf,
}

impl Generation {
    /// Whether any accessor was produced.
    pub fn has_methods(&self) -> bool {
        !self.groups.is_empty()
    }

    /// Writes `source` to `output_path`. Returns `false` if the file already
    /// held identical content.
    pub fn write_to_disk(&self) -> EpointerResult<bool> {
        write_if_changed(&self.output_path, &self.source)
    }
}

/// Scan, resolve and group the constants of a loaded package.
pub fn analyze_package(package: &Package) -> EpointerResult<TypeGroups> {
    let groups = scan_declarations(package);
    let oracle = PackageOracle::new(package, &groups);
    debug!(
        package = %package.name,
        const_groups = groups.len(),
        types = oracle.type_count(),
        "scanned declarations"
    );
    let resolved = resolve_groups(&groups, &oracle)?;
    Ok(group_by_type(&resolved))
}

fn write_if_changed(path: &Path, content: &str) -> EpointerResult<bool> {
    if let Ok(existing) = fs::read_to_string(path) {
        if existing == content {
            debug!(file = %path.display(), "output unchanged");
            return Ok(false);
        }
    }
    fs::write(path, content).with_path(path)?;
    info!(file = %path.display(), bytes = content.len(), "wrote output");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::package_from_sources;

    #[test]
    fn test_builder_defaults() {
        let builder = Epointer::new(Vec::<String>::new());
        assert!(builder.patterns.is_empty());
        assert!(builder.output.is_none());
        assert!(builder.invocation.is_empty());
    }

    #[test]
    fn test_tags_are_trimmed() {
        let builder = Epointer::new(["."]).tags([" a ", "", "b"]);
        assert_eq!(builder.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_analyze_package() {
        let pkg = package_from_sources(
            "/virtual",
            &[(
                "day.go",
                "package days\ntype Day int\nconst (\n\tMonday Day = iota\n\tTuesday\n)\n",
            )],
        )
        .unwrap();
        let groups = analyze_package(&pkg).unwrap();
        assert_eq!(groups.type_names(), vec!["Day"]);
        assert_eq!(groups.get("Day").unwrap().constants, vec!["Monday", "Tuesday"]);
    }
}
