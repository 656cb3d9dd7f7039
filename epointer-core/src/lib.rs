//! epointer-core: `Pointer()` accessor generation for Go enumerated constants
//!
//! This library loads one Go package, determines the type of every
//! package-level constant, and emits one method per named type:
//!
//! ```go
//! func (i Day) Pointer() *Day {
//!     return &i
//! }
//! ```
//!
//! # Features
//!
//! - **Go front end**: Lexer with automatic semicolon insertion and a parser
//!   for the declaration-level grammar
//! - **Build constraints**: `//go:build`, `// +build` and `_GOOS_GOARCH` file
//!   name suffixes, with user-supplied tags
//! - **Type oracle**: Conversions, operators, builtins, aliases and lazily
//!   resolved constant references
//! - **Implicit repetition**: Specs without type and value repeat the type of
//!   the spec above them
//! - **Deterministic output**: Identical input always gives byte-identical
//!   output
//!
//! # Quick Start
//!
//! Use the [`prelude`] module for convenient imports:
//!
//! ```rust,ignore
//! use epointer_core::prelude::*;
//!
//! let generation = Epointer::new(["./days"]).generate()?;
//! print!("{}", generation.source);
//! ```
//!
//! # Module Organization
//!
//! - [`syntax`]: Go lexer, AST and parser
//! - [`constraint`]: Build-constraint evaluation
//! - [`scan`]: Go file discovery and pattern resolution
//! - [`loader`]: Parallel loading of one package
//! - [`oracle`]: Expression and type-expression typing
//! - [`consts`]: Constant scanning, resolution and grouping
//! - [`emit`]: Go source templates
//! - [`builder`]: Fluent builder API for configuration
//! - [`error`]: Typed error handling

pub mod builder;
pub mod config;
pub mod constraint;
pub mod consts;
pub mod emit;
pub mod error;
pub mod loader;
pub mod logging;
pub mod oracle;
pub mod prelude;
pub mod report;
pub mod scan;
pub mod syntax;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{EpointerError, EpointerResult, IoResultExt};

// Builder API
pub use builder::{analyze_package, Epointer, Generation};

// Configuration
pub use config::{load_config, EpointerConfig, OutputConfig, CONFIG_FILE_NAME};

// Build constraints
pub use constraint::{BuildContext, Constraint};

// Constant analysis
pub use consts::{
    group_by_type, qualifying_constants, resolve_groups, scan_declarations, ConstSpec,
    DeclarationGroup, ResolvedConstant, ResolvedSpec, SpecLocation, TypeGroup, TypeGroups,
};

// Emission
pub use emit::{accessor_method, emit_file, emit_methods, file_header};

// Loading
pub use loader::{load_package, package_from_sources, LoadOptions, Package, ParsedFile};

// Logging
pub use logging::{init_structured_logging, log_error, log_info, log_warn};

// Type oracle
pub use oracle::{BasicKind, NamedType, PackageOracle, ResolvedType, TypeOracle};

// Reporting
pub use report::{json_listing, plain_listing, print_json, print_plain};

// File scanning
pub use scan::{gather_go_files, is_go_source_name, resolve_patterns, DEFAULT_OUTPUT_NAME};

// Parsing
pub use syntax::{parse_source, SourceFile, SyntaxError};

#[cfg(test)]
mod tests;
