//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use epointer_core::prelude::*;
//! ```

// Error types
pub use crate::error::{EpointerError, EpointerResult};

// Builder API
pub use crate::builder::{analyze_package, Epointer, Generation};

// Loading
pub use crate::loader::{load_package, LoadOptions, Package};

// Analysis
pub use crate::consts::{group_by_type, resolve_groups, scan_declarations, TypeGroup, TypeGroups};
pub use crate::oracle::{NamedType, PackageOracle, ResolvedType, TypeOracle};

// Emission
pub use crate::emit::emit_file;

// Configuration
pub use crate::config::{load_config, EpointerConfig};
