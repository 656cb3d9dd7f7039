//! Constant analysis: find the named types of package-level constants.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐     ┌─────────────────────┐     ┌─────────────────────┐
//! │  const_scanner.rs   │     │  const_resolver.rs  │     │   const_groups.rs   │
//! │  ─────────────────  │ ──▶ │  ─────────────────  │ ──▶ │  ─────────────────  │
//! │  const groups in    │     │  explicit type,     │     │  type → constants,  │
//! │  source order       │     │  oracle, or repeat  │     │  encounter order    │
//! └─────────────────────┘     └─────────────────────┘     └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use epointer_core::consts::{group_by_type, resolve_groups, scan_declarations};
//! use epointer_core::oracle::PackageOracle;
//!
//! let groups = scan_declarations(&package);
//! let oracle = PackageOracle::new(&package, &groups);
//! let resolved = resolve_groups(&groups, &oracle)?;
//! let by_type = group_by_type(&resolved);
//!
//! for group in &by_type {
//!     println!("{}: {:?}", group.type_name, group.constants);
//! }
//! ```

pub mod const_groups;
pub mod const_resolver;
pub mod const_scanner;

// Re-exports for convenience
pub use const_groups::{group_by_type, TypeGroup, TypeGroups};
pub use const_resolver::{
    declared_type, qualifying_constants, resolve_group, resolve_groups, ResolvedConstant,
    ResolvedSpec,
};
pub use const_scanner::{
    scan_declarations, scan_file, ConstSpec, DeclarationGroup, SpecLocation, DISCARD_NAME,
};
