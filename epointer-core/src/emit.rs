//! Go source emission for `Pointer()` accessors.
//!
//! Every qualifying type gets exactly one method, in type encounter order:
//!
//! ```text
//!
//! func (i Day) Pointer() *Day {
//!         return &i
//! }
//! ```
//!
//! Text is produced by fixed templates; no formatter is run over it. The
//! generated file declares no imports.

use crate::consts::TypeGroups;

/// Program name written into the generated-code marker.
pub const PROGRAM_NAME: &str = "epointer";

/// The accessor for one type, including its leading blank line.
pub fn accessor_method(type_name: &str) -> String {
    format!(
        "\nfunc (i {ty}) Pointer() *{ty} {{\n\treturn &i\n}}\n",
        ty = type_name
    )
}

/// Accessors for every group, concatenated. Empty input gives an empty string.
pub fn emit_methods(groups: &TypeGroups) -> String {
    groups
        .iter()
        .map(|group| accessor_method(group.type_name.as_str()))
        .collect()
}

/// Generated-code marker plus package clause.
///
/// `invocation` is the argument list the generator was run with.
pub fn file_header(package: &str, invocation: &str) -> String {
    let command = if invocation.is_empty() {
        PROGRAM_NAME.to_string()
    } else {
        format!("{} {}", PROGRAM_NAME, invocation)
    };
    format!(
        "// Code generated by \"{}\"; DO NOT EDIT.\n\npackage {}\n",
        command, package
    )
}

/// A complete generated file.
pub fn emit_file(package: &str, invocation: &str, groups: &TypeGroups) -> String {
    let mut out = file_header(package, invocation);
    out.push_str(&emit_methods(groups));
    out
}
