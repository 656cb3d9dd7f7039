//! Declaration scanning: package-level `const` groups in source order.
//!
//! Only top-level `const` declarations are scanned. `var` declarations,
//! type declarations and anything inside function bodies never produce a
//! [`DeclarationGroup`].

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::loader::{Package, ParsedFile};
use crate::syntax::{Decl, Expr, TypeExpr};

/// Name of the blank identifier; such constants are never emitted.
pub const DISCARD_NAME: &str = "_";

/// Where a constant is declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecLocation {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for SpecLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// One declared constant name.
#[derive(Debug, Clone)]
pub struct ConstSpec {
    pub name: String,
    pub explicit_type: Option<TypeExpr>,
    /// Absent when the spec repeats the previous one.
    pub initializer: Option<Expr>,
    pub location: SpecLocation,
    /// Index of the syntactic spec (`a, b = x, y` is one) within its group.
    pub row: usize,
    /// Position of the name within its syntactic spec.
    pub slot: usize,
}

impl ConstSpec {
    pub fn is_discard(&self) -> bool {
        self.name == DISCARD_NAME
    }

    /// Neither a type nor an initializer: the spec repeats its predecessor.
    pub fn is_bare_repeat(&self) -> bool {
        self.explicit_type.is_none() && self.initializer.is_none()
    }
}

/// The specs of one `const` declaration, in source order.
#[derive(Debug, Clone)]
pub struct DeclarationGroup {
    pub file: PathBuf,
    pub specs: Vec<ConstSpec>,
}

impl DeclarationGroup {
    /// Index of the spec a bare repeat at `index` inherits from: same slot,
    /// previous row.
    pub fn predecessor(&self, index: usize) -> Option<usize> {
        let spec = self.specs.get(index)?;
        let row = spec.row.checked_sub(1)?;
        self.specs[..index]
            .iter()
            .rposition(|s| s.row == row && s.slot == spec.slot)
    }
}

/// Scans one parsed file.
pub fn scan_file(file: &ParsedFile) -> Vec<DeclarationGroup> {
    let mut groups = Vec::new();
    for decl in &file.ast.decls {
        let Decl::Const(value_decl) = decl else {
            continue;
        };

        let mut specs = Vec::new();
        for (row, value_spec) in value_decl.specs.iter().enumerate() {
            for (slot, name) in value_spec.names.iter().enumerate() {
                specs.push(ConstSpec {
                    name: name.name.clone(),
                    explicit_type: value_spec.ty.clone(),
                    initializer: value_spec.values.get(slot).cloned(),
                    location: SpecLocation {
                        file: file.path.clone(),
                        line: name.pos.line,
                        column: name.pos.column,
                    },
                    row,
                    slot,
                });
            }
        }

        if !specs.is_empty() {
            groups.push(DeclarationGroup {
                file: file.path.clone(),
                specs,
            });
        }
    }
    groups
}

/// Scans every file of the package, in package file order.
///
/// An empty package, or one without constants, yields an empty list.
pub fn scan_declarations(package: &Package) -> Vec<DeclarationGroup> {
    package.files.iter().flat_map(scan_file).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::package_from_sources;

    fn scan(sources: &[(&str, &str)]) -> Vec<DeclarationGroup> {
        scan_declarations(&package_from_sources("/virtual", sources).unwrap())
    }

    fn names(group: &DeclarationGroup) -> Vec<&str> {
        group.specs.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_only_const_declarations() {
        let groups = scan(&[(
            "p.go",
            "package p\ntype Weekend int\nvar (\n\tSaturday Weekend = iota\n\tSunday\n)\n\
             const (\n\tOK = \"ok\"\n)\nfunc f() {\n\tconst local = 1\n}\n",
        )]);
        assert_eq!(groups.len(), 1);
        assert_eq!(names(&groups[0]), vec!["OK"]);
    }

    #[test]
    fn test_files_in_name_order() {
        let groups = scan(&[
            ("z.go", "package p\nconst Z = 1\n"),
            ("a.go", "package p\nconst A = 1\nconst B = 2\n"),
        ]);
        let all: Vec<&str> = groups.iter().flat_map(names).collect();
        assert_eq!(all, vec!["A", "B", "Z"]);
    }

    #[test]
    fn test_bare_repeat_and_location() {
        let groups = scan(&[("p.go", "package p\nconst (\n\tA Day = iota\n\tB\n)\n")]);
        let specs = &groups[0].specs;
        assert!(!specs[0].is_bare_repeat());
        assert!(specs[1].is_bare_repeat());
        assert_eq!(specs[1].location.line, 4);
        assert_eq!(specs[1].location.column, 2);
        assert_eq!(groups[0].predecessor(1), Some(0));
        assert_eq!(groups[0].predecessor(0), None);
    }

    #[test]
    fn test_multi_name_specs_use_slots() {
        let groups = scan(&[("p.go", "package p\nconst (\n\ta, b = 1, X(2)\n\tc, d\n)\n")]);
        let g = &groups[0];
        assert_eq!(names(g), vec!["a", "b", "c", "d"]);
        assert_eq!(g.specs[1].slot, 1);
        assert_eq!(g.predecessor(2), Some(0));
        assert_eq!(g.predecessor(3), Some(1));
    }

    #[test]
    fn test_discard_is_kept() {
        let groups = scan(&[("p.go", "package p\nconst (\n\t_ Number = iota\n\tOne\n)\n")]);
        assert!(groups[0].specs[0].is_discard());
        assert_eq!(groups[0].specs.len(), 2);
    }

    #[test]
    fn test_no_constants() {
        let groups = scan(&[("p.go", "package p\nfunc main() {}\n")]);
        assert!(groups.is_empty());
    }
}
