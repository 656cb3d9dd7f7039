//! Type resolution for scanned constant specs.
//!
//! Each spec's effective type is, in order of precedence:
//! 1. its explicit type annotation,
//! 2. the oracle's type for its initializer,
//! 3. the effective type of the spec it repeats (same slot, previous row,
//!    same group).
//!
//! A repeat with no predecessor, or whose predecessor's type is
//! indeterminate, aborts the run. Constants with unnamed or indeterminate
//! types are kept in the result but marked as not qualifying.

use serde::Serialize;
use tracing::debug;

use super::const_scanner::{ConstSpec, DeclarationGroup, SpecLocation};
use crate::error::{EpointerError, EpointerResult};
use crate::oracle::{NamedType, ResolvedType, TypeOracle};

/// A spec together with its effective type.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedSpec {
    pub name: String,
    pub ty: ResolvedType,
    /// The effective type is a named type.
    pub qualifies: bool,
    /// The name is not the blank identifier.
    pub emit: bool,
    pub location: SpecLocation,
}

/// A constant that belongs to a named type and appears in the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConstant {
    pub name: String,
    pub type_name: NamedType,
}

/// Type from the spec itself, or `None` for a bare repeat.
pub fn declared_type(spec: &ConstSpec, oracle: &dyn TypeOracle) -> Option<ResolvedType> {
    if let Some(ty) = &spec.explicit_type {
        return Some(oracle.type_of_type_expr(ty));
    }
    spec.initializer.as_ref().map(|init| oracle.type_of_expr(init))
}

/// Resolves one group; propagation never leaves the group.
pub fn resolve_group(
    group: &DeclarationGroup,
    oracle: &dyn TypeOracle,
) -> EpointerResult<Vec<ResolvedSpec>> {
    let mut resolved: Vec<ResolvedSpec> = Vec::with_capacity(group.specs.len());

    for (index, spec) in group.specs.iter().enumerate() {
        let ty = match declared_type(spec, oracle) {
            Some(ty) => ty,
            None => inherited_type(group, index, &resolved)?,
        };
        debug!(constant = %spec.name, ty = %ty, at = %spec.location, "resolved");

        resolved.push(ResolvedSpec {
            name: spec.name.clone(),
            qualifies: ty.is_named(),
            emit: !spec.is_discard(),
            ty,
            location: spec.location.clone(),
        });
    }

    Ok(resolved)
}

fn inherited_type(
    group: &DeclarationGroup,
    index: usize,
    resolved: &[ResolvedSpec],
) -> EpointerResult<ResolvedType> {
    let spec = &group.specs[index];
    let fail = |message: String| {
        EpointerError::resolution(
            &spec.location.file,
            spec.location.line,
            spec.location.column,
            &spec.name,
            message,
        )
    };

    let Some(prev) = group.predecessor(index) else {
        return Err(fail("no preceding constant in its declaration group to repeat".to_string()));
    };
    let prev = &resolved[prev];
    if prev.ty.is_indeterminate() {
        return Err(fail(format!(
            "repeats {} at {}, whose type is indeterminate",
            prev.name, prev.location
        )));
    }
    Ok(prev.ty.clone())
}

/// Resolves all groups in order. The first resolution error aborts.
pub fn resolve_groups(
    groups: &[DeclarationGroup],
    oracle: &dyn TypeOracle,
) -> EpointerResult<Vec<ResolvedSpec>> {
    let mut all = Vec::new();
    for group in groups {
        all.extend(resolve_group(group, oracle)?);
    }
    Ok(all)
}

/// The qualifying, emitted constants, in order.
pub fn qualifying_constants(resolved: &[ResolvedSpec]) -> Vec<ResolvedConstant> {
    resolved
        .iter()
        .filter(|r| r.qualifies && r.emit)
        .filter_map(|r| {
            r.ty.as_named().map(|named| ResolvedConstant {
                name: r.name.clone(),
                type_name: named.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::scan_declarations;
    use crate::loader::package_from_sources;
    use crate::oracle::{BasicKind, PackageOracle};

    fn resolve(src: &str) -> EpointerResult<Vec<ResolvedSpec>> {
        let pkg = package_from_sources("/virtual", &[("p.go", src)]).unwrap();
        let groups = scan_declarations(&pkg);
        let oracle = PackageOracle::new(&pkg, &groups);
        resolve_groups(&groups, &oracle)
    }

    fn find<'r>(resolved: &'r [ResolvedSpec], name: &str) -> &'r ResolvedSpec {
        resolved.iter().find(|r| r.name == name).unwrap()
    }

    #[test]
    fn test_implicit_propagation() {
        let resolved = resolve(
            "package p\ntype Day int\nconst (\n\tMonday Day = 0\n\tTuesday\n\tWednesday\n)\n",
        )
        .unwrap();
        for name in ["Monday", "Tuesday", "Wednesday"] {
            assert_eq!(find(&resolved, name).ty, ResolvedType::named("Day"));
            assert!(find(&resolved, name).qualifies);
        }
    }

    #[test]
    fn test_untyped_chain_does_not_qualify() {
        let resolved = resolve("package p\nconst (\n\tposStart = iota\n\tposMiddle\n\tposEnd\n)\n").unwrap();
        assert_eq!(resolved.len(), 3);
        assert!(resolved.iter().all(|r| !r.qualifies));
        assert_eq!(find(&resolved, "posEnd").ty, ResolvedType::Unnamed(BasicKind::UntypedInt));
        assert!(qualifying_constants(&resolved).is_empty());
    }

    #[test]
    fn test_builtin_typed_does_not_qualify() {
        let resolved = resolve("package p\nconst Max int = 10\nconst Name string = \"x\"\n").unwrap();
        assert!(resolved.iter().all(|r| !r.qualifies));
    }

    #[test]
    fn test_discard_propagates_but_is_not_emitted() {
        let resolved = resolve(
            "package p\ntype Number int\nconst (\n\t_ Number = iota\n\tOne\n\tTwo\n)\n",
        )
        .unwrap();
        let blank = find(&resolved, "_");
        assert!(blank.qualifies);
        assert!(!blank.emit);
        assert_eq!(find(&resolved, "Two").ty, ResolvedType::named("Number"));
        let names: Vec<_> = qualifying_constants(&resolved)
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["One", "Two"]);
    }

    #[test]
    fn test_conversion_beats_argument_type() {
        let resolved = resolve(
            "package p\ntype Conv int\ntype Other int\nconst (alpha Other = 0)\nconst (\n\tAlpha = Conv(alpha)\n)\n",
        )
        .unwrap();
        assert_eq!(find(&resolved, "Alpha").ty, ResolvedType::named("Conv"));
        assert_eq!(find(&resolved, "alpha").ty, ResolvedType::named("Other"));
    }

    #[test]
    fn test_propagation_stops_at_group_boundary() {
        let err = resolve("package p\ntype Day int\nconst Monday Day = 0\nconst (\n\tTuesday\n)\n").unwrap_err();
        match err {
            EpointerError::Resolution { name, line, column, .. } => {
                assert_eq!(name, "Tuesday");
                assert_eq!(line, 5);
                assert_eq!(column, 2);
            }
            other => panic!("expected resolution error, got {:?}", other),
        }
    }

    #[test]
    fn test_repeat_of_indeterminate_is_error() {
        let err = resolve("package p\nimport \"C\"\nconst (\n\ta = C.X\n\tb\n)\n").unwrap_err();
        assert!(err.to_string().contains("indeterminate"));
    }

    #[test]
    fn test_indeterminate_initializer_is_local() {
        let resolved = resolve(
            "package p\ntype Day int\nconst (\n\tx = unknown\n\tMonday Day = 1\n)\n",
        )
        .unwrap();
        assert!(find(&resolved, "x").ty.is_indeterminate());
        assert!(!find(&resolved, "x").qualifies);
        assert!(find(&resolved, "Monday").qualifies);
    }

    #[test]
    fn test_mixed_group_interleaving() {
        let resolved = resolve(
            "package p\ntype (\n\tStatus string\n\tUnum uint8\n)\nconst (\n\tStatusOK Status = \"OK\"\n\tm2 Unum = 1\n\tStatusError Status = \"ERROR\"\n\tm1 Unum = 2\n)\n",
        )
        .unwrap();
        let types: Vec<_> = qualifying_constants(&resolved)
            .into_iter()
            .map(|c| c.type_name.to_string())
            .collect();
        assert_eq!(types, vec!["Status", "Unum", "Status", "Unum"]);
    }

    #[test]
    fn test_multi_name_repeat() {
        let resolved = resolve(
            "package p\ntype A int\ntype B string\nconst (\n\ta1, b1 = A(0), B(\"x\")\n\ta2, b2\n)\n",
        )
        .unwrap();
        assert_eq!(find(&resolved, "a2").ty, ResolvedType::named("A"));
        assert_eq!(find(&resolved, "b2").ty, ResolvedType::named("B"));
    }
}
