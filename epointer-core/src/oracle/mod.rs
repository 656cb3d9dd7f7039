//! Static type oracle: classifies the type of a constant expression.
//!
//! The oracle answers one question for the resolver: given an expression or
//! a type annotation, is its type a named type, an unnamed (predeclared or
//! structural) type, or impossible to determine from the sources at hand?
//!
//! # Example
//!
//! ```ignore
//! use epointer_core::oracle::{PackageOracle, TypeOracle};
//!
//! let oracle = PackageOracle::new(&package, &groups);
//! let ty = oracle.type_of_expr(&initializer);
//! if let Some(named) = ty.as_named() {
//!     println!("named type {}", named);
//! }
//! ```

pub mod package_oracle;

use std::fmt;

use serde::Serialize;

use crate::syntax::{Expr, TypeExpr};

pub use package_oracle::PackageOracle;

/// Answers static type queries for expressions of one compilation unit.
pub trait TypeOracle {
    /// Type of a value expression.
    fn type_of_expr(&self, expr: &Expr) -> ResolvedType;

    /// Type denoted by a type expression.
    fn type_of_type_expr(&self, ty: &TypeExpr) -> ResolvedType;
}

/// A user-declared type, by its canonical name as written in the
/// declaring package (`Day`) or qualified for imported types (`time.Month`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NamedType(String);

impl NamedType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NamedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Predeclared, untyped and structural types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BasicKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    UnsafePointer,
    UntypedBool,
    UntypedInt,
    UntypedRune,
    UntypedFloat,
    UntypedComplex,
    UntypedString,
    UntypedNil,
    /// Pointer, slice, map, struct, interface and other unnamed type literals,
    /// plus the predeclared interfaces.
    Composite,
}

impl BasicKind {
    /// Looks up a predeclared type name (`byte` and `rune` are aliases).
    pub fn from_predeclared(name: &str) -> Option<Self> {
        let kind = match name {
            "bool" => Self::Bool,
            "int" => Self::Int,
            "int8" => Self::Int8,
            "int16" => Self::Int16,
            "int32" | "rune" => Self::Int32,
            "int64" => Self::Int64,
            "uint" => Self::Uint,
            "uint8" | "byte" => Self::Uint8,
            "uint16" => Self::Uint16,
            "uint32" => Self::Uint32,
            "uint64" => Self::Uint64,
            "uintptr" => Self::Uintptr,
            "float32" => Self::Float32,
            "float64" => Self::Float64,
            "complex64" => Self::Complex64,
            "complex128" => Self::Complex128,
            "string" => Self::String,
            "any" | "error" | "comparable" => Self::Composite,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_untyped(self) -> bool {
        matches!(
            self,
            Self::UntypedBool
                | Self::UntypedInt
                | Self::UntypedRune
                | Self::UntypedFloat
                | Self::UntypedComplex
                | Self::UntypedString
                | Self::UntypedNil
        )
    }

    /// Ordering of untyped numeric kinds: int < rune < float < complex.
    fn untyped_numeric_rank(self) -> Option<u8> {
        match self {
            Self::UntypedInt => Some(0),
            Self::UntypedRune => Some(1),
            Self::UntypedFloat => Some(2),
            Self::UntypedComplex => Some(3),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint => "uint",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Uintptr => "uintptr",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
            Self::String => "string",
            Self::UnsafePointer => "unsafe.Pointer",
            Self::UntypedBool => "untyped bool",
            Self::UntypedInt => "untyped int",
            Self::UntypedRune => "untyped rune",
            Self::UntypedFloat => "untyped float",
            Self::UntypedComplex => "untyped complex",
            Self::UntypedString => "untyped string",
            Self::UntypedNil => "untyped nil",
            Self::Composite => "composite",
        }
    }
}

/// Classification of a static type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "type", rename_all = "snake_case")]
pub enum ResolvedType {
    Named(NamedType),
    Unnamed(BasicKind),
    Indeterminate,
}

impl ResolvedType {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(NamedType::new(name))
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Self::Named(_))
    }

    pub fn is_indeterminate(&self) -> bool {
        matches!(self, Self::Indeterminate)
    }

    pub fn as_named(&self) -> Option<&NamedType> {
        match self {
            Self::Named(named) => Some(named),
            _ => None,
        }
    }

    fn is_untyped(&self) -> bool {
        matches!(self, Self::Unnamed(kind) if kind.is_untyped())
    }

    /// Result type of a non-shift, non-comparison binary operation.
    ///
    /// A typed operand wins over an untyped one; two untyped numeric operands
    /// give the wider kind; otherwise the left operand's type is kept.
    pub fn combine(self, other: ResolvedType) -> ResolvedType {
        match (&self, &other) {
            (Self::Indeterminate, _) | (_, Self::Indeterminate) => Self::Indeterminate,
            (Self::Unnamed(a), Self::Unnamed(b)) if a.is_untyped() && b.is_untyped() => {
                match (a.untyped_numeric_rank(), b.untyped_numeric_rank()) {
                    (Some(ra), Some(rb)) if rb > ra => other,
                    _ => self,
                }
            }
            _ if self.is_untyped() => other,
            _ => self,
        }
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(named) => write!(f, "{}", named),
            Self::Unnamed(kind) => f.write_str(kind.name()),
            Self::Indeterminate => f.write_str("indeterminate"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predeclared_aliases() {
        assert_eq!(BasicKind::from_predeclared("byte"), Some(BasicKind::Uint8));
        assert_eq!(BasicKind::from_predeclared("rune"), Some(BasicKind::Int32));
        assert_eq!(BasicKind::from_predeclared("Day"), None);
    }

    #[test]
    fn test_combine_typed_wins() {
        let day = ResolvedType::named("Day");
        let untyped = ResolvedType::Unnamed(BasicKind::UntypedInt);
        assert_eq!(untyped.clone().combine(day.clone()), day);
        assert_eq!(day.clone().combine(untyped), day);
    }

    #[test]
    fn test_combine_untyped_widens() {
        let int = ResolvedType::Unnamed(BasicKind::UntypedInt);
        let float = ResolvedType::Unnamed(BasicKind::UntypedFloat);
        assert_eq!(int.clone().combine(float.clone()), float);
        assert_eq!(float.clone().combine(int), float);
    }

    #[test]
    fn test_combine_indeterminate_poisons() {
        let day = ResolvedType::named("Day");
        assert!(day.combine(ResolvedType::Indeterminate).is_indeterminate());
    }

    #[test]
    fn test_display() {
        assert_eq!(ResolvedType::named("time.Month").to_string(), "time.Month");
        assert_eq!(ResolvedType::Unnamed(BasicKind::UntypedRune).to_string(), "untyped rune");
    }
}
