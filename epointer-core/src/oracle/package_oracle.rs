//! Type oracle backed by the parsed declarations of one package.
//!
//! Knows the package's type declarations, its imports and its constant
//! declaration groups. Identifiers naming other constants are resolved
//! lazily (constants may reference declarations later in the package) with
//! memoization and cycle detection.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use super::{BasicKind, ResolvedType, TypeOracle};
use crate::consts::const_resolver::declared_type;
use crate::consts::DeclarationGroup;
use crate::loader::Package;
use crate::syntax::{Decl, Expr, Ident, LitKind, TypeExpr, TypeSpec};

/// The cgo pseudo-package; its members have no Go declarations to inspect.
const CGO_PACKAGE: &str = "C";

/// Longest chain of constant references followed before giving up.
pub const MAX_REFERENCE_DEPTH: usize = 256;

/// `(group index, spec index)` of a constant.
type ConstKey = (usize, usize);

/// Oracle over a loaded package.
pub struct PackageOracle<'a> {
    types: HashMap<&'a str, &'a TypeSpec>,
    imports: HashSet<&'a str>,
    consts: HashMap<&'a str, ConstKey>,
    groups: &'a [DeclarationGroup],
    memo: RefCell<HashMap<ConstKey, ResolvedType>>,
    in_progress: RefCell<HashSet<ConstKey>>,
    depth: Cell<usize>,
    expanding_aliases: RefCell<HashSet<String>>,
}

impl<'a> PackageOracle<'a> {
    /// Build an oracle from a package and its scanned constant groups.
    pub fn new(package: &'a Package, groups: &'a [DeclarationGroup]) -> Self {
        let mut types = HashMap::new();
        let mut imports = HashSet::new();

        for file in &package.files {
            for import in &file.ast.imports {
                match import.local_name() {
                    "_" | "." => {}
                    name => {
                        imports.insert(name);
                    }
                }
            }
            for decl in &file.ast.decls {
                if let Decl::Type(type_decl) = decl {
                    for spec in &type_decl.specs {
                        types.entry(spec.name.name.as_str()).or_insert(spec);
                    }
                }
            }
        }

        let mut consts = HashMap::new();
        for (g, group) in groups.iter().enumerate() {
            for (i, spec) in group.specs.iter().enumerate() {
                if !spec.is_discard() {
                    consts.entry(spec.name.as_str()).or_insert((g, i));
                }
            }
        }

        Self {
            types,
            imports,
            consts,
            groups,
            memo: RefCell::new(HashMap::new()),
            in_progress: RefCell::new(HashSet::new()),
            depth: Cell::new(0),
            expanding_aliases: RefCell::new(HashSet::new()),
        }
    }

    /// Number of locally declared types known to the oracle.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    // ========================================================================
    // Types
    // ========================================================================

    fn type_by_name(&self, name: &str) -> ResolvedType {
        if let Some(spec) = self.types.get(name) {
            if !spec.alias {
                return ResolvedType::named(name);
            }
            if !self.expanding_aliases.borrow_mut().insert(name.to_string()) {
                return ResolvedType::Indeterminate;
            }
            let target = self.type_of_type_expr(&spec.ty);
            self.expanding_aliases.borrow_mut().remove(name);
            return target;
        }
        match BasicKind::from_predeclared(name) {
            Some(kind) => ResolvedType::Unnamed(kind),
            None => ResolvedType::Indeterminate,
        }
    }

    /// `pkg.Name` used as a type.
    fn qualified_type(&self, package: &str, name: &str) -> ResolvedType {
        match package {
            CGO_PACKAGE => ResolvedType::Indeterminate,
            "unsafe" if name == "Pointer" => ResolvedType::Unnamed(BasicKind::UnsafePointer),
            "unsafe" => ResolvedType::Indeterminate,
            _ if self.imports.contains(package) => ResolvedType::named(format!("{}.{}", package, name)),
            _ => ResolvedType::Indeterminate,
        }
    }

    fn is_type_name(&self, name: &str) -> bool {
        self.types.contains_key(name)
            || (!self.consts.contains_key(name) && BasicKind::from_predeclared(name).is_some())
    }

    // ========================================================================
    // Constants
    // ========================================================================

    fn const_type(&self, key: ConstKey) -> ResolvedType {
        if let Some(ty) = self.memo.borrow().get(&key) {
            return ty.clone();
        }
        if self.depth.get() >= MAX_REFERENCE_DEPTH || !self.in_progress.borrow_mut().insert(key) {
            return ResolvedType::Indeterminate;
        }
        self.depth.set(self.depth.get() + 1);

        let (g, i) = key;
        let group = &self.groups[g];
        let ty = match declared_type(&group.specs[i], self) {
            Some(ty) => ty,
            None => group
                .predecessor(i)
                .map(|p| self.const_type((g, p)))
                .unwrap_or(ResolvedType::Indeterminate),
        };

        self.depth.set(self.depth.get() - 1);
        self.in_progress.borrow_mut().remove(&key);
        self.memo.borrow_mut().insert(key, ty.clone());
        ty
    }

    fn ident_value(&self, ident: &Ident) -> ResolvedType {
        if let Some(&key) = self.consts.get(ident.name.as_str()) {
            return self.const_type(key);
        }
        match ident.name.as_str() {
            "iota" => ResolvedType::Unnamed(BasicKind::UntypedInt),
            "true" | "false" => ResolvedType::Unnamed(BasicKind::UntypedBool),
            "nil" => ResolvedType::Unnamed(BasicKind::UntypedNil),
            _ => ResolvedType::Indeterminate,
        }
    }

    // ========================================================================
    // Calls
    // ========================================================================

    /// If `func` denotes a type, the call is a conversion to that type.
    fn conversion_target(&self, func: &Expr) -> Option<ResolvedType> {
        match func {
            Expr::Ident(id) if self.is_type_name(&id.name) => Some(self.type_by_name(&id.name)),
            Expr::Selector { base, field } => match base.as_ref() {
                Expr::Ident(pkg) if pkg.name == "unsafe" => (field.name == "Pointer")
                    .then_some(ResolvedType::Unnamed(BasicKind::UnsafePointer)),
                // Only conversions and builtins may appear in constant
                // expressions, so a call through another package is a conversion.
                Expr::Ident(pkg)
                    if pkg.name == CGO_PACKAGE || self.imports.contains(pkg.name.as_str()) =>
                {
                    Some(self.qualified_type(&pkg.name, &field.name))
                }
                _ => None,
            },
            Expr::Paren(inner) => match inner.as_ref() {
                Expr::Unary { op: "*", .. } => Some(ResolvedType::Unnamed(BasicKind::Composite)),
                other => self.conversion_target(other),
            },
            Expr::Type(ty) => Some(self.type_of_type_expr(ty)),
            _ => None,
        }
    }

    fn builtin_call(&self, func: &Expr, args: &[Expr]) -> ResolvedType {
        let name = match func {
            Expr::Ident(id) if !self.consts.contains_key(id.name.as_str()) => id.name.as_str(),
            Expr::Selector { base, field } => {
                return match (base.as_ref(), field.name.as_str()) {
                    (Expr::Ident(pkg), "Sizeof" | "Alignof" | "Offsetof") if pkg.name == "unsafe" => {
                        ResolvedType::Unnamed(BasicKind::Uintptr)
                    }
                    _ => ResolvedType::Indeterminate,
                };
            }
            _ => return ResolvedType::Indeterminate,
        };

        match name {
            "len" | "cap" => ResolvedType::Unnamed(BasicKind::Int),
            "real" | "imag" => match args.first().map(|a| self.type_of_expr(a)) {
                Some(ResolvedType::Unnamed(BasicKind::Complex64)) => ResolvedType::Unnamed(BasicKind::Float32),
                Some(ResolvedType::Unnamed(BasicKind::Complex128)) => ResolvedType::Unnamed(BasicKind::Float64),
                Some(ty) if is_untyped_numeric(&ty) => ResolvedType::Unnamed(BasicKind::UntypedFloat),
                _ => ResolvedType::Indeterminate,
            },
            "complex" => match self.fold_args(args) {
                ResolvedType::Unnamed(BasicKind::Float32) => ResolvedType::Unnamed(BasicKind::Complex64),
                ResolvedType::Unnamed(BasicKind::Float64) => ResolvedType::Unnamed(BasicKind::Complex128),
                ty if is_untyped_numeric(&ty) => ResolvedType::Unnamed(BasicKind::UntypedComplex),
                _ => ResolvedType::Indeterminate,
            },
            "min" | "max" => self.fold_args(args),
            _ => ResolvedType::Indeterminate,
        }
    }

    fn fold_args(&self, args: &[Expr]) -> ResolvedType {
        let mut types = args.iter().map(|a| self.type_of_expr(a));
        match types.next() {
            Some(first) => types.fold(first, ResolvedType::combine),
            None => ResolvedType::Indeterminate,
        }
    }
}

fn is_untyped_numeric(ty: &ResolvedType) -> bool {
    matches!(
        ty,
        ResolvedType::Unnamed(
            BasicKind::UntypedInt | BasicKind::UntypedRune | BasicKind::UntypedFloat | BasicKind::UntypedComplex
        )
    )
}

impl TypeOracle for PackageOracle<'_> {
    fn type_of_expr(&self, expr: &Expr) -> ResolvedType {
        match expr {
            Expr::Lit { kind, .. } => ResolvedType::Unnamed(match kind {
                LitKind::Int => BasicKind::UntypedInt,
                LitKind::Float => BasicKind::UntypedFloat,
                LitKind::Imag => BasicKind::UntypedComplex,
                LitKind::Char => BasicKind::UntypedRune,
                LitKind::String => BasicKind::UntypedString,
            }),
            Expr::Ident(id) => self.ident_value(id),
            Expr::Paren(inner) => self.type_of_expr(inner),
            Expr::Call { func, args, .. } => match self.conversion_target(func) {
                Some(target) => target,
                None => self.builtin_call(func, args),
            },
            Expr::Unary { op, operand, .. } => match *op {
                "+" | "-" | "^" | "!" => self.type_of_expr(operand),
                _ => ResolvedType::Indeterminate,
            },
            Expr::Binary { op, lhs, rhs } => match *op {
                "==" | "!=" | "<" | "<=" | ">" | ">=" => ResolvedType::Unnamed(BasicKind::UntypedBool),
                "<<" | ">>" => self.type_of_expr(lhs),
                _ => self.type_of_expr(lhs).combine(self.type_of_expr(rhs)),
            },
            // Constants of other packages, and anything non-constant.
            Expr::Selector { .. } | Expr::Type(_) | Expr::Opaque(_) => ResolvedType::Indeterminate,
        }
    }

    fn type_of_type_expr(&self, ty: &TypeExpr) -> ResolvedType {
        match ty {
            TypeExpr::Name(id) => self.type_by_name(&id.name),
            TypeExpr::Qualified { package, name } => self.qualified_type(&package.name, &name.name),
            TypeExpr::Paren(inner) => self.type_of_type_expr(inner),
            TypeExpr::Instance(_) => ResolvedType::Indeterminate,
            TypeExpr::Pointer(_) | TypeExpr::Composite(..) => ResolvedType::Unnamed(BasicKind::Composite),
        }
    }
}
