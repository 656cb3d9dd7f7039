//! Top-level Go declarations, as far as pointer generation needs them.
//!
//! Function bodies and variable initializers are never inspected; only
//! `const` and `type` declarations carry full structure.

use super::token::Pos;

/// An identifier with its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub pos: Pos,
}

impl Ident {
    pub fn new(name: impl Into<String>, pos: Pos) -> Self {
        Self {
            name: name.into(),
            pos,
        }
    }

    /// The blank identifier `_`.
    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }
}

/// A parsed Go file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub package: Ident,
    pub imports: Vec<ImportSpec>,
    pub decls: Vec<Decl>,
}

/// `import name "path"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit local name (`.` and `_` included), if any.
    pub alias: Option<String>,
    /// Unquoted import path.
    pub path: String,
    pub pos: Pos,
}

impl ImportSpec {
    /// Name the package is referred to by inside the importing file.
    ///
    /// Without an alias this is the last path element, which is the usual
    /// convention for Go package names.
    pub fn local_name(&self) -> &str {
        match &self.alias {
            Some(alias) => alias,
            None => self.path.rsplit('/').next().unwrap_or(&self.path),
        }
    }
}

/// A top-level declaration.
#[derive(Debug, Clone)]
pub enum Decl {
    Const(ValueDecl),
    Var(ValueDecl),
    Type(TypeDecl),
    Func(FuncDecl),
}

/// A `const` or `var` declaration: one spec, or a parenthesized group.
#[derive(Debug, Clone)]
pub struct ValueDecl {
    pub pos: Pos,
    pub grouped: bool,
    pub specs: Vec<ValueSpec>,
}

/// `a, b T = x, y` within a value declaration.
#[derive(Debug, Clone)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub ty: Option<TypeExpr>,
    pub values: Vec<Expr>,
}

/// A `type` declaration: one spec, or a parenthesized group.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub pos: Pos,
    pub specs: Vec<TypeSpec>,
}

/// `Name[P any] = Underlying`.
#[derive(Debug, Clone)]
pub struct TypeSpec {
    pub name: Ident,
    pub generic: bool,
    pub alias: bool,
    pub ty: TypeExpr,
}

/// A function or method declaration (only its name is kept).
#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub name: Ident,
    pub is_method: bool,
}

/// A type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Name(Ident),
    Qualified { package: Ident, name: Ident },
    /// `Base[Args]`, arguments not retained.
    Instance(Box<TypeExpr>),
    Pointer(Box<TypeExpr>),
    Paren(Box<TypeExpr>),
    /// Any structural type: array, slice, map, chan, func, struct, interface.
    Composite(CompositeKind, Pos),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeKind {
    Array,
    Slice,
    Map,
    Chan,
    Func,
    Struct,
    Interface,
}

/// Kind of a basic literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Char,
    String,
}

/// An expression.
///
/// Constructs that cannot appear in a constant expression are collapsed
/// into [`Expr::Opaque`].
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(Ident),
    Lit { kind: LitKind, value: String, pos: Pos },
    Selector { base: Box<Expr>, field: Ident },
    Call { func: Box<Expr>, args: Vec<Expr>, pos: Pos },
    Paren(Box<Expr>),
    Unary { op: &'static str, operand: Box<Expr>, pos: Pos },
    Binary { op: &'static str, lhs: Box<Expr>, rhs: Box<Expr> },
    /// A type in expression position, e.g. the callee of `[]byte(s)`.
    Type(TypeExpr),
    Opaque(Pos),
}

impl Expr {
    /// Position of the first token of the expression.
    pub fn pos(&self) -> Pos {
        match self {
            Self::Ident(id) => id.pos,
            Self::Lit { pos, .. } | Self::Call { pos, .. } | Self::Unary { pos, .. } => *pos,
            Self::Selector { base, .. } => base.pos(),
            Self::Paren(inner) => inner.pos(),
            Self::Binary { lhs, .. } => lhs.pos(),
            Self::Type(ty) => ty.pos(),
            Self::Opaque(pos) => *pos,
        }
    }
}

impl TypeExpr {
    pub fn pos(&self) -> Pos {
        match self {
            Self::Name(id) => id.pos,
            Self::Qualified { package, .. } => package.pos,
            Self::Instance(base) | Self::Pointer(base) | Self::Paren(base) => base.pos(),
            Self::Composite(_, pos) => *pos,
        }
    }
}
