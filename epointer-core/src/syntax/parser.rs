//! Recursive-descent parser for Go top-level declarations.
//!
//! Only `package`, `import`, `const` and `type` are parsed structurally.
//! `var` specs keep their names; `func` declarations keep their name and
//! their signature/body tokens are skipped by bracket balancing.

use super::ast::{
    CompositeKind, Decl, Expr, FuncDecl, Ident, ImportSpec, LitKind, SourceFile, TypeDecl,
    TypeExpr, TypeSpec, ValueDecl, ValueSpec,
};
use super::token::{Keyword, Pos, Token, TokenKind};
use super::SyntaxError;

type PResult<T> = Result<T, SyntaxError>;

const UNARY_OPS: &[&str] = &["+", "-", "!", "^", "*", "&", "<-", "~"];

/// Binary operator precedence, levels 1 (`||`) to 5 (`*`).
fn binary_precedence(kind: &TokenKind) -> Option<(&'static str, u8)> {
    let TokenKind::Op(op) = kind else {
        return None;
    };
    let prec = match *op {
        "||" => 1,
        "&&" => 2,
        "==" | "!=" | "<" | "<=" | ">" | ">=" => 3,
        "+" | "-" | "|" | "^" => 4,
        "*" | "/" | "%" | "<<" | ">>" | "&" | "&^" => 5,
        _ => return None,
    };
    Some((*op, prec))
}

/// Parser over a complete token stream (as produced by the lexer).
pub struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }

    // ========================================================================
    // Token cursor
    // ========================================================================

    fn peek(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.index.min(last)]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn peek_at(&self, n: usize) -> Option<&TokenKind> {
        self.tokens.get(self.index + n).map(|t| &t.kind)
    }

    fn bump(&mut self) -> Token {
        let tok = self.peek().clone();
        if tok.kind != TokenKind::Eof {
            self.index += 1;
        }
        tok
    }

    fn at_op(&self, op: &str) -> bool {
        self.peek_kind().is_op(op)
    }

    fn eat_op(&mut self, op: &str) -> bool {
        if self.at_op(op) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect_op(&mut self, op: &str) -> PResult<Pos> {
        if self.at_op(op) {
            Ok(self.bump().pos)
        } else {
            Err(self.unexpected(&format!("`{}`", op)))
        }
    }

    fn at_keyword(&self, kw: Keyword) -> bool {
        matches!(self.peek_kind(), TokenKind::Keyword(k) if *k == kw)
    }

    fn at_semi(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Semi { .. })
    }

    fn expect_ident(&mut self) -> PResult<Ident> {
        match self.peek_kind() {
            TokenKind::Ident(name) => {
                let ident = Ident::new(name.clone(), self.peek().pos);
                self.bump();
                Ok(ident)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn expect_semi(&mut self) -> PResult<()> {
        if self.at_semi() {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected("`;` or newline"))
        }
    }

    /// End of a top-level declaration: a semicolon, or end of file.
    fn expect_terminator(&mut self) -> PResult<()> {
        match self.peek_kind() {
            TokenKind::Eof => Ok(()),
            _ => self.expect_semi(),
        }
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        let tok = self.peek();
        SyntaxError::new(format!("expected {}, found {}", expected, tok.kind), tok.pos)
    }

    /// Skips a bracketed region starting at the current opening token.
    fn skip_balanced(&mut self) -> PResult<()> {
        let start = self.peek().pos;
        let mut depth = 0usize;
        loop {
            let tok = self.bump();
            match tok.kind {
                TokenKind::Op("(" | "[" | "{") => depth += 1,
                TokenKind::Op(")" | "]" | "}") => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Ok(());
                    }
                }
                TokenKind::Eof => {
                    return Err(SyntaxError::new("unbalanced brackets", start));
                }
                _ => {}
            }
        }
    }

    /// Skips tokens up to the end of the current declaration or group spec.
    ///
    /// Stops before a `)` closing an enclosing group; consumes the final `;`.
    fn skip_to_terminator(&mut self) -> PResult<()> {
        loop {
            match self.peek_kind() {
                TokenKind::Eof => return Ok(()),
                TokenKind::Semi { .. } => {
                    self.bump();
                    return Ok(());
                }
                TokenKind::Op(")") => return Ok(()),
                TokenKind::Op("(" | "[" | "{") => self.skip_balanced()?,
                _ => {
                    self.bump();
                }
            }
        }
    }

    // ========================================================================
    // File structure
    // ========================================================================

    /// Parse a whole file.
    pub fn parse_file(mut self) -> PResult<SourceFile> {
        if !self.at_keyword(Keyword::Package) {
            return Err(self.unexpected("`package` clause"));
        }
        self.bump();
        let package = self.expect_ident()?;
        self.expect_terminator()?;

        let mut imports = Vec::new();
        while self.at_keyword(Keyword::Import) {
            self.bump();
            let (_, specs) = self.parse_group(Self::parse_import_spec)?;
            imports.extend(specs);
        }

        let mut decls = Vec::new();
        loop {
            let pos = self.peek().pos;
            match self.peek_kind() {
                TokenKind::Eof => break,
                TokenKind::Semi { .. } => {
                    self.bump();
                }
                TokenKind::Keyword(Keyword::Const) => {
                    self.bump();
                    let (grouped, specs) = self.parse_group(Self::parse_const_spec)?;
                    decls.push(Decl::Const(ValueDecl { pos, grouped, specs }));
                }
                TokenKind::Keyword(Keyword::Var) => {
                    self.bump();
                    let (grouped, specs) = self.parse_group(Self::parse_var_spec)?;
                    decls.push(Decl::Var(ValueDecl { pos, grouped, specs }));
                }
                TokenKind::Keyword(Keyword::Type) => {
                    self.bump();
                    let (_, specs) = self.parse_group(Self::parse_type_spec)?;
                    decls.push(Decl::Type(TypeDecl { pos, specs }));
                }
                TokenKind::Keyword(Keyword::Func) => {
                    decls.push(Decl::Func(self.parse_func_decl()?));
                }
                TokenKind::Keyword(Keyword::Import) => {
                    return Err(SyntaxError::new(
                        "imports must appear before other declarations",
                        pos,
                    ));
                }
                _ => return Err(self.unexpected("declaration")),
            }
        }

        Ok(SourceFile {
            package,
            imports,
            decls,
        })
    }

    /// Parses `spec` or `( spec; spec; ... )` followed by the declaration terminator.
    fn parse_group<T>(&mut self, mut spec: impl FnMut(&mut Self) -> PResult<T>) -> PResult<(bool, Vec<T>)> {
        if !self.eat_op("(") {
            let item = spec(self)?;
            self.expect_terminator()?;
            return Ok((false, vec![item]));
        }

        let mut items = Vec::new();
        while !self.eat_op(")") {
            items.push(spec(self)?);
            if !self.at_op(")") {
                self.expect_semi()?;
            }
        }
        self.expect_terminator()?;
        Ok((true, items))
    }

    fn parse_import_spec(&mut self) -> PResult<ImportSpec> {
        let pos = self.peek().pos;
        let alias = match self.peek_kind() {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.bump();
                Some(name)
            }
            TokenKind::Op(".") => {
                self.bump();
                Some(".".to_string())
            }
            _ => None,
        };
        match self.peek_kind() {
            TokenKind::Str(lit) => {
                let path = unquote(lit);
                self.bump();
                Ok(ImportSpec { alias, path, pos })
            }
            _ => Err(self.unexpected("import path")),
        }
    }

    fn parse_ident_list(&mut self) -> PResult<Vec<Ident>> {
        let mut names = vec![self.expect_ident()?];
        while self.eat_op(",") {
            names.push(self.expect_ident()?);
        }
        Ok(names)
    }

    fn parse_const_spec(&mut self) -> PResult<ValueSpec> {
        let names = self.parse_ident_list()?;
        let ty = if self.at_op("=") || self.at_op(")") || self.at_semi() || *self.peek_kind() == TokenKind::Eof {
            None
        } else {
            Some(self.parse_type()?)
        };
        let values = if self.eat_op("=") {
            self.parse_expr_list()?
        } else {
            Vec::new()
        };

        if ty.is_some() && values.is_empty() {
            return Err(SyntaxError::new(
                "constant declaration with a type must have an initializer",
                names[0].pos,
            ));
        }
        if !values.is_empty() && values.len() != names.len() {
            let what = if values.len() < names.len() {
                "missing init expr for const declaration"
            } else {
                "extra init expr"
            };
            return Err(SyntaxError::new(what, names[0].pos));
        }

        Ok(ValueSpec { names, ty, values })
    }

    /// Variable specs keep only their names; types and initializers are skipped.
    fn parse_var_spec(&mut self) -> PResult<ValueSpec> {
        let names = self.parse_ident_list()?;
        loop {
            match self.peek_kind() {
                TokenKind::Eof | TokenKind::Semi { .. } | TokenKind::Op(")") => break,
                TokenKind::Op("(" | "[" | "{") => self.skip_balanced()?,
                _ => {
                    self.bump();
                }
            }
        }
        Ok(ValueSpec {
            names,
            ty: None,
            values: Vec::new(),
        })
    }

    fn parse_type_spec(&mut self) -> PResult<TypeSpec> {
        let name = self.expect_ident()?;
        let generic = self.at_op("[") && self.looks_like_type_params();
        if generic {
            self.skip_balanced()?;
        }
        let alias = self.eat_op("=");
        let ty = self.parse_type()?;
        Ok(TypeSpec {
            name,
            generic,
            alias,
            ty,
        })
    }

    /// Distinguishes `type G[T any] ...` from the array type `type A [N]int`.
    fn looks_like_type_params(&self) -> bool {
        matches!(self.peek_at(1), Some(TokenKind::Ident(_)))
            && matches!(
                self.peek_at(2),
                Some(TokenKind::Ident(_) | TokenKind::Keyword(_) | TokenKind::Op("," | "~" | "[" | "*"))
            )
    }

    fn parse_func_decl(&mut self) -> PResult<FuncDecl> {
        self.bump();
        let is_method = self.at_op("(");
        if is_method {
            self.skip_balanced()?;
        }
        let name = self.expect_ident()?;
        self.skip_to_terminator()?;
        Ok(FuncDecl { name, is_method })
    }

    // ========================================================================
    // Types
    // ========================================================================

    fn starts_type(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Ident(_)
                | TokenKind::Op("*" | "[" | "(" | "<-")
                | TokenKind::Keyword(
                    Keyword::Func | Keyword::Map | Keyword::Chan | Keyword::Struct | Keyword::Interface
                )
        )
    }

    pub(crate) fn parse_type(&mut self) -> PResult<TypeExpr> {
        let pos = self.peek().pos;
        match self.peek_kind().clone() {
            TokenKind::Ident(name) => {
                self.bump();
                let first = Ident::new(name, pos);
                let mut ty = if self.at_op(".") && matches!(self.peek_at(1), Some(TokenKind::Ident(_))) {
                    self.bump();
                    let name = self.expect_ident()?;
                    TypeExpr::Qualified {
                        package: first,
                        name,
                    }
                } else {
                    TypeExpr::Name(first)
                };
                if self.at_op("[") {
                    self.skip_balanced()?;
                    ty = TypeExpr::Instance(Box::new(ty));
                }
                Ok(ty)
            }
            TokenKind::Op("*") => {
                self.bump();
                Ok(TypeExpr::Pointer(Box::new(self.parse_type()?)))
            }
            TokenKind::Op("(") => {
                self.bump();
                let inner = self.parse_type()?;
                self.expect_op(")")?;
                Ok(TypeExpr::Paren(Box::new(inner)))
            }
            TokenKind::Op("[") => {
                let kind = if matches!(self.peek_at(1), Some(TokenKind::Op("]"))) {
                    self.bump();
                    self.bump();
                    CompositeKind::Slice
                } else {
                    self.skip_balanced()?;
                    CompositeKind::Array
                };
                self.parse_type()?;
                Ok(TypeExpr::Composite(kind, pos))
            }
            TokenKind::Op("<-") => {
                self.bump();
                if !self.at_keyword(Keyword::Chan) {
                    return Err(self.unexpected("`chan`"));
                }
                self.bump();
                self.parse_type()?;
                Ok(TypeExpr::Composite(CompositeKind::Chan, pos))
            }
            TokenKind::Keyword(Keyword::Chan) => {
                self.bump();
                self.eat_op("<-");
                self.parse_type()?;
                Ok(TypeExpr::Composite(CompositeKind::Chan, pos))
            }
            TokenKind::Keyword(Keyword::Map) => {
                self.bump();
                self.expect_op("[")?;
                self.parse_type()?;
                self.expect_op("]")?;
                self.parse_type()?;
                Ok(TypeExpr::Composite(CompositeKind::Map, pos))
            }
            TokenKind::Keyword(Keyword::Func) => {
                self.bump();
                self.skip_signature()?;
                Ok(TypeExpr::Composite(CompositeKind::Func, pos))
            }
            TokenKind::Keyword(kw @ (Keyword::Struct | Keyword::Interface)) => {
                self.bump();
                if !self.at_op("{") {
                    return Err(self.unexpected("`{`"));
                }
                self.skip_balanced()?;
                let kind = if kw == Keyword::Struct {
                    CompositeKind::Struct
                } else {
                    CompositeKind::Interface
                };
                Ok(TypeExpr::Composite(kind, pos))
            }
            _ => Err(self.unexpected("type")),
        }
    }

    /// Parameters, then an optional result type or result list.
    fn skip_signature(&mut self) -> PResult<()> {
        if !self.at_op("(") {
            return Err(self.unexpected("`(`"));
        }
        self.skip_balanced()?;
        if self.at_op("(") {
            self.skip_balanced()?;
        } else if self.starts_type() {
            self.parse_type()?;
        }
        Ok(())
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn parse_expr_list(&mut self) -> PResult<Vec<Expr>> {
        let mut exprs = vec![self.parse_expr()?];
        while self.eat_op(",") {
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }

    pub(crate) fn parse_expr(&mut self) -> PResult<Expr> {
        self.parse_binary(1)
    }

    fn parse_binary(&mut self, min_prec: u8) -> PResult<Expr> {
        let mut lhs = self.parse_unary()?;
        while let Some((op, prec)) = binary_precedence(self.peek_kind()) {
            if prec < min_prec {
                break;
            }
            self.bump();
            let rhs = self.parse_binary(prec + 1)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        if let TokenKind::Op(op) = self.peek_kind() {
            if let Some(op) = UNARY_OPS.iter().find(|u| **u == *op).copied() {
                let pos = self.bump().pos;
                let operand = self.parse_unary()?;
                return Ok(Expr::Unary {
                    op,
                    operand: Box::new(operand),
                    pos,
                });
            }
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_operand()?;
        loop {
            if self.at_op(".") {
                self.bump();
                if self.at_op("(") {
                    // Type assertion `x.(T)`.
                    let pos = expr.pos();
                    self.skip_balanced()?;
                    expr = Expr::Opaque(pos);
                } else {
                    let field = self.expect_ident()?;
                    expr = Expr::Selector {
                        base: Box::new(expr),
                        field,
                    };
                }
            } else if self.at_op("(") {
                let pos = expr.pos();
                let args = self.parse_call_args()?;
                expr = Expr::Call {
                    func: Box::new(expr),
                    args,
                    pos,
                };
            } else if self.at_op("[") || self.at_op("{") {
                // Index, slice, instantiation or composite literal.
                let pos = expr.pos();
                self.skip_balanced()?;
                expr = Expr::Opaque(pos);
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_call_args(&mut self) -> PResult<Vec<Expr>> {
        self.expect_op("(")?;
        let mut args = Vec::new();
        while !self.eat_op(")") {
            args.push(self.parse_expr()?);
            self.eat_op("...");
            if !self.eat_op(",") {
                self.expect_op(")")?;
                break;
            }
        }
        Ok(args)
    }

    fn parse_operand(&mut self) -> PResult<Expr> {
        let pos = self.peek().pos;
        let lit = |kind, value: &String| Expr::Lit {
            kind,
            value: value.clone(),
            pos,
        };
        let expr = match self.peek_kind() {
            TokenKind::Int(v) => lit(LitKind::Int, v),
            TokenKind::Float(v) => lit(LitKind::Float, v),
            TokenKind::Imag(v) => lit(LitKind::Imag, v),
            TokenKind::Char(v) => lit(LitKind::Char, v),
            TokenKind::Str(v) => lit(LitKind::String, v),
            TokenKind::Ident(name) => Expr::Ident(Ident::new(name.clone(), pos)),
            TokenKind::Op("(") => {
                self.bump();
                let inner = self.parse_expr()?;
                self.expect_op(")")?;
                return Ok(Expr::Paren(Box::new(inner)));
            }
            TokenKind::Keyword(Keyword::Func) => {
                let ty = self.parse_type()?;
                if self.at_op("{") {
                    self.skip_balanced()?;
                    return Ok(Expr::Opaque(pos));
                }
                return Ok(Expr::Type(ty));
            }
            TokenKind::Op("[")
            | TokenKind::Keyword(Keyword::Map | Keyword::Chan | Keyword::Struct | Keyword::Interface) => {
                return Ok(Expr::Type(self.parse_type()?));
            }
            _ => return Err(self.unexpected("expression")),
        };
        self.bump();
        Ok(expr)
    }
}

/// Strips the quotes of a string literal (escape sequences are kept as written).
fn unquote(lit: &str) -> String {
    let mut chars = lit.chars();
    chars.next();
    chars.next_back();
    chars.as_str().to_string()
}
