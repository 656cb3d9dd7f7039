//! Go source front end: lexer, top-level declaration parser and AST.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │   lexer.rs   │ ──▶ │  parser.rs   │ ──▶ │    ast.rs    │
//! │  tokens with │     │  package,    │     │  SourceFile  │
//! │  implicit ;  │     │  const/type  │     │  Decl, Expr  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! Function bodies and variable initializers are skipped; only package-level
//! constants and type declarations are kept in full.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

use std::fmt;

pub use ast::{
    CompositeKind, Decl, Expr, FuncDecl, Ident, ImportSpec, LitKind, SourceFile, TypeDecl,
    TypeExpr, TypeSpec, ValueDecl, ValueSpec,
};
pub use lexer::{tokenize, Lexer};
pub use parser::Parser;
pub use token::{Keyword, Pos, Token, TokenKind};

/// A lexical or syntactic error with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub pos: Pos,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, pos: Pos) -> Self {
        Self {
            message: message.into(),
            pos,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.pos, self.message)
    }
}

impl std::error::Error for SyntaxError {}

/// Tokenize and parse a Go source file.
pub fn parse_source(source: &str) -> Result<SourceFile, SyntaxError> {
    let tokens = tokenize(source)?;
    Parser::new(tokens).parse_file()
}
