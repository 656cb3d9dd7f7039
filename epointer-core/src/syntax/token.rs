//! Token types for the Go lexer.

use std::fmt;

/// A 1-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

impl Pos {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Go reserved words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Break,
    Case,
    Chan,
    Const,
    Continue,
    Default,
    Defer,
    Else,
    Fallthrough,
    For,
    Func,
    Go,
    Goto,
    If,
    Import,
    Interface,
    Map,
    Package,
    Range,
    Return,
    Select,
    Struct,
    Switch,
    Type,
    Var,
}

impl Keyword {
    pub fn from_ident(word: &str) -> Option<Self> {
        let kw = match word {
            "break" => Self::Break,
            "case" => Self::Case,
            "chan" => Self::Chan,
            "const" => Self::Const,
            "continue" => Self::Continue,
            "default" => Self::Default,
            "defer" => Self::Defer,
            "else" => Self::Else,
            "fallthrough" => Self::Fallthrough,
            "for" => Self::For,
            "func" => Self::Func,
            "go" => Self::Go,
            "goto" => Self::Goto,
            "if" => Self::If,
            "import" => Self::Import,
            "interface" => Self::Interface,
            "map" => Self::Map,
            "package" => Self::Package,
            "range" => Self::Range,
            "return" => Self::Return,
            "select" => Self::Select,
            "struct" => Self::Struct,
            "switch" => Self::Switch,
            "type" => Self::Type,
            "var" => Self::Var,
            _ => return None,
        };
        Some(kw)
    }

    /// Whether a line ending after this keyword gets an implicit semicolon.
    fn ends_statement(self) -> bool {
        matches!(
            self,
            Self::Break | Self::Continue | Self::Fallthrough | Self::Return
        )
    }
}

/// Operators and punctuation, longest first so greedy matching works.
pub const OPERATORS: &[&str] = &[
    "<<=", ">>=", "&^=", "...", "&&", "||", "<-", "++", "--", "==", "!=", "<=", ">=", ":=",
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "&^", "~", "+", "-", "*", "/",
    "%", "&", "|", "^", "<", ">", "=", "!", "(", ")", "[", "]", "{", "}", ",", ".", ":",
];

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Keyword(Keyword),
    Int(String),
    Float(String),
    Imag(String),
    Char(String),
    Str(String),
    Op(&'static str),
    /// `;`, either written or inserted at a line end.
    Semi { implicit: bool },
    Eof,
}

impl TokenKind {
    /// Go's automatic semicolon rule: does a newline after this token end the statement?
    pub fn triggers_semicolon(&self) -> bool {
        match self {
            Self::Ident(_)
            | Self::Int(_)
            | Self::Float(_)
            | Self::Imag(_)
            | Self::Char(_)
            | Self::Str(_) => true,
            Self::Keyword(kw) => kw.ends_statement(),
            Self::Op(op) => matches!(*op, "++" | "--" | ")" | "]" | "}"),
            Self::Semi { .. } | Self::Eof => false,
        }
    }

    pub fn is_op(&self, op: &str) -> bool {
        matches!(self, Self::Op(o) if *o == op)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(name) => write!(f, "identifier `{}`", name),
            Self::Keyword(kw) => write!(f, "keyword `{}`", format!("{:?}", kw).to_lowercase()),
            Self::Int(lit) | Self::Float(lit) | Self::Imag(lit) | Self::Char(lit) => {
                write!(f, "literal {}", lit)
            }
            Self::Str(lit) => write!(f, "string {}", lit),
            Self::Op(op) => write!(f, "`{}`", op),
            Self::Semi { implicit: true } => write!(f, "newline"),
            Self::Semi { implicit: false } => write!(f, "`;`"),
            Self::Eof => write!(f, "end of file"),
        }
    }
}

/// A token with its kind and starting position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
}

impl Token {
    pub fn new(kind: TokenKind, pos: Pos) -> Self {
        Self { kind, pos }
    }
}
