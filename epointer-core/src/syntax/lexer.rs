//! Lexer for Go source text.
//!
//! Handles tokenization including:
//! - Identifiers, keywords, numeric/rune/string literals
//! - Operators and punctuation
//! - Line and block comments (discarded)
//! - Automatic semicolon insertion at line ends, per the Go grammar

use super::token::{Keyword, Pos, Token, TokenKind, OPERATORS};
use super::SyntaxError;

/// Converts Go source text into a token stream ending with `Eof`.
pub struct Lexer<'a> {
    source: &'a str,
    offset: usize,
    line: usize,
    column: usize,
    /// Whether the last emitted token allows a semicolon at the next newline.
    pending_semi: bool,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            column: 1,
            pending_semi: false,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the entire source.
    pub fn tokenize(mut self) -> Result<Vec<Token>, SyntaxError> {
        // A byte order mark is permitted as the very first character.
        if self.peek() == Some('\u{feff}') {
            self.advance();
        }

        while let Some(c) = self.peek() {
            match c {
                '\n' => {
                    let pos = self.pos();
                    self.advance();
                    self.line_break(pos);
                }
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '/' if self.peek_next() == Some('/') => self.skip_line_comment(),
                '/' if self.peek_next() == Some('*') => self.skip_block_comment()?,
                _ => self.scan_token(c)?,
            }
        }

        let end = self.pos();
        if self.pending_semi {
            self.tokens.push(Token::new(TokenKind::Semi { implicit: true }, end));
        }
        self.tokens.push(Token::new(TokenKind::Eof, end));
        Ok(self.tokens)
    }

    // ========================================================================
    // Character handling
    // ========================================================================

    fn pos(&self) -> Pos {
        Pos::new(self.line, self.column)
    }

    fn rest(&self) -> &'a str {
        &self.source[self.offset..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn push(&mut self, kind: TokenKind, pos: Pos) {
        self.pending_semi = kind.triggers_semicolon();
        self.tokens.push(Token::new(kind, pos));
    }

    fn line_break(&mut self, pos: Pos) {
        if self.pending_semi {
            self.tokens.push(Token::new(TokenKind::Semi { implicit: true }, pos));
            self.pending_semi = false;
        }
    }

    // ========================================================================
    // Comments
    // ========================================================================

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// A block comment spanning lines acts like a newline.
    fn skip_block_comment(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos();
        self.advance();
        self.advance();
        let mut newline_at = None;
        loop {
            match self.peek() {
                None => return Err(SyntaxError::new("comment not terminated", start)),
                Some('*') if self.peek_next() == Some('/') => {
                    self.advance();
                    self.advance();
                    break;
                }
                Some('\n') => {
                    newline_at.get_or_insert(self.pos());
                    self.advance();
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        if let Some(pos) = newline_at {
            self.line_break(pos);
        }
        Ok(())
    }

    // ========================================================================
    // Tokens
    // ========================================================================

    fn scan_token(&mut self, c: char) -> Result<(), SyntaxError> {
        let start = self.pos();

        if c.is_alphabetic() || c == '_' {
            let word = self.take_while(|c| c.is_alphanumeric() || c == '_');
            let kind = match Keyword::from_ident(&word) {
                Some(kw) => TokenKind::Keyword(kw),
                None => TokenKind::Ident(word),
            };
            self.push(kind, start);
            return Ok(());
        }

        if c.is_ascii_digit() || (c == '.' && self.peek_next().is_some_and(|n| n.is_ascii_digit())) {
            let kind = self.scan_number();
            self.push(kind, start);
            return Ok(());
        }

        match c {
            '"' => {
                let lit = self.scan_quoted('"', start)?;
                self.push(TokenKind::Str(lit), start);
            }
            '\'' => {
                let lit = self.scan_quoted('\'', start)?;
                self.push(TokenKind::Char(lit), start);
            }
            '`' => {
                let lit = self.scan_raw_string(start)?;
                self.push(TokenKind::Str(lit), start);
            }
            ';' => {
                self.advance();
                self.push(TokenKind::Semi { implicit: false }, start);
            }
            _ => {
                let rest = self.rest();
                let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) else {
                    return Err(SyntaxError::new(
                        format!("invalid character {:?}", c),
                        start,
                    ));
                };
                for _ in 0..op.len() {
                    self.advance();
                }
                self.push(TokenKind::Op(op), start);
            }
        }
        Ok(())
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let begin = self.offset;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.advance();
        }
        self.source[begin..self.offset].to_string()
    }

    /// Scans integer, floating-point and imaginary literals.
    ///
    /// Digits are not validated against the base; only the literal's shape matters here.
    fn scan_number(&mut self) -> TokenKind {
        let begin = self.offset;
        let mut is_float = false;

        let hex = self.peek() == Some('0') && matches!(self.peek_next(), Some('x' | 'X'));
        if hex || (self.peek() == Some('0') && matches!(self.peek_next(), Some('b' | 'B' | 'o' | 'O'))) {
            self.advance();
            self.advance();
        }

        let is_digit = |c: char| {
            if hex {
                c.is_ascii_hexdigit() || c == '_'
            } else {
                c.is_ascii_digit() || c == '_'
            }
        };

        self.take_while(is_digit);
        if self.peek() == Some('.') {
            is_float = true;
            self.advance();
            self.take_while(is_digit);
        }

        let exponent = if hex { ['p', 'P'] } else { ['e', 'E'] };
        if self.peek().is_some_and(|c| exponent.contains(&c)) {
            is_float = true;
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            self.take_while(|c| c.is_ascii_digit() || c == '_');
        }

        let imaginary = self.peek() == Some('i');
        if imaginary {
            self.advance();
        }

        let lit = self.source[begin..self.offset].to_string();
        if imaginary {
            TokenKind::Imag(lit)
        } else if is_float {
            TokenKind::Float(lit)
        } else {
            TokenKind::Int(lit)
        }
    }

    /// Scans an interpreted string or rune literal, keeping its quotes.
    fn scan_quoted(&mut self, quote: char, start: Pos) -> Result<String, SyntaxError> {
        let begin = self.offset;
        self.advance();
        loop {
            match self.advance() {
                None | Some('\n') => {
                    let what = if quote == '"' { "string" } else { "rune" };
                    return Err(SyntaxError::new(format!("{} literal not terminated", what), start));
                }
                Some('\\') => {
                    self.advance();
                }
                Some(c) if c == quote => break,
                Some(_) => {}
            }
        }
        Ok(self.source[begin..self.offset].to_string())
    }

    fn scan_raw_string(&mut self, start: Pos) -> Result<String, SyntaxError> {
        let begin = self.offset;
        self.advance();
        loop {
            match self.advance() {
                None => return Err(SyntaxError::new("raw string literal not terminated", start)),
                Some('`') => break,
                Some(_) => {}
            }
        }
        Ok(self.source[begin..self.offset].to_string())
    }
}

/// Convenience wrapper around [`Lexer::tokenize`].
pub fn tokenize(source: &str) -> Result<Vec<Token>, SyntaxError> {
    Lexer::new(source).tokenize()
}
