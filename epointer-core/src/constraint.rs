//! Build constraint evaluation (`//go:build`, `// +build`, file name suffixes).
//!
//! Decides whether a file belongs to the compilation unit for a given tag
//! selection. Mirrors the Go toolchain's rules closely enough for package
//! loading; unknown tags are simply unsatisfied.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

/// Operating systems recognised in file name suffixes.
const KNOWN_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux",
    "nacl", "netbsd", "openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

/// Architectures recognised in file name suffixes.
const KNOWN_ARCH: &[&str] = &[
    "386", "amd64", "amd64p32", "arm", "armbe", "arm64", "arm64be", "loong64", "mips", "mipsle",
    "mips64", "mips64le", "mips64p32", "mips64p32le", "ppc", "ppc64", "ppc64le", "riscv",
    "riscv64", "s390", "s390x", "sparc", "sparc64", "wasm",
];

const UNIX_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "linux",
    "netbsd", "openbsd", "solaris",
];

/// Highest `go1.N` release tag considered satisfied.
const GO_RELEASE_MINOR: u32 = 24;

fn go_build_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^//go:build\s+(.+?)\s*$").expect("valid regex"))
}

fn plus_build_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^//\s*\+build\s+(.+?)\s*$").expect("valid regex"))
}

/// A parsed build constraint expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Tag(String),
    Not(Box<Constraint>),
    And(Box<Constraint>, Box<Constraint>),
    Or(Box<Constraint>, Box<Constraint>),
}

impl Constraint {
    pub fn eval(&self, ctx: &BuildContext) -> bool {
        match self {
            Self::Tag(tag) => ctx.has_tag(tag),
            Self::Not(inner) => !inner.eval(ctx),
            Self::And(a, b) => a.eval(ctx) && b.eval(ctx),
            Self::Or(a, b) => a.eval(ctx) || b.eval(ctx),
        }
    }

    /// Parses a `//go:build` expression (`||`, `&&`, `!`, parentheses).
    pub fn parse(expr: &str) -> Result<Self, String> {
        let tokens = lex_constraint(expr)?;
        let mut parser = ConstraintParser { tokens, pos: 0 };
        let parsed = parser.or_expr()?;
        if parser.pos != parser.tokens.len() {
            return Err(format!("unexpected `{}` in build constraint", parser.tokens[parser.pos]));
        }
        Ok(parsed)
    }

    /// Parses the argument list of one legacy `// +build` line.
    ///
    /// Space-separated options are OR'ed, comma-separated terms AND'ed.
    pub fn parse_plus_build(line: &str) -> Result<Self, String> {
        let mut options = Vec::new();
        for option in line.split_whitespace() {
            let mut terms = Vec::new();
            for term in option.split(',') {
                let (negated, tag) = match term.strip_prefix('!') {
                    Some(rest) => (true, rest),
                    None => (false, term),
                };
                if tag.is_empty() || !tag.chars().all(is_tag_char) {
                    return Err(format!("invalid +build term `{}`", term));
                }
                let leaf = Self::Tag(tag.to_string());
                terms.push(if negated { Self::Not(Box::new(leaf)) } else { leaf });
            }
            options.push(fold(terms, Self::And));
        }
        if options.is_empty() {
            return Err("empty +build line".to_string());
        }
        Ok(fold(options, Self::Or))
    }
}

fn fold(mut items: Vec<Constraint>, join: fn(Box<Constraint>, Box<Constraint>) -> Constraint) -> Constraint {
    let first = items.remove(0);
    items
        .into_iter()
        .fold(first, |acc, next| join(Box::new(acc), Box::new(next)))
}

fn is_tag_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

fn lex_constraint(expr: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut chars = expr.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '(' | ')' | '!' => {
                chars.next();
                tokens.push(c.to_string());
            }
            '&' | '|' => {
                chars.next();
                if chars.next() != Some(c) {
                    return Err(format!("expected `{0}{0}` in build constraint", c));
                }
                tokens.push(format!("{0}{0}", c));
            }
            c if is_tag_char(c) => {
                let mut tag = String::new();
                while let Some(&c) = chars.peek() {
                    if !is_tag_char(c) {
                        break;
                    }
                    tag.push(c);
                    chars.next();
                }
                tokens.push(tag);
            }
            other => return Err(format!("invalid character {:?} in build constraint", other)),
        }
    }
    Ok(tokens)
}

struct ConstraintParser {
    tokens: Vec<String>,
    pos: usize,
}

impl ConstraintParser {
    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn or_expr(&mut self) -> Result<Constraint, String> {
        let mut lhs = self.and_expr()?;
        while self.peek() == Some("||") {
            self.pos += 1;
            lhs = Constraint::Or(Box::new(lhs), Box::new(self.and_expr()?));
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<Constraint, String> {
        let mut lhs = self.not_expr()?;
        while self.peek() == Some("&&") {
            self.pos += 1;
            lhs = Constraint::And(Box::new(lhs), Box::new(self.not_expr()?));
        }
        Ok(lhs)
    }

    fn not_expr(&mut self) -> Result<Constraint, String> {
        match self.peek() {
            Some("!") => {
                self.pos += 1;
                Ok(Constraint::Not(Box::new(self.not_expr()?)))
            }
            Some("(") => {
                self.pos += 1;
                let inner = self.or_expr()?;
                if self.peek() != Some(")") {
                    return Err("missing `)` in build constraint".to_string());
                }
                self.pos += 1;
                Ok(inner)
            }
            Some(tok) if tok.chars().all(is_tag_char) => {
                let tag = tok.to_string();
                self.pos += 1;
                Ok(Constraint::Tag(tag))
            }
            Some(tok) => Err(format!("unexpected `{}` in build constraint", tok)),
            None => Err("unexpected end of build constraint".to_string()),
        }
    }
}

/// The set of satisfied build tags for one load.
#[derive(Debug, Clone)]
pub struct BuildContext {
    goos: String,
    goarch: String,
    tags: HashSet<String>,
}

impl BuildContext {
    /// Context for an explicit target platform plus user tags.
    pub fn new(goos: &str, goarch: &str, user_tags: &[String]) -> Self {
        let mut tags: HashSet<String> = user_tags
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        tags.insert(goos.to_string());
        tags.insert(goarch.to_string());
        tags.insert("gc".to_string());
        if UNIX_OS.contains(&goos) {
            tags.insert("unix".to_string());
        }
        // GOOS values that imply another.
        match goos {
            "android" => {
                tags.insert("linux".to_string());
            }
            "illumos" => {
                tags.insert("solaris".to_string());
            }
            "ios" => {
                tags.insert("darwin".to_string());
            }
            _ => {}
        }
        for minor in 1..=GO_RELEASE_MINOR {
            tags.insert(format!("go1.{}", minor));
        }
        Self {
            goos: goos.to_string(),
            goarch: goarch.to_string(),
            tags,
        }
    }

    /// Context for the host platform plus user tags.
    ///
    /// Cgo counts as enabled, matching a native build: files importing `"C"`
    /// and files constrained by `cgo` are both part of the unit.
    pub fn host(user_tags: &[String]) -> Self {
        let mut ctx = Self::new(host_goos(), host_goarch(), user_tags);
        ctx.tags.insert("cgo".to_string());
        ctx
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Applies the `name_GOOS_GOARCH.go` convention.
    pub fn matches_file_name(&self, file_name: &str) -> bool {
        let stem = file_name.strip_suffix(".go").unwrap_or(file_name);
        let Some(idx) = stem.find('_') else {
            return true;
        };
        let parts: Vec<&str> = stem[idx..].split('_').collect();
        let n = parts.len();
        let os_ok = |os: &str| os == self.goos || self.has_tag(os);
        let arch_ok = |arch: &str| arch == self.goarch || self.has_tag(arch);
        if n >= 2 && KNOWN_OS.contains(&parts[n - 2]) && KNOWN_ARCH.contains(&parts[n - 1]) {
            return os_ok(parts[n - 2]) && arch_ok(parts[n - 1]);
        }
        if let Some(last) = parts.last() {
            if KNOWN_OS.contains(last) {
                return os_ok(*last);
            }
            if KNOWN_ARCH.contains(last) {
                return arch_ok(*last);
            }
        }
        true
    }

    /// Evaluates the header build constraints of a file.
    ///
    /// A `//go:build` line takes precedence over `// +build` lines. Malformed
    /// constraint lines are reported as errors.
    pub fn matches_content(&self, content: &str) -> Result<bool, String> {
        let lines = header_comment_lines(content);

        for line in &lines {
            if let Some(caps) = go_build_re().captures(line) {
                let expr = Constraint::parse(&caps[1])?;
                return Ok(expr.eval(self));
            }
        }

        for line in &lines {
            if let Some(caps) = plus_build_re().captures(line) {
                if !Constraint::parse_plus_build(&caps[1])?.eval(self) {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Whether a file with this name and content is part of the build.
    pub fn includes(&self, file_name: &str, content: &str) -> Result<bool, String> {
        if !self.matches_file_name(file_name) {
            return Ok(false);
        }
        self.matches_content(content)
    }
}

/// `//` comment lines that precede the package clause.
fn header_comment_lines(content: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut in_block = false;
    for raw in content.lines() {
        let line = raw.trim();
        if in_block {
            if line.contains("*/") {
                in_block = false;
            }
            continue;
        }
        if line.is_empty() {
            continue;
        }
        if line.starts_with("//") {
            lines.push(line);
            continue;
        }
        if line.starts_with("/*") {
            in_block = !line.contains("*/");
            continue;
        }
        break;
    }
    lines
}

fn host_goos() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

fn host_goarch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "powerpc" => "ppc",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        "wasm32" => "wasm",
        other => other,
    }
}
