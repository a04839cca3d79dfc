//! Token definitions for am4 assembly source.
//!
//! Tokens are the smallest meaningful units of an am4 program. The
//! vocabulary is small and line-oriented:
//!
//! - **Operations**: one keyword per instruction (`push`, `add`, `jmp`, ...)
//! - **Labels**: a name followed by a colon (`loop:`)
//! - **Identifiers**: variable names used by `fetch`, `store` and `printv`
//! - **Literals**: signed integers (`42`, `-7`) and booleans (`true`, `false`)
//! - **Newline**: every physical line ends with one, it terminates statements
//!
//! # Examples
//!
//! ```rust
//! use am4_syntax::{Token, TokenKind};
//!
//! let push = Token { kind: TokenKind::Push, line: 1, col: 5 };
//! let lit = Token { kind: TokenKind::Int(42), line: 1, col: 10 };
//!
//! assert_eq!(push.kind.describe(), "push");
//! assert_eq!(lit.kind.describe(), "42");
//! ```

use std::fmt;

use crate::ast::Opcode;

/// Token types produced by the am4 lexer.
///
/// Operation keywords carry no payload. Structural tokens carry their
/// semantic content: the name of a label or identifier, or the value of a
/// literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // === Control ===
    /// `noop`
    Noop,
    /// `jmp <label>`
    Jmp,
    /// `jeqz <label>`
    Jeqz,

    // === Stack ===
    /// `push <int|bool>`
    Push,

    // === Arithmetic ===
    Add,
    Sub,
    Mul,

    // === Comparison ===
    Eq,
    Lt,
    Le,
    Gt,
    Ge,

    // === Boolean ===
    LAnd,
    LOr,
    LNeg,

    // === Memory ===
    /// `fetch <ident>`
    Fetch,
    /// `store <ident>`
    Store,

    // === Output ===
    /// `printc <int|bool>`
    PrintC,
    /// `printv <ident>`
    PrintV,

    // === Structural ===
    /// A label declaration, without its trailing colon.
    ///
    /// Source `loop:` produces `Label("loop")`.
    Label(String),

    /// A variable or label name used as an operand.
    Ident(String),

    /// A signed integer literal. Values outside the 24-bit operand range
    /// are kept intact here; truncation happens during encoding.
    Int(i32),

    /// `true` or `false`
    Bool(bool),

    /// End of a physical line.
    Newline,
}

impl TokenKind {
    /// Maps an operation keyword to its token, if `word` is one.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "noop" => TokenKind::Noop,
            "jmp" => TokenKind::Jmp,
            "jeqz" => TokenKind::Jeqz,
            "push" => TokenKind::Push,
            "add" => TokenKind::Add,
            "sub" => TokenKind::Sub,
            "mul" => TokenKind::Mul,
            "eq" => TokenKind::Eq,
            "lt" => TokenKind::Lt,
            "le" => TokenKind::Le,
            "gt" => TokenKind::Gt,
            "ge" => TokenKind::Ge,
            "land" => TokenKind::LAnd,
            "lor" => TokenKind::LOr,
            "lneg" => TokenKind::LNeg,
            "fetch" => TokenKind::Fetch,
            "store" => TokenKind::Store,
            "printc" => TokenKind::PrintC,
            "printv" => TokenKind::PrintV,
            _ => return None,
        };
        Some(kind)
    }

    /// The operation a keyword token stands for; `None` for structural tokens.
    pub fn opcode(&self) -> Option<Opcode> {
        let op = match self {
            TokenKind::Noop => Opcode::Noop,
            TokenKind::Jmp => Opcode::Jmp,
            TokenKind::Jeqz => Opcode::Jeqz,
            TokenKind::Push => Opcode::Push,
            TokenKind::Add => Opcode::Add,
            TokenKind::Sub => Opcode::Sub,
            TokenKind::Mul => Opcode::Mul,
            TokenKind::Eq => Opcode::Eq,
            TokenKind::Lt => Opcode::Lt,
            TokenKind::Le => Opcode::Le,
            TokenKind::Gt => Opcode::Gt,
            TokenKind::Ge => Opcode::Ge,
            TokenKind::LAnd => Opcode::LAnd,
            TokenKind::LOr => Opcode::LOr,
            TokenKind::LNeg => Opcode::LNeg,
            TokenKind::Fetch => Opcode::Fetch,
            TokenKind::Store => Opcode::Store,
            TokenKind::PrintC => Opcode::PrintC,
            TokenKind::PrintV => Opcode::PrintV,
            TokenKind::Label(_)
            | TokenKind::Ident(_)
            | TokenKind::Int(_)
            | TokenKind::Bool(_)
            | TokenKind::Newline => return None,
        };
        Some(op)
    }

    /// Source-like rendering of the token, used in error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Noop => "noop".into(),
            TokenKind::Jmp => "jmp".into(),
            TokenKind::Jeqz => "jeqz".into(),
            TokenKind::Push => "push".into(),
            TokenKind::Add => "add".into(),
            TokenKind::Sub => "sub".into(),
            TokenKind::Mul => "mul".into(),
            TokenKind::Eq => "eq".into(),
            TokenKind::Lt => "lt".into(),
            TokenKind::Le => "le".into(),
            TokenKind::Gt => "gt".into(),
            TokenKind::Ge => "ge".into(),
            TokenKind::LAnd => "land".into(),
            TokenKind::LOr => "lor".into(),
            TokenKind::LNeg => "lneg".into(),
            TokenKind::Fetch => "fetch".into(),
            TokenKind::Store => "store".into(),
            TokenKind::PrintC => "printc".into(),
            TokenKind::PrintV => "printv".into(),
            TokenKind::Label(name) => format!("{}:", name),
            TokenKind::Ident(name) => name.clone(),
            TokenKind::Int(n) => n.to_string(),
            TokenKind::Bool(b) => b.to_string(),
            TokenKind::Newline => "\\n".into(),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// A token with its source location.
///
/// `line` and `col` are 1-based and point at the first character of the
/// token; they are reported verbatim in lexer and parser errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The type and semantic content of this token
    pub kind: TokenKind,

    /// Line number in the source file (1-based)
    pub line: usize,

    /// Column number in the source file (1-based)
    pub col: usize,
}
