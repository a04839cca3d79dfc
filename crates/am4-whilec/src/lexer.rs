//! Tokenizer for While source, driven by a `logos` state machine.

use std::fmt;

use logos::Logos;

use am4_syntax::error::{error_at, ErrorKind, Result};

#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"([ \t\r\n\f]+|//[^\n]*)")]
pub enum WhileToken {
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i32>().ok())]
    Int(i32),

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,

    #[token("true")]
    True,
    #[token("false")]
    False,

    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token("<=")]
    Le,
    #[token(">")]
    Gt,
    #[token(">=")]
    Ge,

    #[token("&")]
    And,
    #[token("|")]
    Or,
    #[token("!")]
    Not,

    #[token(":=")]
    Assign,
    #[token(";")]
    Semi,

    #[token("skip")]
    Skip,
    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("do")]
    Do,

    #[regex(r"[A-Za-z][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
}

impl fmt::Display for WhileToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WhileToken::Int(n) => return write!(f, "{}", n),
            WhileToken::Ident(name) => return f.write_str(name),
            WhileToken::Plus => "+",
            WhileToken::Minus => "-",
            WhileToken::Star => "*",
            WhileToken::LParen => "(",
            WhileToken::RParen => ")",
            WhileToken::True => "true",
            WhileToken::False => "false",
            WhileToken::Eq => "=",
            WhileToken::Lt => "<",
            WhileToken::Le => "<=",
            WhileToken::Gt => ">",
            WhileToken::Ge => ">=",
            WhileToken::And => "&",
            WhileToken::Or => "|",
            WhileToken::Not => "!",
            WhileToken::Assign => ":=",
            WhileToken::Semi => ";",
            WhileToken::Skip => "skip",
            WhileToken::If => "if",
            WhileToken::Then => "then",
            WhileToken::Else => "else",
            WhileToken::While => "while",
            WhileToken::Do => "do",
        };
        f.write_str(s)
    }
}

/// A token with its 1-based source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub token: WhileToken,
    pub line: usize,
    pub col: usize,
}

fn position(src: &str, line_starts: &[usize], offset: usize) -> (usize, usize) {
    let line = line_starts.partition_point(|&s| s <= offset);
    let start = line_starts[line - 1];
    (line, src[start..offset].chars().count() + 1)
}

pub fn tokenize(src: &str) -> Result<Vec<Spanned>> {
    let line_starts: Vec<usize> = std::iter::once(0)
        .chain(src.match_indices('\n').map(|(i, _)| i + 1))
        .collect();

    let mut tokens = Vec::new();
    for (token, span) in WhileToken::lexer(src).spanned() {
        let (line, col) = position(src, &line_starts, span.start);
        match token {
            Ok(token) => tokens.push(Spanned { token, line, col }),
            Err(_) => {
                let text = &src[span];
                let msg = if text.bytes().all(|b| b.is_ascii_digit()) {
                    format!("integer literal `{}` does not fit in 32 bits", text)
                } else {
                    format!("could not parse token `{}`", text)
                };
                return error_at(ErrorKind::Lex, line, col, msg);
            }
        }
    }
    Ok(tokens)
}
