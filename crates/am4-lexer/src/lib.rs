//! am4 lexer: converts assembly source into positioned tokens.
use am4_syntax::error::{error_at, ErrorKind, Result, Warning};
use am4_syntax::token::{Token, TokenKind};
use am4_syntax::{truncate_operand, OPERAND_MAX, OPERAND_MIN};

/// Longest run of non-whitespace characters accepted as one token.
pub const MAX_TOKEN_LEN: usize = 254;

/// Character scanner that splits source into whitespace-separated runs and
/// classifies each run.
pub struct Lexer {
    src: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
    warnings: Vec<Warning>,
}

impl Lexer {
    /// Create a new lexer over the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            src: input.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
            warnings: Vec::new(),
        }
    }

    /// Non-fatal diagnostics collected by [`Lexer::tokenize`].
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }
    fn peek_next(&self) -> Option<char> {
        self.src.get(self.pos + 1).copied()
    }
    fn advance(&mut self) -> Option<char> {
        let ch = self.src.get(self.pos).copied();
        if let Some(c) = ch {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        ch
    }

    fn at_comment(&self) -> bool {
        self.peek() == Some('/') && self.peek_next() == Some('/')
    }

    fn skip_blanks(&mut self) {
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    // Stops before the newline so it is still emitted.
    fn skip_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn read_run(&mut self) -> Result<String> {
        let start_line = self.line;
        let start_col = self.col;
        let mut s = String::new();
        let mut len = 0usize;
        while let Some(c) = self.peek() {
            if matches!(c, ' ' | '\t' | '\r' | '\n') || self.at_comment() {
                break;
            }
            len += 1;
            if len > MAX_TOKEN_LEN {
                return error_at(
                    ErrorKind::Lex,
                    start_line,
                    start_col,
                    format!("found a token more than {} characters long", MAX_TOKEN_LEN),
                );
            }
            s.push(c);
            self.advance();
        }
        Ok(s)
    }

    fn classify(&mut self, text: &str, line: usize, col: usize) -> Result<TokenKind> {
        if let Some(kind) = TokenKind::keyword(text) {
            return Ok(kind);
        }
        if let Some(name) = text.strip_suffix(':') {
            if is_name(name) {
                return Ok(TokenKind::Label(name.to_string()));
            }
            return error_at(ErrorKind::Lex, line, col, format!("malformed label `{}`", text));
        }
        if is_int_literal(text) {
            let value: i32 = match text.parse() {
                Ok(v) => v,
                Err(_) => {
                    return error_at(
                        ErrorKind::Lex,
                        line,
                        col,
                        format!("integer literal `{}` does not fit in 32 bits", text),
                    )
                }
            };
            if !(OPERAND_MIN..=OPERAND_MAX).contains(&value) {
                self.warnings.push(Warning::new(
                    format!(
                        "integer literal {} is outside the 24-bit operand range [{}, {}] and will be truncated to {}",
                        value,
                        OPERAND_MIN,
                        OPERAND_MAX,
                        truncate_operand(value)
                    ),
                    line,
                    col,
                ));
            }
            return Ok(TokenKind::Int(value));
        }
        match text {
            "true" => return Ok(TokenKind::Bool(true)),
            "false" => return Ok(TokenKind::Bool(false)),
            _ => {}
        }
        if is_name(text) {
            return Ok(TokenKind::Ident(text.to_string()));
        }
        error_at(ErrorKind::Lex, line, col, format!("could not parse token `{}`", text))
    }

    /// Tokenize the entire input. Every line that holds a statement ends with
    /// a `Newline` token, including a final line without a trailing `\n`.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens: Vec<Token> = Vec::new();
        loop {
            self.skip_blanks();
            let line = self.line;
            let col = self.col;
            match self.peek() {
                None => {
                    if tokens.last().map_or(false, |t| t.kind != TokenKind::Newline) {
                        tokens.push(Token {
                            kind: TokenKind::Newline,
                            line,
                            col,
                        });
                    }
                    break;
                }
                Some('\n') => {
                    self.advance();
                    tokens.push(Token {
                        kind: TokenKind::Newline,
                        line,
                        col,
                    });
                }
                Some('/') if self.peek_next() == Some('/') => self.skip_comment(),
                Some(_) => {
                    let text = self.read_run()?;
                    let kind = self.classify(&text, line, col)?;
                    tokens.push(Token { kind, line, col });
                }
            }
        }
        Ok(tokens)
    }
}

fn is_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_int_literal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(input);
        lexer
            .tokenize()
            .expect("Lexing should succeed")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            kinds("noop jmp jeqz push add sub mul eq lt le gt ge land lor lneg fetch store printc printv\n"),
            vec![
                TokenKind::Noop,
                TokenKind::Jmp,
                TokenKind::Jeqz,
                TokenKind::Push,
                TokenKind::Add,
                TokenKind::Sub,
                TokenKind::Mul,
                TokenKind::Eq,
                TokenKind::Lt,
                TokenKind::Le,
                TokenKind::Gt,
                TokenKind::Ge,
                TokenKind::LAnd,
                TokenKind::LOr,
                TokenKind::LNeg,
                TokenKind::Fetch,
                TokenKind::Store,
                TokenKind::PrintC,
                TokenKind::PrintV,
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn test_literals_and_names() {
        assert_eq!(
            kinds("push -12\npush true\nstore my_var2\nloop:\n"),
            vec![
                TokenKind::Push,
                TokenKind::Int(-12),
                TokenKind::Newline,
                TokenKind::Push,
                TokenKind::Bool(true),
                TokenKind::Newline,
                TokenKind::Store,
                TokenKind::Ident("my_var2".to_string()),
                TokenKind::Newline,
                TokenKind::Label("loop".to_string()),
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn test_positions() {
        let mut lexer = Lexer::new("push 1\n\t  add\n");
        let tokens = lexer.tokenize().unwrap();
        let pos: Vec<(usize, usize)> = tokens.iter().map(|t| (t.line, t.col)).collect();
        assert_eq!(pos, vec![(1, 1), (1, 6), (1, 7), (2, 4), (2, 7)]);
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            kinds("// header\npush 1 // trailing\npush 2//glued\n"),
            vec![
                TokenKind::Newline,
                TokenKind::Push,
                TokenKind::Int(1),
                TokenKind::Newline,
                TokenKind::Push,
                TokenKind::Int(2),
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn test_missing_final_newline_is_synthesized() {
        assert_eq!(kinds("add"), vec![TokenKind::Add, TokenKind::Newline]);
        assert_eq!(kinds(""), vec![]);
        assert_eq!(kinds("add\r\n"), vec![TokenKind::Add, TokenKind::Newline]);
    }

    #[test]
    fn test_truncation_warning() {
        let mut lexer = Lexer::new("push 8388607\npush 8388608\npush -8388609\n");
        let tokens = lexer.tokenize().unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Int(8_388_607));
        assert_eq!(tokens[4].kind, TokenKind::Int(8_388_608));
        let warnings = lexer.warnings();
        assert_eq!(warnings.len(), 2);
        assert_eq!((warnings[0].line, warnings[0].col), (2, 6));
        assert!(warnings[0].msg.contains("truncated to -8388608"));
        assert!(warnings[1].msg.contains("truncated to 8388607"));
    }

    #[test]
    fn test_errors() {
        let err = Lexer::new("push 1\n  pu$h 2\n").tokenize().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Lex);
        assert_eq!((err.line, err.col), (Some(2), Some(3)));
        assert!(err.msg.contains("pu$h"));

        let err = Lexer::new(":\n").tokenize().unwrap_err();
        assert!(err.msg.contains("malformed label"));

        let err = Lexer::new("bad-label:\n").tokenize().unwrap_err();
        assert!(err.msg.contains("malformed label"));

        let err = Lexer::new("push 99999999999\n").tokenize().unwrap_err();
        assert!(err.msg.contains("does not fit"));

        let long = "a".repeat(MAX_TOKEN_LEN + 1);
        let err = Lexer::new(&long).tokenize().unwrap_err();
        assert!(err.msg.contains("more than 254"));
    }

    #[test]
    fn test_other_whitespace_stays_in_the_token() {
        let err = Lexer::new("push\u{a0}1\n").tokenize().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Lex);
        assert_eq!((err.line, err.col), (Some(1), Some(1)));
        assert_eq!(err.msg, "could not parse token `push\u{a0}1`");

        let err = Lexer::new("push 1\u{b}\n").tokenize().unwrap_err();
        assert_eq!((err.line, err.col), (Some(1), Some(6)));
        assert_eq!(err.msg, "could not parse token `1\u{b}`");

        let err = Lexer::new("add\u{c}\n").tokenize().unwrap_err();
        assert!(err.msg.contains("add\u{c}"));
    }
}
