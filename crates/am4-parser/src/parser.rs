//! Single-pass statement parser that builds the instruction list and both
//! symbol tables.

use am4_syntax::ast::{Instruction, Opcode, Operand, Program};
use am4_syntax::error::{error_at, ErrorKind, Result};
use am4_syntax::token::{Token, TokenKind};

/// Consumes a token stream once, left to right.
///
/// Labels are recorded at the address of the next emitted instruction and
/// `store` allocates identifier slots as a side effect. Jump targets and
/// variable names stay symbolic; the encoder resolves them.
pub struct Parser {
    tokens: std::vec::IntoIter<Token>,
    // position of the last token taken, for errors at end of input
    line: usize,
    col: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            line: 1,
            col: 1,
        }
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.next()?;
        self.line = tok.line;
        self.col = tok.col;
        Some(tok)
    }

    fn expect_newline(&mut self, pattern: &str) -> Result<()> {
        match self.next() {
            Some(Token { kind: TokenKind::Newline, .. }) => Ok(()),
            Some(tok) => error_at(
                ErrorKind::Syntax,
                tok.line,
                tok.col,
                format!("`{}` not followed by a newline, found `{}`", pattern, tok.kind),
            ),
            None => error_at(
                ErrorKind::Syntax,
                self.line,
                self.col,
                format!("`{}` not followed by a newline", pattern),
            ),
        }
    }

    /// Reads the operand token an opcode requires.
    fn operand(&mut self, opcode: Opcode, line: usize, col: usize) -> Result<Operand> {
        if !opcode.has_operand() {
            return Ok(Operand::None);
        }
        let expected = match opcode {
            Opcode::Push | Opcode::PrintC => "an int or bool",
            Opcode::Jmp | Opcode::Jeqz => "a label",
            _ => "an identifier",
        };
        let tok = match self.next() {
            Some(tok) => tok,
            None => {
                return error_at(
                    ErrorKind::Syntax,
                    line,
                    col,
                    format!("`{}` not followed by {}", opcode, expected),
                )
            }
        };
        match (opcode, tok.kind) {
            (Opcode::Push | Opcode::PrintC, TokenKind::Int(n)) => Ok(Operand::Int(n)),
            (Opcode::Push | Opcode::PrintC, TokenKind::Bool(b)) => Ok(Operand::Bool(b)),
            // `jmp end` and `jmp end:` name the same label
            (Opcode::Jmp | Opcode::Jeqz, TokenKind::Ident(name) | TokenKind::Label(name)) => {
                Ok(Operand::Label(name))
            }
            (Opcode::Fetch | Opcode::Store | Opcode::PrintV, TokenKind::Ident(name)) => Ok(Operand::Ident(name)),
            (_, other) => error_at(
                ErrorKind::Syntax,
                tok.line,
                tok.col,
                format!("`{}` not followed by {}, found `{}`", opcode, expected, other),
            ),
        }
    }

    /// Parses the whole token stream.
    pub fn parse_program(&mut self) -> Result<Program> {
        let mut program = Program::default();
        while let Some(tok) = self.next() {
            let Token { kind, line, col } = tok;
            let opcode = match kind.opcode() {
                Some(op) => op,
                None => match kind {
                    TokenKind::Label(name) => {
                        self.expect_newline(&format!("{}:", name))?;
                        let addr = program.instructions.len();
                        if let Some(prev) = program.labels.declare(name.clone(), addr) {
                            return error_at(
                                ErrorKind::Syntax,
                                line,
                                col,
                                format!("label `{}` already declared at instruction {}", name, prev),
                            );
                        }
                        continue;
                    }
                    TokenKind::Ident(name) => {
                        return error_at(
                            ErrorKind::Syntax,
                            line,
                            col,
                            format!(
                                "unexpected identifier `{}`; identifiers are only valid after fetch, store or printv",
                                name
                            ),
                        );
                    }
                    TokenKind::Newline => continue,
                    literal => {
                        return error_at(
                            ErrorKind::Syntax,
                            line,
                            col,
                            format!("unexpected literal `{}`; literals are only valid after push or printc", literal),
                        );
                    }
                },
            };

            let operand = self.operand(opcode, line, col)?;
            let pattern = match opcode {
                Opcode::Push | Opcode::PrintC => format!("{} <int|bool>", opcode),
                Opcode::Jmp | Opcode::Jeqz => format!("{} <label>", opcode),
                Opcode::Fetch | Opcode::Store | Opcode::PrintV => format!("{} <ident>", opcode),
                _ => opcode.to_string(),
            };
            self.expect_newline(&pattern)?;

            if let (Opcode::Store, Operand::Ident(name)) = (opcode, &operand) {
                program.idents.intern(name.clone());
            }
            program.instructions.push(Instruction::new(opcode, operand, line, col));
        }
        Ok(program)
    }
}
