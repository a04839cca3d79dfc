//! Recursive-descent parser for While.
//!
//! ```text
//! seq    := stmt (";" stmt)*
//! stmt   := IDENT ":=" arith | "skip" | "(" seq ")"
//!         | "if" bool "then" stmt "else" stmt
//!         | "while" bool "do" stmt
//! arith  := term (("+" | "-") term)*
//! term   := factor ("*" factor)*
//! factor := INT | IDENT | "(" arith ")"
//! bool   := conj ("|" conj)*
//! conj   := neg ("&" neg)*
//! neg    := "!" neg | "true" | "false" | "(" bool ")" | arith CMP arith
//! ```
//!
//! The body of `while` and both branches of `if` are single statements; a
//! parenthesized sequence groups several.

use am4_syntax::error::{error_at, ErrorKind, Result};

use crate::ast::{Arith, ArithOp, Bool, CmpOp, LogicOp, Stmt};
use crate::lexer::{Spanned, WhileToken};

pub struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Spanned>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&WhileToken> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Position of the next token, or of the last one at end of input.
    fn here(&self) -> (usize, usize) {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or((1, 1), |t| (t.line, t.col))
    }

    fn unexpected<T>(&self, expected: &str) -> Result<T> {
        let (line, col) = self.here();
        let found = match self.peek() {
            Some(tok) => format!("`{}`", tok),
            None => "end of input".to_string(),
        };
        error_at(
            ErrorKind::Syntax,
            line,
            col,
            format!("expected {}, found {}", expected, found),
        )
    }

    fn expect(&mut self, token: WhileToken) -> Result<()> {
        if self.peek() == Some(&token) {
            self.advance();
            Ok(())
        } else {
            self.unexpected(&format!("`{}`", token))
        }
    }

    /// Parses a whole program, which must consume every token.
    pub fn parse_program(&mut self) -> Result<Stmt> {
        if self.tokens.is_empty() {
            return error_at(ErrorKind::Syntax, 1, 1, "empty program");
        }
        let program = self.parse_seq()?;
        if self.peek().is_some() {
            return self.unexpected("`;` or end of input");
        }
        Ok(program)
    }

    fn parse_seq(&mut self) -> Result<Stmt> {
        let mut stmts = vec![self.parse_stmt()?];
        while self.peek() == Some(&WhileToken::Semi) {
            self.advance();
            stmts.push(self.parse_stmt()?);
        }
        if stmts.len() == 1 {
            Ok(stmts.remove(0))
        } else {
            Ok(Stmt::Seq(stmts))
        }
    }

    fn parse_stmt(&mut self) -> Result<Stmt> {
        match self.peek().cloned() {
            Some(WhileToken::Ident(name)) => {
                self.advance();
                self.expect(WhileToken::Assign)?;
                let value = self.parse_arith()?;
                Ok(Stmt::Assign { name, value })
            }
            Some(WhileToken::Skip) => {
                self.advance();
                Ok(Stmt::Skip)
            }
            Some(WhileToken::If) => {
                self.advance();
                let cond = self.parse_bool()?;
                self.expect(WhileToken::Then)?;
                let then_branch = Box::new(self.parse_stmt()?);
                self.expect(WhileToken::Else)?;
                let else_branch = Box::new(self.parse_stmt()?);
                Ok(Stmt::If {
                    cond,
                    then_branch,
                    else_branch,
                })
            }
            Some(WhileToken::While) => {
                self.advance();
                let cond = self.parse_bool()?;
                self.expect(WhileToken::Do)?;
                let body = Box::new(self.parse_stmt()?);
                Ok(Stmt::While { cond, body })
            }
            Some(WhileToken::LParen) => {
                self.advance();
                let inner = self.parse_seq()?;
                self.expect(WhileToken::RParen)?;
                Ok(inner)
            }
            _ => self.unexpected("a statement"),
        }
    }

    fn parse_arith(&mut self) -> Result<Arith> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(WhileToken::Plus) => ArithOp::Add,
                Some(WhileToken::Minus) => ArithOp::Sub,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.parse_term()?;
            lhs = Arith::Binary {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            };
        }
    }

    fn parse_term(&mut self) -> Result<Arith> {
        let mut lhs = self.parse_factor()?;
        while self.peek() == Some(&WhileToken::Star) {
            self.advance();
            let rhs = self.parse_factor()?;
            lhs = Arith::Binary {
                lhs: Box::new(lhs),
                op: ArithOp::Mul,
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_factor(&mut self) -> Result<Arith> {
        match self.peek().cloned() {
            Some(WhileToken::Int(n)) => {
                self.advance();
                Ok(Arith::Int(n))
            }
            Some(WhileToken::Ident(name)) => {
                self.advance();
                Ok(Arith::Var(name))
            }
            Some(WhileToken::LParen) => {
                self.advance();
                let inner = self.parse_arith()?;
                self.expect(WhileToken::RParen)?;
                Ok(inner)
            }
            _ => self.unexpected("an integer, a variable or `(`"),
        }
    }

    fn parse_bool(&mut self) -> Result<Bool> {
        let mut lhs = self.parse_conj()?;
        while self.peek() == Some(&WhileToken::Or) {
            self.advance();
            let rhs = self.parse_conj()?;
            lhs = Bool::Logic {
                lhs: Box::new(lhs),
                op: LogicOp::Or,
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_conj(&mut self) -> Result<Bool> {
        let mut lhs = self.parse_neg()?;
        while self.peek() == Some(&WhileToken::And) {
            self.advance();
            let rhs = self.parse_neg()?;
            lhs = Bool::Logic {
                lhs: Box::new(lhs),
                op: LogicOp::And,
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_neg(&mut self) -> Result<Bool> {
        match self.peek() {
            Some(WhileToken::Not) => {
                self.advance();
                Ok(Bool::Not(Box::new(self.parse_neg()?)))
            }
            Some(WhileToken::True) => {
                self.advance();
                Ok(Bool::True)
            }
            Some(WhileToken::False) => {
                self.advance();
                Ok(Bool::False)
            }
            Some(WhileToken::LParen) => {
                // `(` opens either a condition or an arithmetic operand
                let start = self.pos;
                self.advance();
                if let Ok(inner) = self.parse_bool() {
                    if self.peek() == Some(&WhileToken::RParen) {
                        self.advance();
                        return Ok(inner);
                    }
                }
                self.pos = start;
                self.parse_cmp()
            }
            _ => self.parse_cmp(),
        }
    }

    fn parse_cmp(&mut self) -> Result<Bool> {
        let lhs = self.parse_arith()?;
        let op = match self.peek() {
            Some(WhileToken::Eq) => CmpOp::Eq,
            Some(WhileToken::Lt) => CmpOp::Lt,
            Some(WhileToken::Le) => CmpOp::Le,
            Some(WhileToken::Gt) => CmpOp::Gt,
            Some(WhileToken::Ge) => CmpOp::Ge,
            _ => return self.unexpected("a comparison operator"),
        };
        self.advance();
        let rhs = self.parse_arith()?;
        Ok(Bool::Cmp { lhs, op, rhs })
    }
}
