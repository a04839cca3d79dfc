//! Lowering of While statements to am4 assembly text.

use std::collections::HashSet;

use am4_syntax::error::{error, ErrorKind, Result};
use am4_syntax::{Opcode, TokenKind};

use crate::ast::{Arith, Bool, Stmt};

/// Emits am4 source for one While program.
///
/// Labels are plain counters (`0:`, `1:`, ...), and jumps name them with the
/// trailing colon (`jeqz 0:`), which the am4 parser accepts as a label
/// reference. Every variable becomes an am4 identifier of the same name.
#[derive(Debug, Default)]
pub struct CodeGenerator {
    out: String,
    next_label: usize,
    assigned: HashSet<String>,
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates the whole program. The epilogue leaves `fetch result` on
    /// the stack when a result variable is named, otherwise `push 0`.
    pub fn generate(mut self, program: &Stmt, result: Option<&str>) -> Result<String> {
        collect_assigned(program, &mut self.assigned);
        self.stmt(program)?;
        match result {
            Some(name) => {
                self.check_read(name)?;
                self.op_arg(Opcode::Fetch, name);
            }
            None => self.op_arg(Opcode::Push, 0),
        }
        Ok(self.out)
    }

    fn label(&mut self) -> String {
        let label = format!("{}:", self.next_label);
        self.next_label += 1;
        label
    }

    fn op(&mut self, opcode: Opcode) {
        self.out += &format!("    {}\n", opcode);
    }

    fn op_arg(&mut self, opcode: Opcode, arg: impl std::fmt::Display) {
        self.out += &format!("    {} {}\n", opcode, arg);
    }

    fn place(&mut self, label: &str) {
        self.out += &format!("{}\n", label);
    }

    fn check_name(name: &str) -> Result<()> {
        if TokenKind::keyword(name).is_some() {
            return error(
                ErrorKind::Syntax,
                format!("variable name `{}` is an am4 mnemonic", name),
            );
        }
        Ok(())
    }

    fn check_read(&self, name: &str) -> Result<()> {
        Self::check_name(name)?;
        if !self.assigned.contains(name) {
            return error(
                ErrorKind::UnresolvedSymbol,
                format!("variable `{}` is read but never assigned", name),
            );
        }
        Ok(())
    }

    fn stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::Assign { name, value } => {
                Self::check_name(name)?;
                self.arith(value)?;
                self.op_arg(Opcode::Store, name);
            }
            Stmt::Skip => self.op(Opcode::Noop),
            Stmt::Seq(stmts) => {
                for s in stmts {
                    self.stmt(s)?;
                }
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let else_label = self.label();
                let end_label = self.label();
                self.bool(cond)?;
                self.op_arg(Opcode::Jeqz, &else_label);
                self.stmt(then_branch)?;
                self.op_arg(Opcode::Jmp, &end_label);
                self.place(&else_label);
                self.stmt(else_branch)?;
                self.place(&end_label);
            }
            Stmt::While { cond, body } => {
                let cond_label = self.label();
                let end_label = self.label();
                self.place(&cond_label);
                self.bool(cond)?;
                self.op_arg(Opcode::Jeqz, &end_label);
                self.stmt(body)?;
                self.op_arg(Opcode::Jmp, &cond_label);
                self.place(&end_label);
            }
        }
        Ok(())
    }

    fn arith(&mut self, arith: &Arith) -> Result<()> {
        match arith {
            Arith::Int(n) => self.op_arg(Opcode::Push, n),
            Arith::Var(name) => {
                self.check_read(name)?;
                self.op_arg(Opcode::Fetch, name);
            }
            Arith::Binary { lhs, op, rhs } => {
                self.arith(lhs)?;
                self.arith(rhs)?;
                self.op(op.opcode());
            }
        }
        Ok(())
    }

    fn bool(&mut self, b: &Bool) -> Result<()> {
        match b {
            Bool::True => self.op_arg(Opcode::Push, true),
            Bool::False => self.op_arg(Opcode::Push, false),
            Bool::Not(inner) => {
                self.bool(inner)?;
                self.op(Opcode::LNeg);
            }
            Bool::Cmp { lhs, op, rhs } => {
                self.arith(lhs)?;
                self.arith(rhs)?;
                self.op(op.opcode());
            }
            Bool::Logic { lhs, op, rhs } => {
                self.bool(lhs)?;
                self.bool(rhs)?;
                self.op(op.opcode());
            }
        }
        Ok(())
    }
}

// A variable counts as defined if any assignment names it, wherever it sits,
// matching the am4 rule that one `store` anywhere defines an identifier.
fn collect_assigned(stmt: &Stmt, out: &mut HashSet<String>) {
    match stmt {
        Stmt::Assign { name, .. } => {
            out.insert(name.clone());
        }
        Stmt::Skip => {}
        Stmt::Seq(stmts) => stmts.iter().for_each(|s| collect_assigned(s, out)),
        Stmt::If {
            then_branch,
            else_branch,
            ..
        } => {
            collect_assigned(then_branch, out);
            collect_assigned(else_branch, out);
        }
        Stmt::While { body, .. } => collect_assigned(body, out),
    }
}
