//! While syntax tree.

use am4_syntax::Opcode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
}

impl ArithOp {
    pub fn opcode(self) -> Opcode {
        match self {
            ArithOp::Add => Opcode::Add,
            ArithOp::Sub => Opcode::Sub,
            ArithOp::Mul => Opcode::Mul,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arith {
    Int(i32),
    Var(String),
    Binary {
        lhs: Box<Arith>,
        op: ArithOp,
        rhs: Box<Arith>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    pub fn opcode(self) -> Opcode {
        match self {
            CmpOp::Eq => Opcode::Eq,
            CmpOp::Lt => Opcode::Lt,
            CmpOp::Le => Opcode::Le,
            CmpOp::Gt => Opcode::Gt,
            CmpOp::Ge => Opcode::Ge,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
}

impl LogicOp {
    pub fn opcode(self) -> Opcode {
        match self {
            LogicOp::And => Opcode::LAnd,
            LogicOp::Or => Opcode::LOr,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bool {
    True,
    False,
    Not(Box<Bool>),
    Cmp {
        lhs: Arith,
        op: CmpOp,
        rhs: Arith,
    },
    Logic {
        lhs: Box<Bool>,
        op: LogicOp,
        rhs: Box<Bool>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Assign { name: String, value: Arith },
    Skip,
    /// `s1; s2; ...`, always at least two statements.
    Seq(Vec<Stmt>),
    If {
        cond: Bool,
        then_branch: Box<Stmt>,
        else_branch: Box<Stmt>,
    },
    While { cond: Bool, body: Box<Stmt> },
}
