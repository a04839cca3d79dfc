//! Instruction model produced by the parser and consumed by the encoder.

use std::fmt;

use crate::symbols::{IdentTable, LabelTable};

/// Width of the signed operand field of an instruction word.
pub const OPERAND_BITS: u32 = 24;
/// Smallest operand that survives encoding unchanged (`-2^23`).
pub const OPERAND_MIN: i32 = -(1 << (OPERAND_BITS - 1));
/// Largest operand that survives encoding unchanged (`2^23 - 1`).
pub const OPERAND_MAX: i32 = (1 << (OPERAND_BITS - 1)) - 1;

/// Value an operand reads back as after being squeezed into 24 bits.
pub fn truncate_operand(value: i32) -> i32 {
    (value << (32 - OPERAND_BITS)) >> (32 - OPERAND_BITS)
}

/// Operation set of the am4 machine, with its fixed opcode bytes.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Noop = 0x00,

    Jmp = 0x01,
    Jeqz = 0x02,

    Push = 0x10,

    Add = 0x20,
    Sub = 0x30,
    Mul = 0x40,

    Eq = 0xa0,
    Lt = 0xa1,
    Le = 0xa2,
    Gt = 0xa3,
    Ge = 0xa4,

    LAnd = 0xaa,
    LOr = 0xab,
    LNeg = 0xb0,

    Fetch = 0xc0,
    Store = 0xc1,

    PrintC = 0xd0,
    PrintV = 0xd1,
}

impl Opcode {
    pub const ALL: [Opcode; 19] = [
        Opcode::Noop,
        Opcode::Jmp,
        Opcode::Jeqz,
        Opcode::Push,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Eq,
        Opcode::Lt,
        Opcode::Le,
        Opcode::Gt,
        Opcode::Ge,
        Opcode::LAnd,
        Opcode::LOr,
        Opcode::LNeg,
        Opcode::Fetch,
        Opcode::Store,
        Opcode::PrintC,
        Opcode::PrintV,
    ];

    /// The byte stored in bits 31-24 of an instruction word.
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Noop => "noop",
            Opcode::Jmp => "jmp",
            Opcode::Jeqz => "jeqz",
            Opcode::Push => "push",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mul => "mul",
            Opcode::Eq => "eq",
            Opcode::Lt => "lt",
            Opcode::Le => "le",
            Opcode::Gt => "gt",
            Opcode::Ge => "ge",
            Opcode::LAnd => "land",
            Opcode::LOr => "lor",
            Opcode::LNeg => "lneg",
            Opcode::Fetch => "fetch",
            Opcode::Store => "store",
            Opcode::PrintC => "printc",
            Opcode::PrintV => "printv",
        }
    }

    /// Whether the operand field is meaningful for this operation.
    pub fn has_operand(self) -> bool {
        matches!(
            self,
            Opcode::Jmp
                | Opcode::Jeqz
                | Opcode::Push
                | Opcode::Fetch
                | Opcode::Store
                | Opcode::PrintC
                | Opcode::PrintV
        )
    }
}

impl TryFrom<u8> for Opcode {
    type Error = u8;

    /// Decodes an opcode byte; the unknown byte is handed back on failure.
    fn try_from(byte: u8) -> std::result::Result<Self, u8> {
        Opcode::ALL
            .iter()
            .copied()
            .find(|op| op.code() == byte)
            .ok_or(byte)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Operand of an abstract instruction, before address resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    None,
    Int(i32),
    Bool(bool),
    /// Jump target, resolved through the label table.
    Label(String),
    /// Variable, resolved through the identifier table.
    Ident(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::None => Ok(()),
            Operand::Int(n) => write!(f, "{}", n),
            Operand::Bool(b) => write!(f, "{}", b),
            Operand::Label(name) | Operand::Ident(name) => f.write_str(name),
        }
    }
}

/// One emitted statement. `line`/`col` locate the opcode keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operand: Operand,
    pub line: usize,
    pub col: usize,
}

impl Instruction {
    pub fn new(opcode: Opcode, operand: Operand, line: usize, col: usize) -> Self {
        Self { opcode, operand, line, col }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operand {
            Operand::None => write!(f, "{}", self.opcode),
            ref operand => write!(f, "{} {}", self.opcode, operand),
        }
    }
}

/// Parser output: instructions in binary layout order plus both symbol tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub instructions: Vec<Instruction>,
    pub labels: LabelTable,
    pub idents: IdentTable,
}
