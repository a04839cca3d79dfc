//! Lowering of parsed programs into binary images.

use am4_bytecode::{encode_word, Binary};
use am4_syntax::ast::{Instruction, Operand, Program};
use am4_syntax::error::{Error, ErrorKind, Result};

/// Resolves symbolic operands and packs each instruction into a word.
///
/// Variable slots occupy addresses `0..n` (n = number of identifiers) and
/// instruction `k` lives at address `k + n`, so every operand that names a
/// location is an offset into the same flat memory.
#[derive(Debug, Default, Clone, Copy)]
pub struct Encoder;

impl Encoder {
    pub fn new() -> Self {
        Self
    }

    pub fn encode(&self, program: &Program) -> Result<Binary> {
        let ident_count = program.idents.len();

        // data region, one zeroed word per variable
        let mut image = vec![0u32; ident_count];
        image.reserve(program.instructions.len());

        for ins in &program.instructions {
            let operand = resolve_operand(ins, program)?;
            image.push(encode_word(ins.opcode.code(), operand));
        }

        let ident_count = u32::try_from(ident_count)
            .map_err(|_| Error::new(ErrorKind::InvalidBinary, "too many identifiers"))?;
        Binary::new(ident_count, image)
    }
}

fn resolve_operand(ins: &Instruction, program: &Program) -> Result<i32> {
    match &ins.operand {
        Operand::None => Ok(0),
        Operand::Int(n) => Ok(*n),
        Operand::Bool(b) => Ok(i32::from(*b)),
        Operand::Ident(name) => match program.idents.resolve(name) {
            Some(slot) => Ok(slot as i32),
            None => Err(Error::with_span(
                ErrorKind::UnresolvedSymbol,
                format!("`{}` is not a valid identifier (it is never stored to)", name),
                ins.line,
                ins.col,
            )),
        },
        Operand::Label(name) => match program.labels.resolve(name) {
            Some(addr) => Ok((addr + program.idents.len()) as i32),
            None => Err(Error::with_span(
                ErrorKind::UnresolvedSymbol,
                format!("`{}` is not a valid label", name),
                ins.line,
                ins.col,
            )),
        },
    }
}
