//! Decoding of a binary's text region back into readable instructions.

use std::fmt;

use am4_syntax::Opcode;

use crate::binary::Binary;
use crate::word::decode_word;

/// One instruction word as the VM would see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedInstruction {
    /// Absolute address in the unified address space.
    pub addr: usize,
    pub word: u32,
    /// The opcode byte, or the raw byte if it is not part of the instruction set.
    pub opcode: Result<Opcode, u8>,
    /// Sign-extended operand field.
    pub operand: i32,
}

impl fmt::Display for DecodedInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>6}  {:08x}  ", self.addr, self.word)?;
        match self.opcode {
            Ok(op) if op.has_operand() => write!(f, "{} {}", op, self.operand),
            Ok(op) => write!(f, "{}", op),
            Err(byte) => write!(f, "<illegal 0x{:02x}>", byte),
        }
    }
}

/// Decodes every word of the text region, in address order.
pub fn disassemble(binary: &Binary) -> Vec<DecodedInstruction> {
    let base = binary.ident_count() as usize;
    binary
        .text()
        .iter()
        .enumerate()
        .map(|(i, &word)| {
            let (byte, operand) = decode_word(word);
            DecodedInstruction {
                addr: base + i,
                word,
                opcode: Opcode::try_from(byte),
                operand,
            }
        })
        .collect()
}

/// Human-readable dump: header summary, data slots, then the decoded text.
pub fn listing(binary: &Binary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "; identifiers: {}, total size: {} words\n",
        binary.ident_count(),
        binary.total_size()
    ));
    for slot in 0..binary.ident_count() as usize {
        out.push_str(&format!("{:>6}  {:08x}  .data\n", slot, binary.image()[slot]));
    }
    for ins in disassemble(binary) {
        out.push_str(&ins.to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::encode_word;

    #[test]
    fn decodes_text_region_with_absolute_addresses() {
        let bin = Binary::new(
            2,
            vec![
                0,
                0,
                encode_word(Opcode::Push.code(), -4),
                encode_word(Opcode::Jmp.code(), 2),
                encode_word(0xee, 0),
            ],
        )
        .unwrap();
        let decoded = disassemble(&bin);
        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded[0].addr, 2);
        assert_eq!(decoded[0].opcode, Ok(Opcode::Push));
        assert_eq!(decoded[0].operand, -4);
        assert_eq!(decoded[1].to_string(), "     3  01000002  jmp 2");
        assert_eq!(decoded[2].opcode, Err(0xee));
        assert!(decoded[2].to_string().ends_with("<illegal 0xee>"));
    }

    #[test]
    fn listing_shows_header_and_data() {
        let bin = Binary::new(1, vec![0, encode_word(Opcode::Add.code(), 0)]).unwrap();
        let text = listing(&bin);
        assert!(text.starts_with("; identifiers: 1, total size: 2 words\n"));
        assert!(text.contains("     0  00000000  .data\n"));
        assert!(text.contains("     1  20000000  add\n"));
    }
}
