//! Packing of one instruction into a 32-bit word.
//!
//! ```text
//!  31        24 23                              0
//! +------------+---------------------------------+
//! |   opcode   |    operand (24-bit, signed)     |
//! +------------+---------------------------------+
//! ```

pub const OPCODE_SHIFT: u32 = 24;
pub const OPERAND_MASK: u32 = 0x00ff_ffff;
pub const SIGN_BIT: u32 = 0x0080_0000;
pub const SIGN_EXTEND: u32 = 0xff00_0000;

/// Packs an opcode byte and an operand. Bits of `operand` above bit 23 are
/// dropped.
pub fn encode_word(opcode: u8, operand: i32) -> u32 {
    ((opcode as u32) << OPCODE_SHIFT) | (operand as u32 & OPERAND_MASK)
}

/// Splits a word into its opcode byte and sign-extended operand.
pub fn decode_word(word: u32) -> (u8, i32) {
    let opcode = (word >> OPCODE_SHIFT) as u8;
    let mut operand = word & OPERAND_MASK;
    if operand & SIGN_BIT != 0 {
        operand |= SIGN_EXTEND;
    }
    (opcode, operand as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use am4_syntax::{OPERAND_MAX, OPERAND_MIN};

    #[test]
    fn packs_opcode_into_high_byte() {
        assert_eq!(encode_word(0x10, 5), 0x1000_0005);
        assert_eq!(encode_word(0xc1, 0), 0xc100_0000);
    }

    #[test]
    fn negative_operands_sign_extend() {
        let w = encode_word(0x10, -1);
        assert_eq!(w, 0x10ff_ffff);
        assert_eq!(decode_word(w), (0x10, -1));
        assert_eq!(decode_word(encode_word(0x10, OPERAND_MIN)), (0x10, OPERAND_MIN));
        assert_eq!(decode_word(encode_word(0x10, OPERAND_MAX)), (0x10, OPERAND_MAX));
    }

    #[test]
    fn out_of_range_operands_wrap() {
        assert_eq!(decode_word(encode_word(0x10, OPERAND_MAX + 1)).1, OPERAND_MIN);
        assert_eq!(decode_word(encode_word(0x10, 1 << 24)).1, 0);
        // high operand bits never leak into the opcode
        assert_eq!(decode_word(encode_word(0x20, -1)).0, 0x20);
    }
}
