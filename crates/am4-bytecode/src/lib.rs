//! Binary format for am4 programs.
//!
//! This crate defines how an instruction is packed into a 32-bit word, the
//! binary image the assembler emits and the VM loads, its little-endian
//! file encoding, and a disassembler over the text region.

pub mod binary;
pub mod disasm;
pub mod word;

pub use binary::{Binary, HEADER_WORDS};
pub use disasm::{disassemble, listing, DecodedInstruction};
pub use word::{decode_word, encode_word};
