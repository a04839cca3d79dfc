//! Compiler from the While language to am4 assembly.
//!
//! The output is plain am4 source, ready for `am4asm`.

pub mod ast;
pub mod codegen;
pub mod lexer;
pub mod parser;

pub use codegen::CodeGenerator;
pub use lexer::{tokenize, WhileToken};
pub use parser::Parser;

use am4_syntax::error::Result;

/// Compiles While source to am4 source. With `result`, the compiled program
/// halts with that variable's value on the stack; otherwise with 0.
pub fn compile(src: &str, result: Option<&str>) -> Result<String> {
    let tokens = tokenize(src)?;
    let program = Parser::new(tokens).parse_program()?;
    CodeGenerator::new().generate(&program, result)
}
