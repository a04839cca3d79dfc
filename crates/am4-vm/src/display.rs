//! Formatting of VM state for execution traces.

use am4_syntax::Opcode;

pub fn format_stack(stack: &[i32]) -> String {
    let mut s = String::from("[");
    for (i, v) in stack.iter().enumerate() {
        if i > 0 {
            s.push_str(", ");
        }
        s.push_str(&v.to_string());
    }
    s.push(']');
    s
}

/// One trace line: address, decoded instruction and the stack before dispatch.
pub fn format_step(pc: usize, opcode: Opcode, operand: i32, stack: &[i32]) -> String {
    let ins = if opcode.has_operand() {
        format!("{} {}", opcode, operand)
    } else {
        opcode.to_string()
    };
    format!("{:>6}  {:<16} stack={}", pc, ins, format_stack(stack))
}
