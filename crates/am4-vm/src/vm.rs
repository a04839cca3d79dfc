//! am4 VM core.

use std::io::{self, Write};

use am4_bytecode::{decode_word, Binary};
use am4_syntax::error::{error, Error, ErrorKind, Result};
use am4_syntax::Opcode;

use crate::display::format_step;
use crate::stack::Stack;

pub const DEFAULT_STACK_CAPACITY: usize = 256;

/// Execution settings, passed explicitly to [`Vm::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmConfig {
    /// Maximum operand stack depth.
    pub stack_capacity: usize,
    /// Log every dispatched instruction to stderr.
    pub trace: bool,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            stack_capacity: DEFAULT_STACK_CAPACITY,
            trace: false,
        }
    }
}

/// Stack machine over a flat word memory.
///
/// `printc`/`printv` output goes to the writer `W` (stdout by default).
pub struct Vm<W: Write = io::Stdout> {
    config: VmConfig,
    out: W,
}

impl Vm<io::Stdout> {
    pub fn new(config: VmConfig) -> Self {
        Self::with_output(config, io::stdout())
    }
}

impl<W: Write> Vm<W> {
    pub fn with_output(config: VmConfig, out: W) -> Self {
        Self { config, out }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Executes `binary` until the program counter runs off the end of
    /// memory, then pops and returns the top of the stack.
    pub fn run(&mut self, binary: &Binary) -> Result<i32> {
        let mut memory: Vec<i32> = binary.image().iter().map(|&w| w as i32).collect();
        let total = memory.len();
        let mut stack = Stack::new(self.config.stack_capacity);
        let mut pc = binary.ident_count() as usize;

        while pc < total {
            let (byte, operand) = decode_word(memory[pc] as u32);
            let opcode = Opcode::try_from(byte).map_err(|b| {
                Error::new(
                    ErrorKind::IllegalInstruction,
                    format!("unknown operation 0x{:02x} at address {}", b, pc),
                )
            })?;
            if self.config.trace {
                eprintln!("{}", format_step(pc, opcode, operand, stack.as_slice()));
            }
            pc += 1;

            match opcode {
                Opcode::Noop => {}
                Opcode::Jmp => pc = jump_target("jmp", operand)?,
                Opcode::Jeqz => {
                    let v = stack.pop("jeqz")?;
                    if v == 0 {
                        pc = jump_target("jeqz", operand)?;
                    }
                }
                Opcode::Push => stack.push(operand, "push")?,
                Opcode::Add => binary_op(&mut stack, "add", |a, b| a.wrapping_add(b))?,
                Opcode::Sub => binary_op(&mut stack, "sub", |a, b| a.wrapping_sub(b))?,
                Opcode::Mul => binary_op(&mut stack, "mul", |a, b| a.wrapping_mul(b))?,
                Opcode::Eq => binary_op(&mut stack, "eq", |a, b| i32::from(a == b))?,
                Opcode::Lt => binary_op(&mut stack, "lt", |a, b| i32::from(a < b))?,
                Opcode::Le => binary_op(&mut stack, "le", |a, b| i32::from(a <= b))?,
                Opcode::Gt => binary_op(&mut stack, "gt", |a, b| i32::from(a > b))?,
                Opcode::Ge => binary_op(&mut stack, "ge", |a, b| i32::from(a >= b))?,
                // both operands are already on the stack, so no short-circuit
                Opcode::LAnd => binary_op(&mut stack, "land", |a, b| i32::from(a != 0 && b != 0))?,
                Opcode::LOr => binary_op(&mut stack, "lor", |a, b| i32::from(a != 0 || b != 0))?,
                Opcode::LNeg => {
                    let v = stack.pop("lneg")?;
                    stack.push(i32::from(v == 0), "lneg")?;
                }
                Opcode::Fetch => {
                    let addr = data_address("fetch", operand, total)?;
                    stack.push(memory[addr], "fetch")?;
                }
                Opcode::Store => {
                    let addr = data_address("store", operand, total)?;
                    memory[addr] = stack.pop("store")?;
                }
                Opcode::PrintC => writeln!(self.out, "{}", operand)?,
                Opcode::PrintV => {
                    let addr = data_address("printv", operand, total)?;
                    writeln!(self.out, "{}", memory[addr])?;
                }
            }
        }

        self.out.flush()?;
        stack
            .pop("end of program")
            .map_err(|_| Error::new(ErrorKind::StackUnderflow, "stack underflow: program ended with an empty stack"))
    }
}

fn binary_op(stack: &mut Stack, op: &str, f: impl Fn(i32, i32) -> i32) -> Result<()> {
    let v2 = stack.pop(op)?;
    let v1 = stack.pop(op)?;
    stack.push(f(v1, v2), op)
}

// A target at or past the end of memory simply ends the program.
fn jump_target(op: &str, operand: i32) -> Result<usize> {
    if operand < 0 {
        return error(
            ErrorKind::AddressOutOfRange,
            format!("{} to negative address {}", op, operand),
        );
    }
    Ok(operand as usize)
}

fn data_address(op: &str, operand: i32, total: usize) -> Result<usize> {
    if operand < 0 || operand as usize >= total {
        return error(
            ErrorKind::AddressOutOfRange,
            format!("{} of address {} outside memory of {} words", op, operand, total),
        );
    }
    Ok(operand as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use am4_bytecode::encode_word;

    fn binary(ident_count: u32, code: &[(Opcode, i32)]) -> Binary {
        let mut image = vec![0u32; ident_count as usize];
        image.extend(code.iter().map(|&(op, arg)| encode_word(op.code(), arg)));
        Binary::new(ident_count, image).unwrap()
    }

    fn run(ident_count: u32, code: &[(Opcode, i32)]) -> Result<i32> {
        Vm::with_output(VmConfig::default(), Vec::new()).run(&binary(ident_count, code))
    }

    #[test]
    fn test_vm_arithmetic_operations() {
        let cases = vec![
            (Opcode::Add, 13),
            (Opcode::Sub, 7),
            (Opcode::Mul, 30),
        ];
        for (op, expected) in cases {
            let result = run(0, &[(Opcode::Push, 10), (Opcode::Push, 3), (op, 0)]).unwrap();
            assert_eq!(result, expected, "{}", op);
        }
    }

    #[test]
    fn test_vm_comparison_operations() {
        let cases = vec![
            (4, 4, Opcode::Eq, 1),
            (4, 5, Opcode::Eq, 0),
            (4, 5, Opcode::Lt, 1),
            (5, 4, Opcode::Lt, 0),
            (5, 5, Opcode::Le, 1),
            (6, 5, Opcode::Gt, 1),
            (5, 6, Opcode::Ge, 0),
        ];
        for (a, b, op, expected) in cases {
            let result = run(0, &[(Opcode::Push, a), (Opcode::Push, b), (op, 0)]).unwrap();
            assert_eq!(result, expected, "{} {} {}", a, op, b);
        }
    }

    #[test]
    fn test_vm_boolean_operations() {
        assert_eq!(run(0, &[(Opcode::Push, 2), (Opcode::Push, 0), (Opcode::LAnd, 0)]).unwrap(), 0);
        assert_eq!(run(0, &[(Opcode::Push, 2), (Opcode::Push, -1), (Opcode::LAnd, 0)]).unwrap(), 1);
        assert_eq!(run(0, &[(Opcode::Push, 0), (Opcode::Push, 0), (Opcode::LOr, 0)]).unwrap(), 0);
        assert_eq!(run(0, &[(Opcode::Push, 0), (Opcode::Push, 7), (Opcode::LOr, 0)]).unwrap(), 1);
        assert_eq!(run(0, &[(Opcode::Push, 0), (Opcode::LNeg, 0)]).unwrap(), 1);
        assert_eq!(run(0, &[(Opcode::Push, 9), (Opcode::LNeg, 0)]).unwrap(), 0);
    }

    #[test]
    fn test_vm_memory_shares_address_space() {
        // slot 0 is the variable, the program starts at address 1
        let code = [
            (Opcode::Push, 3),
            (Opcode::Push, 7),
            (Opcode::Store, 0),
            (Opcode::Fetch, 0),
            (Opcode::Add, 0),
        ];
        assert_eq!(run(1, &code).unwrap(), 10);
    }

    #[test]
    fn test_vm_fetch_reads_instruction_words() {
        let result = run(0, &[(Opcode::Fetch, 0)]).unwrap();
        assert_eq!(result as u32, encode_word(Opcode::Fetch.code(), 0));
    }

    #[test]
    fn test_vm_conditional_jumps() {
        // 0: push 0, 1: jeqz 4, 2: push 1, 3: jmp 5, 4: push 2
        let code = [
            (Opcode::Push, 0),
            (Opcode::Jeqz, 4),
            (Opcode::Push, 1),
            (Opcode::Jmp, 5),
            (Opcode::Push, 2),
        ];
        assert_eq!(run(0, &code).unwrap(), 2);

        let code = [
            (Opcode::Push, 1),
            (Opcode::Jeqz, 4),
            (Opcode::Push, 1),
            (Opcode::Jmp, 5),
            (Opcode::Push, 2),
        ];
        assert_eq!(run(0, &code).unwrap(), 1);
    }

    #[test]
    fn test_vm_jump_past_end_terminates() {
        assert_eq!(run(0, &[(Opcode::Push, 4), (Opcode::Jmp, 100), (Opcode::Push, 5)]).unwrap(), 4);
    }

    #[test]
    fn test_vm_negative_operands() {
        assert_eq!(run(0, &[(Opcode::Push, -8_388_608)]).unwrap(), -8_388_608);
        assert_eq!(run(0, &[(Opcode::Push, -2), (Opcode::Push, 3), (Opcode::Mul, 0)]).unwrap(), -6);
    }

    #[test]
    fn test_vm_arithmetic_wraps() {
        // build i32::MAX in memory, then add 1
        let code = [
            (Opcode::Push, 1),
            (Opcode::Store, 0),
            (Opcode::Push, 8_388_607),
            (Opcode::Push, 256),
            (Opcode::Mul, 0),
            (Opcode::Push, 255),
            (Opcode::Add, 0),
            (Opcode::Push, 1),
            (Opcode::Add, 0),
        ];
        assert_eq!(run(1, &code).unwrap(), i32::MIN);
    }

    #[test]
    fn test_vm_print_output() {
        let bin = binary(
            1,
            &[
                (Opcode::PrintC, 42),
                (Opcode::Push, -5),
                (Opcode::Store, 0),
                (Opcode::PrintV, 0),
                (Opcode::Push, 1),
            ],
        );
        let mut vm = Vm::with_output(VmConfig::default(), Vec::new());
        assert_eq!(vm.run(&bin).unwrap(), 1);
        assert_eq!(String::from_utf8(vm.into_output()).unwrap(), "42\n-5\n");
    }

    #[test]
    fn test_vm_stack_underflow() {
        let err = run(0, &[(Opcode::Add, 0)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::StackUnderflow);
        assert!(err.msg.contains("stack underflow in add"));

        let err = run(0, &[(Opcode::Noop, 0)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::StackUnderflow);
        assert!(err.msg.contains("empty stack"));

        let err = run(0, &[]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::StackUnderflow);
    }

    #[test]
    fn test_vm_stack_overflow() {
        let config = VmConfig {
            stack_capacity: 2,
            trace: false,
        };
        let bin = binary(0, &[(Opcode::Push, 1), (Opcode::Push, 2), (Opcode::Push, 3)]);
        let err = Vm::with_output(config, Vec::new()).run(&bin).unwrap_err();
        assert_eq!(err.kind, ErrorKind::StackOverflow);
    }

    #[test]
    fn test_vm_illegal_instruction() {
        let bin = Binary::new(0, vec![encode_word(Opcode::Push.code(), 1), 0xff00_0000]).unwrap();
        let err = Vm::with_output(VmConfig::default(), Vec::new()).run(&bin).unwrap_err();
        assert_eq!(err.kind, ErrorKind::IllegalInstruction);
        assert!(err.msg.contains("0xff at address 1"));
    }

    #[test]
    fn test_vm_address_checks() {
        let err = run(0, &[(Opcode::Fetch, 9)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::AddressOutOfRange);

        let err = run(0, &[(Opcode::Push, 1), (Opcode::Store, -1)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::AddressOutOfRange);

        let err = run(0, &[(Opcode::Jmp, -3)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::AddressOutOfRange);
    }
}
