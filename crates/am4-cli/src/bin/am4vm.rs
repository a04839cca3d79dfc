use std::path::PathBuf;

use clap::Parser;

use am4_bytecode::Binary;
use am4_cli::render_error;
use am4_vm::{Vm, VmConfig, DEFAULT_STACK_CAPACITY};

#[derive(Parser, Debug)]
#[command(name = "am4vm", version, about = "Run an assembled am4 binary")]
struct Cli {
    /// Binary produced by am4asm
    input: PathBuf,

    /// Maximum operand stack depth
    #[arg(long = "stack-size", env = "AM4_STACK_SIZE", default_value_t = DEFAULT_STACK_CAPACITY)]
    stack_size: usize,

    /// Trace every instruction to stderr
    #[arg(long = "trace", default_value_t = false)]
    trace: bool,
}

fn main() {
    let cli = Cli::parse();

    let binary = match Binary::read_file(&cli.input) {
        Ok(b) => b,
        Err(e) => {
            render_error("Load error", None, &e);
            std::process::exit(1);
        }
    };

    let config = VmConfig {
        stack_capacity: cli.stack_size,
        trace: cli.trace,
    };
    let mut vm = Vm::new(config);
    match vm.run(&binary) {
        Ok(value) => println!("Result = {}", value),
        Err(e) => {
            render_error("VM error", None, &e);
            std::process::exit(1);
        }
    }
}
