use std::path::PathBuf;

use clap::Parser;

use am4_bytecode::{listing, Binary};
use am4_cli::render_error;

#[derive(Parser, Debug)]
#[command(name = "am4dis", version, about = "Print a decoded listing of an am4 binary")]
struct Cli {
    /// Binary produced by am4asm
    input: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    match Binary::read_file(&cli.input) {
        Ok(binary) => print!("{}", listing(&binary)),
        Err(e) => {
            render_error("Load error", None, &e);
            std::process::exit(1);
        }
    }
}
