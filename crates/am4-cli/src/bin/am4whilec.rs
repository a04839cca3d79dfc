use std::fs;
use std::path::PathBuf;

use clap::Parser;

use am4_cli::{read_source, render_error, render_note};
use am4_syntax::error::{Error, ErrorKind};

#[derive(Parser, Debug)]
#[command(name = "am4whilec", version, about = "Compile a While program to am4 assembly")]
struct Cli {
    /// While source file
    input: PathBuf,

    /// Where to write the am4 source
    #[arg(short = 'o', long = "out", default_value = "out.am4")]
    out: PathBuf,

    /// Variable whose final value the program halts with
    #[arg(short = 'r', long = "result", value_name = "VAR")]
    result: Option<String>,

    /// Print a summary after compiling
    #[arg(short = 'v', long = "verbose", default_value_t = false)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let src = match read_source(&cli.input) {
        Ok(s) => s,
        Err(e) => {
            render_error("error", None, &e);
            std::process::exit(1);
        }
    };

    let asm = match am4_whilec::compile(&src, cli.result.as_deref()) {
        Ok(asm) => asm,
        Err(e) => {
            render_error("Compile error", Some(&src), &e);
            std::process::exit(1);
        }
    };

    if let Err(e) = fs::write(&cli.out, &asm) {
        let e = Error::new(
            ErrorKind::Io,
            format!("Failed to write {}: {}", cli.out.display(), e),
        );
        render_error("error", None, &e);
        std::process::exit(1);
    }
    if cli.verbose {
        render_note(&format!(
            "wrote {} lines of am4 to {}",
            asm.lines().count(),
            cli.out.display()
        ));
    }
}
