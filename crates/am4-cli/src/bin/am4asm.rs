use std::path::PathBuf;

use clap::Parser;

use am4_cli::{read_source, render_error, render_note, render_warning};
use am4_encoder::Encoder;
use am4_lexer::Lexer;
use am4_parser::Parser as Am4Parser;

#[derive(Parser, Debug)]
#[command(name = "am4asm", version, about = "Assemble an am4 source file into a binary")]
struct Cli {
    /// Source file to assemble
    input: PathBuf,

    /// Where to write the binary
    #[arg(short = 'o', long = "out", default_value = "out.bin")]
    out: PathBuf,

    /// Print a summary of each stage
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

    let mut lexer = Lexer::new(&src);
    let lexed = lexer.tokenize();
    // warnings seen before a lex error are still reported
    for warning in lexer.take_warnings() {
        render_warning(&src, &warning);
    }
    let tokens = match lexed {
        Ok(t) => t,
        Err(e) => {
            render_error("Lex error", Some(&src), &e);
            std::process::exit(1);
        }
    };
    if cli.verbose {
        render_note(&format!("lexed {} tokens", tokens.len()));
    }

    let mut parser = Am4Parser::new(tokens);
    let program = match parser.parse_program() {
        Ok(p) => p,
        Err(e) => {
            render_error("Parse error", Some(&src), &e);
            std::process::exit(1);
        }
    };
    if cli.verbose {
        render_note(&format!(
            "parsed {} instructions, {} labels, {} identifiers",
            program.instructions.len(),
            program.labels.len(),
            program.idents.len()
        ));
        if !program.labels.is_empty() {
            render_note("labels:");
        }
        for (name, addr) in program.labels.sorted() {
            render_note(&format!("  {}: {}", name, addr + program.idents.len()));
        }
        if !program.idents.is_empty() {
            render_note("identifiers:");
        }
        for (slot, name) in program.idents.iter() {
            render_note(&format!("  {} -> {}", name, slot));
        }
    }

    let binary = match Encoder::new().encode(&program) {
        Ok(b) => b,
        Err(e) => {
            render_error("Encode error", Some(&src), &e);
            std::process::exit(1);
        }
    };

    if let Err(e) = binary.write_file(&cli.out) {
        render_error("error", None, &e);
        std::process::exit(1);
    }
    if cli.verbose {
        render_note(&format!(
            "wrote {} words ({} identifiers) to {}",
            binary.total_size(),
            binary.ident_count(),
            cli.out.display()
        ));
    }
}
