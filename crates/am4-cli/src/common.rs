use owo_colors::OwoColorize;

use am4_syntax::error::{Error, ErrorKind, Warning};

fn print_excerpt(source: &str, line: usize, col: usize, note: &str, warning: bool) {
    let src_line = match line.checked_sub(1).and_then(|i| source.lines().nth(i)) {
        Some(l) => l,
        None => return,
    };
    let line_num_str = format!("{:3} | ", line);
    eprintln!("     |");
    eprintln!("{}{}", line_num_str.bright_black(), src_line);

    let mut marker = String::new();
    marker.push_str(&" ".repeat(line_num_str.len()));
    if col > 1 {
        marker.push_str(&" ".repeat(col - 1));
    }
    marker.push('^');
    marker.push(' ');
    marker.push_str(note);
    if warning {
        eprintln!("{}", marker.yellow());
    } else {
        eprintln!("{}", marker.red());
    }
    eprintln!("     |");
}

/// Prints `heading: message`, the offending source line when the error has a
/// location and `source` is known, and a contextual hint.
pub fn render_error(heading: &str, source: Option<&str>, err: &Error) {
    eprintln!("{}: {}", heading.red().bold(), err.msg.red());
    if let (Some(line), Some(col)) = (err.line, err.col) {
        eprintln!("  --> line {}, column {}", line, col);
        if let Some(src) = source {
            print_excerpt(src, line, col, "error here", false);
        }
    }
    provide_error_suggestions(err);
}

pub fn render_warning(source: &str, warning: &Warning) {
    eprintln!("{}: {}", "warning".yellow().bold(), warning.msg.yellow());
    eprintln!("  --> line {}, column {}", warning.line, warning.col);
    print_excerpt(source, warning.line, warning.col, "truncated here", true);
}

/// One-line summary shown by `--verbose`.
pub fn render_note(msg: &str) {
    println!("{}", msg.dimmed());
}

/// A hint for `err`, plus an optional example or detail line.
pub fn suggestion(err: &Error) -> Option<(&'static str, Option<&'static str>)> {
    let msg = err.msg.as_str();
    match err.kind {
        ErrorKind::Lex if msg.contains("does not fit") => Some((
            "Help: integer literals must fit in 32 bits, and only 24 bits reach the operand field.",
            Some("Operands range from -8388608 to 8388607"),
        )),
        ErrorKind::Lex if msg.contains("malformed label") => Some((
            "Help: a label is a name followed directly by a colon.",
            Some("Example: loop:"),
        )),
        ErrorKind::Lex if msg.contains("characters long") => {
            Some(("Help: tokens are limited to 254 characters.", None))
        }
        ErrorKind::Lex => Some((
            "Help: a token is an opcode, a `name:` label, an integer, true/false or an identifier.",
            None,
        )),
        ErrorKind::Syntax if msg.contains("already declared") => {
            Some(("Help: every label name may be declared only once.", None))
        }
        ErrorKind::Syntax if msg.contains("not followed by a newline") => Some((
            "Help: each line holds at most one instruction or one label.",
            None,
        )),
        ErrorKind::Syntax if msg.contains("unexpected") => Some((
            "Help: every line must start with an opcode or a label.",
            Some("Example: push 42"),
        )),
        ErrorKind::Syntax => None,
        ErrorKind::UnresolvedSymbol if msg.contains("label") => Some((
            "Help: declare the jump target as `name:` on its own line.",
            Some("Example: jmp end ... end:"),
        )),
        ErrorKind::UnresolvedSymbol => Some((
            "Help: a variable only exists if some `store` in the program names it.",
            Some("Example: push 0 / store x / fetch x"),
        )),
        ErrorKind::StackUnderflow => Some((
            "Help: an instruction popped more values than were pushed.",
            Some("The program must also leave its result on the stack"),
        )),
        ErrorKind::StackOverflow => Some((
            "Help: the operand stack is full.",
            Some("Raise the limit with --stack-size or AM4_STACK_SIZE"),
        )),
        ErrorKind::AddressOutOfRange => Some((
            "Help: an address operand points outside the program's memory.",
            None,
        )),
        ErrorKind::IllegalInstruction | ErrorKind::InvalidBinary => Some((
            "Help: the file does not look like an am4 binary.",
            Some("Reassemble it with: am4asm program.am4 -o program.bin"),
        )),
        ErrorKind::Io => Some((
            "Help: check that the file exists and you have permission to access it.",
            None,
        )),
    }
}

pub fn provide_error_suggestions(err: &Error) {
    if let Some((help, detail)) = suggestion(err) {
        eprintln!("{}", help.yellow());
        if let Some(detail) = detail {
            eprintln!("    {}", detail.bright_black());
        }
    }
}
