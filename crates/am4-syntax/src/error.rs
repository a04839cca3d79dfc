//! Error and warning types shared by every stage of the am4 toolchain.
//!
//! All stages (lexer, parser, encoder, binary codec and virtual machine)
//! report failures through the same [`Error`] type. An error carries a
//! human-readable message, an [`ErrorKind`] naming which class of failure
//! occurred, and an optional source location.
//!
//! Every error is fatal for the stage that raised it: there is no recovery
//! and no multi-error reporting. The only non-fatal diagnostic is a
//! [`Warning`], which the lexer emits for integer literals that will not fit
//! the 24-bit operand field.
//!
//! # Examples
//!
//! ```rust
//! use am4_syntax::error::{error, error_at, Error, ErrorKind, Result};
//!
//! fn lookup(name: &str) -> Result<u32> {
//!     error(ErrorKind::UnresolvedSymbol, format!("`{}` is not a valid label", name))
//! }
//!
//! fn scan(line: usize, col: usize) -> Result<()> {
//!     error_at(ErrorKind::Lex, line, col, "could not parse token `$`")
//! }
//!
//! assert!(lookup("end").is_err());
//! let err = scan(3, 7).unwrap_err();
//! assert_eq!(err.kind, ErrorKind::Lex);
//! assert_eq!(err.to_string(), "could not parse token `$` at 3:7");
//! ```

use std::fmt;
use std::io;

/// The class of failure an [`Error`] reports.
///
/// The set is closed: every failure the toolchain can produce maps onto one
/// of these kinds, which is what callers match on (the CLI uses it for the
/// heading of its diagnostics and for contextual help).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unrecognized token, over-length token or malformed label.
    Lex,
    /// Wrong token after an opcode, missing newline, misplaced identifier,
    /// duplicate label.
    Syntax,
    /// A label or identifier that is referenced but never defined.
    UnresolvedSymbol,
    /// Push onto a full operand stack.
    StackOverflow,
    /// Pop from an empty operand stack.
    StackUnderflow,
    /// An opcode byte outside the instruction set.
    IllegalInstruction,
    /// A memory access or jump target outside the program's memory.
    AddressOutOfRange,
    /// A binary file whose header or length is inconsistent.
    InvalidBinary,
    /// The source or binary file could not be read or written.
    Io,
}

impl ErrorKind {
    /// Short lowercase label used when rendering diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Lex => "lex error",
            ErrorKind::Syntax => "syntax error",
            ErrorKind::UnresolvedSymbol => "unresolved symbol",
            ErrorKind::StackOverflow => "stack overflow",
            ErrorKind::StackUnderflow => "stack underflow",
            ErrorKind::IllegalInstruction => "illegal instruction",
            ErrorKind::AddressOutOfRange => "address out of range",
            ErrorKind::InvalidBinary => "invalid binary",
            ErrorKind::Io => "io error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An error that occurred while assembling or running an am4 program.
///
/// # Fields
///
/// - `kind`: the class of failure
/// - `msg`: human-readable description
/// - `line`: optional 1-based line number in the source file
/// - `col`: optional 1-based column number in the source file
///
/// Lexer, parser and encoder errors carry a location. Binary-format and VM
/// errors never do: the source is gone by then, so their message names the
/// operation and the raw value instead.
///
/// ```rust
/// use am4_syntax::{Error, ErrorKind};
///
/// let err = Error::with_span(ErrorKind::Syntax, "`add` not followed by a newline", 4, 1);
/// assert_eq!(err.to_string(), "`add` not followed by a newline at 4:1");
///
/// let err = Error::new(ErrorKind::StackUnderflow, "stack underflow in add");
/// assert_eq!(err.to_string(), "stack underflow in add");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// Class of failure
    pub kind: ErrorKind,

    /// Human-readable error message
    pub msg: String,

    /// Optional line number in source file (1-based)
    pub line: Option<usize>,

    /// Optional column number in source file (1-based)
    pub col: Option<usize>,
}

impl Error {
    /// Creates a new error without source location.
    pub fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            msg: msg.into(),
            line: None,
            col: None,
        }
    }

    /// Creates a new error located at `line:col` (both 1-based).
    pub fn with_span(kind: ErrorKind, msg: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            kind,
            msg: msg.into(),
            line: Some(line),
            col: Some(col),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(l), Some(c)) = (self.line, self.col) {
            write!(f, "{} at {}:{}", self.msg, l, c)
        } else {
            write!(f, "{}", self.msg)
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::new(ErrorKind::Io, e.to_string())
    }
}

/// A specialized `Result` type for am4 operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Shorthand for `Err(Error::new(kind, msg))`.
pub fn error<T>(kind: ErrorKind, msg: impl Into<String>) -> Result<T> {
    Err(Error::new(kind, msg))
}

/// Shorthand for `Err(Error::with_span(kind, msg, line, col))`.
pub fn error_at<T>(kind: ErrorKind, line: usize, col: usize, msg: impl Into<String>) -> Result<T> {
    Err(Error::with_span(kind, msg, line, col))
}

/// A non-fatal diagnostic attached to a source location.
///
/// Assembly continues after a warning is recorded; the caller decides how
/// (and whether) to show it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub msg: String,
    pub line: usize,
    pub col: usize,
}

impl Warning {
    pub fn new(msg: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            msg: msg.into(),
            line,
            col,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}:{}", self.msg, self.line, self.col)
    }
}
