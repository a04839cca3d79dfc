//! Shared plumbing for the `am4asm`, `am4vm`, `am4dis` and `am4whilec` binaries.

pub mod common;

use std::fs;
use std::path::Path;

use am4_syntax::error::{Error, ErrorKind, Result};

pub use common::{provide_error_suggestions, render_error, render_note, render_warning};

pub fn read_source(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::new(
            ErrorKind::Io,
            format!("File not found: {}", path.display()),
        ));
    }
    fs::read_to_string(path)
        .map_err(|e| Error::new(ErrorKind::Io, format!("Failed to read {}: {}", path.display(), e)))
}
