//! The am4 binary image and its on-disk form.
//!
//! On disk a binary is a sequence of little-endian 32-bit words:
//!
//! ```text
//! [identifier_count][total_size][data x identifier_count][instructions ...]
//! ```
//!
//! where `total_size = identifier_count + instruction_count`. Everything
//! after the two header words is the *image*: the VM's initial memory, with
//! variable slots at the low addresses and instructions above them.

use std::fs;
use std::path::Path;

use am4_syntax::error::{error, Error, ErrorKind, Result};

/// Number of header words preceding the image.
pub const HEADER_WORDS: usize = 2;

const WORD_BYTES: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binary {
    ident_count: u32,
    image: Vec<u32>,
}

impl Binary {
    /// Builds a binary from an identifier count and the full image (data
    /// region followed by text region).
    pub fn new(ident_count: u32, image: Vec<u32>) -> Result<Self> {
        if u32::try_from(image.len()).is_err() {
            return error(
                ErrorKind::InvalidBinary,
                format!("image of {} words does not fit a 32-bit size field", image.len()),
            );
        }
        if (ident_count as usize) > image.len() {
            return error(
                ErrorKind::InvalidBinary,
                format!(
                    "identifier count {} exceeds total size {}",
                    ident_count,
                    image.len()
                ),
            );
        }
        Ok(Self { ident_count, image })
    }

    pub fn ident_count(&self) -> u32 {
        self.ident_count
    }

    /// Identifier slots plus instructions; the length of the image.
    pub fn total_size(&self) -> u32 {
        self.image.len() as u32
    }

    pub fn image(&self) -> &[u32] {
        &self.image
    }

    /// The instruction words only.
    pub fn text(&self) -> &[u32] {
        &self.image[self.ident_count as usize..]
    }

    /// Header followed by image.
    pub fn to_words(&self) -> Vec<u32> {
        let mut words = Vec::with_capacity(HEADER_WORDS + self.image.len());
        words.push(self.ident_count);
        words.push(self.total_size());
        words.extend_from_slice(&self.image);
        words
    }

    pub fn from_words(words: &[u32]) -> Result<Self> {
        if words.len() < HEADER_WORDS {
            return error(
                ErrorKind::InvalidBinary,
                format!("binary has {} words, the header alone needs {}", words.len(), HEADER_WORDS),
            );
        }
        let ident_count = words[0];
        let total_size = words[1];
        let body = &words[HEADER_WORDS..];
        if body.len() != total_size as usize {
            return error(
                ErrorKind::InvalidBinary,
                format!(
                    "header declares {} words but the binary holds {}",
                    total_size,
                    body.len()
                ),
            );
        }
        Binary::new(ident_count, body.to_vec())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_words().iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % WORD_BYTES != 0 {
            return error(
                ErrorKind::InvalidBinary,
                format!("binary length {} is not a multiple of {} bytes", bytes.len(), WORD_BYTES),
            );
        }
        let words: Vec<u32> = bytes
            .chunks_exact(WORD_BYTES)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Binary::from_words(&words)
    }

    pub fn read_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| {
            Error::new(ErrorKind::Io, format!("Failed to read {}: {}", path.display(), e))
        })?;
        Binary::from_bytes(&bytes)
    }

    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_bytes()).map_err(|e| {
            Error::new(ErrorKind::Io, format!("Failed to write {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Binary {
        Binary::new(1, vec![0, 0x1000_0007, 0xc100_0000]).unwrap()
    }

    #[test]
    fn header_precedes_image() {
        assert_eq!(sample().to_words(), vec![1, 3, 0, 0x1000_0007, 0xc100_0000]);
        assert_eq!(sample().text(), &[0x1000_0007, 0xc100_0000]);
    }

    #[test]
    fn bytes_are_little_endian() {
        let bytes = sample().to_bytes();
        assert_eq!(bytes.len(), 20);
        assert_eq!(&bytes[..8], &[1, 0, 0, 0, 3, 0, 0, 0]);
        assert_eq!(&bytes[12..16], &[0x07, 0x00, 0x00, 0x10]);
        assert_eq!(Binary::from_bytes(&bytes).unwrap(), sample());
    }

    #[test]
    fn rejects_inconsistent_headers() {
        let err = Binary::from_bytes(&[1, 2, 3]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidBinary);

        let err = Binary::from_words(&[0]).unwrap_err();
        assert!(err.msg.contains("header"));

        let err = Binary::from_words(&[0, 3, 0x2000_0000]).unwrap_err();
        assert!(err.msg.contains("declares 3 words"));

        let err = Binary::from_words(&[2, 1, 0]).unwrap_err();
        assert!(err.msg.contains("exceeds total size"));
    }

    #[test]
    fn empty_program_is_valid() {
        let b = Binary::from_words(&[0, 0]).unwrap();
        assert_eq!(b.total_size(), 0);
        assert!(b.text().is_empty());
    }

    #[test]
    fn file_round_trip() {
        let dir = std::env::temp_dir().join(format!("am4-bytecode-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sample.bin");
        sample().write_file(&path).unwrap();
        assert_eq!(Binary::read_file(&path).unwrap(), sample());
        fs::remove_dir_all(&dir).unwrap();

        let err = Binary::read_file(dir.join("missing.bin")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Io);
    }
}
