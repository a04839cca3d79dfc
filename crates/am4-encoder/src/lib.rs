//! am4 encoder: parsed program -> binary image.

pub mod encoder;

pub use encoder::Encoder;
