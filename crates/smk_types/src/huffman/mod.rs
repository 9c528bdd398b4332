//! Huffman coding layer: the 8-bit codec ([`h8`]) and the 16-bit codec
//! ([`h16`]) built on top of it.

mod build;
pub mod h16;
pub mod h8;

pub use h16::{H16Builder, H16Codes, H16Tree};
pub use h8::{H8Builder, H8Codes, H8Tree};
