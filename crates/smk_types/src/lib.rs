//! Core data types and codec primitives for transcoding between
//! uncompressed BGR video and the Smacker v2 (SMK2) container.
//!
//! # Layers
//!
//! - [`bitstream`]: LSB-first bit reader/writer.
//! - [`huffman`]: 8-bit and 16-bit canonical Huffman trees, the latter with
//!   an MRU escape cache.
//! - [`palette`]: the 256-entry palette delta codec.
//! - [`block`]: the 4x4 block model and run-length chainer.
//! - [`smk`]: the SMK2 container format built on the layers above.
//! - [`frame_io`]: the frame source/sink traits that decouple this crate
//!   from any particular container on the other end.
//!
//! # Examples
//!
//! ```rust
//! use smk_types::smk::Encoder;
//! use smk_types::frame_io::FrameSink;
//!
//! let mut encoder = Encoder::new(4, 4, 15).unwrap();
//! encoder.encode_frame(&[0u8; 4 * 4 * 3]).unwrap();
//! let bytes = encoder.finish().unwrap();
//! assert_eq!(&bytes[0..4], b"SMK2");
//! ```

pub mod bitstream;
pub mod block;
pub mod error;
pub mod frame_io;
pub mod huffman;
pub mod palette;
pub mod smk;

pub use error::{Error, Result};
