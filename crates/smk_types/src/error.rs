//! Error types shared by the bitstream, Huffman, palette, block and frame
//! layers.

use thiserror::Error;

/// Result alias used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while reading or writing an SMK2 stream.
#[derive(Debug, Error)]
pub enum Error {
    /// Header magic or an embedded four-byte tag did not match what was expected.
    #[error("bad signature: expected {expected:?}, found {found:?}")]
    BadSignature {
        /// The tag that should have been present.
        expected: &'static str,
        /// The tag actually read.
        found: String,
    },

    /// Non-zero flags, non-zero audio flag bits, or a non-`vids` stream type.
    #[error("unsupported flag: {0}")]
    UnsupportedFlag(String),

    /// Width or height is not a multiple of 4.
    #[error("bad dimension: {width}x{height} (both must be divisible by 4)")]
    BadDimension {
        /// The offending width.
        width: u32,
        /// The offending height.
        height: u32,
    },

    /// bpp != 24 or compression != 0 in an AVI `strf` chunk.
    #[error("bad pixel format: {0}")]
    BadPixelFormat(String),

    /// An H8/H16 tree's leading presence bit was absent.
    #[error("missing huffman tree presence bit")]
    MissingTree,

    /// An H8/H16 tree's trailing framing bit, or internal structure, was malformed.
    #[error("corrupt huffman tree")]
    CorruptTree,

    /// Fewer than three free 16-bit escape values remained when building an H16 tree.
    #[error("huffman symbol space exhausted building escape cache")]
    TreeOverflow,

    /// A chain's length could not be decomposed into sizetable tokens.
    #[error("chain length {0} is not representable by the sizetable")]
    InvalidChainLength(usize),

    /// A frame contained more than 256 distinct colors.
    #[error("palette overflow: frame uses more than 256 distinct colors")]
    PaletteOverflow,

    /// A caller-supplied argument was invalid, e.g. a bitstream write wider than the
    /// accumulator, or a frame span of the wrong size.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Propagated from the underlying byte stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
