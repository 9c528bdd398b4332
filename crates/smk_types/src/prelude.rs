//! Prelude module for `smk_types`.
//!
//! # Examples
//!
//! ```no_run
//! use smk_types::prelude::*;
//!
//! let mut encoder = Encoder::new(4, 4, 15).unwrap();
//! encoder.encode_frame(&[0u8; 4 * 4 * 3]).unwrap();
//! ```

#[doc(inline)]
pub use crate::error::{Error, Result};

#[doc(inline)]
pub use crate::frame_io::{FrameSink, FrameSource};

#[doc(inline)]
pub use crate::palette::Palette;

#[doc(inline)]
pub use crate::smk::{Decoder, Encoder};
