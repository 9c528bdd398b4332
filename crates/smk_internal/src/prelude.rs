//! Prelude module for `smk_internal`.
//!
//! # Examples
//!
//! ```rust
//! use smk_internal::prelude::*;
//!
//! let mut encoder = Encoder::new(4, 4, 15).unwrap();
//! ```

#[doc(inline)]
pub use smk_types::prelude::*;

#[doc(inline)]
pub use smk_avi::{AviReader, AviWriter};

#[doc(inline)]
pub use crate::transcode::{avi_to_smk, smk_to_avi};
