//! Internal crate for `smk-transcode`.
//!
//! This module is separated into its own crate to keep the container
//! layer (`smk_avi`) and the codec core (`smk_types`) independently
//! testable, and should not be used directly.
//!
//! # Examples
//!
//! ```rust
//! use smk_internal::prelude::*;
//!
//! let mut encoder = Encoder::new(4, 4, 15).unwrap();
//! encoder.encode_frame(&[0u8; 4 * 4 * 3]).unwrap();
//! ```

/// `use smk_internal::prelude::*;` to import commonly used items.
pub mod prelude;
pub mod transcode;

pub use smk_avi;
pub use smk_types;
