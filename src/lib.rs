#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `smk-transcode` converts between uncompressed RIFF-AVI video and
//! Smacker v2 (SMK2), the paletted Huffman-coded format used by a
//! generation of PC game FMV.
//!
//! ```no_run
//! use smk_transcode::prelude::*;
//!
//! let avi_bytes = std::fs::read("input.avi").unwrap();
//! let smk_bytes = avi_to_smk(&avi_bytes).unwrap();
//! std::fs::write("output.smk", smk_bytes).unwrap();
//! ```

pub use smk_internal::*;
