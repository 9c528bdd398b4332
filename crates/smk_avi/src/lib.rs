//! A minimal RIFF-AVI reader and writer for uncompressed 24-bit BGR video,
//! implementing [`smk_types::frame_io`]'s source/sink traits so it can sit
//! on either end of an SMK2 transcode.

pub mod reader;
pub mod writer;

pub use reader::AviReader;
pub use writer::AviWriter;
