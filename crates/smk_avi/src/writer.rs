//! Writes uncompressed 24-bit BGR frames into a RIFF-AVI container.

use log::debug;

use smk_types::error::{Error, Result};
use smk_types::frame_io::FrameSink;

/// Builds a complete RIFF-AVI file in memory, one frame at a time.
pub struct AviWriter {
    buf: Vec<u8>,
    width: u32,
    height: u32,
    frame_size: usize,
    row_pad: usize,
    frames_written: u32,
    num_frames: u32,
}

impl AviWriter {
    /// Writes the RIFF/`hdrl`/`strl` chain up front, since the `movi` LIST
    /// size and overall frame count must be known before any frame data.
    pub fn new(width: u32, height: u32, fps: u32, num_frames: u32) -> Result<Self> {
        if width % 4 != 0 || height % 4 != 0 {
            return Err(Error::BadDimension { width, height });
        }

        let row_pad = (4 - (width as usize * 3) % 4) % 4;
        let frame_size = (width as usize * 3 + row_pad) * height as usize;

        let mut buf = Vec::new();
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&0u32.to_le_bytes()); // patched in finish()
        buf.extend_from_slice(b"AVI ");

        buf.extend_from_slice(b"LIST");
        buf.extend_from_slice(&(4 + 64 + 124u32).to_le_bytes());
        buf.extend_from_slice(b"hdrl");

        buf.extend_from_slice(b"avih");
        buf.extend_from_slice(&56u32.to_le_bytes());
        buf.extend_from_slice(&(1_000_000 / fps.max(1)).to_le_bytes());
        buf.extend_from_slice(&(frame_size as u32).to_le_bytes());
        buf.extend_from_slice(&1u32.to_le_bytes()); // padding granule
        buf.extend_from_slice(&0u32.to_le_bytes()); // flags
        buf.extend_from_slice(&num_frames.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes()); // initial frames
        buf.extend_from_slice(&1u32.to_le_bytes()); // number of streams
        buf.extend_from_slice(&(frame_size as u32).to_le_bytes()); // suggested buffer size
        buf.extend_from_slice(&width.to_le_bytes());
        buf.extend_from_slice(&height.to_le_bytes());
        buf.extend_from_slice(&[0u8; 16]);

        buf.extend_from_slice(b"LIST");
        buf.extend_from_slice(&116u32.to_le_bytes());
        buf.extend_from_slice(b"strl");

        buf.extend_from_slice(b"strh");
        buf.extend_from_slice(&56u32.to_le_bytes());
        buf.extend_from_slice(b"vids");
        buf.extend_from_slice(b"DIB ");
        buf.extend_from_slice(&0u32.to_le_bytes()); // flags
        buf.extend_from_slice(&0u16.to_le_bytes()); // priority
        buf.extend_from_slice(&0u16.to_le_bytes()); // language
        buf.extend_from_slice(&0u32.to_le_bytes()); // initial frames
        buf.extend_from_slice(&1u32.to_le_bytes()); // scale
        buf.extend_from_slice(&fps.to_le_bytes()); // rate
        buf.extend_from_slice(&0u32.to_le_bytes()); // start
        buf.extend_from_slice(&num_frames.to_le_bytes()); // length
        buf.extend_from_slice(&(frame_size as u32).to_le_bytes()); // suggested buffer size
        buf.extend_from_slice(&0u32.to_le_bytes()); // quality
        buf.extend_from_slice(&(frame_size as u32).to_le_bytes()); // sample size
        buf.extend_from_slice(&[0u8; 8]); // rcFrame

        buf.extend_from_slice(b"strf");
        buf.extend_from_slice(&40u32.to_le_bytes()); // strf chunk size
        buf.extend_from_slice(&40u32.to_le_bytes()); // biSize
        buf.extend_from_slice(&width.to_le_bytes());
        buf.extend_from_slice(&(-(height as i32)).to_le_bytes()); // top-down DIB
        buf.extend_from_slice(&1u16.to_le_bytes()); // planes
        buf.extend_from_slice(&24u16.to_le_bytes()); // bit count
        buf.extend_from_slice(&0u32.to_le_bytes()); // no compression
        buf.extend_from_slice(&(frame_size as u32).to_le_bytes()); // size image
        buf.extend_from_slice(&0u32.to_le_bytes()); // x pels
        buf.extend_from_slice(&0u32.to_le_bytes()); // y pels
        buf.extend_from_slice(&0u32.to_le_bytes()); // colors used
        buf.extend_from_slice(&0u32.to_le_bytes()); // important colors

        buf.extend_from_slice(b"LIST");
        buf.extend_from_slice(&(num_frames * (frame_size as u32 + 8) + 4).to_le_bytes());
        buf.extend_from_slice(b"movi");

        debug!("opened AVI writer for {width}x{height}, {num_frames} frames at {fps} fps");

        Ok(Self { buf, width, height, frame_size, row_pad, frames_written: 0, num_frames })
    }

    /// Patches the overall RIFF size field and returns the finished file.
    pub fn finish(mut self) -> Vec<u8> {
        let size = (self.buf.len() - 8) as u32;
        self.buf[4..8].copy_from_slice(&size.to_le_bytes());
        self.buf
    }
}

impl FrameSink for AviWriter {
    fn encode_frame(&mut self, frame: &[u8]) -> Result<()> {
        let expected = (self.width * self.height * 3) as usize;
        if frame.len() != expected {
            return Err(Error::InvalidArgument(format!(
                "frame is {} bytes, expected {expected} for {}x{}",
                frame.len(),
                self.width,
                self.height
            )));
        }
        if self.frames_written >= self.num_frames {
            return Err(Error::InvalidArgument(format!("more frames written than the declared {}", self.num_frames)));
        }

        self.buf.extend_from_slice(b"00dc");
        self.buf.extend_from_slice(&(self.frame_size as u32).to_le_bytes());

        let row_bytes = self.width as usize * 3;
        for row in frame.chunks_exact(row_bytes) {
            self.buf.extend_from_slice(row);
            self.buf.extend(std::iter::repeat(0u8).take(self.row_pad));
        }

        self.frames_written += 1;
        Ok(())
    }
}
