//! The only contract between the SMK2 codec core and any particular
//! container on the other end: a producer and a consumer of raw BGR
//! frames, in presentation order.

use crate::error::Result;

/// A producer of `width * height * 3`-byte BGR frames.
pub trait FrameSource {
    /// Frame width in pixels. Always a multiple of 4.
    fn width(&self) -> u32;
    /// Frame height in pixels. Always a multiple of 4.
    fn height(&self) -> u32;
    /// Frames per second.
    fn fps(&self) -> u32;
    /// Total number of frames this source will yield.
    fn num_frames(&self) -> u32;
    /// Reads and returns the next frame's raw BGR bytes, or `Ok(None)` once
    /// every frame has been produced.
    fn next_frame(&mut self) -> Result<Option<Vec<u8>>>;
}

/// A consumer of `width * height * 3`-byte BGR frames, fed in presentation order.
pub trait FrameSink {
    /// Buffers or writes one frame. `frame.len()` must equal `width * height * 3`.
    fn encode_frame(&mut self, frame: &[u8]) -> Result<()>;
}
