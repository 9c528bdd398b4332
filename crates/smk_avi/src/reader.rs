//! Reads uncompressed 24-bit BGR frames out of a RIFF-AVI container.

use log::debug;

use smk_types::error::{Error, Result};
use smk_types::frame_io::FrameSource;

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos + n;
        let slice = self.data.get(self.pos..end).ok_or_else(|| Error::InvalidArgument("AVI stream truncated".into()))?;
        self.pos = end;
        Ok(slice)
    }

    fn skip(&mut self, n: usize) {
        self.pos += n;
    }

    fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take(4)?.try_into().expect("exactly 4 bytes")))
    }

    fn u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.take(2)?.try_into().expect("exactly 2 bytes")))
    }

    fn check(&mut self, tag: &'static str) -> Result<()> {
        let found = self.take(4)?;
        if found != tag.as_bytes() {
            return Err(Error::BadSignature { expected: tag, found: String::from_utf8_lossy(found).into_owned() });
        }
        Ok(())
    }

    /// Skips `JUNK` chunks and an optional `LIST ... INFO ...` chunk, leaving
    /// the cursor right after the `movi` LIST's own tag. Not every writer
    /// emits an `INFO` list, so this does not require one.
    fn skip_to_movi(&mut self) -> Result<()> {
        loop {
            let tag = self.take(4)?.to_vec();
            match &tag[..] {
                b"JUNK" => {
                    let size = self.u32()? as usize;
                    self.skip(size);
                }
                b"LIST" => {
                    let size = self.u32()? as usize;
                    let list_type = self.take(4)?.to_vec();
                    match &list_type[..] {
                        b"INFO" => self.skip(size - 4),
                        b"movi" => return Ok(()),
                        other => {
                            return Err(Error::BadSignature {
                                expected: "INFO or movi",
                                found: String::from_utf8_lossy(other).into_owned(),
                            })
                        }
                    }
                }
                _ => return Err(Error::BadSignature { expected: "JUNK or LIST", found: String::from_utf8_lossy(&tag).into_owned() }),
            }
        }
    }
}

/// Reads successive BGR frames from an in-memory RIFF-AVI buffer.
pub struct AviReader<'a> {
    data: &'a [u8],
    pos: usize,
    width: u32,
    height: u32,
    fps: u32,
    num_frames: u32,
    frame_size: usize,
    current_frame: u32,
}

impl<'a> AviReader<'a> {
    /// Parses the RIFF/`hdrl`/`strl` chain and leaves the reader positioned
    /// at the first `00dc` frame chunk inside `movi`.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);

        cursor.check("RIFF")?;
        cursor.skip(4); // overall file size
        cursor.check("AVI ")?;
        cursor.check("LIST")?;
        cursor.skip(4); // hdrl LIST size
        cursor.check("hdrl")?;
        cursor.check("avih")?;
        cursor.skip(4); // avih chunk size
        let us_per_frame = cursor.u32()?;
        let fps = 1_000_000 / us_per_frame.max(1);
        cursor.skip(12); // max bytes/sec, padding granule, flags
        let num_frames = cursor.u32()?;
        cursor.skip(12); // initial frames, number of streams, suggested buffer size
        let width = cursor.u32()?;
        let height = cursor.u32()?;
        cursor.skip(16); // reserved

        cursor.check("LIST")?;
        cursor.skip(4); // strl LIST size
        cursor.check("strl")?;
        cursor.check("strh")?;
        cursor.skip(4); // strh chunk size
        cursor.check("vids")?;
        cursor.skip(4); // fccHandler, not validated
        cursor.skip(48); // flags, priority, language, initial frames, scale, rate,
                          // start, length, suggested buffer size, quality, sample size, rcFrame

        cursor.check("strf")?;
        cursor.skip(18); // strf chunk size, biSize, biWidth, biHeight, biPlanes
        let bit_count = cursor.u16()?;
        if bit_count != 24 {
            return Err(Error::BadPixelFormat(format!("{bit_count} bits per pixel, expected 24")));
        }
        let compression = cursor.u32()?;
        if compression != 0 {
            return Err(Error::BadPixelFormat(format!("compression {compression}, expected uncompressed")));
        }
        cursor.skip(20); // sizeImage, xPels, yPels, colors used, colors important

        cursor.skip_to_movi()?;

        if width % 4 != 0 || height % 4 != 0 {
            return Err(Error::BadDimension { width, height });
        }

        debug!("parsed AVI header: {width}x{height}, {num_frames} frames at {fps} fps");

        Ok(Self {
            data,
            pos: cursor.pos,
            width,
            height,
            fps,
            num_frames,
            frame_size: (width * height * 3) as usize,
            current_frame: 0,
        })
    }
}

impl<'a> FrameSource for AviReader<'a> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fps(&self) -> u32 {
        self.fps
    }

    fn num_frames(&self) -> u32 {
        self.num_frames
    }

    fn next_frame(&mut self) -> Result<Option<Vec<u8>>> {
        if self.current_frame >= self.num_frames {
            return Ok(None);
        }

        let mut cursor = Cursor { data: self.data, pos: self.pos };
        cursor.check("00dc")?;
        let declared_size = cursor.u32()? as usize;
        if declared_size != self.frame_size {
            return Err(Error::InvalidArgument(format!(
                "frame {} chunk is {declared_size} bytes, expected {}",
                self.current_frame, self.frame_size
            )));
        }
        let frame = cursor.take(self.frame_size)?.to_vec();

        self.pos = cursor.pos;
        self.current_frame += 1;
        Ok(Some(frame))
    }
}
