//! SMK2 decoder: header parsing, tree construction, and per-frame block
//! reconstruction.

use log::{debug, trace};

use crate::bitstream::BitReader;
use crate::block::SIZETABLE;
use crate::error::{Error, Result};
use crate::frame_io::FrameSource;
use crate::huffman::H16Tree;
use crate::palette::{self, Palette};

use super::{decode_framerate, FRAME_FLAG_HAS_PALETTE, MAGIC};

struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos + n;
        let slice = self
            .data
            .get(self.pos..end)
            .ok_or_else(|| Error::InvalidArgument("SMK2 stream truncated".into()))?;
        self.pos = end;
        Ok(slice)
    }

    fn skip(&mut self, n: usize) {
        self.pos += n;
    }

    fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take(4)?.try_into().expect("exactly 4 bytes")))
    }

    fn i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.take(4)?.try_into().expect("exactly 4 bytes")))
    }
}

/// Decodes an in-memory SMK2 stream into successive BGR frames.
pub struct Decoder<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    num_frames: u32,
    fps: u32,
    frame_sizes: Vec<u32>,
    frame_flags: Vec<u8>,
    mmap: H16Tree,
    mclr: H16Tree,
    full: H16Tree,
    type_tree: H16Tree,
    payload_offsets: Vec<usize>,
    palette: Palette,
    frame_buffer: Vec<u8>,
    current_frame: u32,
}

impl<'a> Decoder<'a> {
    /// Parses the header and the four trees out of `data`, leaving the
    /// decoder positioned at the first frame payload.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);

        let signature = cursor.take(4)?;
        if signature != MAGIC {
            return Err(Error::BadSignature { expected: "SMK2", found: String::from_utf8_lossy(signature).into_owned() });
        }

        let width = cursor.u32()?;
        let height = cursor.u32()?;
        let num_frames = cursor.u32()?;
        let framerate_field = cursor.i32()?;
        let fps = decode_framerate(framerate_field);

        let flags = cursor.u32()?;
        if flags != 0 {
            return Err(Error::UnsupportedFlag(format!("flags = {flags}")));
        }

        cursor.skip(28); // audio track sizes, all zero
        let trees_size = cursor.u32()? as usize;
        cursor.skip(48); // mmap/mclr/full/type size fields, audio rates, reserved

        let frame_sizes: Vec<u32> = (0..num_frames).map(|_| cursor.u32()).collect::<Result<_>>()?;
        let frame_flags = cursor.take(num_frames as usize)?.to_vec();
        for &flag in &frame_flags {
            if flag & !FRAME_FLAG_HAS_PALETTE != 0 {
                return Err(Error::UnsupportedFlag("audio substreams are not supported".into()));
            }
        }

        let trees_bytes = cursor.take(trees_size)?;
        let mut tree_reader = BitReader::new(trees_bytes);
        let mmap = H16Tree::read(&mut tree_reader)?;
        let mclr = H16Tree::read(&mut tree_reader)?;
        let full = H16Tree::read(&mut tree_reader)?;
        let type_tree = H16Tree::read(&mut tree_reader)?;

        if width % 4 != 0 || height % 4 != 0 {
            return Err(Error::BadDimension { width, height });
        }

        let mut payload_offsets = Vec::with_capacity(num_frames as usize + 1);
        let mut offset = cursor.pos;
        for &size in &frame_sizes {
            payload_offsets.push(offset);
            offset += size as usize;
        }

        debug!("parsed SMK2 header: {width}x{height}, {num_frames} frames at {fps} fps");

        Ok(Self {
            data,
            width,
            height,
            num_frames,
            fps,
            frame_sizes,
            frame_flags,
            mmap,
            mclr,
            full,
            type_tree,
            payload_offsets,
            palette: [[0u8; 3]; 256],
            frame_buffer: vec![0u8; (width * height * 3) as usize],
            current_frame: 0,
        })
    }

    fn decode_next_frame(&mut self) -> Result<Option<Vec<u8>>> {
        if self.current_frame >= self.num_frames {
            return Ok(None);
        }

        let index = self.current_frame as usize;
        let payload = &self.data[self.payload_offsets[index]..self.payload_offsets[index] + self.frame_sizes[index] as usize];
        let mut pos = 0usize;

        if self.frame_flags[index] & FRAME_FLAG_HAS_PALETTE != 0 {
            let length = usize::from(*payload.first().ok_or(Error::CorruptTree)?) * 4;
            let block = payload.get(..length).ok_or(Error::CorruptTree)?;
            let previous = self.palette;
            self.palette = palette::decode(block, &previous)?;
            pos = length;
        }

        self.mmap.reset_cache();
        self.mclr.reset_cache();
        self.full.reset_cache();
        self.type_tree.reset_cache();

        let mut reader = BitReader::new(&payload[pos..]);
        self.decode_blocks(&mut reader)?;

        self.current_frame += 1;
        trace!("decoded frame {index}");
        Ok(Some(self.frame_buffer.clone()))
    }

    fn decode_blocks(&mut self, reader: &mut BitReader) -> Result<()> {
        let width = self.width as usize;
        let height = self.height as usize;
        let stride = width * 3;

        let mut row = 0usize;
        let mut col = 0usize;
        while row < height {
            let token = self.type_tree.lookup(reader)?;
            let block_type = token & 0x3;
            let length_code = ((token >> 2) & 0x3F) as usize;
            let type_data = (token >> 8) & 0xFF;

            let count = SIZETABLE[length_code] as usize;
            for _ in 0..count {
                if row >= height {
                    break;
                }
                let base = row * stride + col * 3;

                match block_type {
                    0 => self.decode_mono(reader, base, stride)?,
                    1 => self.decode_full(reader, base, stride)?,
                    2 => {}
                    3 => self.decode_solid(base, stride, (type_data & 0xFF) as u8),
                    other => return Err(Error::InvalidArgument(format!("invalid block type {other}"))),
                }

                col += 4;
                if col >= width {
                    col = 0;
                    row += 4;
                }
            }
        }

        Ok(())
    }

    fn decode_mono(&mut self, reader: &mut BitReader, base: usize, stride: usize) -> Result<()> {
        let colors = self.mclr.lookup(reader)?;
        let map = self.mmap.lookup(reader)?;

        // The mono decode in the original implementation this codec draws
        // on evaluates `colors & 0xFF00 >> 8` as `colors & 0xFF` due to
        // operator precedence; this extracts the true high byte instead,
        // matching how the encoder packs it as color 1.
        let color1 = self.palette[usize::from((colors & 0xFF00) >> 8)];
        let color2 = self.palette[usize::from(colors & 0xFF)];

        let mut offset = base;
        for y in 0..4 {
            for x in 0..4 {
                let color = if map & (1 << (y * 4 + x)) != 0 { color1 } else { color2 };
                let p = offset + x * 3;
                self.frame_buffer[p..p + 3].copy_from_slice(&color);
            }
            offset += stride;
        }
        Ok(())
    }

    fn decode_full(&mut self, reader: &mut BitReader, base: usize, stride: usize) -> Result<()> {
        let mut offset = base;
        for _ in 0..4 {
            let word0 = self.full.lookup(reader)?;
            let color1 = self.palette[usize::from((word0 & 0xFF00) >> 8)];
            let color2 = self.palette[usize::from(word0 & 0xFF)];

            let word1 = self.full.lookup(reader)?;
            let color3 = self.palette[usize::from((word1 & 0xFF00) >> 8)];
            let color4 = self.palette[usize::from(word1 & 0xFF)];

            self.frame_buffer[offset + 3 * 3..offset + 3 * 3 + 3].copy_from_slice(&color1);
            self.frame_buffer[offset + 2 * 3..offset + 2 * 3 + 3].copy_from_slice(&color2);
            self.frame_buffer[offset + 3..offset + 6].copy_from_slice(&color3);
            self.frame_buffer[offset..offset + 3].copy_from_slice(&color4);

            offset += stride;
        }
        Ok(())
    }

    fn decode_solid(&mut self, base: usize, stride: usize, color_index: u8) {
        let color = self.palette[usize::from(color_index)];
        let mut offset = base;
        for _ in 0..4 {
            for x in 0..4 {
                let p = offset + x * 3;
                self.frame_buffer[p..p + 3].copy_from_slice(&color);
            }
            offset += stride;
        }
    }
}

impl<'a> FrameSource for Decoder<'a> {
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
        self.decode_next_frame()
    }
}
