//! SMK2 encoder: global palette construction, block chaining, and the
//! tally-then-replay two-pass Huffman tree build.

use std::collections::HashMap;

use log::debug;

use crate::bitstream::BitWriter;
use crate::block::{self, Block, BlockType, ChainToken};
use crate::error::{Error, Result};
use crate::frame_io::FrameSink;
use crate::huffman::{H16Builder, H16Codes};
use crate::palette::{self, Palette};

use super::{encode_framerate, FRAME_FLAG_HAS_PALETTE, MAGIC};

/// Buffers whole frames and assembles a complete SMK2 stream on [`finish`](Self::finish).
pub struct Encoder {
    width: u32,
    height: u32,
    fps: u32,
    frames: Vec<Vec<u8>>,
}

impl Encoder {
    /// Creates an encoder for `width x height` frames at `fps`. Both
    /// dimensions must be multiples of 4.
    pub fn new(width: u32, height: u32, fps: u32) -> Result<Self> {
        if width % 4 != 0 || height % 4 != 0 {
            return Err(Error::BadDimension { width, height });
        }
        Ok(Self { width, height, fps, frames: Vec::new() })
    }

    fn build_palette(&self) -> Result<(Palette, HashMap<[u8; 3], u8>)> {
        let mut palette: Palette = [[0u8; 3]; 256];
        let mut indices: HashMap<[u8; 3], u8> = HashMap::new();

        for frame in &self.frames {
            for pixel in frame.chunks_exact(3) {
                let color = [pixel[0], pixel[1], pixel[2]];
                if indices.contains_key(&color) {
                    continue;
                }
                let next = indices.len();
                if next >= 256 {
                    return Err(Error::PaletteOverflow);
                }
                palette[next] = color;
                indices.insert(color, next as u8);
            }
        }

        Ok((palette, indices))
    }

    fn chain_type_value(token: &ChainToken) -> u16 {
        (token.block_type as u16) | (u16::from(token.length_code) << 2) | (u16::from(token.data) << 8)
    }

    /// Consumes the buffered frames and produces a complete SMK2 stream.
    pub fn finish(self) -> Result<Vec<u8>> {
        let (palette, indices) = self.build_palette()?;
        debug!("built global palette with {} distinct colors", indices.len());

        let mut previous: Option<Vec<u8>> = None;
        let mut frame_chains: Vec<Vec<ChainToken>> = Vec::with_capacity(self.frames.len());
        for frame in &self.frames {
            let blocks = block::classify_blocks(frame, previous.as_deref(), self.width, self.height, &mut |c| {
                indices.get(&c).copied().ok_or(Error::PaletteOverflow)
            })?;
            frame_chains.push(block::build_chains(blocks)?);
            previous = Some(frame.clone());
        }

        let mut mmap_tally = H16Builder::new();
        let mut mclr_tally = H16Builder::new();
        let mut full_tally = H16Builder::new();
        let mut type_tally = H16Builder::new();

        for tokens in &frame_chains {
            for token in tokens {
                type_tally.record(Self::chain_type_value(token));
                match token.block_type {
                    BlockType::Mono => {
                        for b in &token.blocks {
                            if let Block::Mono { colors, map } = b {
                                mclr_tally.record(*colors);
                                mmap_tally.record(*map);
                            }
                        }
                    }
                    BlockType::Full => {
                        for b in &token.blocks {
                            if let Block::Full { rows } = b {
                                for row in rows {
                                    full_tally.record(row[0]);
                                    full_tally.record(row[1]);
                                }
                            }
                        }
                    }
                    BlockType::Void | BlockType::Solid => {}
                }
            }
        }

        let mut tree_writer = BitWriter::new();
        let mmap_codes = mmap_tally.build(&mut tree_writer)?;
        let mclr_codes = mclr_tally.build(&mut tree_writer)?;
        let full_codes = full_tally.build(&mut tree_writer)?;
        let type_codes = type_tally.build(&mut tree_writer)?;
        let trees_bytes = tree_writer.into_bytes();

        let mut frame_payloads: Vec<Vec<u8>> = Vec::with_capacity(frame_chains.len());
        let mut frame_flags: Vec<u8> = Vec::with_capacity(frame_chains.len());

        for (index, tokens) in frame_chains.iter().enumerate() {
            let mut writer = BitWriter::new();
            for token in tokens {
                type_codes.write(&mut writer, Self::chain_type_value(token))?;
                match token.block_type {
                    BlockType::Mono => {
                        for b in &token.blocks {
                            if let Block::Mono { colors, map } = b {
                                mclr_codes.write(&mut writer, *colors)?;
                                mmap_codes.write(&mut writer, *map)?;
                            }
                        }
                    }
                    BlockType::Full => {
                        for b in &token.blocks {
                            if let Block::Full { rows } = b {
                                for row in rows {
                                    full_codes.write(&mut writer, row[0])?;
                                    full_codes.write(&mut writer, row[1])?;
                                }
                            }
                        }
                    }
                    BlockType::Void | BlockType::Solid => {}
                }
            }

            let mut payload = Vec::new();
            let has_palette = index == 0;
            if has_palette {
                payload.extend_from_slice(&palette::encode(&palette)?);
            }
            payload.extend_from_slice(&writer.into_bytes());
            while payload.len() % 4 != 0 {
                payload.push(0);
            }

            frame_flags.push(if has_palette { FRAME_FLAG_HAS_PALETTE } else { 0 });
            frame_payloads.push(payload);
        }

        let mut out = Vec::new();
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&(self.frames.len() as u32).to_le_bytes());
        out.extend_from_slice(&encode_framerate(self.fps).to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes()); // flags
        out.extend_from_slice(&[0u8; 28]); // audio track sizes

        // Per-tree size fields are node_count*4+12, matching the original
        // format's packed-tree-region bookkeeping, not the raw node count.
        out.extend_from_slice(&(trees_bytes.len() as u32).to_le_bytes());
        out.extend_from_slice(&(mmap_codes.node_count() as u32 * 4 + 12).to_le_bytes());
        out.extend_from_slice(&(mclr_codes.node_count() as u32 * 4 + 12).to_le_bytes());
        out.extend_from_slice(&(full_codes.node_count() as u32 * 4 + 12).to_le_bytes());
        out.extend_from_slice(&(type_codes.node_count() as u32 * 4 + 12).to_le_bytes());
        out.extend_from_slice(&[0u8; 28]); // audio rates
        out.extend_from_slice(&[0u8; 4]); // reserved

        for payload in &frame_payloads {
            out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        }
        out.extend_from_slice(&frame_flags);
        out.extend_from_slice(&trees_bytes);
        for payload in &frame_payloads {
            out.extend_from_slice(payload);
        }

        debug!("encoded {} frames into {} bytes", self.frames.len(), out.len());
        Ok(out)
    }
}

impl FrameSink for Encoder {
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
        self.frames.push(frame.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smk::Decoder;

    fn solid_frame(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
        let mut frame = vec![0u8; (width * height * 3) as usize];
        for pixel in frame.chunks_exact_mut(3) {
            pixel.copy_from_slice(&color);
        }
        frame
    }

    #[test]
    fn round_trips_a_solid_single_chain_video() {
        let width = 8;
        let height = 8;
        let frame = solid_frame(width, height, [10, 20, 30]);

        let mut encoder = Encoder::new(width, height, 15).unwrap();
        encoder.encode_frame(&frame).unwrap();
        encoder.encode_frame(&frame).unwrap();
        let bytes = encoder.finish().unwrap();

        let mut decoder = Decoder::new(&bytes).unwrap();
        assert_eq!(decoder.width(), width);
        assert_eq!(decoder.height(), height);
        assert_eq!(decoder.num_frames(), 2);

        let first = decoder.next_frame().unwrap().unwrap();
        assert_eq!(first, frame);
        let second = decoder.next_frame().unwrap().unwrap();
        assert_eq!(second, frame);
        assert!(decoder.next_frame().unwrap().is_none());
    }

    #[test]
    fn round_trips_a_checkerboard_mono_frame() {
        let width = 8;
        let height = 8;
        let mut frame = vec![0u8; (width * height * 3) as usize];
        for y in 0..height as usize {
            for x in 0..width as usize {
                let p = (y * width as usize + x) * 3;
                if (x / 4 + y / 4) % 2 == 1 {
                    frame[p..p + 3].copy_from_slice(&[200, 180, 160]);
                }
            }
        }

        let mut encoder = Encoder::new(width, height, 10).unwrap();
        encoder.encode_frame(&frame).unwrap();
        let bytes = encoder.finish().unwrap();

        let mut decoder = Decoder::new(&bytes).unwrap();
        let decoded = decoder.next_frame().unwrap().unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn over_256_colors_reports_palette_overflow() {
        let width = 4;
        let height = 4 * 257;
        let mut frame = vec![0u8; (width * height * 3) as usize];
        for (i, pixel) in frame.chunks_exact_mut(3 * 4).enumerate() {
            // 256 distinct colors via the low channel, then one more once the
            // high channel ticks over: 257 distinct colors total.
            let color = [(i % 256) as u8, u8::from(i >= 256), 0];
            for p in pixel.chunks_exact_mut(3) {
                p.copy_from_slice(&color);
            }
        }

        let mut encoder = Encoder::new(width, height, 10).unwrap();
        encoder.encode_frame(&frame).unwrap();
        assert!(matches!(encoder.finish(), Err(Error::PaletteOverflow)));
    }

    #[test]
    fn mismatched_frame_length_is_rejected() {
        let mut encoder = Encoder::new(4, 4, 10).unwrap();
        let err = encoder.encode_frame(&[0u8; 10]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
