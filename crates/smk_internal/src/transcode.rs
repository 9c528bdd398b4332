//! Pumps frames between a [`FrameSource`] and a [`FrameSink`], the only
//! place this crate couples the AVI container to the SMK2 codec core.

use log::info;

use smk_avi::{AviReader, AviWriter};
use smk_types::error::Result;
use smk_types::frame_io::{FrameSink, FrameSource};
use smk_types::smk::{Decoder, Encoder};

fn pump(source: &mut impl FrameSource, sink: &mut impl FrameSink) -> Result<()> {
    let mut count = 0u32;
    while let Some(frame) = source.next_frame()? {
        sink.encode_frame(&frame)?;
        count += 1;
    }
    info!("transcoded {count} frames");
    Ok(())
}

/// Reads a RIFF-AVI file and encodes it as an SMK2 stream.
pub fn avi_to_smk(avi_bytes: &[u8]) -> Result<Vec<u8>> {
    let mut reader = AviReader::new(avi_bytes)?;
    let mut encoder = Encoder::new(reader.width(), reader.height(), reader.fps())?;
    pump(&mut reader, &mut encoder)?;
    encoder.finish()
}

/// Decodes an SMK2 stream and writes it out as a RIFF-AVI file.
pub fn smk_to_avi(smk_bytes: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = Decoder::new(smk_bytes)?;
    let mut writer = AviWriter::new(decoder.width(), decoder.height(), decoder.fps(), decoder.num_frames())?;
    pump(&mut decoder, &mut writer)?;
    Ok(writer.finish())
}
