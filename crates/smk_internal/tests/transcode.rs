//! The S1-S6 scenarios run through the full AVI -> SMK2 -> AVI pipeline,
//! not just the codec core.

use smk_avi::{AviReader, AviWriter};
use smk_internal::transcode::{avi_to_smk, smk_to_avi};
use smk_types::frame_io::{FrameSink, FrameSource};
use smk_types::Error;

fn solid_avi(width: u32, height: u32, frames: u32, color: u8) -> Vec<u8> {
    let mut writer = AviWriter::new(width, height, 15, frames).unwrap();
    let frame = vec![color; (width * height * 3) as usize];
    for _ in 0..frames {
        writer.encode_frame(&frame).unwrap();
    }
    writer.finish()
}

/// S1: a single solid frame survives AVI -> SMK2 -> AVI as the identity.
#[test]
fn single_solid_frame_round_trips_through_both_containers() {
    let avi_bytes = solid_avi(4, 4, 1, 0x41);
    let smk_bytes = avi_to_smk(&avi_bytes).unwrap();
    let round_tripped = smk_to_avi(&smk_bytes).unwrap();

    let mut original = AviReader::new(&avi_bytes).unwrap();
    let mut rebuilt = AviReader::new(&round_tripped).unwrap();
    assert_eq!(rebuilt.next_frame().unwrap().unwrap(), original.next_frame().unwrap().unwrap());
}

/// S2: an 8x8 checkerboard frame round-trips through both containers.
#[test]
fn checkerboard_frame_round_trips_through_both_containers() {
    let width = 8u32;
    let height = 8u32;
    let mut frame = vec![0u8; (width * height * 3) as usize];
    for y in 0..height as usize {
        for x in 0..width as usize {
            let p = (y * width as usize + x) * 3;
            if (x + y) % 2 == 1 {
                frame[p..p + 3].copy_from_slice(&[0xFF, 0xFF, 0xFF]);
            }
        }
    }
    let mut writer = AviWriter::new(width, height, 15, 1).unwrap();
    writer.encode_frame(&frame).unwrap();
    let avi_bytes = writer.finish();

    let smk_bytes = avi_to_smk(&avi_bytes).unwrap();
    let round_tripped = smk_to_avi(&smk_bytes).unwrap();

    let mut rebuilt = AviReader::new(&round_tripped).unwrap();
    assert_eq!(rebuilt.next_frame().unwrap().unwrap(), frame);
}

/// S3: a repeated frame round-trips, exercising the void-chain path across
/// the full pipeline.
#[test]
fn repeated_frame_round_trips_through_both_containers() {
    let avi_bytes = solid_avi(4, 4, 3, 0x2A);
    let smk_bytes = avi_to_smk(&avi_bytes).unwrap();
    let round_tripped = smk_to_avi(&smk_bytes).unwrap();

    let mut original = AviReader::new(&avi_bytes).unwrap();
    let mut rebuilt = AviReader::new(&round_tripped).unwrap();
    assert_eq!(rebuilt.num_frames(), original.num_frames());
    while let Some(frame) = original.next_frame().unwrap() {
        assert_eq!(rebuilt.next_frame().unwrap().unwrap(), frame);
    }
}

/// S4: a frame with more than 256 distinct colors fails at the `avi_to_smk`
/// boundary with `PaletteOverflow`.
#[test]
fn palette_overflow_propagates_out_of_avi_to_smk() {
    let width = 4u32;
    let height = 4 * 257;
    let mut frame = vec![0u8; (width * height * 3) as usize];
    for (i, block_pixels) in frame.chunks_exact_mut(3 * 4).enumerate() {
        let color = [(i % 256) as u8, u8::from(i >= 256), 0];
        for p in block_pixels.chunks_exact_mut(3) {
            p.copy_from_slice(&color);
        }
    }
    let mut writer = AviWriter::new(width, height, 15, 1).unwrap();
    writer.encode_frame(&frame).unwrap();
    let avi_bytes = writer.finish();

    assert!(matches!(avi_to_smk(&avi_bytes), Err(Error::PaletteOverflow)));
}

/// S5: a nonzero SMK2 header flags field is rejected by `smk_to_avi`.
#[test]
fn nonzero_smk_flags_are_rejected_by_smk_to_avi() {
    let avi_bytes = solid_avi(4, 4, 1, 0x10);
    let mut smk_bytes = avi_to_smk(&avi_bytes).unwrap();
    smk_bytes[20] = 1; // magic(4)+width(4)+height(4)+num_frames(4)+framerate(4)
    assert!(matches!(smk_to_avi(&smk_bytes), Err(Error::UnsupportedFlag(_))));
}

/// S6: an AVI whose declared width is not divisible by 4 is rejected by
/// `avi_to_smk` before any frame is touched.
#[test]
fn width_not_divisible_by_four_is_rejected_by_avi_to_smk() {
    // AviWriter::new already enforces this, so build the header by hand.
    let mut writer = AviWriter::new(8, 4, 15, 1).unwrap();
    writer.encode_frame(&vec![0u8; 8 * 4 * 3]).unwrap();
    let mut avi_bytes = writer.finish();

    // avih's width field sits right after RIFF/AVI /LIST/hdrl/avih headers
    // and the us_per_frame/maxbytes/padding/flags/num_frames/initial-frames/
    // streams/buffer-size fields: offset 12+8+8+4+4+12+4+12 = 64.
    avi_bytes[64..68].copy_from_slice(&6u32.to_le_bytes());

    assert!(matches!(avi_to_smk(&avi_bytes), Err(Error::BadDimension { width: 6, height: 4 })));
}
