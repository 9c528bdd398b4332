//! The SMK2 container: header layout, tree packing, and per-frame payload
//! framing, built on the bitstream/huffman/palette/block layers.

pub mod decode;
pub mod encode;

pub use decode::Decoder;
pub use encode::Encoder;

/// The four-byte file signature.
pub const MAGIC: &[u8; 4] = b"SMK2";

/// Low bit of a per-frame flag byte: this frame carries a palette block.
pub const FRAME_FLAG_HAS_PALETTE: u8 = 0x01;

/// Decodes the raw header framerate field into frames per second, per the
/// container's own encoding: positive fields are `1000/field`, negative
/// fields are `100000/-field`, zero means 10 fps.
pub fn decode_framerate(field: i32) -> u32 {
    match field.cmp(&0) {
        std::cmp::Ordering::Greater => (1000 / field) as u32,
        std::cmp::Ordering::Less => (100_000 / -field) as u32,
        std::cmp::Ordering::Equal => 10,
    }
}

/// Encodes `fps` back into the raw header framerate field, inverse of
/// [`decode_framerate`] for the positive-field branch (the only one this
/// codec emits).
pub fn encode_framerate(fps: u32) -> i32 {
    (1000 / fps.max(1)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framerate_field_decoding() {
        assert_eq!(decode_framerate(0), 10);
        assert_eq!(decode_framerate(40), 25);
        assert_eq!(decode_framerate(-100_000), 1);
    }
}
