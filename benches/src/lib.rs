//! Synthetic frame generators shared by the SMK2 codec benchmarks.
//!
//! There is no real-world SMK2 corpus bundled with this repository, so
//! every benchmark exercises the codec against generated video: solid,
//! two-tone, and high-entropy frames drive the solid/mono/full block
//! paths respectively.

/// A solid frame: every pixel set to `color`. Exercises the solid block
/// path and, across frames, the void (unchanged) path.
pub fn solid_frames(width: u32, height: u32, count: usize, color: [u8; 3]) -> Vec<Vec<u8>> {
    let frame = {
        let mut buf = vec![0u8; (width * height * 3) as usize];
        for pixel in buf.chunks_exact_mut(3) {
            pixel.copy_from_slice(&color);
        }
        buf
    };
    vec![frame; count]
}

/// A single frame tiled with 4x4 checkerboard blocks of `a`/`b`. Exercises
/// the mono block path.
pub fn checkerboard_frame(width: u32, height: u32, a: [u8; 3], b: [u8; 3]) -> Vec<u8> {
    let mut buf = vec![0u8; (width * height * 3) as usize];
    for y in 0..height as usize {
        for x in 0..width as usize {
            let p = (y * width as usize + x) * 3;
            let color = if (x / 4 + y / 4) % 2 == 0 { a } else { b };
            buf[p..p + 3].copy_from_slice(&color);
        }
    }
    buf
}

/// A frame where every 4x4 block has four or more distinct colors, forcing
/// the codec's full block path on every block.
pub fn noisy_frame(width: u32, height: u32) -> Vec<u8> {
    let mut buf = vec![0u8; (width * height * 3) as usize];
    for y in 0..height as usize {
        for x in 0..width as usize {
            let p = (y * width as usize + x) * 3;
            let seed = (x % 4) + (y % 4) * 4;
            buf[p] = (seed * 17) as u8;
            buf[p + 1] = (seed * 31) as u8;
            buf[p + 2] = (seed * 53) as u8;
        }
    }
    buf
}

/// Common benchmark video dimensions, all multiples of 4.
pub mod sizes {
    /// Tiny: 64x64.
    pub const TINY: (u32, u32) = (64, 64);
    /// Small: 256x256.
    pub const SMALL: (u32, u32) = (256, 256);
    /// Medium: 512x512.
    pub const MEDIUM: (u32, u32) = (512, 512);
    /// A common video resolution: 640x480.
    pub const STANDARD: (u32, u32) = (640, 480);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_frames_share_the_requested_color() {
        let frames = solid_frames(8, 8, 3, [1, 2, 3]);
        assert_eq!(frames.len(), 3);
        assert_eq!(&frames[0][0..3], &[1, 2, 3]);
    }

    #[test]
    fn checkerboard_frame_alternates_by_block() {
        let frame = checkerboard_frame(8, 4, [0, 0, 0], [255, 255, 255]);
        assert_eq!(&frame[0..3], &[0, 0, 0]);
        assert_eq!(&frame[4 * 3..4 * 3 + 3], &[255, 255, 255]);
    }
}
