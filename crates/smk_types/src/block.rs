//! The 4x4 block model and the run-length chainer built on top of it.
//!
//! A frame is tiled into 4x4 blocks, each classified as `void | solid |
//! mono | full`; consecutive same-typed blocks (same color, for solid
//! runs) are grouped into chains, whose lengths are then decomposed into
//! tokens drawn from the fixed 64-entry [`SIZETABLE`].

use crate::error::{Error, Result};

/// The four block kinds a chain token can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    /// Two palette indices plus a 16-bit pixel bitmap.
    Mono = 0,
    /// Four rows of two packed pixel-pair words each.
    Full = 1,
    /// Inherits pixels from the same position in the previous frame.
    Void = 2,
    /// One palette index shared by all 16 pixels.
    Solid = 3,
}

/// A single classified 4x4 block.
#[derive(Debug, Clone)]
pub enum Block {
    /// `colors = (c1 << 8) | c0`; `map` bit `y*4+x` selects `c1` over `c0`.
    Mono { colors: u16, map: u16 },
    /// Row `y`'s two words, `(colors[y][0], colors[y][1])`, each packing
    /// two pixels as `(right << 8) | left`.
    Full { rows: [[u16; 2]; 4] },
    /// Unchanged from the previous frame.
    Void,
    /// All 16 pixels share `color`.
    Solid { color: u8 },
}

impl Block {
    /// The block's [`BlockType`] tag.
    pub fn block_type(&self) -> BlockType {
        match self {
            Block::Mono { .. } => BlockType::Mono,
            Block::Full { .. } => BlockType::Full,
            Block::Void => BlockType::Void,
            Block::Solid { .. } => BlockType::Solid,
        }
    }
}

/// Fixed 64-entry chain-length dictionary: `0..58` hold `1..59`, `59..63`
/// hold `128, 256, 512, 1024, 2048`.
pub const SIZETABLE: [u32; 64] = [
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31,
    32, 33, 34, 35, 36, 37, 38, 39, 40, 41, 42, 43, 44, 45, 46, 47, 48, 49, 50, 51, 52, 53, 54, 55, 56, 57, 58, 59,
    128, 256, 512, 1024, 2048,
];

/// Classifies every 4x4 block of `frame` against `previous` (`None` on the
/// first frame). `index_of` resolves a BGR triple to its palette index.
pub fn classify_blocks(
    frame: &[u8],
    previous: Option<&[u8]>,
    width: u32,
    height: u32,
    index_of: &mut impl FnMut([u8; 3]) -> Result<u8>,
) -> Result<Vec<Block>> {
    let w = width as usize;
    let h = height as usize;
    let mut blocks = Vec::with_capacity((w / 4) * (h / 4));

    for y in (0..h).step_by(4) {
        for x in (0..w).step_by(4) {
            let mut colors: Vec<[u8; 3]> = Vec::with_capacity(3);
            let mut same_as_previous = previous.is_some();

            for y_off in 0..4 {
                for x_off in 0..4 {
                    let p = (y + y_off) * w * 3 + (x + x_off) * 3;
                    let pixel = [frame[p], frame[p + 1], frame[p + 2]];

                    if same_as_previous {
                        if let Some(prev) = previous {
                            if prev[p] != frame[p] || prev[p + 1] != frame[p + 1] || prev[p + 2] != frame[p + 2] {
                                same_as_previous = false;
                            }
                        }
                    }

                    if colors.len() < 3 && !colors.contains(&pixel) {
                        colors.push(pixel);
                    }
                }
            }

            if same_as_previous {
                blocks.push(Block::Void);
                continue;
            }

            match colors.len() {
                0 | 1 => {
                    let color = index_of(colors[0])?;
                    blocks.push(Block::Solid { color });
                }
                2 => {
                    let idx1 = index_of(colors[0])?;
                    let idx0 = index_of(colors[1])?;
                    let mut map = 0u16;
                    for y_off in 0..4 {
                        for x_off in 0..4 {
                            let p = (y + y_off) * w * 3 + (x + x_off) * 3;
                            let pixel = [frame[p], frame[p + 1], frame[p + 2]];
                            if pixel == colors[0] {
                                map |= 1 << (y_off * 4 + x_off);
                            }
                        }
                    }
                    blocks.push(Block::Mono { colors: (u16::from(idx1) << 8) | u16::from(idx0), map });
                }
                _ => {
                    let mut rows = [[0u16; 2]; 4];
                    for (y_off, row) in rows.iter_mut().enumerate() {
                        let p = (y + y_off) * w * 3 + x * 3;
                        let c1 = index_of([frame[p], frame[p + 1], frame[p + 2]])?;
                        let c2 = index_of([frame[p + 3], frame[p + 4], frame[p + 5]])?;
                        let c3 = index_of([frame[p + 6], frame[p + 7], frame[p + 8]])?;
                        let c4 = index_of([frame[p + 9], frame[p + 10], frame[p + 11]])?;
                        row[0] = (u16::from(c4) << 8) | u16::from(c3);
                        row[1] = (u16::from(c2) << 8) | u16::from(c1);
                    }
                    blocks.push(Block::Full { rows });
                }
            }
        }
    }

    Ok(blocks)
}

fn same_run(a: &Block, b: &Block) -> bool {
    match (a, b) {
        (Block::Solid { color: c1 }, Block::Solid { color: c2 }) => c1 == c2,
        (Block::Mono { .. }, Block::Mono { .. })
        | (Block::Full { .. }, Block::Full { .. })
        | (Block::Void, Block::Void) => true,
        _ => false,
    }
}

/// Groups consecutive blocks of the same run into maximal chains.
pub fn group_into_runs(blocks: Vec<Block>) -> Vec<Vec<Block>> {
    let mut runs: Vec<Vec<Block>> = Vec::new();
    for block in blocks {
        match runs.last() {
            Some(run) if same_run(&run[0], &block) => {
                runs.last_mut().expect("checked above").push(block);
            }
            _ => runs.push(vec![block]),
        }
    }
    runs
}

/// Decomposes `length` into a minimal list of [`SIZETABLE`] indices summing
/// to it, via a forward dynamic program.
pub fn decompose_chain_length(length: usize) -> Result<Vec<u8>> {
    if length == 0 {
        return Err(Error::InvalidChainLength(0));
    }

    let mut dp = vec![usize::MAX; length + 1];
    let mut last: Vec<Option<u8>> = vec![None; length + 1];
    dp[0] = 0;

    for (code, &size) in SIZETABLE.iter().enumerate() {
        let size = size as usize;
        for m in size..=length {
            if dp[m - size] != usize::MAX && dp[m - size] + 1 < dp[m] {
                dp[m] = dp[m - size] + 1;
                last[m] = Some(code as u8);
            }
        }
    }

    let Some(_) = last[length] else {
        return Err(Error::InvalidChainLength(length));
    };

    let mut codes = Vec::new();
    let mut remaining = length;
    while remaining > 0 {
        let code = last[remaining].expect("dp reachability guarantees a path");
        codes.push(code);
        remaining -= SIZETABLE[code as usize] as usize;
    }
    Ok(codes)
}

/// One emitted chain instruction: a run type, a sizetable-index length, the
/// solid color (for solid runs, else 0), and the per-block payload for
/// mono/full runs (empty for solid/void, whose length alone is enough to
/// reconstruct pixels).
pub struct ChainToken {
    /// The run's block type.
    pub block_type: BlockType,
    /// Index into [`SIZETABLE`] giving this token's block count.
    pub length_code: u8,
    /// Solid color index, or 0 for non-solid runs.
    pub data: u8,
    /// Per-block payload, populated only for mono/full runs.
    pub blocks: Vec<Block>,
}

/// Classifies and chains a full frame's blocks into emittable tokens.
pub fn build_chains(blocks: Vec<Block>) -> Result<Vec<ChainToken>> {
    let mut tokens = Vec::new();
    for run in group_into_runs(blocks) {
        let block_type = run[0].block_type();
        let data = match &run[0] {
            Block::Solid { color } => *color,
            _ => 0,
        };

        let codes = decompose_chain_length(run.len())?;
        let mut skip = 0usize;
        for code in codes {
            let count = SIZETABLE[code as usize] as usize;
            let blocks = match block_type {
                BlockType::Mono | BlockType::Full => run[skip..skip + count].to_vec(),
                BlockType::Void | BlockType::Solid => Vec::new(),
            };
            skip += count;
            tokens.push(ChainToken { block_type, length_code: code, data, blocks });
        }
    }
    Ok(tokens)
}
