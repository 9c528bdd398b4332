//! 16-bit Huffman codec built from two H8 trees (low/high byte) plus a
//! three-entry MRU cache. Three "escape" values — 16-bit symbols absent
//! from the observed frequency set — sit near the root of the structural
//! tree and double as references into the MRU cache.

use std::collections::{BTreeMap, HashMap};

use crate::bitstream::{BitReader, BitWriter};
use crate::error::{Error, Result};

use super::build::{self, Code};
use super::h8::{H8Builder, H8Codes, H8Tree};

#[derive(Clone, Copy)]
enum Leaf {
    Literal(u16),
    Cache(u8),
}

enum Node {
    Leaf(Leaf),
    Branch { one: u32 },
}

/// A decoded H16 tree with its own MRU cache, reset at the start of every
/// frame decode.
pub struct H16Tree {
    nodes: Vec<Node>,
    cache: [u16; 3],
    init_cache: [u16; 3],
}

impl H16Tree {
    /// Reads: presence bit, low-byte H8 tree, high-byte H8 tree, three raw
    /// u16 cache seeds, the recursive structural tree, trailing bit.
    pub fn read(reader: &mut BitReader) -> Result<Self> {
        if !reader.read_bit()? {
            return Err(Error::MissingTree);
        }

        let low = H8Tree::read(reader)?;
        let high = H8Tree::read(reader)?;

        let init_cache = [reader.read_u16()?, reader.read_u16()?, reader.read_u16()?];

        let mut nodes = Vec::new();
        Self::read_rec(reader, &mut nodes, &low, &high, &init_cache)?;

        if reader.read_bit()? {
            return Err(Error::CorruptTree);
        }

        Ok(Self { nodes, cache: init_cache, init_cache })
    }

    fn read_rec(reader: &mut BitReader, nodes: &mut Vec<Node>, low: &H8Tree, high: &H8Tree, init_cache: &[u16; 3]) -> Result<()> {
        if reader.read_bit()? {
            let branch = nodes.len();
            nodes.push(Node::Branch { one: 0 });
            Self::read_rec(reader, nodes, low, high, init_cache)?;
            let one = nodes.len() as u32;
            nodes[branch] = Node::Branch { one };
            Self::read_rec(reader, nodes, low, high, init_cache)
        } else {
            let value = u16::from(low.lookup(reader)?) | (u16::from(high.lookup(reader)?) << 8);
            let leaf = init_cache
                .iter()
                .position(|&slot| slot == value)
                .map_or(Leaf::Literal(value), |index| Leaf::Cache(index as u8));
            nodes.push(Node::Leaf(leaf));
            Ok(())
        }
    }

    /// Descends one value's worth of bits, resolves a cache reference if
    /// any, then applies the MRU update.
    pub fn lookup(&mut self, reader: &mut BitReader) -> Result<u16> {
        let mut index = 0usize;
        loop {
            match self.nodes[index] {
                Node::Branch { one } => {
                    index = if reader.read_bit()? { one as usize } else { index + 1 };
                }
                Node::Leaf(leaf) => {
                    let value = match leaf {
                        Leaf::Literal(v) => v,
                        Leaf::Cache(slot) => self.cache[slot as usize],
                    };
                    self.touch_cache(value);
                    return Ok(value);
                }
            }
        }
    }

    fn touch_cache(&mut self, value: u16) {
        if value != self.cache[0] {
            let (c0, c1) = (self.cache[0], self.cache[1]);
            self.cache[2] = c1;
            self.cache[1] = c0;
            self.cache[0] = value;
        }
    }

    /// Resets the MRU cache to its serialized initial values. Called at the
    /// start of every frame decode.
    pub fn reset_cache(&mut self) {
        self.cache = self.init_cache;
    }

    /// Number of tree nodes (`2 * leaf_count - 1`), used for the header's
    /// per-tree size fields.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Accumulates 16-bit symbol frequencies, then builds and packs an
/// [`H16Tree`].
#[derive(Default)]
pub struct H16Builder {
    freq: BTreeMap<u16, u64>,
}

impl H16Builder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tallies one occurrence of `value`.
    pub fn record(&mut self, value: u16) {
        *self.freq.entry(value).or_insert(0) += 1;
    }

    /// Reserves three 16-bit values absent from the tallied frequency set,
    /// scanning `1..=65535` in ascending order.
    fn reserve_escape_values(&self) -> Result<[u16; 3]> {
        let mut escapes = [0u16; 3];
        let mut found = 0usize;
        let mut symbol: u16 = 1;
        loop {
            if !self.freq.contains_key(&symbol) {
                escapes[found] = symbol;
                found += 1;
                if found == escapes.len() {
                    return Ok(escapes);
                }
            }
            if symbol == u16::MAX {
                break;
            }
            symbol += 1;
        }
        Err(Error::TreeOverflow)
    }

    /// Builds the tree, writes: presence bit, low/high H8 trees (each
    /// tallying the byte halves of every distinct 16-bit leaf value,
    /// escapes included), the three raw escape values, the recursive
    /// structural tree (leaves re-emitted through the low/high codes),
    /// trailing bit. Returns the per-value codes used to write literal
    /// frame data through this tree.
    pub fn build(mut self, writer: &mut BitWriter) -> Result<H16Codes> {
        let escapes = self.reserve_escape_values()?;
        for &e in &escapes {
            self.freq.insert(e, u64::MAX);
        }

        let leaves: Vec<(u16, u64)> = self.freq.into_iter().collect();
        let root = build::build(leaves);
        let codes = build::assign_codes(&root);

        writer.write(1, 1)?;

        let mut low_builder = H8Builder::new();
        let mut high_builder = H8Builder::new();
        let mut symbols: Vec<u16> = codes.keys().copied().collect();
        symbols.sort_unstable();
        for symbol in &symbols {
            low_builder.record((*symbol & 0xFF) as u8);
            high_builder.record((*symbol >> 8) as u8);
        }
        let low_codes = low_builder.build(writer)?;
        let high_codes = high_builder.build(writer)?;

        for &e in &escapes {
            writer.write(u32::from(e), 16)?;
        }

        build::walk(
            &root,
            &mut || writer.write(1, 1),
            &mut |symbol| {
                writer.write(0, 1)?;
                low_codes.write(writer, (symbol & 0xFF) as u8)?;
                high_codes.write(writer, (symbol >> 8) as u8)
            },
        )?;

        writer.write(0, 1)?;

        Ok(H16Codes { codes, node_count: symbols.len() * 2 - 1 })
    }
}

/// Per-value codes produced by [`H16Builder::build`], used to emit literal
/// per-frame chain data (not tree-header bytes, which use the nested H8
/// trees instead).
pub struct H16Codes {
    codes: HashMap<u16, Code>,
    node_count: usize,
}

impl H16Codes {
    /// Writes `value`'s structural code to `writer`.
    pub fn write(&self, writer: &mut BitWriter, value: u16) -> Result<()> {
        let code = self.codes.get(&value).ok_or(Error::CorruptTree)?;
        writer.write(code.word, code.len)
    }

    /// Number of tree nodes (`2 * leaf_count - 1`), matching [`H16Tree::node_count`].
    pub fn node_count(&self) -> usize {
        self.node_count
    }
}
