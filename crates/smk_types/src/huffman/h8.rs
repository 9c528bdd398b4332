//! 8-bit canonical Huffman codec: packs/unpacks a binary tree of 8-bit
//! symbols via a recursive branch/leaf marker scheme. Used standalone and
//! as the low-byte/high-byte trees nested inside [`super::h16`].

use std::collections::BTreeMap;

use crate::bitstream::{BitReader, BitWriter};
use crate::error::{Error, Result};

use super::build::{self, Code};

enum Node {
    Leaf(u8),
    Branch { one: u32 },
}

/// A decoded 8-bit Huffman tree, ready for repeated lookups.
///
/// Nodes live in an arena rather than behind owned child pointers: a branch
/// only records the index of its `one` child, since its `zero` child is
/// always the immediately following arena slot (the same invariant the
/// packed bitstream relies on when it was written).
pub struct H8Tree {
    nodes: Vec<Node>,
}

impl H8Tree {
    /// Reads a tree: presence bit, recursive structure, trailing bit.
    pub fn read(reader: &mut BitReader) -> Result<Self> {
        if !reader.read_bit()? {
            return Err(Error::MissingTree);
        }
        let mut nodes = Vec::new();
        Self::read_rec(reader, &mut nodes)?;
        if reader.read_bit()? {
            return Err(Error::CorruptTree);
        }
        Ok(Self { nodes })
    }

    fn read_rec(reader: &mut BitReader, nodes: &mut Vec<Node>) -> Result<()> {
        if reader.read_bit()? {
            let branch = nodes.len();
            nodes.push(Node::Branch { one: 0 });
            Self::read_rec(reader, nodes)?;
            let one = nodes.len() as u32;
            nodes[branch] = Node::Branch { one };
            Self::read_rec(reader, nodes)
        } else {
            let value = reader.read_byte()?;
            nodes.push(Node::Leaf(value));
            Ok(())
        }
    }

    /// Descends one symbol's worth of bits from the root.
    pub fn lookup(&self, reader: &mut BitReader) -> Result<u8> {
        let mut index = 0usize;
        loop {
            match self.nodes[index] {
                Node::Branch { one } => {
                    index = if reader.read_bit()? { one as usize } else { index + 1 };
                }
                Node::Leaf(value) => return Ok(value),
            }
        }
    }
}

/// Accumulates symbol frequencies, then builds and packs an [`H8Tree`].
#[derive(Default)]
pub struct H8Builder {
    freq: BTreeMap<u8, u64>,
}

impl H8Builder {
    /// Creates an empty, frequency-free builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tallies one occurrence of `value`.
    pub fn record(&mut self, value: u8) {
        *self.freq.entry(value).or_insert(0) += 1;
    }

    /// Builds the optimal tree from tallied frequencies, writes its packed
    /// form (presence bit, recursive structure, trailing bit) to `writer`,
    /// and returns the per-symbol codes for subsequent literal writes.
    pub fn build(self, writer: &mut BitWriter) -> Result<H8Codes> {
        let leaves: Vec<(u8, u64)> = if self.freq.is_empty() { vec![(0, 1)] } else { self.freq.into_iter().collect() };

        let root = build::build(leaves);
        let codes = build::assign_codes(&root);

        writer.write(1, 1)?;
        build::walk(
            &root,
            &mut || writer.write(1, 1),
            &mut |symbol| {
                writer.write(0, 1)?;
                writer.write(u32::from(symbol), 8)
            },
        )?;
        writer.write(0, 1)?;

        Ok(H8Codes { codes })
    }
}

/// Per-symbol codes produced by [`H8Builder::build`].
pub struct H8Codes {
    codes: std::collections::HashMap<u8, Code>,
}

impl H8Codes {
    /// Writes `value`'s code to `writer`.
    pub fn write(&self, writer: &mut BitWriter, value: u8) -> Result<()> {
        let code = self.codes.get(&value).ok_or_else(|| Error::CorruptTree)?;
        writer.write(code.word, code.len)
    }
}
