//! LH decoding: LZ77 tokens coded through two binary decode tables.
//!
//! After the usual `@` marker and size header come two table segments
//! ("pieces"): a 9-bit table resolving literal/length symbols and a 5-bit
//! table resolving distance bit counts. The token stream that follows is read
//! one bit at a time, MSB first.
//!
//! A table is an array of 16-bit nodes. Node 1 is the root; node 0 is never
//! used. For a node with value `v` at index `n`, the children taken on bit `b`
//! sit at `(n & !1) + 2 * (offset + 1) + b`, where `offset` is the low
//! `depth - 2` bits of `v`. Bit `depth - 1` of `v` marks the 0-child as a leaf
//! and bit `depth - 2` marks the 1-child; a leaf node holds the symbol itself.

use alloc::vec;
use alloc::vec::Vec;

use crate::cursor::ByteCursor;
use crate::error::{CodecError, Result};
use crate::sniff::{Format, read_nintendo_header};
use crate::window::OutputWindow;

/// Bit width of literal/length table entries.
const LITERAL_DEPTH: u32 = 9;

/// Bit width of distance table entries.
const DISTANCE_DEPTH: u32 = 5;

/// Minimum back-reference length.
const MIN_MATCH: usize = 3;

/// A decode table built from one piece of the stream header.
#[derive(Debug, Clone)]
pub struct DecodeTable {
    nodes: Vec<u16>,
    depth: u32,
}

impl DecodeTable {
    /// Builds a table of `2 << depth` nodes from the piece at the cursor.
    ///
    /// The piece starts with a count `c` (one byte for depths up to 8, two
    /// little-endian bytes above) and spans `(c + 1) * 4` bytes including the
    /// count. Its body is a big-endian stream of `depth`-bit values filling
    /// nodes 1, 2, 3, ... in order. Bytes are pulled only when fewer than
    /// `depth` bits are buffered, so the last refill may reach past the
    /// nominal piece end; the cursor ends after the last byte actually read.
    pub fn load(cursor: &mut ByteCursor<'_>, depth: u32) -> Result<Self> {
        let start = cursor.position();
        let mut nodes = vec![0u16; 2 << depth];
        let mask = (1u32 << depth) - 1;

        let count = if depth <= 8 {
            usize::from(cursor.read_u8()?)
        } else {
            usize::from(cursor.read_u16_le()?)
        };
        let piece_len = (count + 1) * 4;

        let mut shift_reg: u32 = 0;
        let mut buffered: u32 = 0;
        let mut next = 1;

        while cursor.position() - start < piece_len {
            if buffered < depth {
                let refill = (depth + 7 - buffered) >> 3;
                for _ in 0..refill {
                    shift_reg = (shift_reg << 8) | u32::from(cursor.read_u8()?);
                }
                buffered += refill << 3;
            }

            if next < nodes.len() {
                nodes[next] = ((shift_reg >> (buffered - depth)) & mask) as u16;
                next += 1;
            }
            buffered -= depth;
        }

        log::trace!(
            "LH {depth}-bit table: {} nodes from {} bytes",
            next - 1,
            cursor.position() - start
        );
        Ok(Self { nodes, depth })
    }

    fn node(&self, index: usize) -> Result<u16> {
        self.nodes
            .get(index)
            .copied()
            .ok_or(CodecError::CorruptCodeTable { node: index })
    }

    /// Walks from the root, one input bit per level, to a leaf symbol.
    pub fn decode(&self, bits: &mut BitReader<'_>) -> Result<u16> {
        let offset_mask = (1u16 << (self.depth - 2)) - 1;
        let leaf_flag = 1u16 << (self.depth - 1);
        let mut index = 1;

        loop {
            let value = self.node(index)?;
            let bit = bits.read_bit()?;
            let offset = usize::from(value & offset_mask);
            let child = (index & !1) + 2 * (offset + 1) + usize::from(bit);

            if value & (leaf_flag >> bit) != 0 {
                return self.node(child);
            }
            index = child;
        }
    }
}

/// MSB-first bit reader over the token stream.
#[derive(Debug)]
pub struct BitReader<'a> {
    cursor: ByteCursor<'a>,
    current: u8,
    bits_left: u32,
}

impl<'a> BitReader<'a> {
    #[must_use]
    pub const fn new(cursor: ByteCursor<'a>) -> Self {
        Self {
            cursor,
            current: 0,
            bits_left: 0,
        }
    }

    pub fn read_bit(&mut self) -> Result<u8> {
        if self.bits_left == 0 {
            self.current = self.cursor.read_u8()?;
            self.bits_left = 8;
        }
        self.bits_left -= 1;
        Ok((self.current >> self.bits_left) & 1)
    }

    /// Reads `count` bits as a big-endian integer.
    pub fn read_bits(&mut self, count: u32) -> Result<u32> {
        let mut value = 0;
        for _ in 0..count {
            value = (value << 1) | u32::from(self.read_bit()?);
        }
        Ok(value)
    }
}

/// Decompresses a complete LH stream.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    let mut cursor = ByteCursor::new(input);
    let size = read_nintendo_header(&mut cursor, Format::Lh)?;
    let mut output = OutputWindow::with_size(size)?;

    let literals = DecodeTable::load(&mut cursor, LITERAL_DEPTH)?;
    let distances = DecodeTable::load(&mut cursor, DISTANCE_DEPTH)?;
    let mut bits = BitReader::new(cursor);

    while !output.is_full() {
        let symbol = literals.decode(&mut bits)?;
        if symbol < 0x100 {
            output.push_literal(symbol as u8);
            continue;
        }

        let length = usize::from(symbol & 0xFF) + MIN_MATCH;
        let distance = read_distance(&distances, &mut bits)?;
        output.copy_backref(distance, length)?;
    }

    Ok(output.into_inner())
}

/// Resolves a distance: the table gives a bit count `k`; `k == 0` means
/// distance 1, otherwise a leading 1 and `k - 1` raw bits form `distance - 1`.
///
/// The distance register is 16 bits wide, so an offset of `0xFFFF` wraps to
/// distance 0 and is rejected by the copy.
fn read_distance(table: &DecodeTable, bits: &mut BitReader<'_>) -> Result<usize> {
    let width = u32::from(table.decode(bits)?);
    let offset = match width {
        0 => 0,
        _ => {
            let tail = bits.read_bits(width - 1)?;
            (1u32 << (width - 1)) | tail
        }
    };
    Ok(((offset + 1) & 0xFFFF) as usize)
}
