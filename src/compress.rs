use alloc::vec::Vec;

use crate::error::{CodecError, Result};
use crate::yaz0::{HEADER_SIZE, LONG_MATCH_BIAS, SHORT_MATCH_BIAS};

/// Largest distance a token can express (12 bits + 1).
const MAX_WINDOW: usize = 0x1000;

/// Minimum match length required to encode a back-reference.
const MIN_MATCH: usize = 3;

/// Longest match the 3-byte token can express (0xFF + 0x12).
const MAX_MATCH: usize = 0xFF + LONG_MATCH_BIAS;

/// Longest match that still fits the 2-byte token.
const MAX_SHORT_MATCH: usize = 0x0F + SHORT_MATCH_BIAS;

/// Hash mask for the 4096-entry bucket table (12 bits).
const HASH_MASK: usize = 0xFFF;

/// Marker for an empty hash table entry.
const EMPTY_ENTRY: usize = usize::MAX;

/// Trade-off between encoding speed and output size, from 0 to 9.
///
/// Level 0 stores every byte as a literal. Higher levels widen the search
/// window (256 bytes at level 1, the full 4096 at level 9) and follow longer
/// hash chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    pub const NONE: Self = Self(0);
    pub const FAST: Self = Self(1);
    pub const BEST: Self = Self(9);

    /// Creates a level, clamping values above 9.
    #[must_use]
    pub fn new(level: u8) -> Self {
        if level > Self::BEST.0 {
            log::warn!("Compression level {level} clamped to {}", Self::BEST.0);
            return Self::BEST;
        }
        Self(level)
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// How far back a match may start.
    const fn window(self) -> usize {
        (0x10E0 * self.0 as usize / 9).saturating_sub(0xE0)
    }

    /// Maximum number of hash chain entries to inspect per position.
    const fn search_depth(self) -> usize {
        1 << (self.0 + 3)
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::FAST
    }
}

impl From<u8> for CompressionLevel {
    fn from(level: u8) -> Self {
        Self::new(level)
    }
}

/// One code byte and the (up to 8) tokens it governs.
///
/// Code bits are assigned from the MSB down: 1 = literal, 0 = back-reference.
struct CodeGroup {
    code: u8,
    item_count: usize,
    buffer: [u8; 24], // Max size: 8 long tokens * 3 bytes
    buffer_len: usize,
}

impl CodeGroup {
    const fn new() -> Self {
        Self {
            code: 0,
            item_count: 0,
            buffer: [0; 24],
            buffer_len: 0,
        }
    }

    fn push_literal(&mut self, byte: u8, output: &mut Vec<u8>) {
        self.code |= 0x80 >> self.item_count;
        self.buffer[self.buffer_len] = byte;
        self.buffer_len += 1;
        self.commit_item(output);
    }

    /// Adds a back-reference token. `length` must be in `MIN_MATCH..=MAX_MATCH`
    /// and `distance` in `1..=MAX_WINDOW`.
    fn push_match(&mut self, distance: usize, length: usize, output: &mut Vec<u8>) {
        let delta = distance - 1;
        let hi = (delta >> 8) as u8;
        let lo = (delta & 0xFF) as u8;

        if length <= MAX_SHORT_MATCH {
            let nibble = (length - SHORT_MATCH_BIAS) as u8;
            self.extend(&[(nibble << 4) | hi, lo]);
        } else {
            let extra = (length - LONG_MATCH_BIAS) as u8;
            self.extend(&[hi, lo, extra]);
        }
        self.commit_item(output);
    }

    fn extend(&mut self, bytes: &[u8]) {
        self.buffer[self.buffer_len..self.buffer_len + bytes.len()].copy_from_slice(bytes);
        self.buffer_len += bytes.len();
    }

    fn commit_item(&mut self, output: &mut Vec<u8>) {
        self.item_count += 1;
        if self.item_count == 8 {
            self.flush(output);
        }
    }

    /// Writes the group; unused code bits stay zero.
    fn flush(&mut self, output: &mut Vec<u8>) {
        if self.item_count > 0 {
            output.push(self.code);
            output.extend_from_slice(&self.buffer[..self.buffer_len]);
            self.code = 0;
            self.item_count = 0;
            self.buffer_len = 0;
        }
    }
}

/// Hash chains over the sliding window.
///
/// `head` maps a 3-byte hash to the most recent position with that hash,
/// `prev` maps a position (modulo the window) to the previous one.
struct MatchFinder {
    head: Vec<usize>,
    prev: Vec<usize>,
}

impl MatchFinder {
    fn new() -> Self {
        Self {
            head: alloc::vec![EMPTY_ENTRY; HASH_MASK + 1],
            prev: alloc::vec![EMPTY_ENTRY; MAX_WINDOW],
        }
    }

    /// Records `idx`. Called for every input byte, including those covered by
    /// a match, so later searches can find overlapping runs.
    fn insert(&mut self, input: &[u8], idx: usize) {
        if idx + MIN_MATCH <= input.len() {
            let h = hash_3_bytes(&input[idx..idx + MIN_MATCH]);
            self.prev[idx % MAX_WINDOW] = self.head[h];
            self.head[h] = idx;
        }
    }

    /// Finds the longest earlier match for `input[pos..]` as `(distance, length)`.
    fn longest_match(
        &self,
        input: &[u8],
        pos: usize,
        level: CompressionLevel,
    ) -> Option<(usize, usize)> {
        if pos + MIN_MATCH > input.len() {
            return None;
        }

        let window = level.window();
        let max_len = (input.len() - pos).min(MAX_MATCH);
        let mut best_len = 0;
        let mut best_dist = 0;

        let mut candidate = self.head[hash_3_bytes(&input[pos..pos + MIN_MATCH])];
        let mut depth = 0;

        while candidate != EMPTY_ENTRY && depth < level.search_depth() {
            if candidate >= pos {
                break;
            }
            let dist = pos - candidate;
            if dist > window {
                break;
            }

            // Check the byte at `best_len` first to fail fast.
            if best_len < max_len && input[candidate + best_len] == input[pos + best_len] {
                let len = common_prefix_len(&input[pos..], &input[candidate..], max_len);
                if len > best_len {
                    best_len = len;
                    best_dist = dist;
                    if len == max_len {
                        break;
                    }
                }
            }

            candidate = self.prev[candidate % MAX_WINDOW];
            depth += 1;
        }

        (best_len >= MIN_MATCH).then_some((best_dist, best_len))
    }
}

/// Compresses `input` into a complete Yaz0 stream.
///
/// Matches are chosen greedily; the result always decodes back to `input`
/// but is not guaranteed to be the smallest encoding. Incompressible data
/// grows by one code byte per eight input bytes plus the header.
///
/// # Errors
/// Fails only when `input` is too large for the 32-bit size header.
pub fn compress(input: &[u8], level: u8) -> Result<Vec<u8>> {
    compress_with_level(input, CompressionLevel::new(level))
}

/// Like [`compress`], with an already validated level.
pub fn compress_with_level(input: &[u8], level: CompressionLevel) -> Result<Vec<u8>> {
    compress_with_magic(input, level, b"Yaz0")
}

/// Encodes `input` behind the given Yaz-family magic.
pub(crate) fn compress_with_magic(
    input: &[u8],
    level: CompressionLevel,
    magic: &[u8; 4],
) -> Result<Vec<u8>> {
    let size = u32::try_from(input.len())
        .map_err(|_| CodecError::InputTooLarge { size: input.len() })?;

    let mut output = Vec::with_capacity(HEADER_SIZE + input.len() + input.len() / 8 + 1);
    output.extend_from_slice(magic);
    output.extend_from_slice(&size.to_be_bytes());
    output.extend_from_slice(&[0; 8]);

    if level == CompressionLevel::NONE {
        store_literals(input, &mut output);
    } else {
        compress_greedy(input, level, &mut output);
    }

    log::debug!(
        "Yaz0 level {}: {} -> {} bytes",
        level.get(),
        input.len(),
        output.len()
    );
    Ok(output)
}

fn store_literals(input: &[u8], output: &mut Vec<u8>) {
    let mut group = CodeGroup::new();
    for &byte in input {
        group.push_literal(byte, output);
    }
    group.flush(output);
}

fn compress_greedy(input: &[u8], level: CompressionLevel, output: &mut Vec<u8>) {
    let mut finder = MatchFinder::new();
    let mut group = CodeGroup::new();
    let mut pos = 0;

    while pos < input.len() {
        match finder.longest_match(input, pos, level) {
            Some((distance, length)) => {
                group.push_match(distance, length, output);
                for idx in pos..pos + length {
                    finder.insert(input, idx);
                }
                pos += length;
            }
            None => {
                group.push_literal(input[pos], output);
                finder.insert(input, pos);
                pos += 1;
            }
        }
    }

    group.flush(output);
}

/// Hashes the first 3 bytes of a slice for the bucket lookup.
#[inline]
fn hash_3_bytes(b: &[u8]) -> usize {
    let h = ((b[0] as usize) << 6) ^ ((b[1] as usize) << 3) ^ (b[2] as usize);
    h & HASH_MASK
}

/// Finds the length of the common prefix between two slices, up to `max`.
#[inline]
fn common_prefix_len(a: &[u8], b: &[u8], max: usize) -> usize {
    a.iter()
        .zip(b)
        .take(max)
        .take_while(|(x, y)| x == y)
        .count()
}
