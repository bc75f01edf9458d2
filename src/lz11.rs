//! LZ11 decoding.
//!
//! Flag bits are read MSB first; a clear bit is a literal byte, a set bit a
//! back-reference. The high nibble of a reference's first byte picks its
//! size:
//!
//! ```text
//! 0 : 0L LR RR         length = L + 0x11,   8-bit L
//! 1 : 1L LL LR RR      length = L + 0x111, 16-bit L
//! n : LR RR            length = n + 1       (n >= 2)
//!                      distance = R + 1,    12-bit R
//! ```

use alloc::vec::Vec;

use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::sniff::{Format, read_nintendo_header};
use crate::window::OutputWindow;

/// Bias of the 3-byte token length.
const MEDIUM_MATCH_BIAS: usize = 0x11;

/// Bias of the 4-byte token length.
const LONG_MATCH_BIAS: usize = 0x111;

/// Decompresses a complete LZ11 stream.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    let mut cursor = ByteCursor::new(input);
    let size = read_nintendo_header(&mut cursor, Format::Lz11)?;
    let mut output = OutputWindow::with_size(size)?;

    while !output.is_full() {
        let flags = cursor.read_u8()?;

        for bit in 0..8 {
            if output.is_full() {
                break;
            }

            if flags & (0x80 >> bit) == 0 {
                output.push_literal(cursor.read_u8()?);
            } else {
                let (distance, length) = read_reference(&mut cursor)?;
                output.copy_backref(distance, length)?;
            }
        }
    }

    Ok(output.into_inner())
}

/// Reads one 2, 3 or 4-byte back-reference token as `(distance, length)`.
fn read_reference(cursor: &mut ByteCursor<'_>) -> Result<(usize, usize)> {
    let b1 = usize::from(cursor.read_u8()?);
    let b2 = usize::from(cursor.read_u8()?);

    let token = match b1 >> 4 {
        0 => {
            let b3 = usize::from(cursor.read_u8()?);
            let length = (((b1 & 0xF) << 4) | (b2 >> 4)) + MEDIUM_MATCH_BIAS;
            let distance = (((b2 & 0xF) << 8) | b3) + 1;
            (distance, length)
        }
        1 => {
            let b3 = usize::from(cursor.read_u8()?);
            let b4 = usize::from(cursor.read_u8()?);
            let length = (((b1 & 0xF) << 12) | (b2 << 4) | (b3 >> 4)) + LONG_MATCH_BIAS;
            let distance = (((b3 & 0xF) << 8) | b4) + 1;
            (distance, length)
        }
        n => {
            let distance = (((b1 & 0xF) << 8) | b2) + 1;
            (distance, n + 1)
        }
    };
    Ok(token)
}
