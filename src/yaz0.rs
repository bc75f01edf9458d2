//! Yaz0 / Yaz1 decoding.
//!
//! Layout: a 16-byte header followed by groups of one code byte and up to
//! eight tokens. Code bits are consumed from the most significant bit down;
//! a set bit is a literal byte, a clear bit is a back-reference:
//!
//! ```text
//! NR RR        length = N + 2            (N in 1..=15)
//! 0R RR LL     length = LL + 0x12
//!              distance = RRR + 1        (12 bits)
//! ```

use alloc::vec::Vec;

use crate::cursor::ByteCursor;
use crate::error::{CodecError, Result};
use crate::sniff::Format;
use crate::window::OutputWindow;

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 16;

/// Added to the 3rd token byte in the long form.
pub(crate) const LONG_MATCH_BIAS: usize = 0x12;

/// Added to the nibble in the short form.
pub(crate) const SHORT_MATCH_BIAS: usize = 2;

/// Parsed Yaz0/Yaz1 header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub format: Format,
    pub decompressed_size: usize,
}

/// Parses the 16-byte header, leaving `cursor` at the first code byte.
///
/// A zero size word means the following word holds the real size.
pub fn read_header(cursor: &mut ByteCursor<'_>) -> Result<Header> {
    let format = match cursor.read_bytes(4)? {
        b"Yaz0" => Format::Yaz0,
        b"Yaz1" => Format::Yaz1,
        _ => {
            return Err(CodecError::InvalidMagic {
                expected: Format::Yaz0,
            });
        }
    };

    let size = match cursor.read_u32_be()? {
        0 => {
            let extended = cursor.read_u32_be()?;
            cursor.advance(4)?;
            extended
        }
        short => {
            cursor.advance(8)?;
            short
        }
    };
    let decompressed_size = size as usize;

    log::debug!(
        "{format} header: {decompressed_size} bytes, payload at {}",
        cursor.position()
    );
    Ok(Header {
        format,
        decompressed_size,
    })
}

/// Decompresses a complete Yaz0 or Yaz1 stream.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    let mut cursor = ByteCursor::new(input);
    let header = read_header(&mut cursor)?;
    let mut output = OutputWindow::with_size(header.decompressed_size)?;

    while !output.is_full() {
        let code = cursor.read_u8()?;

        for bit in 0..8 {
            if output.is_full() {
                // Unused decisions of the last code byte.
                break;
            }

            if code & (0x80 >> bit) != 0 {
                output.push_literal(cursor.read_u8()?);
                continue;
            }

            let b1 = cursor.read_u8()?;
            let b2 = cursor.read_u8()?;
            let distance = ((usize::from(b1 & 0x0F) << 8) | usize::from(b2)) + 1;
            let length = match b1 >> 4 {
                0 => usize::from(cursor.read_u8()?) + LONG_MATCH_BIAS,
                n => usize::from(n) + SHORT_MATCH_BIAS,
            };
            output.copy_backref(distance, length)?;
        }
    }

    Ok(output.into_inner())
}
