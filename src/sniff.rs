//! Format detection by leading magic bytes.
//!
//! The checks are cheap heuristics, not proof: an uncompressed file that
//! happens to start with `0x11` or `@` is reported as LZ11 or LH. Callers
//! that know the container layout should pick the codec themselves.

use alloc::vec::Vec;
use core::fmt;

use crate::cursor::ByteCursor;
use crate::error::{CodecError, Result};
use crate::{compress, lh, lz11, yaz0};

/// Marker byte opening an LZ11 stream.
pub const LZ11_MAGIC: u8 = 0x11;

/// Marker byte opening an LH stream (`@`).
pub const LH_MAGIC: u8 = 0x40;

/// A compressed stream format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// `Yaz0` magic, big-endian size header.
    Yaz0,
    /// `Yaz1` magic; same layout as Yaz0.
    Yaz1,
    /// `0x11` marker, LZSS with 2/3/4-byte tokens.
    Lz11,
    /// `@` marker, LZ with two Huffman-style decode tables.
    Lh,
}

impl Format {
    /// Guesses the format from the leading bytes of `data`.
    #[must_use]
    pub fn sniff(data: &[u8]) -> Option<Self> {
        match data {
            [b'Y', b'a', b'z', b'0', ..] => Some(Self::Yaz0),
            [b'Y', b'a', b'z', b'1', ..] => Some(Self::Yaz1),
            [LZ11_MAGIC, ..] => Some(Self::Lz11),
            [LH_MAGIC, ..] => Some(Self::Lh),
            _ => None,
        }
    }

    /// Whether an encoder exists for this format.
    #[must_use]
    pub const fn can_compress(self) -> bool {
        matches!(self, Self::Yaz0 | Self::Yaz1)
    }

    /// Reads the decompressed size from the header without decoding.
    pub fn declared_size(self, data: &[u8]) -> Result<usize> {
        let mut cursor = ByteCursor::new(data);
        match self {
            Self::Yaz0 | Self::Yaz1 => yaz0::read_header(&mut cursor).map(|h| h.decompressed_size),
            Self::Lz11 | Self::Lh => read_nintendo_header(&mut cursor, self),
        }
    }

    pub fn decompress(self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Yaz0 | Self::Yaz1 => yaz0::decompress(data),
            Self::Lz11 => lz11::decompress(data),
            Self::Lh => lh::decompress(data),
        }
    }

    /// Compresses `data` into this format. Only the Yaz family has an encoder.
    pub fn compress(self, data: &[u8], level: u8) -> Result<Vec<u8>> {
        let level = compress::CompressionLevel::new(level);
        match self {
            Self::Yaz0 => compress::compress_with_magic(data, level, b"Yaz0"),
            Self::Yaz1 => compress::compress_with_magic(data, level, b"Yaz1"),
            Self::Lz11 | Self::Lh => Err(CodecError::UnsupportedOperation(self)),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Yaz0 => "Yaz0",
            Self::Yaz1 => "Yaz1",
            Self::Lz11 => "LZ11",
            Self::Lh => "LH",
        })
    }
}

/// Returns `true` if `data` looks like any supported compressed format.
#[must_use]
pub fn is_compressed(data: &[u8]) -> bool {
    Format::sniff(data).is_some()
}

/// Reads the 1-byte marker and 24-bit (or extended 32-bit) little-endian
/// size header used by LZ11 and LH.
pub(crate) fn read_nintendo_header(cursor: &mut ByteCursor<'_>, format: Format) -> Result<usize> {
    let expected = match format {
        Format::Lz11 => LZ11_MAGIC,
        _ => LH_MAGIC,
    };
    if cursor.read_u8()? != expected {
        return Err(CodecError::InvalidMagic { expected: format });
    }
    let size = match cursor.read_u24_le()? {
        0 => cursor.read_u32_le()?,
        short => short,
    };
    log::debug!(
        "{format} header: {size} bytes, payload at {}",
        cursor.position()
    );
    Ok(size as usize)
}

/// Guesses a file extension for already decompressed data.
#[must_use]
pub fn guess_extension(data: &[u8]) -> &'static str {
    let magic = data.get(..4).unwrap_or_default();
    match magic {
        b"FRES" => ".bfres",
        b"FFNT" => ".bffnt",
        b"BNTX" => ".bntx",
        b"BNSH" => ".bnsh",
        b"FLAN" => ".bflan",
        b"FLYT" => ".bflyt",
        b"Gfx2" => ".gtx",
        b"SARC" => ".sarc",
        b"Yaz0" => ".szs",
        _ if has_flim_footer(data) => ".bflim",
        _ => ".bin",
    }
}

fn has_flim_footer(data: &[u8]) -> bool {
    data.len() >= 0x28 && &data[data.len() - 0x28..data.len() - 0x24] == b"FLIM"
}
