//! # Nintendo LZ codecs
//!
//! `nintendo-lz` is a safe, pure-Rust implementation of the compression
//! formats found in Nintendo game archives and resource files:
//!
//! - **Yaz0 / Yaz1** (`.szs`): LZSS with a 16-byte big-endian header. Both
//!   decoding and encoding are supported.
//! - **LZ11**: LZSS with 2, 3 and 4-byte back-reference tokens. Decode only.
//! - **LH**: LZ77 tokens coded through two binary decode tables. Decode only.
//!
//! All codecs work on in-memory buffers, never panic on malformed input and
//! allocate the output once, at the size declared in the stream header.
//!
//! ## Example
//!
//! ```rust
//! use nintendo_lz::{Format, compress, decompress};
//!
//! let level = b"level data level data level data";
//! let packed = compress(level, 9).unwrap();
//! assert_eq!(Format::sniff(&packed), Some(Format::Yaz0));
//!
//! let unpacked = decompress(&packed).unwrap();
//! assert_eq!(unpacked, level);
//! ```
//!
//! ## Features
//!
//! - `parallel`: run [`decompress_batch`] on the rayon thread pool.

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod batch;
pub mod compress;
pub mod cursor;
pub mod decompress;
pub mod error;
pub mod lh;
pub mod lz11;
pub mod sniff;
pub mod window;
pub mod yaz0;

pub use batch::decompress_batch;
pub use compress::{CompressionLevel, compress, compress_with_level};
pub use decompress::decompress;
pub use error::{CodecError, Result};
pub use sniff::{Format, guess_extension, is_compressed};

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{Format, compress, decompress, is_compressed};

    #[test]
    fn test_round_trip() {
        let original = b"Hello world repeated Hello world repeated Hello world repeated";
        let compressed = compress(original, 9).unwrap();
        assert!(is_compressed(&compressed));
        assert_eq!(decompress(&compressed).unwrap(), original);
    }

    #[test]
    fn test_compress_rle() {
        let original = alloc::vec![b'A'; 100];
        let compressed = compress(&original, 1).unwrap();

        // Header, one code byte, one literal and one long token.
        assert_eq!(compressed.len(), 16 + 1 + 1 + 3);
        assert_eq!(decompress(&compressed).unwrap(), original);
    }

    #[test]
    fn test_incompressible() {
        let original: Vec<u8> = (0..200).map(|i| (i * 7) as u8).collect();
        let compressed = compress(&original, 9).unwrap();

        // Header + 25 code bytes + 200 literals.
        assert_eq!(compressed.len(), 16 + 25 + 200);
        assert_eq!(Format::Yaz0.decompress(&compressed).unwrap(), original);
    }
}
