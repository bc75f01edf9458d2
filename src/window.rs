use alloc::vec::Vec;

use crate::error::{CodecError, Result};

/// Output side of a decode: a buffer reserved for exactly the declared size.
///
/// Literals and back-references never grow the buffer past that size. A
/// back-reference that would overrun it is cut short at the limit.
#[derive(Debug)]
pub struct OutputWindow {
    buf: Vec<u8>,
    limit: usize,
}

impl OutputWindow {
    /// Reserves the full declared size up front.
    pub fn with_size(limit: usize) -> Result<Self> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(limit)
            .map_err(|_| CodecError::OutputTooLarge { size: limit })?;
        Ok(Self { buf, limit })
    }

    /// Number of bytes produced so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.buf.len() >= self.limit
    }

    #[inline]
    pub fn push_literal(&mut self, byte: u8) {
        if !self.is_full() {
            self.buf.push(byte);
        }
    }

    /// Copies `length` bytes starting `distance` bytes behind the write
    /// position.
    ///
    /// The source range may overlap the bytes being written (`distance <
    /// length`), so each byte is read only after the one before it has been
    /// written. With `distance == 1` this repeats the last byte.
    pub fn copy_backref(&mut self, distance: usize, length: usize) -> Result<()> {
        let position = self.buf.len();
        if distance == 0 || distance > position {
            return Err(CodecError::CorruptBackReference { distance, position });
        }

        let room = self.limit - position;
        if length > room {
            log::warn!(
                "Back-reference of {length} bytes at {position} truncated to the declared size {}",
                self.limit
            );
        }

        let mut src = position - distance;
        for _ in 0..length.min(room) {
            let byte = self.buf[src];
            self.buf.push(byte);
            src += 1;
        }
        Ok(())
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}
