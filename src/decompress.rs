use alloc::vec::Vec;

use crate::error::{CodecError, Result};
use crate::sniff::Format;

/// Decompresses a stream of any supported format.
///
/// The format is picked by [`Format::sniff`] from the leading bytes. Use
/// [`Format::decompress`] or the per-format modules when the format is
/// already known.
///
/// # Errors
/// [`CodecError::UnknownFormat`] when no marker matches, otherwise whatever
/// the selected decoder reports. No partial output is returned.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    let format = Format::sniff(input).ok_or(CodecError::UnknownFormat)?;
    format.decompress(input)
}
