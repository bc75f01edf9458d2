use thiserror::Error;

use crate::sniff::Format;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Stream does not start with the {expected} marker")]
    InvalidMagic { expected: Format },

    #[error("Stream does not start with a known compression marker")]
    UnknownFormat,

    #[error("Unexpected end of stream at input offset {offset}")]
    TruncatedStream { offset: usize },

    #[error("Back-reference distance {distance} out of bounds at output position {position}")]
    CorruptBackReference { distance: usize, position: usize },

    #[error("{0} streams can only be decompressed")]
    UnsupportedOperation(Format),

    #[error("Decode table walk left the table at node {node}")]
    CorruptCodeTable { node: usize },

    #[error("Declared output size {size} cannot be allocated")]
    OutputTooLarge { size: usize },

    #[error("Input of {size} bytes does not fit the 32-bit size header")]
    InputTooLarge { size: usize },
}

pub type Result<T> = core::result::Result<T, CodecError>;
