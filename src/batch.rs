//! Decoding many independent streams at once.
//!
//! Streams share no state, so with the `parallel` feature the batch is spread
//! over the rayon thread pool. Without it the same call runs sequentially.

use alloc::vec::Vec;

use crate::decompress::decompress;
use crate::error::Result;

/// Decompresses every input, keeping results in input order.
#[cfg(feature = "parallel")]
pub fn decompress_batch<T: AsRef<[u8]> + Sync>(inputs: &[T]) -> Vec<Result<Vec<u8>>> {
    use rayon::prelude::*;

    inputs
        .par_iter()
        .map(|input| decompress(input.as_ref()))
        .collect()
}

/// Decompresses every input, keeping results in input order.
#[cfg(not(feature = "parallel"))]
pub fn decompress_batch<T: AsRef<[u8]> + Sync>(inputs: &[T]) -> Vec<Result<Vec<u8>>> {
    inputs
        .iter()
        .map(|input| decompress(input.as_ref()))
        .collect()
}
