#![no_main]

use libfuzzer_sys::fuzz_target;
use nintendo_lz::{compress, decompress, lh, lz11, yaz0};

/// Feeds arbitrary bytes to every decoder.
///
/// Each call must return `Ok` or `Err`; a panic or an output longer than the
/// declared size is a failure.
fn verify_decompression_robustness(data: &[u8]) {
    let _ = decompress(data);
    let _ = yaz0::decompress(data);
    let _ = lz11::decompress(data);
    let _ = lh::decompress(data);
}

/// Verifies `decompress(compress(data)) == data` at a level taken from the
/// first input byte.
fn verify_round_trip(data: &[u8]) {
    let level = data.first().map_or(1, |b| b % 10);
    let compressed = compress(data, level).expect("input fits the size header");

    match decompress(&compressed) {
        Ok(decompressed) => {
            if decompressed != data {
                panic!(
                    "Round-trip mismatch!\nInput len: {}\nCompressed len: {}\nDecompressed len: {}",
                    data.len(),
                    compressed.len(),
                    decompressed.len()
                );
            }
        }
        Err(e) => {
            panic!(
                "Round-trip failed! Decompressor rejected valid compressed data.\nError: {:?}\nInput len: {}",
                e,
                data.len()
            );
        }
    }
}

fuzz_target!(|data: &[u8]| {
    verify_decompression_robustness(data);
    verify_round_trip(data);
});
