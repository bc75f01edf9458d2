use nintendo_lz::{CodecError, Format, compress, decompress, is_compressed, lz11, yaz0};

// --- Test Constants ---

/// Size of the Yaz0 header that precedes the first code byte.
const HEADER_SIZE: usize = 16;

// --- Helpers ---

/// Performs a full compress-decompress cycle at `level` and asserts bit-exact
/// reconstruction.
#[track_caller]
fn assert_round_trip_at(input: &[u8], level: u8) {
    let compressed = compress(input, level).expect("compression failed");
    match decompress(&compressed) {
        Ok(output) => assert_eq!(output, input, "Round-trip output mismatches input"),
        Err(e) => panic!("Decompression failed during round-trip: {e:?}"),
    }
}

/// Round-trips at the fastest, default-ish and best levels.
#[track_caller]
fn assert_round_trip(input: &[u8]) {
    for level in [0, 1, 5, 9] {
        assert_round_trip_at(input, level);
    }
}

/// Builds a Yaz0 stream from the two size words and a raw payload.
fn yaz0_stream(size: u32, extended: u32, payload: &[u8]) -> Vec<u8> {
    let mut data = b"Yaz0".to_vec();
    data.extend_from_slice(&size.to_be_bytes());
    data.extend_from_slice(&extended.to_be_bytes());
    data.extend_from_slice(&[0; 4]);
    data.extend_from_slice(payload);
    data
}

/// Reads the declared size from the Yaz0 header.
fn declared_size(data: &[u8]) -> u32 {
    u32::from_be_bytes([data[4], data[5], data[6], data[7]])
}

// --- Basic Sanity & Boundaries (Tests 1-8) ---

/// Test: Empty input is a bare header and decodes to nothing.
#[test]
fn t01_empty_input() {
    let compressed = compress(b"", 9).unwrap();
    assert_eq!(compressed.len(), HEADER_SIZE);
    assert_round_trip(b"");
}

/// Test: Single byte input: one code byte, one literal.
#[test]
fn t02_single_byte() {
    let compressed = compress(b"A", 9).unwrap();
    assert_eq!(compressed.len(), HEADER_SIZE + 2);
    assert_eq!(compressed[HEADER_SIZE], 0x80);
    assert_eq!(declared_size(&compressed), 1);
    assert_round_trip(b"A");
}

/// Test: Input exactly matching the window size (4096).
#[test]
fn t03_exact_window() {
    let input: Vec<u8> = (0..4096).map(|i| (i % 251) as u8).collect();
    assert_round_trip(&input);
}

/// Test: Input slightly larger than the window (4097).
#[test]
fn t04_window_plus_one() {
    let input: Vec<u8> = (0..4097).map(|i| (i % 251) as u8).collect();
    assert_round_trip(&input);
}

/// Test: Well past the window (3 * 4096 + 17).
#[test]
fn t05_beyond_window() {
    let input: Vec<u8> = (0..3 * 4096 + 17).map(|i| ((i * 31) % 253) as u8).collect();
    assert_round_trip(&input);
}

/// Test: Magic bytes of the output.
#[test]
fn t06_output_magic() {
    let compressed = compress(b"abc", 3).unwrap();
    assert_eq!(&compressed[..4], b"Yaz0");
    assert!(is_compressed(&compressed));
    assert_eq!(Format::sniff(&compressed), Some(Format::Yaz0));
}

/// Test: Fixed literal fixture.
#[test]
fn t07_literal_fixture() {
    let data = yaz0_stream(5, 0, &[0xFF, 0x41, 0x42, 0x43, 0x44, 0x45]);
    assert_eq!(decompress(&data).unwrap(), b"ABCDE");
}

/// Test: Levels above 9 are clamped rather than rejected.
#[test]
fn t08_level_clamped() {
    let input = b"clamp clamp clamp clamp";
    assert_eq!(compress(input, 200).unwrap(), compress(input, 9).unwrap());
}

// --- Compression Logic & Patterns (Tests 9-18) ---

/// Test: 1000 repeats become a literal plus distance-1 references.
#[test]
fn t09_run_uses_distance_one() {
    let input = vec![b'A'; 1000];
    let compressed = compress(&input, 9).unwrap();

    let code = compressed[HEADER_SIZE];
    assert_eq!(code & 0xC0, 0x80, "literal followed by a reference");
    assert_eq!(compressed[HEADER_SIZE + 1], b'A');
    let b1 = compressed[HEADER_SIZE + 2];
    let b2 = compressed[HEADER_SIZE + 3];
    let distance = ((usize::from(b1 & 0x0F) << 8) | usize::from(b2)) + 1;
    assert_eq!(distance, 1);

    assert!(compressed.len() < 40);
    assert_eq!(decompress(&compressed).unwrap(), input);
}

/// Test: All zeros (common padding pattern).
#[test]
fn t10_all_zeros() {
    let input = vec![0u8; 1024];
    let compressed = compress(&input, 9).unwrap();
    assert!(compressed.len() < 40);
    assert_round_trip(&input);
}

/// Test: Alternating pattern (0xAA, 0x55).
#[test]
fn t11_alternating_pattern() {
    let input: Vec<u8> = (0..1000)
        .map(|i| if i % 2 == 0 { 0xAA } else { 0x55 })
        .collect();
    let compressed = compress(&input, 9).unwrap();
    assert!(compressed.len() < 50);
    assert_round_trip(&input);
}

/// Test: Incrementing pattern has no matches; all literals.
#[test]
fn t12_incrementing_pattern_incompressible() {
    let input: Vec<u8> = (0..=255).collect();
    let compressed = compress(&input, 9).unwrap();
    assert_eq!(compressed.len(), HEADER_SIZE + 32 + 256);
    assert!(compressed[HEADER_SIZE..].chunks(9).all(|g| g[0] == 0xFF));
    assert_round_trip(&input);
}

/// Test: Overlapping match shorter than a token needs.
#[test]
fn t13_overlapping_match() {
    assert_round_trip(b"aaaaa");
}

/// Test: Distant match right at the 4096-byte window edge.
#[test]
fn t14_distant_match() {
    let mut input = Vec::new();
    input.extend_from_slice(b"ABCDEFGH");
    input.extend((0..4088).map(|i| (i % 199) as u8 | 0x80));
    input.extend_from_slice(b"ABCDEFGH");
    assert_eq!(input.len(), 4104);
    assert_round_trip(&input);
}

/// Test: Repetitive text compresses well at both ends of the level range.
#[test]
fn t15_level_ratio() {
    let phrase = b"The quick brown fox jumps over the lazy dog. ";
    let mut input = Vec::new();
    for i in 0..200 {
        input.extend_from_slice(phrase);
        input.extend_from_slice(format!("{i:04}").as_bytes());
    }
    for level in [1, 9] {
        let compressed = compress(&input, level).unwrap();
        assert!(compressed.len() < input.len() / 4);
    }
    assert_round_trip(&input);
}

/// Test: Match lengths straddling the short/long token boundary (17/18).
#[test]
fn t16_token_length_boundary() {
    for run in [3usize, 17, 18, 19, 273, 274, 275] {
        let mut input = b"xy".to_vec();
        input.extend(vec![b'z'; run]);
        input.extend_from_slice(b"xy");
        assert_round_trip(&input);
    }
}

/// Test: Level 0 output is one 0xFF code byte per 8 literals.
#[test]
fn t17_level_zero_layout() {
    let input = vec![b'Q'; 24];
    let compressed = compress(&input, 0).unwrap();
    assert_eq!(compressed.len(), HEADER_SIZE + 3 + 24);
    assert_eq!(compressed[HEADER_SIZE], 0xFF);
    assert_eq!(compressed[HEADER_SIZE + 9], 0xFF);
    assert_eq!(compressed[HEADER_SIZE + 18], 0xFF);
}

/// Test: Compressed output can itself be compressed and restored.
#[test]
fn t18_recursive_compression() {
    let input = b"Hello world repeated Hello world repeated";
    let comp1 = compress(input, 9).unwrap();
    let comp2 = compress(&comp1, 9).unwrap();

    let out_comp1 = decompress(&comp2).unwrap();
    assert_eq!(out_comp1, comp1);
    assert_eq!(decompress(&out_comp1).unwrap(), input);
}

// --- Decompression Error Handling (Tests 19-28) ---

/// Test: Header cut short.
#[test]
fn t19_truncated_header() {
    assert_eq!(
        decompress(b"Yaz0\0\0"),
        Err(CodecError::TruncatedStream { offset: 6 })
    );
}

/// Test: Missing final literal byte.
#[test]
fn t20_missing_final_literal() {
    let data = yaz0_stream(5, 0, &[0xFF, b'A', b'B', b'C', b'D']);
    assert_eq!(
        decompress(&data),
        Err(CodecError::TruncatedStream { offset: data.len() })
    );
}

/// Test: Missing code byte after the header.
#[test]
fn t21_missing_code_byte() {
    let data = yaz0_stream(1, 0, &[]);
    assert_eq!(
        decompress(&data),
        Err(CodecError::TruncatedStream { offset: 16 })
    );
}

/// Test: Reference token cut after its first byte.
#[test]
fn t22_truncated_reference() {
    let data = yaz0_stream(8, 0, &[0x80, b'A', 0x30]);
    assert_eq!(
        decompress(&data),
        Err(CodecError::TruncatedStream { offset: data.len() })
    );
}

/// Test: Long-form reference missing its length byte.
#[test]
fn t23_truncated_long_reference() {
    let data = yaz0_stream(40, 0, &[0x80, b'A', 0x00, 0x00]);
    assert_eq!(
        decompress(&data),
        Err(CodecError::TruncatedStream { offset: data.len() })
    );
}

/// Test: Reference before any output exists.
#[test]
fn t24_reference_into_nothing() {
    let data = yaz0_stream(3, 0, &[0x00, 0x10, 0x00]);
    assert_eq!(
        decompress(&data),
        Err(CodecError::CorruptBackReference {
            distance: 1,
            position: 0
        })
    );
}

/// Test: Reference further back than the output written so far.
#[test]
fn t25_reference_too_far() {
    // "AB", then distance 10.
    let data = yaz0_stream(6, 0, &[0xC0, b'A', b'B', 0x20, 0x09]);
    assert_eq!(
        decompress(&data),
        Err(CodecError::CorruptBackReference {
            distance: 10,
            position: 2
        })
    );
}

/// Test: Wrong magic on a Yaz0-only entry point.
#[test]
fn t26_wrong_magic() {
    let mut data = yaz0_stream(1, 0, &[0x80, b'A']);
    data[..4].copy_from_slice(b"Yaz9");
    assert_eq!(
        yaz0::decompress(&data),
        Err(CodecError::InvalidMagic {
            expected: Format::Yaz0
        })
    );
    assert_eq!(decompress(&data), Err(CodecError::UnknownFormat));
}

/// Test: Random noise never panics.
#[test]
fn t27_noise_does_not_panic() {
    let mut seed: u32 = 0xDEAD_BEEF;
    for len in 0..300 {
        let mut data = b"Yaz0\0\0\x01\0\0\0\0\0\0\0\0\0".to_vec();
        for _ in 0..len {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            data.push((seed >> 24) as u8);
        }
        let _ = decompress(&data);
    }
}

/// Test: Compression is not offered for the decode-only formats.
#[test]
fn t28_unsupported_compression() {
    assert_eq!(
        Format::Lz11.compress(b"data", 9),
        Err(CodecError::UnsupportedOperation(Format::Lz11))
    );
    assert_eq!(
        Format::Lh.compress(b"data", 9),
        Err(CodecError::UnsupportedOperation(Format::Lh))
    );
}

// --- Header Variants & Boundaries (Tests 29-34) ---

/// Test: Zero short-form size defers to the extended size word.
#[test]
fn t29_extended_size_used() {
    let data = yaz0_stream(0, 5, &[0xFF, b'A', b'B', b'C', b'D', b'E']);
    assert_eq!(decompress(&data).unwrap(), b"ABCDE");
    assert_eq!(Format::Yaz0.declared_size(&data), Ok(5));
}

/// Test: Non-zero short-form size ignores the second word.
#[test]
fn t30_extended_size_ignored() {
    let data = yaz0_stream(3, 0x0000_FFFF, &[0xFF, b'A', b'B', b'C', b'D', b'E']);
    assert_eq!(decompress(&data).unwrap(), b"ABC");
}

/// Test: Unused decisions of the last code byte are discarded, even if they
/// would be back-references pointing nowhere.
#[test]
fn t31_partial_final_group() {
    let data = yaz0_stream(2, 0, &[0xC0, b'o', b'k']);
    assert_eq!(decompress(&data).unwrap(), b"ok");
}

/// Test: Trailing garbage after the last token is ignored.
#[test]
fn t32_trailing_bytes_ignored() {
    let mut data = compress(b"payload", 9).unwrap();
    data.extend_from_slice(&[0xAB; 7]);
    assert_eq!(decompress(&data).unwrap(), b"payload");
}

/// Test: Yaz1 magic decodes with the same layout.
#[test]
fn t33_yaz1_stream() {
    let mut data = compress(b"yaz one yaz one yaz one", 9).unwrap();
    data[3] = b'1';
    assert_eq!(Format::sniff(&data), Some(Format::Yaz1));
    assert_eq!(decompress(&data).unwrap(), b"yaz one yaz one yaz one");
}

/// Test: LZ11 literal fixture through the auto-dispatcher.
#[test]
fn t34_lz11_fixture() {
    let data = [0x11, 0x05, 0x00, 0x00, 0x00, b'L', b'Z', b'1', b'1', b'!'];
    assert_eq!(decompress(&data).unwrap(), b"LZ11!");
    assert_eq!(lz11::decompress(&data).unwrap(), b"LZ11!");
}

// --- Advanced Scenarios (Tests 35-40) ---

/// Test: Fibonacci sequence (deterministic but non-trivial pattern).
#[test]
fn t35_fibonacci_content() {
    let mut input = vec![1u8, 1];
    for _ in 0..1000 {
        let next = input[input.len() - 1].wrapping_add(input[input.len() - 2]);
        input.push(next);
    }
    assert_round_trip(&input);
}

/// Test: UTF-8 content.
#[test]
fn t36_unicode_bytes() {
    assert_round_trip("おはようございます おはようございます".as_bytes());
}

/// Test: Very sparse data (mostly zeros with rare non-zero bytes).
#[test]
fn t37_very_sparse_data() {
    let mut input = vec![0u8; 256 * 1024];
    input[500] = 0xFF;
    input[90000] = 0xAA;
    let compressed = compress(&input, 9).unwrap();
    assert!(compressed.len() < 5000);
    assert_round_trip_at(&input, 9);
}

/// Test: Runs longer than the maximal match length.
#[test]
fn t38_beyond_max_match() {
    let input = vec![b'A'; 5000];
    assert_round_trip(&input);
}

/// Test: Deterministic pseudo-random noise.
#[test]
fn t39_random_noise_roundtrip() {
    let input: Vec<u8> = (0..2048).map(|i| ((i * 37) ^ (i >> 3)) as u8).collect();
    assert_round_trip(&input);
}

/// Test: Complex corpus mix.
#[test]
fn t40_final_mixed_corpus() {
    let mut input = Vec::new();
    input.extend(vec![0u8; 100]);
    input.extend(b"Literal string");
    input.extend(vec![b'A'; 50]);
    input.extend((0..100).map(|i| i as u8));
    input.extend(b"Literal string");
    assert_round_trip(&input);
}
