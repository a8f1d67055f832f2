use std::{env, fs};
use trielzw::{decode::Decoder, encode::Encoder, CodeWidth, Configuration};

#[test]
fn roundtrip_all() {
    // The test executable is a conveniently large and varied input.
    let file = env::args().next().unwrap();
    let data = fs::read(file).unwrap();
    let data = &data[..data.len().min(1 << 18)];

    for &flavor in &[CodeWidth::Static, CodeWidth::Dynamic] {
        for max_bits in 9..=16 {
            assert_roundtrips(data, flavor, max_bits);
        }
    }
}

#[test]
fn roundtrip_text() {
    let text: &[&[u8]] = &[
        b"",
        b"A",
        b"AB",
        b"ABABABA",
        b"TOBEORNOTTOBEORTOBEORNOT",
        b"the quick brown fox jumps over the lazy dog, the quick brown fox jumps again",
        include_bytes!("../src/lib.rs"),
    ];
    for data in text {
        for &flavor in &[CodeWidth::Static, CodeWidth::Dynamic] {
            assert_roundtrips(data, flavor, 12);
        }
    }
}

#[test]
fn roundtrip_long_runs() {
    let mut data = vec![b'A'; 100_000];
    data.extend(std::iter::repeat(b'B').take(50_000));
    data.extend((0..50_000u32).map(|i| (i % 3) as u8));

    for &flavor in &[CodeWidth::Static, CodeWidth::Dynamic] {
        for &max_bits in &[9, 12, 16] {
            assert_roundtrips(&data, flavor, max_bits);
        }
    }
}

#[test]
fn roundtrip_every_byte_value() {
    let data: Vec<u8> = (0..=255u8).cycle().take(256 * 40).collect();
    assert_roundtrips(&data, CodeWidth::Static, 9);
    assert_roundtrips(&data, CodeWidth::Dynamic, 10);
}

#[test]
fn encoder_can_be_reused() {
    let encoder = Encoder::new(12).unwrap();
    let decoder = Decoder::new(12).unwrap();
    let first = encoder.encode(b"abcabcabcabc").unwrap();
    encoder.encode(b"something else entirely").unwrap();
    let again = encoder.encode(b"abcabcabcabc").unwrap();
    assert_eq!(first, again);
    assert_eq!(decoder.decode(&again.codes).unwrap(), b"abcabcabcabc");
}

fn assert_roundtrips(data: &[u8], flavor: CodeWidth, max_bits: u8) {
    let config = match flavor {
        CodeWidth::Static => Configuration::new(max_bits),
        CodeWidth::Dynamic => Configuration::with_dynamic_size(max_bits),
    };
    let encoder = config.build_encoder().unwrap();
    let compressed = encoder.encode(data).unwrap();
    assert!(compressed.bits <= max_bits, "{:?}, {}", flavor, max_bits);

    let decoder = config.build_decoder().unwrap();
    let result = decoder.decode(&compressed.codes);
    assert!(result.is_ok(), "{:?}, {}, {:?}", flavor, max_bits, result);
    assert!(data == &*result.unwrap(), "{:?}, {}", flavor, max_bits);

    // Through the frame as well.
    let frame = trielzw::compress(config, data).unwrap();
    assert_eq!(trielzw::decompress(config, &frame).unwrap(), data);
}
