#![no_main]
use libfuzzer_sys::fuzz_target;
use trielzw::{Decoder, Encoder};

fuzz_target!(|data: &[u8]| {
    for &max_bits in &[9, 12] {
        let compressed = Encoder::with_dynamic_size(max_bits).unwrap().encode(data).unwrap();
        let decoder = Decoder::with_dynamic_size(max_bits).unwrap();
        let result = decoder.decode(&compressed.codes);
        assert!(result.is_ok(), "{:?}", result);
        assert_eq!(result.unwrap(), data);
    }
});
