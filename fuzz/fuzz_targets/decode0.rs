#![no_main]
use libfuzzer_sys::fuzz_target;
use trielzw::Configuration;

fuzz_target!(|raw_data: &[u8]| {
    let _ = trielzw::decompress(Configuration::with_dynamic_size(16), raw_data);
    let _ = trielzw::decompress(Configuration::new(12), raw_data);
});
