//! Fuzz target for VOC 2005 text annotation parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the annotation parser,
//! checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use voctext::annotation::parse_slice;

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid excessive memory usage.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = parse_slice(data);
});
