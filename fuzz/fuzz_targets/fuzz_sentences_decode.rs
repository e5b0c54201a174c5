//! Fuzz target for sentence batch decoding.
//!
//! Arbitrary bytes must decode to `Ok` or `Err`, never panic, and a
//! successful decode must survive re-encoding.

#![no_main]

use annotator_core::sentences::Sentences;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(sentences) = Sentences::decode(data) {
        let reencoded = sentences.encode_to_vec();
        let again = Sentences::decode(&reencoded).expect("re-encoded batch decodes");
        assert_eq!(again, sentences);
    }
});
