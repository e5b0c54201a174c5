//! Fuzz target for the annotate export.
//!
//! Feeds arbitrary bytes through `annotator_annotate` on a registered
//! model. Every call must return either a decodable buffer or an error
//! code, and the handle must stay usable.

#![no_main]

use std::sync::{Arc, OnceLock};

use annotator_core::engine::AnnotatorError;
use annotator_core::ffi::{annotator_annotate, annotator_free_bytebuffer, register_annotator, ExternError};
use annotator_core::sentences::{decode_annotated, Sentence};
use annotator_core::AnnotationModel;
use libfuzzer_sys::fuzz_target;

struct LengthTagger;

impl AnnotationModel for LengthTagger {
    fn name(&self) -> &str {
        "length-tagger"
    }

    fn annotate_sentence(&self, sentence: &mut Sentence) -> Result<(), AnnotatorError> {
        for token in &mut sentence.tokens {
            token.lemma = Some(token.form.chars().count().to_string());
        }
        Ok(())
    }
}

static HANDLE: OnceLock<u64> = OnceLock::new();

fuzz_target!(|data: &[u8]| {
    let handle = *HANDLE.get_or_init(|| register_annotator(Arc::new(LengthTagger)).id());
    let Ok(len) = i32::try_from(data.len()) else {
        return;
    };

    let mut err = ExternError::default();
    let buffer = unsafe { annotator_annotate(handle, data.as_ptr(), len, 4, &mut err) };
    if err.is_success() {
        let bytes = unsafe { buffer.as_slice() }.to_vec();
        unsafe { annotator_free_bytebuffer(buffer) };
        decode_annotated(&bytes).expect("annotate output decodes");
    } else {
        assert!(buffer.is_null());
        let _ = unsafe { err.take_message() };
    }
});
