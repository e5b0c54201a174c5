//! Input size limit from `ANNOTATOR_MAX_INPUT_BYTES`.
//!
//! Kept in its own test binary: the process configuration is read once,
//! so the variable has to be set before any other call into the crate.

use std::ffi::CString;

use prost::Message;

use annotator_core::ffi::{
    annotator_annotate, annotator_free, annotator_free_bytebuffer, annotator_load, ErrorCode,
    ExternError,
};
use annotator_core::sentences::{decode_annotated, proto};

fn request(sentence: &str, copies: usize) -> Vec<u8> {
    let sentence = proto::Sentence {
        tokens: sentence
            .split_whitespace()
            .map(|form| proto::Token {
                form: form.to_string(),
                ..Default::default()
            })
            .collect(),
    };
    proto::Sentences {
        sentences: vec![sentence; copies],
    }
    .encode_to_vec()
}

#[test]
fn test_input_over_configured_limit_is_rejected() {
    std::env::set_var("ANNOTATOR_MAX_INPUT_BYTES", "1024");
    assert_eq!(annotator_core::config::current().max_input_bytes, 1024);

    let path = CString::new(format!(
        "{}/tests/fixtures/dutch-small/annotator.toml",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap();
    let mut err = ExternError::default();
    let handle = unsafe { annotator_load(path.as_ptr(), &mut err) };
    assert!(err.is_success());

    let oversized = request("De kat slaapt hier .", 100);
    assert!(oversized.len() > 1024);
    let buffer = unsafe {
        annotator_annotate(handle, oversized.as_ptr(), oversized.len() as i32, 8, &mut err)
    };
    assert!(buffer.is_null());
    assert_eq!(err.code, ErrorCode::InvalidParams as i32);
    let message = unsafe { err.take_message() }.unwrap();
    assert!(message.contains("exceed the limit of 1024 bytes"), "{}", message);

    // The handle still serves inputs under the limit.
    let small = request("De kat slaapt hier .", 2);
    assert!(small.len() <= 1024);
    let buffer =
        unsafe { annotator_annotate(handle, small.as_ptr(), small.len() as i32, 8, &mut err) };
    assert!(err.is_success());
    let output = decode_annotated(unsafe { buffer.as_slice() }).unwrap();
    assert_eq!(output.len(), 2);
    unsafe { annotator_free_bytebuffer(buffer) };

    unsafe { annotator_free(handle, &mut err) };
    assert!(err.is_success());
}
