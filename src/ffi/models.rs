// Copyright 2024-2026 annotator-core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Model lifecycle and annotation exports.

use std::ffi::{c_char, CStr};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use super::buffer::{input_slice, ByteBuffer};
use super::error::{call_with_result, ErrorCode, ExternError};
use crate::engine::{self, AnnotationModel, AnnotatorError};
use crate::models::{HandleRegistry, ModelHandle};
use crate::scheduler::thread_widths;
use crate::sentences::Sentences;
use crate::telemetry::{init_from_env, metrics, CallSpan, SpanExt};

static ANNOTATORS: OnceLock<HandleRegistry<dyn AnnotationModel>> = OnceLock::new();

/// The process-wide registry behind every exported handle.
pub fn annotators() -> &'static HandleRegistry<dyn AnnotationModel> {
    ANNOTATORS.get_or_init(HandleRegistry::new)
}

/// Register a model built in Rust, making it reachable through the C API.
pub fn register_annotator(model: Arc<dyn AnnotationModel>) -> ModelHandle {
    init_from_env();
    let name = model.name().to_string();
    let handle = annotators().insert(model);
    metrics::record_model_loaded(annotators().len());
    tracing::info!(handle = handle.id(), model = %name, "annotator registered");
    handle
}

unsafe fn path_arg<'a>(path: *const c_char) -> Result<&'a str, AnnotatorError> {
    if path.is_null() {
        return Err(AnnotatorError::NullPointer("config_path"));
    }
    CStr::from_ptr(path)
        .to_str()
        .map_err(|_| AnnotatorError::InvalidInput("invalid UTF-8 in config_path".to_string()))
}

/// Load the annotator described by the TOML configuration at `config_path`.
///
/// Returns a handle, or 0 with `err` filled in.
///
/// # Safety
///
/// `config_path` must be null or a NUL-terminated string. `err` must be
/// null or point to a writable `ExternError`.
#[no_mangle]
pub unsafe extern "C" fn annotator_load(config_path: *const c_char, err: *mut ExternError) -> u64 {
    call_with_result(err, "annotator_load", || {
        init_from_env();
        let span = CallSpan::new("annotator_load", 0);
        let _enter = span.enter();

        let result = path_arg(config_path).and_then(engine::load_model);
        span.record_result(&result);
        let handle = annotators().insert(result?);
        span.record("handle", handle.id());
        metrics::record_model_loaded(annotators().len());
        tracing::info!(handle = handle.id(), "annotator loaded");
        Ok(handle.id())
    })
}

/// Release the annotator behind `handle`.
///
/// Annotate calls already running on the handle finish normally; the
/// model is dropped when the last of them returns.
///
/// # Safety
///
/// `err` must be null or point to a writable `ExternError`.
#[no_mangle]
pub unsafe extern "C" fn annotator_free(handle: u64, err: *mut ExternError) {
    call_with_result(err, "annotator_free", || {
        let span = CallSpan::new("annotator_free", handle);
        let _enter = span.enter();

        let result = annotators().remove(ModelHandle::new(handle));
        span.record_result(&result);
        let model = result?;
        tracing::info!(handle, model = model.name(), "annotator freed");
        metrics::record_model_freed(annotators().len());
        Ok(())
    })
}

/// Annotate a serialized batch of sentences.
///
/// The input is a `Sentences` protobuf message of `sentences_len` bytes.
/// Sentences are grouped into batches of `batch_size` (0: one batch)
/// after sorting by length; the output lists them in input order. The
/// returned buffer must be released with `annotator_free_bytebuffer`. On
/// failure an empty buffer is returned and `err` is filled in.
///
/// # Safety
///
/// `sentences_data` must be null or point to `sentences_len` readable
/// bytes. `err` must be null or point to a writable `ExternError`.
#[no_mangle]
pub unsafe extern "C" fn annotator_annotate(
    handle: u64,
    sentences_data: *const u8,
    sentences_len: i32,
    batch_size: usize,
    err: *mut ExternError,
) -> ByteBuffer {
    call_with_result(err, "annotator_annotate", || {
        let span = CallSpan::new("annotator_annotate", handle);
        let _enter = span.enter();

        let start = Instant::now();
        let result = annotate_serialized(handle, sentences_data, sentences_len, batch_size);
        let latency = start.elapsed();
        span.record_result(&result);
        span.record_latency(latency);

        match &result {
            Ok((_, n_sentences)) => {
                span.record("sentences", *n_sentences);
                metrics::record_annotate_success(*n_sentences, latency);
            }
            Err(e) => metrics::record_annotate_failure(ErrorCode::from(e).as_i32()),
        }

        result.map(|(bytes, _)| ByteBuffer::from_vec(bytes))
    })
}

unsafe fn annotate_serialized(
    handle: u64,
    data: *const u8,
    len: i32,
    batch_size: usize,
) -> Result<(Vec<u8>, usize), AnnotatorError> {
    // The registry lock is released here; a concurrent free only drops
    // the registry's reference.
    let model = annotators().resolve(ModelHandle::new(handle))?;

    let input = input_slice(data, len)?;
    let max_input_bytes = crate::config::current().max_input_bytes;
    if input.len() > max_input_bytes {
        return Err(AnnotatorError::InvalidInput(format!(
            "serialized sentences of {} bytes exceed the limit of {} bytes",
            input.len(),
            max_input_bytes
        )));
    }

    let sentences = Sentences::decode(input)?;
    let parallelism = thread_widths().begin_annotation();
    tracing::debug!(
        sentences = sentences.len(),
        batch_size,
        intra_op = parallelism.intra_op,
        inter_op = parallelism.inter_op,
        "annotating"
    );

    let annotated = engine::annotate(model.as_ref(), sentences.into_inner(), batch_size, parallelism)?;
    let n_sentences = annotated.len();
    Ok((Sentences(annotated).encode_to_vec(), n_sentences))
}

/// Number of live handles.
#[no_mangle]
pub extern "C" fn annotator_count() -> u64 {
    annotators().len() as u64
}
