//! C ABI for the annotator.
//!
//! # Safety
//!
//! Exports never unwind into the caller. Fallible exports report through
//! a caller-owned [`ExternError`] slot, which may be null when the caller
//! does not care about the error. Ownership rules:
//! - handles from `annotator_load` are released with `annotator_free`
//! - buffers from `annotator_annotate` are released with
//!   `annotator_free_bytebuffer`
//! - error messages are released with `annotator_free_string`
//! - the string from `annotator_version` is static and never freed

mod buffer;
mod error;
mod models;
mod runtime;

pub use buffer::{annotator_free_bytebuffer, ByteBuffer};
pub use error::{annotator_free_string, call_with_result, ErrorCode, ExternError};
pub use models::{
    annotator_annotate, annotator_count, annotator_free, annotator_load, annotators,
    register_annotator,
};
pub use runtime::{
    annotator_set_num_interop_threads, annotator_set_num_intraop_threads, annotator_version,
};
