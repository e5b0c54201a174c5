// Copyright 2024-2026 annotator-core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error reporting across the C boundary.
//!
//! Every fallible export takes a caller-owned `ExternError` out-slot. The
//! slot is always written: zeroed on success, filled with a code and an
//! owned message on failure. Panics never cross the boundary.

use std::any::Any;
use std::ffi::{c_char, CStr, CString};
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

use crate::engine::AnnotatorError;
use crate::telemetry::metrics;

/// Stable error codes reported through [`ExternError::code`].
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,
    NullPointer = -1,
    InvalidConfig = -2,
    Io = -3,
    InvalidHandle = -7,
    ModelLoadFailed = -8,
    InferenceFailed = -9,
    DecodeFailed = -10,
    InvalidParams = -11,
    Panic = -99,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl From<&AnnotatorError> for ErrorCode {
    fn from(err: &AnnotatorError) -> Self {
        match err {
            AnnotatorError::Io(..) => ErrorCode::Io,
            AnnotatorError::Config { .. } => ErrorCode::InvalidConfig,
            AnnotatorError::LoadLexicon { .. } | AnnotatorError::IncompatibleModel(_) => {
                ErrorCode::ModelLoadFailed
            }
            AnnotatorError::ProtobufDecode(_) => ErrorCode::DecodeFailed,
            AnnotatorError::InvalidInput(_) => ErrorCode::InvalidParams,
            AnnotatorError::NullPointer(_) => ErrorCode::NullPointer,
            AnnotatorError::Inference(_) => ErrorCode::InferenceFailed,
            AnnotatorError::InvalidHandle(_) => ErrorCode::InvalidHandle,
            AnnotatorError::Panic(_) => ErrorCode::Panic,
        }
    }
}

/// Caller-provided error out-slot.
///
/// `message` is owned by the caller once written and must be released
/// with [`annotator_free_string`]. It is null on success.
#[repr(C)]
#[derive(Debug)]
pub struct ExternError {
    pub code: i32,
    pub message: *mut c_char,
}

impl ExternError {
    pub fn success() -> Self {
        Self {
            code: ErrorCode::Success.as_i32(),
            message: ptr::null_mut(),
        }
    }

    pub fn new_error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.as_i32(),
            message: owned_c_string(message.into()),
        }
    }

    pub fn from_error(err: &AnnotatorError) -> Self {
        Self::new_error(ErrorCode::from(err), err.to_string())
    }

    pub fn is_success(&self) -> bool {
        self.code == ErrorCode::Success.as_i32()
    }

    /// Borrow the message, if any.
    ///
    /// # Safety
    ///
    /// `message` must be null or a string written by this library that has
    /// not been freed yet.
    pub unsafe fn message(&self) -> Option<&CStr> {
        if self.message.is_null() {
            None
        } else {
            Some(CStr::from_ptr(self.message))
        }
    }

    /// Take the message out of the slot and free it.
    ///
    /// # Safety
    ///
    /// Same contract as [`ExternError::message`]. The slot is reset to
    /// success afterwards, so the message is freed only once.
    pub unsafe fn take_message(&mut self) -> Option<String> {
        if self.message.is_null() {
            return None;
        }
        let message = CString::from_raw(self.message);
        self.message = ptr::null_mut();
        self.code = ErrorCode::Success.as_i32();
        Some(message.to_string_lossy().into_owned())
    }
}

impl Default for ExternError {
    fn default() -> Self {
        Self::success()
    }
}

/// Interior NUL bytes would truncate the message on the C side.
fn owned_c_string(message: String) -> *mut c_char {
    let message = match CString::new(message) {
        Ok(message) => message,
        Err(err) => {
            let mut bytes = err.into_vec();
            bytes.retain(|&b| b != 0);
            CString::new(bytes).unwrap_or_default()
        }
    };
    message.into_raw()
}

/// Write `value` into the caller's slot. A null slot drops the error.
unsafe fn write_error(out_err: *mut ExternError, mut value: ExternError) {
    if out_err.is_null() {
        if let Some(message) = value.take_message() {
            tracing::debug!(%message, "error discarded: no error slot supplied");
        }
        return;
    }
    ptr::write(out_err, value);
}

pub(crate) fn panic_message(payload: &Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    }
}

/// Run `f` behind the boundary guard and report its outcome in `out_err`.
///
/// On failure, including a panic inside `f`, the slot receives the error
/// and `R::default()` is returned: 0 for handles, an empty buffer for
/// annotate calls.
///
/// # Safety
///
/// `out_err` must be null or point to writable memory for one
/// `ExternError`. Its previous contents are overwritten, not freed.
pub unsafe fn call_with_result<R, F>(out_err: *mut ExternError, op: &'static str, f: F) -> R
where
    R: Default,
    F: FnOnce() -> Result<R, AnnotatorError>,
{
    let result = panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let message = panic_message(&payload);
        tracing::error!(op, panic = %message, "panic contained at the C boundary");
        metrics::record_panic(op);
        Err(AnnotatorError::Panic(message))
    });

    match result {
        Ok(value) => {
            write_error(out_err, ExternError::success());
            value
        }
        Err(err) => {
            if err.is_caller_error() {
                tracing::debug!(op, error = %err, "call rejected");
            } else {
                tracing::warn!(op, error = %err, "call failed");
            }
            write_error(out_err, ExternError::from_error(&err));
            R::default()
        }
    }
}

/// Guard for exports that have no error slot.
pub(crate) fn call_infallible<F: FnOnce()>(op: &'static str, f: F) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(f)) {
        let message = panic_message(&payload);
        tracing::error!(op, panic = %message, "panic contained at the C boundary");
        metrics::record_panic(op);
    }
}

/// Free a string returned by this library. Null is a no-op.
///
/// # Safety
///
/// `s` must be null or a string from this library that was not freed yet.
#[no_mangle]
pub unsafe extern "C" fn annotator_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
