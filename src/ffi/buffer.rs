//! Byte buffers handed across the C boundary.

use std::ptr;
use std::slice;

use crate::engine::AnnotatorError;

/// An owned byte buffer returned to the caller.
///
/// Release it with [`annotator_free_bytebuffer`], exactly once. A buffer
/// with a null `data` pointer is empty and freeing it is a no-op.
#[repr(C)]
#[derive(Debug)]
pub struct ByteBuffer {
    pub len: i64,
    pub data: *mut u8,
}

impl ByteBuffer {
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        let boxed = bytes.into_boxed_slice();
        // A slice never holds more than isize::MAX bytes.
        let len = boxed.len() as i64;
        let data = Box::into_raw(boxed) as *mut u8;
        Self { len, data }
    }

    pub fn is_null(&self) -> bool {
        self.data.is_null()
    }

    /// View the contents.
    ///
    /// # Safety
    ///
    /// The buffer must come from [`ByteBuffer::from_vec`] and not have been
    /// freed.
    pub unsafe fn as_slice(&self) -> &[u8] {
        match usize::try_from(self.len) {
            Ok(len) if !self.data.is_null() => slice::from_raw_parts(self.data, len),
            _ => &[],
        }
    }

    /// Reclaim the allocation as a vector.
    ///
    /// # Safety
    ///
    /// Same as [`ByteBuffer::as_slice`]; the buffer must not be used again.
    pub unsafe fn into_vec(self) -> Vec<u8> {
        match self.into_box() {
            Some(boxed) => boxed.into_vec(),
            None => Vec::new(),
        }
    }

    /// Free the allocation.
    ///
    /// # Safety
    ///
    /// Same as [`ByteBuffer::into_vec`].
    pub unsafe fn destroy(self) {
        drop(self.into_box());
    }

    unsafe fn into_box(self) -> Option<Box<[u8]>> {
        if self.data.is_null() {
            return None;
        }
        match usize::try_from(self.len) {
            Ok(len) => Some(Box::from_raw(ptr::slice_from_raw_parts_mut(self.data, len))),
            Err(_) => {
                tracing::warn!(len = self.len, "byte buffer with negative length leaked");
                None
            }
        }
    }
}

impl Default for ByteBuffer {
    fn default() -> Self {
        Self {
            len: 0,
            data: ptr::null_mut(),
        }
    }
}

/// Free a buffer returned by `annotator_annotate`.
///
/// # Safety
///
/// `buffer` must have been returned by this library and not freed yet.
#[no_mangle]
pub unsafe extern "C" fn annotator_free_bytebuffer(buffer: ByteBuffer) {
    buffer.destroy();
}

/// Borrow caller memory as an input slice.
///
/// A zero length is always valid, whatever `data` points to.
///
/// # Safety
///
/// When `len > 0`, `data` must be null or point to `len` readable bytes
/// that outlive the returned slice.
pub(crate) unsafe fn input_slice<'a>(data: *const u8, len: i32) -> Result<&'a [u8], AnnotatorError> {
    let len = usize::try_from(len)
        .map_err(|_| AnnotatorError::InvalidInput(format!("negative buffer length {}", len)))?;
    if len == 0 {
        return Ok(&[]);
    }
    if data.is_null() {
        return Err(AnnotatorError::NullPointer("invalid buffer"));
    }
    Ok(slice::from_raw_parts(data, len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_keeps_contents() {
        let buffer = ByteBuffer::from_vec(vec![1, 2, 3]);
        assert_eq!(buffer.len, 3);
        assert_eq!(unsafe { buffer.as_slice() }, &[1, 2, 3]);
        assert_eq!(unsafe { buffer.into_vec() }, vec![1, 2, 3]);
    }

    #[test]
    fn empty_buffer_is_freeable() {
        let buffer = ByteBuffer::from_vec(Vec::new());
        assert_eq!(buffer.len, 0);
        unsafe { annotator_free_bytebuffer(buffer) };
        unsafe { annotator_free_bytebuffer(ByteBuffer::default()) };
    }

    #[test]
    fn input_slice_validation() {
        let bytes = [9u8, 8, 7];
        assert_eq!(unsafe { input_slice(bytes.as_ptr(), 3) }.unwrap(), &bytes);
        assert!(unsafe { input_slice(ptr::null(), 0) }.unwrap().is_empty());
        assert!(matches!(
            unsafe { input_slice(ptr::null(), 4) },
            Err(AnnotatorError::NullPointer(_))
        ));
        assert!(matches!(
            unsafe { input_slice(bytes.as_ptr(), -1) },
            Err(AnnotatorError::InvalidInput(_))
        ));
    }
}
