//! Process-wide runtime settings.

use std::ffi::c_char;

use super::error::call_infallible;
use crate::scheduler::{thread_widths, WidthUpdate};
use crate::telemetry::init_from_env;

static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");

/// Set the number of threads that annotate the sentences of one batch.
///
/// Zero or a negative value selects one thread per CPU. Applies to every
/// annotate call that starts afterwards.
#[no_mangle]
pub extern "C" fn annotator_set_num_intraop_threads(n_threads: i32) {
    call_infallible("annotator_set_num_intraop_threads", || {
        init_from_env();
        thread_widths().set_intra_op(n_threads);
    });
}

/// Set the number of batches annotated concurrently.
///
/// Zero or a negative value selects one thread per CPU. Only effective
/// before the first annotate call of the process; afterwards the call is
/// logged and ignored.
#[no_mangle]
pub extern "C" fn annotator_set_num_interop_threads(n_threads: i32) {
    call_infallible("annotator_set_num_interop_threads", || {
        init_from_env();
        if thread_widths().set_inter_op(n_threads) == WidthUpdate::IgnoredAfterStart {
            tracing::debug!(n_threads, "inter-op width unchanged");
        }
    });
}

/// Library version as a static NUL-terminated string. Do not free it.
#[no_mangle]
pub extern "C" fn annotator_version() -> *const c_char {
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn version_matches_package() {
        let version = unsafe { CStr::from_ptr(annotator_version()) };
        assert_eq!(version.to_str().unwrap(), env!("CARGO_PKG_VERSION"));
    }
}
