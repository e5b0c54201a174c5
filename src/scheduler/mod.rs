//! Annotation scheduling.
//!
//! Length-sorted batching, parallel dispatch over a shared rayon pool,
//! and the process-wide thread widths that size that dispatch.

mod batch;
mod pool;

pub use batch::{annotate_batched, for_each_parallel};
pub use pool::{thread_widths, worker_pool, Parallelism, ThreadWidths, WidthUpdate};
