//! Process-wide parallelism widths for annotation workers.
//!
//! Two independent knobs:
//! - intra-op: workers sharing the sentences of one batch. Takes effect
//!   for every annotate call issued after it is set.
//! - inter-op: batches processed concurrently. Latched when the first
//!   annotate call starts; later changes are ignored with a warning.
//!
//! A width of 0 means "one per CPU".
//!
//! Annotation work runs on a shared rayon pool whose size is the
//! inter-op width, so the number of worker threads is bounded no matter
//! how many calls run at once.

use parking_lot::Mutex;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use crate::config::{self, EnvConfig};
use crate::engine::AnnotatorError;

/// Resolved widths for one annotate call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parallelism {
    pub intra_op: usize,
    pub inter_op: usize,
}

impl Parallelism {
    /// Single-threaded execution.
    pub fn sequential() -> Self {
        Self {
            intra_op: 1,
            inter_op: 1,
        }
    }
}

impl Default for Parallelism {
    fn default() -> Self {
        Self::sequential()
    }
}

/// Outcome of changing a thread width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthUpdate {
    Applied,
    /// The inter-op width was already latched by a running annotation.
    IgnoredAfterStart,
}

#[derive(Debug)]
struct InterOp {
    width: usize,
    latched: bool,
}

/// Intra-op and inter-op widths.
#[derive(Debug)]
pub struct ThreadWidths {
    intra_op: AtomicUsize,
    inter_op: Mutex<InterOp>,
}

impl ThreadWidths {
    /// Create widths; 0 means auto-detect.
    pub fn new(intra_op: usize, inter_op: usize) -> Self {
        Self {
            intra_op: AtomicUsize::new(intra_op),
            inter_op: Mutex::new(InterOp {
                width: inter_op,
                latched: false,
            }),
        }
    }

    /// Seed widths from environment configuration.
    pub fn from_env(config: &EnvConfig) -> Self {
        Self::new(config.intra_op_threads, config.inter_op_threads)
    }

    /// Set the intra-op width. Non-positive values select auto-detection.
    pub fn set_intra_op(&self, n_threads: i32) -> WidthUpdate {
        let width = usize::try_from(n_threads).unwrap_or(0);
        self.intra_op.store(width, Ordering::SeqCst);
        tracing::debug!(intra_op = width, "intra-op threads set");
        WidthUpdate::Applied
    }

    /// Set the inter-op width. Non-positive values select auto-detection.
    ///
    /// Once an annotation has started the width is fixed for the life of
    /// the process and this call is a no-op.
    pub fn set_inter_op(&self, n_threads: i32) -> WidthUpdate {
        let width = usize::try_from(n_threads).unwrap_or(0);
        let mut inter_op = self.inter_op.lock();
        if inter_op.latched {
            tracing::warn!(
                requested = width,
                current = inter_op.width,
                "inter-op threads cannot be changed after annotation has started"
            );
            return WidthUpdate::IgnoredAfterStart;
        }
        inter_op.width = width;
        tracing::debug!(inter_op = width, "inter-op threads set");
        WidthUpdate::Applied
    }

    /// Resolved intra-op width.
    pub fn intra_op(&self) -> usize {
        resolve(self.intra_op.load(Ordering::SeqCst))
    }

    /// Resolved inter-op width.
    pub fn inter_op(&self) -> usize {
        resolve(self.inter_op.lock().width)
    }

    pub fn is_inter_op_latched(&self) -> bool {
        self.inter_op.lock().latched
    }

    /// Widths for an annotate call, latching the inter-op width.
    pub fn begin_annotation(&self) -> Parallelism {
        let inter_op = {
            let mut inter_op = self.inter_op.lock();
            inter_op.latched = true;
            resolve(inter_op.width)
        };
        Parallelism {
            intra_op: self.intra_op(),
            inter_op,
        }
    }
}

impl Default for ThreadWidths {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

fn resolve(width: usize) -> usize {
    if width == 0 {
        num_cpus::get().max(1)
    } else {
        width
    }
}

static THREAD_WIDTHS: OnceLock<ThreadWidths> = OnceLock::new();

/// The process-wide thread widths, seeded from `ANNOTATOR_*_THREADS`.
pub fn thread_widths() -> &'static ThreadWidths {
    THREAD_WIDTHS.get_or_init(|| ThreadWidths::from_env(config::current()))
}

static WORKER_POOLS: OnceLock<Mutex<HashMap<usize, Arc<ThreadPool>>>> = OnceLock::new();

/// The worker pool with `width` threads, started on first use.
///
/// Pools live for the rest of the process. Calls through the C API all
/// use the latched inter-op width and therefore share one pool.
pub fn worker_pool(width: usize) -> Result<Arc<ThreadPool>, AnnotatorError> {
    let width = width.max(1);
    let mut pools = WORKER_POOLS.get_or_init(Default::default).lock();
    if let Some(pool) = pools.get(&width) {
        return Ok(Arc::clone(pool));
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(width)
        .thread_name(move |id| format!("annotator-worker-{}-{}", width, id))
        .build()
        .map_err(|e| AnnotatorError::Inference(format!("cannot start worker pool: {}", e)))?;
    tracing::debug!(threads = width, "worker pool started");

    let pool = Arc::new(pool);
    pools.insert(width, Arc::clone(&pool));
    Ok(pool)
}
