//! Annotator Core
//!
//! A linguistic annotation engine exposed through a C ABI. Callers load
//! annotators from configuration files, send batches of tokenized
//! sentences as protobuf bytes and receive the same sentences back with
//! lemma, part-of-speech, morphological features and dependency layers.
//!
//! # Boundary Rules
//!
//! - Handles: opaque non-zero `u64`, never reused within a process
//! - Errors: reported through a caller-owned `ExternError` slot
//! - Memory: every buffer and string handed out has exactly one free call
//! - Panics: contained at the boundary and reported as an error code
//!
//! # Rust API
//!
//! The same engine is usable without the C layer:
//!
//! ```no_run
//! use annotator_core::engine::{annotate, load_model};
//! use annotator_core::scheduler::Parallelism;
//! use annotator_core::sentences::{Sentence, Token};
//!
//! let model = load_model("model/annotator.toml")?;
//! let sentence: Sentence = ["Dit", "is", "een", "test", "."]
//!     .into_iter()
//!     .map(Token::new)
//!     .collect();
//! let annotated = annotate(model.as_ref(), vec![sentence], 32, Parallelism::default())?;
//! assert_eq!(annotated.len(), 1);
//! # Ok::<(), annotator_core::engine::AnnotatorError>(())
//! ```

pub mod config;
pub mod engine;
pub mod ffi;
pub mod models;
pub mod scheduler;
pub mod sentences;
pub mod telemetry;

pub use engine::{AnnotationModel, AnnotatorError, LexiconAnnotator};
pub use ffi::{register_annotator, ByteBuffer, ErrorCode, ExternError};
pub use models::ModelHandle;
pub use sentences::{Sentence, Sentences, Token};
