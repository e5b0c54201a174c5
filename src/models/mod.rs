//! Model management.
//!
//! Handles configuration parsing, lexicon loading and registry tracking.

mod config;
mod lexicon;
mod registry;

pub use config::{
    AnnotatorConfig, ModelSection, ParserSection, TaggerSection, SUPPORTED_FORMAT_VERSION,
};
pub use lexicon::{normalize_form, Lexicon, LexiconEntry};
pub use registry::{HandleRegistry, ModelHandle};
