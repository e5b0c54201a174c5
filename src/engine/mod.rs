//! Annotation engine.
//!
//! Every model is driven through the [`AnnotationModel`] trait; the
//! registry and the C boundary never see concrete model types. The
//! built-in [`LexiconAnnotator`] is loaded from a TOML configuration.

mod annotator;
pub mod error;

use std::path::Path;
use std::sync::Arc;

pub use annotator::LexiconAnnotator;
pub use error::AnnotatorError;

use crate::scheduler::{annotate_batched, for_each_parallel, Parallelism};
use crate::sentences::Sentence;

/// A loaded annotation model.
///
/// Models are shared between threads and must not rely on mutable state
/// during annotation.
pub trait AnnotationModel: Send + Sync {
    /// Model name, used in logs.
    fn name(&self) -> &str;

    /// Replace every annotation layer of `sentence`.
    fn annotate_sentence(&self, sentence: &mut Sentence) -> Result<(), AnnotatorError>;

    /// Annotate one batch, spreading its sentences over `intra_op` workers.
    fn annotate_batch(
        &self,
        batch: &mut [&mut Sentence],
        intra_op: usize,
    ) -> Result<(), AnnotatorError> {
        for_each_parallel(batch, intra_op, |sentence| {
            self.annotate_sentence(sentence)
        })
    }
}

/// Load the model described by the configuration at `config_path`.
pub fn load_model(config_path: impl AsRef<Path>) -> Result<Arc<dyn AnnotationModel>, AnnotatorError> {
    let annotator = LexiconAnnotator::load(config_path)?;
    Ok(Arc::new(annotator))
}

/// Annotate `sentences` with `model`, returning them in input order.
pub fn annotate(
    model: &dyn AnnotationModel,
    mut sentences: Vec<Sentence>,
    batch_size: usize,
    parallelism: Parallelism,
) -> Result<Vec<Sentence>, AnnotatorError> {
    annotate_batched(model, &mut sentences, batch_size, parallelism)?;
    Ok(sentences)
}
