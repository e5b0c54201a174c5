//! Sentence batching and parallel dispatch.
//!
//! Sentences are grouped by length so that each batch holds sentences of
//! similar size, then batches are spread over the shared worker pool.
//! Sentences are annotated in place, so the caller's order is never
//! disturbed.

use rayon::prelude::*;

use crate::engine::{AnnotationModel, AnnotatorError};
use crate::sentences::Sentence;

use super::pool::{worker_pool, Parallelism};

/// Annotate `sentences` in place, `batch_size` sentences at a time.
///
/// `batch_size` only controls grouping; `0` puts every sentence in one
/// batch. All work runs on the worker pool of `parallelism.inter_op`
/// threads, and the calling thread blocks until it is done.
pub fn annotate_batched(
    model: &dyn AnnotationModel,
    sentences: &mut [Sentence],
    batch_size: usize,
    parallelism: Parallelism,
) -> Result<(), AnnotatorError> {
    if sentences.is_empty() {
        return Ok(());
    }

    // Sort sentences by length.
    let mut sent_refs: Vec<&mut Sentence> = sentences.iter_mut().collect();
    sent_refs.sort_by_key(|s| s.len());

    let batch_size = if batch_size == 0 {
        sent_refs.len()
    } else {
        batch_size
    };

    let mut batches: Vec<&mut [&mut Sentence]> = sent_refs.chunks_mut(batch_size).collect();
    tracing::trace!(
        batches = batches.len(),
        batch_size,
        inter_op = parallelism.inter_op,
        intra_op = parallelism.intra_op,
        "dispatching batches"
    );

    let pool = worker_pool(parallelism.inter_op)?;
    pool.install(|| {
        batches
            .par_iter_mut()
            .try_for_each(|batch| model.annotate_batch(batch, parallelism.intra_op))
    })
}

/// Apply `f` to every item, splitting the items into at most `width`
/// parallel tasks on the current rayon pool.
///
/// Returns one of the errors raised, if any. A panicking task is
/// re-raised on the calling thread.
pub fn for_each_parallel<T, F>(items: &mut [T], width: usize, f: F) -> Result<(), AnnotatorError>
where
    T: Send,
    F: Fn(&mut T) -> Result<(), AnnotatorError> + Sync,
{
    let width = width.max(1).min(items.len());
    if width <= 1 {
        return items.iter_mut().try_for_each(f);
    }

    let per_task = items.len().div_ceil(width);
    let f = &f;
    items
        .par_chunks_mut(per_task)
        .try_for_each(|group| group.iter_mut().try_for_each(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentences::Token;
    use parking_lot::Mutex;
    use std::collections::HashSet;
    use std::panic;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread::{self, ThreadId};

    /// Marks each token with the batch it was seen in.
    struct BatchRecorder {
        batches: AtomicUsize,
    }

    impl AnnotationModel for BatchRecorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn annotate_sentence(&self, sentence: &mut Sentence) -> Result<(), AnnotatorError> {
            for token in &mut sentence.tokens {
                token.lemma = Some(token.form.to_uppercase());
            }
            Ok(())
        }

        fn annotate_batch(
            &self,
            batch: &mut [&mut Sentence],
            _intra_op: usize,
        ) -> Result<(), AnnotatorError> {
            let id = self.batches.fetch_add(1, Ordering::SeqCst);
            for sentence in batch.iter_mut() {
                self.annotate_sentence(sentence)?;
                for token in &mut sentence.tokens {
                    token.xpos = Some(id.to_string());
                }
            }
            Ok(())
        }
    }

    fn sentence(forms: &[&str]) -> Sentence {
        forms.iter().map(|f| Token::new(*f)).collect()
    }

    fn input() -> Vec<Sentence> {
        vec![
            sentence(&["a", "b", "c"]),
            sentence(&["d"]),
            sentence(&["e", "f"]),
            sentence(&["g", "h", "i", "j"]),
        ]
    }

    #[test]
    fn order_is_preserved_for_every_batch_size() {
        for batch_size in [0, 1, 2, 3, 10] {
            for inter_op in [1, 2, 4] {
                let model = BatchRecorder {
                    batches: AtomicUsize::new(0),
                };
                let mut sentences = input();
                let parallelism = Parallelism {
                    intra_op: 1,
                    inter_op,
                };
                annotate_batched(&model, &mut sentences, batch_size, parallelism).unwrap();

                let forms: Vec<Vec<&str>> = sentences
                    .iter()
                    .map(|s| s.tokens.iter().map(|t| t.form.as_str()).collect())
                    .collect();
                assert_eq!(
                    forms,
                    vec![vec!["a", "b", "c"], vec!["d"], vec!["e", "f"], vec!["g", "h", "i", "j"]]
                );
                assert_eq!(sentences[0].tokens[0].lemma.as_deref(), Some("A"));
            }
        }
    }

    #[test]
    fn batches_group_sentences_by_length() {
        let model = BatchRecorder {
            batches: AtomicUsize::new(0),
        };
        let mut sentences = input();
        annotate_batched(&model, &mut sentences, 2, Parallelism::sequential()).unwrap();

        assert_eq!(model.batches.load(Ordering::SeqCst), 2);
        // Shortest two (lengths 1 and 2) share the first batch.
        let batch_of = |i: usize| sentences[i].tokens[0].xpos.clone().unwrap();
        assert_eq!(batch_of(1), batch_of(2));
        assert_eq!(batch_of(0), batch_of(3));
        assert_ne!(batch_of(0), batch_of(1));
    }

    #[test]
    fn zero_batch_size_is_one_batch() {
        let model = BatchRecorder {
            batches: AtomicUsize::new(0),
        };
        let mut sentences = input();
        annotate_batched(&model, &mut sentences, 0, Parallelism::sequential()).unwrap();
        assert_eq!(model.batches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_input_does_no_work() {
        let model = BatchRecorder {
            batches: AtomicUsize::new(0),
        };
        annotate_batched(&model, &mut [], 4, Parallelism::sequential()).unwrap();
        assert_eq!(model.batches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn for_each_parallel_reports_errors() {
        let mut items: Vec<usize> = (0..16).collect();
        let result = for_each_parallel(&mut items, 4, |item| {
            if *item == 9 {
                Err(AnnotatorError::Inference("nine".into()))
            } else {
                *item *= 2;
                Ok(())
            }
        });
        assert!(matches!(result, Err(AnnotatorError::Inference(msg)) if msg == "nine"));
    }

    #[test]
    fn for_each_parallel_visits_every_item() {
        let mut items: Vec<usize> = (0..37).collect();
        for_each_parallel(&mut items, 8, |item| {
            *item += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(items, (1..38).collect::<Vec<_>>());
    }

    #[test]
    fn worker_panics_reach_the_caller() {
        let result = panic::catch_unwind(|| {
            let mut items = vec![0u8; 4];
            let _ = for_each_parallel(&mut items, 4, |_| panic!("worker exploded"));
        });
        assert!(result.is_err());
    }

    /// Records every thread that annotates a sentence.
    struct ThreadRecorder {
        threads: Mutex<HashSet<ThreadId>>,
        names: Mutex<HashSet<String>>,
    }

    impl AnnotationModel for ThreadRecorder {
        fn name(&self) -> &str {
            "threads"
        }

        fn annotate_sentence(&self, _sentence: &mut Sentence) -> Result<(), AnnotatorError> {
            let current = thread::current();
            self.threads.lock().insert(current.id());
            self.names
                .lock()
                .insert(current.name().unwrap_or_default().to_string());
            Ok(())
        }
    }

    #[test]
    fn workers_stay_within_inter_op_width() {
        let model = ThreadRecorder {
            threads: Mutex::new(HashSet::new()),
            names: Mutex::new(HashSet::new()),
        };
        let parallelism = Parallelism {
            intra_op: 16,
            inter_op: 3,
        };

        for _ in 0..3 {
            let mut sentences: Vec<Sentence> = (0..256)
                .map(|i| {
                    let form = i.to_string();
                    sentence(&[form.as_str()])
                })
                .collect();
            annotate_batched(&model, &mut sentences, 16, parallelism).unwrap();
        }

        let threads = model.threads.lock().len();
        assert!((1..=3).contains(&threads), "{} worker threads", threads);
        for name in model.names.lock().iter() {
            assert!(name.starts_with("annotator-worker-3-"), "unexpected thread {:?}", name);
        }
        assert!(!model.threads.lock().contains(&thread::current().id()));
    }

    #[test]
    fn batch_errors_are_returned() {
        struct Failing;

        impl AnnotationModel for Failing {
            fn name(&self) -> &str {
                "failing"
            }

            fn annotate_sentence(&self, sentence: &mut Sentence) -> Result<(), AnnotatorError> {
                if sentence.len() > 3 {
                    return Err(AnnotatorError::Inference("too long".into()));
                }
                Ok(())
            }
        }

        let mut sentences = input();
        let parallelism = Parallelism {
            intra_op: 2,
            inter_op: 2,
        };
        let result = annotate_batched(&Failing, &mut sentences, 1, parallelism);
        assert!(matches!(result, Err(AnnotatorError::Inference(msg)) if msg == "too long"));
    }
}
