//! Lexicon-driven tagger with rule-based dependency attachment.

use std::path::Path;

use super::{AnnotationModel, AnnotatorError};
use crate::models::{normalize_form, AnnotatorConfig, Lexicon};
use crate::sentences::Sentence;

/// Annotator assigning lemma, POS and morphology from a lexicon, and
/// attaching every token to a single root chosen by POS preference.
pub struct LexiconAnnotator {
    config: AnnotatorConfig,
    lexicon: Lexicon,
}

impl LexiconAnnotator {
    pub fn new(config: AnnotatorConfig, lexicon: Lexicon) -> Self {
        Self { config, lexicon }
    }

    /// Load the configuration at `config_path` and the lexicon it names.
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self, AnnotatorError> {
        let config_path = config_path.as_ref();
        let config = AnnotatorConfig::from_file(config_path)?;
        let lexicon = Lexicon::from_file(&config.model.lexicon)?;

        tracing::info!(
            model = %config.model.name,
            lexicon_entries = lexicon.len(),
            path = %config_path.display(),
            "annotator loaded"
        );

        Ok(Self::new(config, lexicon))
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Tag every token, returning lexicon relation overrides per token.
    fn tag(&self, sentence: &mut Sentence) -> Vec<Option<String>> {
        let tagger = &self.config.tagger;
        sentence
            .tokens
            .iter_mut()
            .map(|token| {
                token.clear_annotations();
                match self.lexicon.lookup(&token.form) {
                    Some(entry) => {
                        token.lemma = Some(entry.lemma.clone());
                        token.upos = Some(entry.upos.clone());
                        token.xpos = entry.xpos.clone();
                        token.features = entry.features.clone();
                        entry.relation.clone()
                    }
                    None => {
                        let upos = if is_punctuation(&token.form) {
                            &tagger.punctuation_upos
                        } else {
                            &tagger.unknown_upos
                        };
                        token.lemma = Some(normalize_form(&token.form));
                        token.upos = Some(upos.clone());
                        None
                    }
                }
            })
            .collect()
    }

    /// Index of the root token: the first token with the most preferred
    /// root POS, else the first token.
    fn root_index(&self, sentence: &Sentence) -> usize {
        self.config
            .parser
            .root_upos
            .iter()
            .find_map(|upos| {
                sentence
                    .tokens
                    .iter()
                    .position(|t| t.upos.as_deref() == Some(upos.as_str()))
            })
            .unwrap_or(0)
    }

    fn parse(&self, sentence: &mut Sentence, overrides: Vec<Option<String>>) {
        if sentence.is_empty() {
            return;
        }

        let parser = &self.config.parser;
        let root = self.root_index(sentence);

        for (idx, (token, relation)) in sentence.tokens.iter_mut().zip(overrides).enumerate() {
            if idx == root {
                token.head = Some(0);
                token.relation = Some("root".to_string());
                continue;
            }

            let relation = relation
                .or_else(|| {
                    token
                        .upos
                        .as_ref()
                        .and_then(|upos| parser.relations.get(upos))
                        .cloned()
                })
                .unwrap_or_else(|| parser.default_relation.clone());

            token.head = Some(root + 1);
            token.relation = Some(relation);
        }
    }
}

fn is_punctuation(form: &str) -> bool {
    !form.is_empty() && form.chars().all(|c| c.is_ascii_punctuation() || is_unicode_punct(c))
}

fn is_unicode_punct(c: char) -> bool {
    matches!(c, '\u{2010}'..='\u{2027}' | '\u{2030}'..='\u{205E}' | '\u{3001}'..='\u{3003}' | '¡' | '¿' | '«' | '»')
}

impl AnnotationModel for LexiconAnnotator {
    fn name(&self) -> &str {
        &self.config.model.name
    }

    fn annotate_sentence(&self, sentence: &mut Sentence) -> Result<(), AnnotatorError> {
        let max_len = self.config.model.max_sentence_len;
        if sentence.len() > max_len {
            return Err(AnnotatorError::Inference(format!(
                "sentence of {} tokens exceeds the model limit of {} tokens",
                sentence.len(),
                max_len
            )));
        }
        if sentence.tokens.iter().any(|t| t.form.is_empty()) {
            return Err(AnnotatorError::InvalidInput(
                "sentence contains a token with an empty form".into(),
            ));
        }

        let overrides = self.tag(sentence);
        self.parse(sentence, overrides);
        Ok(())
    }
}
