//! Annotator model configuration parsing and validation.
//!
//! A configuration is a TOML file; relative paths inside it are resolved
//! against the directory containing the configuration.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::AnnotatorError;

/// The only configuration format this crate understands.
pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

const DEFAULT_MAX_SENTENCE_LEN: usize = 512;

/// Top-level annotator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnotatorConfig {
    pub model: ModelSection,
    #[serde(default)]
    pub tagger: TaggerSection,
    #[serde(default)]
    pub parser: ParserSection,
}

/// Model identity and artifacts.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelSection {
    /// Human-readable model name.
    pub name: String,
    /// Configuration format version.
    pub format_version: u32,
    /// Lexicon file, relative to the configuration file.
    pub lexicon: PathBuf,
    /// Longest sentence (in tokens) the model accepts.
    #[serde(default = "default_max_sentence_len")]
    pub max_sentence_len: usize,
}

fn default_max_sentence_len() -> usize {
    DEFAULT_MAX_SENTENCE_LEN
}

/// Part-of-speech tagging fallbacks.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TaggerSection {
    /// Universal POS assigned to forms missing from the lexicon.
    pub unknown_upos: String,
    /// Universal POS assigned to unknown all-punctuation forms.
    pub punctuation_upos: String,
}

impl Default for TaggerSection {
    fn default() -> Self {
        Self {
            unknown_upos: "X".to_string(),
            punctuation_upos: "PUNCT".to_string(),
        }
    }
}

/// Rule-based dependency attachment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParserSection {
    /// Universal POS tags eligible as sentence root, in order of preference.
    pub root_upos: Vec<String>,
    /// Relation used when neither the lexicon nor `relations` has one.
    pub default_relation: String,
    /// Relation per universal POS tag.
    pub relations: BTreeMap<String, String>,
}

impl Default for ParserSection {
    fn default() -> Self {
        Self {
            root_upos: ["VERB", "NOUN", "PROPN", "ADJ"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            default_relation: "dep".to_string(),
            relations: BTreeMap::from([("PUNCT".to_string(), "punct".to_string())]),
        }
    }
}

impl AnnotatorConfig {
    /// Read, parse and validate a configuration file.
    ///
    /// Relative artifact paths are resolved against the configuration's
    /// directory.
    pub fn from_file(path: &Path) -> Result<Self, AnnotatorError> {
        let content = fs::read_to_string(path).map_err(|err| {
            AnnotatorError::Io(
                format!("Cannot open annotator config file `{}`", path.display()),
                err,
            )
        })?;

        let mut config = Self::from_toml(&content, path)?;
        config.relativize_paths(path);
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from a TOML string. `origin` is only used
    /// in error messages.
    pub fn from_toml(content: &str, origin: &Path) -> Result<Self, AnnotatorError> {
        toml::from_str(content).map_err(|source| AnnotatorError::Config {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Resolve relative artifact paths against the directory of `config_path`.
    pub fn relativize_paths(&mut self, config_path: &Path) {
        if self.model.lexicon.is_relative() {
            if let Some(dir) = config_path.parent() {
                self.model.lexicon = dir.join(&self.model.lexicon);
            }
        }
    }

    /// Check that the configuration describes a model this crate can run.
    pub fn validate(&self) -> Result<(), AnnotatorError> {
        if self.model.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(AnnotatorError::IncompatibleModel(format!(
                "format_version {} is not supported (expected {})",
                self.model.format_version, SUPPORTED_FORMAT_VERSION
            )));
        }
        if self.model.name.is_empty() {
            return Err(AnnotatorError::IncompatibleModel(
                "model name cannot be empty".into(),
            ));
        }
        if self.model.max_sentence_len == 0 {
            return Err(AnnotatorError::IncompatibleModel(
                "max_sentence_len must be positive".into(),
            ));
        }
        if self.parser.default_relation.is_empty() {
            return Err(AnnotatorError::IncompatibleModel(
                "parser.default_relation cannot be empty".into(),
            ));
        }
        Ok(())
    }
}
