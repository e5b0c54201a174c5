//! Lexicon loading and lookup.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

use crate::engine::AnnotatorError;

/// One lexicon entry, keyed by its normalized form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LexiconEntry {
    pub form: String,
    pub lemma: String,
    pub upos: String,
    #[serde(default)]
    pub xpos: Option<String>,
    #[serde(default)]
    pub features: BTreeMap<String, String>,
    /// Dependency relation overriding the per-POS parser rule.
    #[serde(default)]
    pub relation: Option<String>,
}

#[derive(Deserialize)]
struct LexiconFile {
    #[serde(default)]
    entry: Vec<LexiconEntry>,
}

/// Normalize a surface form into a lexicon key (NFKC, lowercase).
pub fn normalize_form(form: &str) -> String {
    form.nfkc().collect::<String>().to_lowercase()
}

/// Form-indexed lexicon.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, LexiconEntry>,
}

impl Lexicon {
    /// Load a lexicon from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, AnnotatorError> {
        let content = fs::read_to_string(path).map_err(|err| {
            AnnotatorError::Io(
                format!("Cannot open lexicon file `{}`", path.display()),
                err,
            )
        })?;
        Self::from_toml(&content, path)
    }

    /// Parse a lexicon from a TOML string. `origin` is only used in
    /// error messages.
    pub fn from_toml(content: &str, origin: &Path) -> Result<Self, AnnotatorError> {
        let file: LexiconFile =
            toml::from_str(content).map_err(|source| AnnotatorError::LoadLexicon {
                path: origin.to_path_buf(),
                source,
            })?;
        Self::from_entries(file.entry)
    }

    /// Build a lexicon, rejecting empty and duplicate forms.
    pub fn from_entries(
        entries: impl IntoIterator<Item = LexiconEntry>,
    ) -> Result<Self, AnnotatorError> {
        let mut map = HashMap::new();
        for entry in entries {
            let key = normalize_form(&entry.form);
            if key.is_empty() {
                return Err(AnnotatorError::IncompatibleModel(
                    "lexicon entry with empty form".into(),
                ));
            }
            if map.contains_key(&key) {
                return Err(AnnotatorError::IncompatibleModel(format!(
                    "duplicate lexicon entry for `{}`",
                    entry.form
                )));
            }
            map.insert(key, entry);
        }
        Ok(Self { entries: map })
    }

    /// Look up the entry for a surface form.
    pub fn lookup(&self, form: &str) -> Option<&LexiconEntry> {
        self.entries.get(&normalize_form(form))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
