//! Sentence and token types plus their protobuf wire representation.
//!
//! Incoming tokens only contribute their form and misc layer; every
//! annotation layer is recomputed by the model.

use std::collections::BTreeMap;
use std::ops::Deref;

use prost::Message;

use crate::engine::AnnotatorError;

pub mod proto;

/// A token with its annotation layers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Token {
    pub form: String,
    pub lemma: Option<String>,
    pub upos: Option<String>,
    pub xpos: Option<String>,
    pub features: BTreeMap<String, String>,
    /// Caller metadata, carried through annotation unchanged.
    pub misc: BTreeMap<String, String>,
    /// 1-based position of the head token, `0` is the root.
    pub head: Option<usize>,
    pub relation: Option<String>,
}

impl Token {
    pub fn new(form: impl Into<String>) -> Self {
        Self {
            form: form.into(),
            ..Default::default()
        }
    }

    /// Drop every annotation layer, keeping the form and misc.
    pub fn clear_annotations(&mut self) {
        self.lemma = None;
        self.upos = None;
        self.xpos = None;
        self.features.clear();
        self.head = None;
        self.relation = None;
    }
}

/// A sentence, as an ordered list of tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sentence {
    pub tokens: Vec<Token>,
}

impl Sentence {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl FromIterator<Token> for Sentence {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

/// A batch of sentences as exchanged across the boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sentences(pub Vec<Sentence>);

impl Sentences {
    /// Decode a serialized `Sentences` message.
    pub fn decode(bytes: &[u8]) -> Result<Self, AnnotatorError> {
        let sentences = proto::Sentences::decode(bytes)?;
        Ok(sentences.into())
    }

    /// Serialize to the protobuf wire format.
    pub fn encode_to_vec(&self) -> Vec<u8> {
        proto::Sentences::from(self).encode_to_vec()
    }

    pub fn into_inner(self) -> Vec<Sentence> {
        self.0
    }
}

impl Deref for Sentences {
    type Target = [Sentence];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

impl From<proto::Token> for Token {
    fn from(token: proto::Token) -> Self {
        Token {
            form: token.form,
            misc: token.misc,
            ..Default::default()
        }
    }
}

impl From<&Token> for proto::Token {
    fn from(token: &Token) -> Self {
        proto::Token {
            form: token.form.clone(),
            lemma: token.lemma.clone().unwrap_or_default(),
            upos: token.upos.clone().unwrap_or_default(),
            xpos: token.xpos.clone().unwrap_or_default(),
            features: token.features.clone(),
            head: token.head.map(|head| head as i32).unwrap_or_default(),
            relation: token.relation.clone().unwrap_or_default(),
            misc: token.misc.clone(),
        }
    }
}

impl From<proto::Sentence> for Sentence {
    fn from(sentence: proto::Sentence) -> Self {
        sentence.tokens.into_iter().map(Token::from).collect()
    }
}

impl From<&Sentence> for proto::Sentence {
    fn from(sentence: &Sentence) -> Self {
        proto::Sentence {
            tokens: sentence.tokens.iter().map(proto::Token::from).collect(),
        }
    }
}

impl From<proto::Sentences> for Sentences {
    fn from(sentences: proto::Sentences) -> Self {
        Sentences(sentences.sentences.into_iter().map(Into::into).collect())
    }
}

impl From<&Sentences> for proto::Sentences {
    fn from(sentences: &Sentences) -> Self {
        proto::Sentences {
            sentences: sentences.iter().map(proto::Sentence::from).collect(),
        }
    }
}

/// Read the annotated form of a protobuf token back into a [`Token`].
///
/// Unlike `From<proto::Token>`, this keeps every layer. Used by callers
/// inspecting annotation results.
pub fn token_from_annotated(token: proto::Token) -> Token {
    let relation = non_empty(token.relation);
    let head = if relation.is_some() {
        usize::try_from(token.head).ok()
    } else {
        None
    };
    Token {
        form: token.form,
        lemma: non_empty(token.lemma),
        upos: non_empty(token.upos),
        xpos: non_empty(token.xpos),
        features: token.features,
        misc: token.misc,
        head,
        relation,
    }
}

/// Decode an annotation result, keeping every annotation layer.
pub fn decode_annotated(bytes: &[u8]) -> Result<Sentences, AnnotatorError> {
    let sentences = proto::Sentences::decode(bytes)?;
    Ok(Sentences(
        sentences
            .sentences
            .into_iter()
            .map(|s| s.tokens.into_iter().map(token_from_annotated).collect())
            .collect(),
    ))
}
