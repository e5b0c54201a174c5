//! Protocol buffer messages for the sentence wire format.
//!
//! ```text
//! message Sentences { repeated Sentence sentences = 1; }
//! message Sentence  { repeated Token tokens = 1; }
//! message Token {
//!   string form = 1; string lemma = 2; string upos = 3; string xpos = 4;
//!   map<string, string> features = 5;
//!   int32 head = 6; string relation = 7;
//!   map<string, string> misc = 8;
//! }
//! ```

use std::collections::BTreeMap;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Sentences {
    #[prost(message, repeated, tag = "1")]
    pub sentences: Vec<Sentence>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Sentence {
    #[prost(message, repeated, tag = "1")]
    pub tokens: Vec<Token>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Token {
    #[prost(string, tag = "1")]
    pub form: String,
    #[prost(string, tag = "2")]
    pub lemma: String,
    #[prost(string, tag = "3")]
    pub upos: String,
    #[prost(string, tag = "4")]
    pub xpos: String,
    #[prost(btree_map = "string, string", tag = "5")]
    pub features: BTreeMap<String, String>,
    #[prost(int32, tag = "6")]
    pub head: i32,
    #[prost(string, tag = "7")]
    pub relation: String,
    #[prost(btree_map = "string, string", tag = "8")]
    pub misc: BTreeMap<String, String>,
}
