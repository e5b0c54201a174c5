//! Annotator error types.
//!
//! All errors are fail-closed: malformed input is rejected, never truncated.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading models or annotating sentences.
#[derive(Debug, Error)]
pub enum AnnotatorError {
    #[error("{0}: {1}")]
    Io(String, #[source] io::Error),

    #[error("Cannot parse annotator config `{}`: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Cannot deserialize lexicon from `{}`: {source}", .path.display())]
    LoadLexicon {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Incompatible model: {0}")]
    IncompatibleModel(String),

    #[error("Cannot decode protobuf: {0}")]
    ProtobufDecode(#[from] prost::DecodeError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Null pointer: {0}")]
    NullPointer(&'static str),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("invalid handle: {0}")]
    InvalidHandle(u64),

    #[error("Panic at the FFI boundary: {0}")]
    Panic(String),
}

impl AnnotatorError {
    /// Returns true if this error was caused by the caller's input rather
    /// than by the model or the library.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::ProtobufDecode(_)
                | Self::InvalidInput(_)
                | Self::NullPointer(_)
                | Self::InvalidHandle(_)
        )
    }

    /// Returns true if this error happened while loading a model.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Self::Io(..) | Self::Config { .. } | Self::LoadLexicon { .. } | Self::IncompatibleModel(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_the_file() {
        let err = AnnotatorError::Io(
            "Cannot open annotator config file `/foo/bar`".to_string(),
            io::Error::new(io::ErrorKind::NotFound, "file not found"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/foo/bar"));
        assert!(msg.contains("file not found"));
        assert!(err.is_load_failure());
        assert!(!err.is_caller_error());
    }

    #[test]
    fn invalid_handle_message() {
        let err = AnnotatorError::InvalidHandle(42);
        assert_eq!(err.to_string(), "invalid handle: 42");
        assert!(err.is_caller_error());
    }

    #[test]
    fn inference_error_is_neither_caller_nor_load() {
        let err = AnnotatorError::Inference("too long".into());
        assert!(!err.is_caller_error());
        assert!(!err.is_load_failure());
    }
}
