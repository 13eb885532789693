//! Error types shared by every stage of the feed pass.

use thiserror::Error;

use crate::section::SectionKind;

/// Fatal errors raised while transforming an export into a feed.
///
/// None of these are recoverable mid-pass: the caller must discard whatever
/// was already written to the sink and restart from the beginning.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Required option missing or invalid, or the export contradicts it.
    #[error("configuration error ({key}): {message}")]
    Configuration { key: String, message: String },

    /// Token stream does not have the shape of a catalog export.
    #[error("malformed export at token {position}: {message}")]
    Structural { position: u64, message: String },

    /// A complete record is missing a required field.
    #[error("invalid {section} record #{index}: {source}")]
    InvalidRecord {
        section: SectionKind,
        index: usize,
        #[source]
        source: FieldError,
    },

    /// A product references data the lookup tables cannot resolve.
    #[error("product {product}: {message}")]
    DataIntegrity { product: String, message: String },

    /// A listener callback arrived in the wrong adapter state.
    #[error("unexpected {event} while {state}")]
    Sequence { state: &'static str, event: String },

    /// Tokenizer rejected the input bytes.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading the source or writing the sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for feed operations.
pub type Result<T> = std::result::Result<T, FeedError>;

impl FeedError {
    /// Create a Configuration error.
    pub fn configuration(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a Structural error.
    pub fn structural(position: u64, message: impl Into<String>) -> Self {
        Self::Structural {
            position,
            message: message.into(),
        }
    }

    /// Create a DataIntegrity error.
    pub fn data_integrity(product: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataIntegrity {
            product: product.into(),
            message: message.into(),
        }
    }
}

/// Problems with a single field while typing a reconstructed record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("missing required field `{0}`")]
    Missing(&'static str),

    #[error("field `{0}` must be a scalar")]
    NotScalar(&'static str),

    #[error("field `{field}` is malformed: {message}")]
    Malformed {
        field: &'static str,
        message: String,
    },
}
