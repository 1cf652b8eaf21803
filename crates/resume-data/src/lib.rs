//! Résumé record model and interchange formats.
//!
//! This crate is responsible for translating between serialized résumé files (JSON, XML and
//! YAML) and the in-memory [`Resume`] record. It knows nothing about templates or rendering;
//! those live in `fodder-core`.

pub mod codec;
pub mod model;

pub use codec::{decode, encode, from_str, to_string};
pub use fodder_types::DataFormat;
pub use model::{
    Basics, Education, EntryGroup, GroupPair, Location, Publication, PublicationGroups, Resume,
    Skill, SocialProfile, Work, WorkGroups, CURRENT_SCHEMA_VERSION, PRIMARY, SUPPLEMENTARY,
};

use thiserror::Error;

/// Errors returned by the `resume-data` boundary crate.
#[derive(Debug, Error)]
pub enum DataError {
    /// The bytes are not well-formed for the requested format.
    #[error("malformed {format} input: {source}")]
    MalformedInput {
        format: DataFormat,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The input parsed, but its structure does not match the résumé schema.
    #[error("{format} schema mismatch at {path}: {message}")]
    SchemaMismatch {
        format: DataFormat,
        path: String,
        message: String,
    },

    /// The encoder reported a failure.
    #[error("failed to serialize {format}: {message}")]
    Serialization { format: DataFormat, message: String },
}

pub type DataResult<T> = std::result::Result<T, DataError>;

impl DataError {
    pub(crate) fn malformed(
        format: DataFormat,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::MalformedInput {
            format,
            source: source.into(),
        }
    }

    pub(crate) fn mismatch(
        format: DataFormat,
        path: impl Into<String>,
        message: impl ToString,
    ) -> Self {
        let path = path.into();
        let path = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        Self::SchemaMismatch {
            format,
            path,
            message: message.to_string(),
        }
    }

    pub(crate) fn serialization(format: DataFormat, message: impl ToString) -> Self {
        Self::Serialization {
            format,
            message: message.to_string(),
        }
    }
}
