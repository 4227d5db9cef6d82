//! Error types for bulk archive generation.

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, BulkError>;

/// Everything that can go wrong while assembling a bulk archive.
///
/// Nothing here is retried internally. A failed build never hands back a
/// partial archive.
#[derive(Error, Debug)]
pub enum BulkError {
    /// A resource record is malformed (not an object, missing `url`, bad `size`).
    #[error("invalid resource record #{index}: {reason}")]
    InvalidResource { index: usize, reason: String },

    /// A resource record carries a negative `size`.
    #[error("resource {url} has negative size {size}")]
    NegativeSize { url: String, size: i64 },

    /// The prefix cannot be used as a single archive path segment.
    #[error("invalid prefix {prefix:?}: {reason}")]
    InvalidPrefix { prefix: String, reason: &'static str },

    /// The checksum attribute names an algorithm the download scripts cannot verify.
    #[error("checksum attribute {attribute:?} does not name md5, sha1, sha256 or sha512")]
    UnsupportedChecksum { attribute: String },

    /// A script template is broken or references an unknown variable.
    #[error("template {template}: {reason}")]
    Template { template: String, reason: String },

    /// Writing the archive failed.
    #[error("archive error: {0}")]
    Archive(#[from] std::io::Error),

    /// Reading back an archive found malformed data.
    #[error("malformed ZIP archive: {0}")]
    Zip(String),

    /// A request document could not be decoded.
    #[error("invalid request JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl BulkError {
    pub(crate) fn template(template: &str, reason: impl Into<String>) -> Self {
        Self::Template {
            template: template.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn zip(reason: impl Into<String>) -> Self {
        Self::Zip(reason.into())
    }
}
