use std::fmt;

use crate::error::{BulkError, Result};

/// Digest algorithms every generated script knows how to verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha512,
}

impl ChecksumAlgorithm {
    /// Infer the algorithm from a checksum attribute name.
    ///
    /// The name must start with the algorithm, ignoring case, `-` and `_`:
    /// `md5`, `SHA-256` and `sha1_checksum` are all accepted.
    pub fn from_attribute(attribute: &str) -> Result<Self> {
        let normalized: String = attribute
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        [Self::Sha512, Self::Sha256, Self::Sha1, Self::Md5]
            .into_iter()
            .find(|algorithm| normalized.starts_with(algorithm.name()))
            .ok_or_else(|| BulkError::UnsupportedChecksum {
                attribute: attribute.to_string(),
            })
    }

    /// Lowercase name as understood by coreutils (`<name>sum`), `hashlib`
    /// and `Get-FileHash`.
    pub fn name(&self) -> &'static str {
        match self {
            ChecksumAlgorithm::Md5 => "md5",
            ChecksumAlgorithm::Sha1 => "sha1",
            ChecksumAlgorithm::Sha256 => "sha256",
            ChecksumAlgorithm::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
