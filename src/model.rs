//! Input records handed over by the hosting catalogue.
//!
//! Resources arrive as loosely typed JSON objects. [`Resource::from_record`]
//! validates them into a typed form before any aggregation happens, so a
//! malformed record stops the build before a single archive byte is written.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BulkError, Result};

/// Checksum attribute used when a request does not name one.
pub const DEFAULT_CHECKSUM_ATTRIBUTE: &str = "md5";

/// A single downloadable file from the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub url: String,
    /// Size in bytes, if the catalogue knows it.
    pub size: Option<u64>,
    /// Remaining scalar fields of the record, keyed by name.
    pub attributes: BTreeMap<String, String>,
}

impl Resource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            size: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Look up an attribute such as the checksum field.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Validate a raw catalogue record.
    ///
    /// `index` is the record's position in the request and only feeds error
    /// messages. `null` attribute values count as absent.
    pub fn from_record(index: usize, record: &Value) -> Result<Self> {
        let invalid = |reason: &str| BulkError::InvalidResource {
            index,
            reason: reason.to_string(),
        };

        let object = record.as_object().ok_or_else(|| invalid("not a JSON object"))?;

        let url = match object.get("url") {
            Some(Value::String(url)) => url.clone(),
            Some(_) => return Err(invalid("`url` is not a string")),
            None => return Err(invalid("missing `url`")),
        };

        let size = match object.get("size") {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => {
                if let Some(size) = n.as_u64() {
                    Some(size)
                } else if let Some(size) = n.as_i64() {
                    return Err(BulkError::NegativeSize { url, size });
                } else {
                    return Err(invalid("`size` is not an integer"));
                }
            }
            Some(_) => return Err(invalid("`size` is not an integer")),
        };

        let attributes = object
            .iter()
            .filter(|(key, _)| !matches!(key.as_str(), "url" | "size"))
            .filter_map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    Value::Null | Value::Array(_) | Value::Object(_) => return None,
                };
                Some((key.clone(), text))
            })
            .collect();

        Ok(Self {
            url,
            size,
            attributes,
        })
    }
}

/// A catalogue package. Only its membership in the request matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    #[serde(rename = "type", default)]
    pub package_type: String,
}

/// Parameters for one archive build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkRequest {
    /// Root directory name inside the archive and namespace for tmp files.
    pub prefix: String,
    pub title: String,
    #[serde(default)]
    pub username: Option<String>,
    /// Where the user can look up their API key.
    #[serde(default)]
    pub user_page: Option<String>,
    #[serde(default)]
    pub packages: Vec<Package>,
    /// Raw resource records, validated during the build.
    #[serde(default)]
    pub resources: Vec<Value>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub query_url: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default = "default_checksum_attribute")]
    pub checksum_attribute: String,
}

fn default_checksum_attribute() -> String {
    DEFAULT_CHECKSUM_ATTRIBUTE.to_string()
}

impl BulkRequest {
    pub fn new(prefix: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            title: title.into(),
            username: None,
            user_page: None,
            packages: Vec::new(),
            resources: Vec::new(),
            query: None,
            query_url: None,
            download_url: None,
            checksum_attribute: default_checksum_attribute(),
        }
    }

    /// Decode a request document.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Validate every raw resource record, in input order.
    pub fn parse_resources(&self) -> Result<Vec<Resource>> {
        self.resources
            .iter()
            .enumerate()
            .map(|(index, record)| Resource::from_record(index, record))
            .collect()
    }

    /// Check the prefix is usable as one path segment.
    pub fn validate_prefix(&self) -> Result<()> {
        let reason = if self.prefix.is_empty() {
            Some("must not be empty")
        } else if self.prefix.contains(['/', '\\']) {
            Some("must not contain path separators")
        } else if self.prefix == "." || self.prefix.contains("..") {
            Some("must not contain relative path components")
        } else if self.prefix.chars().any(char::is_control) {
            Some("must not contain control characters")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(BulkError::InvalidPrefix {
                prefix: self.prefix.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }
}
