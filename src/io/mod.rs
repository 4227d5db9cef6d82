//! Where the CLI loads bulk requests from.
//!
//! The library itself never touches the filesystem or network: requests
//! are plain values. These sources exist for the command-line adapter,
//! which accepts either a local JSON file or an HTTP(S) URL.

mod http;
mod local;

pub use http::HttpRequestSource;
pub use local::LocalRequestSource;

use anyhow::Result;
use async_trait::async_trait;

use crate::model::BulkRequest;

/// A location a request document can be fetched from
#[async_trait]
pub trait RequestSource: Send + Sync {
    /// Fetch the raw request document
    async fn fetch(&self) -> Result<Vec<u8>>;

    /// Human-readable location, used in log and error messages
    fn location(&self) -> &str;

    /// Fetch and decode the request
    async fn load(&self) -> Result<BulkRequest> {
        let data = self.fetch().await?;
        let request = BulkRequest::from_json(&data)
            .map_err(|e| anyhow::anyhow!("{}: {}", self.location(), e))?;
        tracing::debug!(
            "Loaded request {} from {} ({} resources)",
            request.prefix,
            self.location(),
            request.resources.len()
        );
        Ok(request)
    }
}

/// Whether `location` should be fetched over HTTP.
pub fn is_http_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Pick the source type for a path or URL.
pub fn open_source(location: &str) -> Result<Box<dyn RequestSource>> {
    if is_http_url(location) {
        Ok(Box::new(HttpRequestSource::new(location.to_string())?))
    } else {
        Ok(Box::new(LocalRequestSource::new(location)))
    }
}
