use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::RequestSource;
use anyhow::{Result, bail};

/// Request document served over HTTP(S), e.g. by the catalogue itself
pub struct HttpRequestSource {
    client: Client,
    url: String,
    max_retry: u32,
}

impl HttpRequestSource {
    pub fn new(url: String) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            url,
            max_retry: 5,
        })
    }
}

#[async_trait]
impl RequestSource for HttpRequestSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        let mut retry_count = 0;

        loop {
            let result = self
                .client
                .get(&self.url)
                .header("Accept", "application/json")
                .send()
                .await;

            match result {
                Ok(resp) => {
                    if !resp.status().is_success() {
                        bail!("HTTP request failed with status: {}", resp.status());
                    }
                    return Ok(resp.bytes().await?.to_vec());
                }
                Err(e) if e.is_timeout() || e.is_connect() => {
                    retry_count += 1;
                    if retry_count >= self.max_retry {
                        bail!("Max retries exceeded fetching {}: {}", self.url, e);
                    }
                    tracing::warn!(
                        "Connection error, retry {}/{}: {}",
                        retry_count,
                        self.max_retry,
                        e
                    );
                    tokio::time::sleep(Duration::from_millis(500 * retry_count as u64)).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn location(&self) -> &str {
        &self.url
    }
}
