use super::RequestSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

/// Request document on the local filesystem
pub struct LocalRequestSource {
    path: PathBuf,
    display: String,
}

impl LocalRequestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display = path.display().to_string();
        Self { path, display }
    }
}

#[async_trait]
impl RequestSource for LocalRequestSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("failed to read {}", self.display))
    }

    fn location(&self) -> &str {
        &self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("request.json");
        std::fs::write(
            &path,
            r#"{"prefix": "abc", "title": "Test", "resources": [{"url": "http://x/a.txt"}]}"#,
        )
        .unwrap();

        let request = LocalRequestSource::new(&path).load().await.unwrap();
        assert_eq!(request.prefix, "abc");
        assert_eq!(request.resources.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempdir().unwrap();
        let source = LocalRequestSource::new(dir.path().join("absent.json"));
        let err = source.load().await.unwrap_err();
        assert!(err.to_string().contains("absent.json"));
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(LocalRequestSource::new(&path).load().await.is_err());
    }
}
