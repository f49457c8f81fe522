//! Bearer token sources. The token itself is issued and stored by an external login flow; this
//! module only reads it.

use crate::error::Res;
use crate::utils;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Supplies the bearer token attached to each request. `None` means requests go out without an
/// `Authorization` header.
#[async_trait::async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn bearer_token(&self) -> Res<Option<String>>;
}

/// Reads the token from a file on every call, so a token refreshed by another tool is picked up
/// without restarting.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl CredentialProvider for TokenFile {
    async fn bearer_token(&self) -> Res<Option<String>> {
        if !self.path.is_file() {
            warn!(
                "No token file at {}, sending unauthenticated requests",
                self.path.display()
            );
            return Ok(None);
        }
        let token = utils::read(&self.path).await?.trim().to_string();
        if token.is_empty() {
            warn!("Token file {} is empty", self.path.display());
            return Ok(None);
        }
        debug!("Loaded bearer token from {}", self.path.display());
        Ok(Some(token))
    }
}

/// A fixed token, or none at all.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: Option<String>) -> Self {
        Self(token)
    }
}

#[async_trait::async_trait]
impl CredentialProvider for StaticToken {
    async fn bearer_token(&self) -> Res<Option<String>> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_token_file_trims_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("token");
        utils::write(&path, "abc.def.ghi\n").await.unwrap();
        let token = TokenFile::new(&path).bearer_token().await.unwrap();
        assert_eq!(token.as_deref(), Some("abc.def.ghi"));
    }

    #[tokio::test]
    async fn test_missing_token_file_is_none() {
        let dir = TempDir::new().unwrap();
        let token = TokenFile::new(dir.path().join("nope"))
            .bearer_token()
            .await
            .unwrap();
        assert!(token.is_none());
    }

    #[tokio::test]
    async fn test_empty_token_file_is_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("token");
        utils::write(&path, "  \n").await.unwrap();
        assert!(TokenFile::new(&path).bearer_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_static_token() {
        let token = StaticToken::new(Some("t0k3n".into()));
        assert_eq!(token.bearer_token().await.unwrap().as_deref(), Some("t0k3n"));
        assert!(StaticToken::default().bearer_token().await.unwrap().is_none());
    }
}
