use crate::commands::Out;
use crate::{Config, Result};
use std::path::Path;
use tracing::warn;

/// Creates the home directory, its `.secrets` subdirectory and an initial `config.json`.
///
/// # Arguments
/// - `paylens_home` - The directory that will be the home directory, e.g. `$HOME/paylens`
/// - `api_url` - The base URL of the admin REST API, e.g. `https://admin.example.com/api/`
/// - `token` - The bearer token. When given it is written to `.secrets/token` with owner-only
///   permissions.
///
/// # Errors
/// - Returns an error if the URL is invalid or any file operations fail.
pub async fn init(paylens_home: &Path, api_url: &str, token: Option<&str>) -> Result<Out<()>> {
    let config = Config::create(paylens_home, api_url, token).await?;
    if token.is_none() {
        warn!(
            "No token was given, write one to {} before talking to a server that needs it",
            config.token_path().display()
        );
    }
    Ok(format!(
        "Successfully created the paylens directory and config at {}",
        config.root().display()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("paylens");
        let out = init(&home, "https://admin.example.com/api", Some("secret"))
            .await
            .unwrap();
        assert!(out.message().starts_with("Successfully created"));
        assert!(home.join("config.json").is_file());
        assert!(home.join(".secrets").join("token").is_file());
    }
}
