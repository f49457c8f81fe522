//! Configuration file handling for paylens.
//!
//! The configuration file is stored at `$PAYLENS_HOME/config.json` and holds the API base URL, the
//! location of the bearer token file and the request timeout.

use crate::error::{ErrorType, IntoResult, Res};
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const APP_NAME: &str = "paylens";
const CONFIG_VERSION: u8 = 1;
const SECRETS: &str = ".secrets";
const TOKEN: &str = "token";
const CONFIG_JSON: &str = "config.json";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$PAYLENS_HOME` and from there it loads `$PAYLENS_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    secrets: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    api_url: Url,
}

impl Config {
    /// Creates the home directory, its `.secrets` subdirectory and an initial `config.json`.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the home directory, e.g. `$HOME/paylens`
    /// - `api_url` - The base URL of the admin API, e.g. `https://admin.example.com/api/`
    /// - `token` - If given, written to `.secrets/token` with owner-only permissions.
    ///
    /// # Errors
    /// - Returns an error if the URL is invalid or any file operation fails.
    pub async fn create(
        dir: impl Into<PathBuf>,
        api_url: &str,
        token: Option<&str>,
    ) -> Result<Self> {
        Self::create_inner(dir.into(), api_url, token)
            .await
            .pub_result(ErrorType::Config)
    }

    async fn create_inner(maybe_relative: PathBuf, api_url: &str, token: Option<&str>) -> Res<Self> {
        let api_url = parse_api_url(api_url)?;

        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the paylens home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;
        let secrets = root.join(SECRETS);
        utils::make_dir(&secrets).await?;

        let config_file = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            api_url: api_url.to_string(),
            token_path: None,
            request_timeout_secs: None,
        };
        let config_path = root.join(CONFIG_JSON);
        config_file.save(&config_path).await?;

        let config = Self {
            root,
            secrets,
            config_path,
            config_file,
            api_url,
        };

        if let Some(token) = token {
            utils::write_secret(config.token_path(), token.trim())
                .await
                .context("Unable to save the token")?;
        }

        Ok(config)
    }

    /// This will
    /// - validate that `paylens_home` exists and that the config file exists
    /// - load and validate the config file
    /// - return the loaded configuration object
    pub async fn load(paylens_home: impl Into<PathBuf>) -> Result<Self> {
        Self::load_inner(paylens_home.into())
            .await
            .pub_result(ErrorType::Config)
    }

    async fn load_inner(maybe_relative: PathBuf) -> Res<Self> {
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The paylens home directory is missing, run 'paylens init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;
        let api_url = parse_api_url(&config_file.api_url)
            .with_context(|| format!("Bad api_url in {}", config_path.display()))?;

        Ok(Self {
            secrets: root.join(SECRETS),
            root,
            config_path,
            config_file,
            api_url,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn secrets(&self) -> &Path {
        &self.secrets
    }

    /// The API base URL, always ending in `/`.
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Returns the stored `token_path` if it is absolute, otherwise resolves it against the home
    /// directory.
    pub fn token_path(&self) -> PathBuf {
        let p = self.config_file.token_path();
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.config_file
                .request_timeout_secs
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        )
    }
}

/// Parses the API base URL and makes sure it ends in `/` so that `Url::join` appends resource
/// paths instead of replacing the last segment.
fn parse_api_url(s: &str) -> Res<Url> {
    let mut url = Url::parse(s.trim()).with_context(|| format!("Invalid API URL '{s}'"))?;
    if url.cannot_be_a_base() {
        bail!("The API URL '{s}' cannot be used as a base URL");
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "paylens",
///   "config_version": 1,
///   "api_url": "https://admin.example.com/api/",
///   "token_path": ".secrets/token",
///   "request_timeout_secs": 30
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "paylens"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Base URL of the admin REST API
    api_url: String,

    /// Path to the bearer token file (optional, relative to the home directory or absolute)
    /// Defaults to $PAYLENS_HOME/.secrets/token if not specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token_path: Option<PathBuf>,

    /// Per-request timeout in seconds. Defaults to 30.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request_timeout_secs: Option<u64>,
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or names a different app.
    async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    /// Gets the token path. Relative paths are relative to the home directory.
    fn token_path(&self) -> PathBuf {
        self.token_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(SECRETS).join(TOKEN))
    }
}
