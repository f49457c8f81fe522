//! The boundary between the app and the admin REST backend.
//!
//! The `Backend` trait is the seam: `HttpBackend` talks to the real service with `reqwest`, and
//! `TestBackend` holds seeded JSON in memory so that the whole app can run without a server.

mod credentials;
mod http;
mod test_backend;

pub use credentials::{CredentialProvider, StaticToken, TokenFile};
pub use http::HttpBackend;
pub use test_backend::TestBackend;

use crate::error::Res;
use crate::Config;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env::VarError;
use tracing::debug;

const TEST_MODE_ENV: &str = "PAYLENS_IN_TEST_MODE";

/// The collections the backend exposes.
#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    Users,
    Employees,
    ContactQueries,
    Payments,
}

serde_plain::derive_display_from_serialize!(Resource);
serde_plain::derive_fromstr_from_deserialize!(Resource);

impl Resource {
    /// The collection path, relative to the API base URL.
    pub fn path(self) -> &'static str {
        match self {
            Resource::Users => "users",
            Resource::Employees => "employees",
            Resource::ContactQueries => "contact-queries",
            Resource::Payments => "payments",
        }
    }
}

/// The operations the app needs from the backend.
///
/// `list` returns the raw items of a collection with any `{"data": [...]}` envelope removed.
/// Mutations return nothing; callers re-fetch afterwards rather than patching local state.
#[async_trait::async_trait]
pub trait Backend {
    async fn list(&mut self, resource: Resource) -> Res<Vec<Value>>;

    async fn update(&mut self, resource: Resource, id: &str, body: &Value) -> Res<()>;

    async fn delete(&mut self, resource: Resource, id: &str) -> Res<()>;
}

/// Which `Backend` implementation to use.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    /// Talk to the configured REST API.
    #[default]
    Http,
    /// Use seeded in-memory data.
    Test,
}

impl Mode {
    /// `Mode::Test` when `PAYLENS_IN_TEST_MODE` is set and non-empty, otherwise `Mode::Http`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(s) if !s.is_empty() => Mode::Test,
            Ok(_) | Err(VarError::NotPresent) => Mode::Http,
            Err(VarError::NotUnicode(_)) => Mode::Test,
        }
    }
}

/// Creates the backend for `mode`. The HTTP backend reads its bearer token from the token file
/// configured in `config`.
pub(crate) fn backend(config: &Config, mode: Mode) -> Res<Box<dyn Backend + Send>> {
    debug!("Creating {mode:?} backend");
    Ok(match mode {
        Mode::Http => {
            let credentials = TokenFile::new(config.token_path());
            Box::new(HttpBackend::new(
                config.api_url().clone(),
                config.request_timeout(),
                Box::new(credentials),
            )?)
        }
        Mode::Test => Box::new(TestBackend::default()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_paths() {
        assert_eq!(Resource::ContactQueries.path(), "contact-queries");
        assert_eq!(
            "contact-queries".parse::<Resource>().unwrap(),
            Resource::ContactQueries
        );
        assert_eq!(Resource::Employees.to_string(), "employees");
    }
}
