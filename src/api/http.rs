//! Implements the `Backend` trait over HTTP with `reqwest`.

use crate::api::{Backend, CredentialProvider, Resource};
use crate::error::Res;
use crate::model::unwrap_envelope;
use anyhow::{anyhow, bail, Context};
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

/// Talks to the admin REST API. Every request asks the `CredentialProvider` for a bearer token.
pub struct HttpBackend {
    base: Url,
    client: reqwest::Client,
    credentials: Box<dyn CredentialProvider>,
}

impl HttpBackend {
    /// `base` should end in `/` so that resource paths are joined beneath it rather than replacing
    /// its last segment. `timeout` applies to each request as a whole.
    pub fn new(
        base: Url,
        timeout: Duration,
        credentials: Box<dyn CredentialProvider>,
    ) -> Res<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build the HTTP client")?;
        Ok(Self {
            base,
            client,
            credentials,
        })
    }

    fn collection_url(&self, resource: Resource) -> Res<Url> {
        self.base
            .join(resource.path())
            .with_context(|| format!("Unable to build the URL for {resource}"))
    }

    fn item_url(&self, resource: Resource, id: &str) -> Res<Url> {
        let mut url = self.collection_url(resource)?;
        // push() percent-encodes, so ids containing '/' or '?' stay a single segment
        url.path_segments_mut()
            .map_err(|_| anyhow!("The API URL '{}' cannot be a base URL", self.base))?
            .push(id);
        Ok(url)
    }

    async fn request(&self, method: Method, url: Url) -> Res<RequestBuilder> {
        trace!("{method} {url}");
        let mut builder = self.client.request(method, url);
        if let Some(token) = self.credentials.bearer_token().await? {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }
}

/// Turns a non-2xx response into an error that carries the status and body.
async fn check(response: Response, what: &str) -> Res<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read response body".to_string());
    bail!("{what} failed with status {status}: {body}")
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn list(&mut self, resource: Resource) -> Res<Vec<Value>> {
        let url = self.collection_url(resource)?;
        let response = self
            .request(Method::GET, url)
            .await?
            .send()
            .await
            .with_context(|| format!("Failed to send the request for {resource}"))?;
        let response = check(response, &format!("Listing {resource}")).await?;
        let body: Value = response
            .json()
            .await
            .with_context(|| format!("Failed to parse the {resource} response as JSON"))?;
        let items = unwrap_envelope(body)
            .with_context(|| format!("Unexpected shape of the {resource} response"))?;
        debug!("Fetched {} {resource}", items.len());
        Ok(items)
    }

    async fn update(&mut self, resource: Resource, id: &str, body: &Value) -> Res<()> {
        let url = self.item_url(resource, id)?;
        let response = self
            .request(Method::PUT, url)
            .await?
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send the update for {resource} '{id}'"))?;
        check(response, &format!("Updating {resource} '{id}'")).await?;
        debug!("Updated {resource} '{id}'");
        Ok(())
    }

    async fn delete(&mut self, resource: Resource, id: &str) -> Res<()> {
        let url = self.item_url(resource, id)?;
        let response = self
            .request(Method::DELETE, url)
            .await?
            .send()
            .await
            .with_context(|| format!("Failed to send the delete for {resource} '{id}'"))?;
        check(response, &format!("Deleting {resource} '{id}'")).await?;
        debug!("Deleted {resource} '{id}'");
        Ok(())
    }
}
