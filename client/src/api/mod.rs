//! Remote API gateways.
//!
//! The traits describe the external collaborators at their boundary only;
//! [`ApiClient`] is the reqwest-backed implementation used in production.
//! Fetch methods return the raw decoded payload, whatever envelope it
//! arrived in; normalization happens uniformly in the coordinators via the
//! engine. No gateway retries: at most one attempt per user action.

mod cart;
mod catalog;
mod orders;

pub use cart::CartGateway;
pub use catalog::CatalogApi;
pub use orders::OrdersApi;

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::identity::IdentityWatch;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::Value;
use spindle_engine::envelope;

/// HTTP client for the catalog, cart, and orders APIs.
///
/// Every request picks up the bearer credential from the identity stream
/// at send time; requests issued while signed out go out unauthenticated.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    identity: IdentityWatch,
}

impl ApiClient {
    /// Build a client from configuration and the identity stream.
    pub fn new(config: &Config, identity: IdentityWatch) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            identity,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer credential when an identity is present.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.identity.borrow().as_ref() {
            Some(identity) => request.bearer_auth(&identity.token),
            None => request,
        }
    }

    async fn get_value(&self, path: &str) -> Result<Value> {
        let response = self.authorize(self.http.get(self.url(path))).send().await?;
        Self::decode_value(response).await
    }

    async fn decode_value(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::from_status(status));
        }
        Ok(response.json::<Value>().await?)
    }

    async fn expect_ok(response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::from_status(status));
        }
        Ok(())
    }
}

/// Normalize a fetched payload, logging shape mismatches and skipped items.
///
/// Shape mismatches degrade to an empty sequence and are logged only,
/// never raised.
pub(crate) fn normalize_payload<T: DeserializeOwned>(
    payload: Value,
    looks_like: fn(&Value) -> bool,
    entity: &'static str,
) -> Vec<T> {
    let normalized = envelope::normalize::<T, _>(payload, looks_like);
    if normalized.is_unrecognized() {
        tracing::warn!(entity, "unrecognized response envelope; treating as empty");
    }
    if normalized.skipped > 0 {
        tracing::warn!(
            entity,
            skipped = normalized.skipped,
            "envelope items failed to decode and were skipped"
        );
    }
    normalized.entities
}
