//! Orders API gateway.

use super::ApiClient;
use crate::error::Result;
use serde_json::Value;
use std::future::Future;

/// Remote order-history reads, scoped to one user.
pub trait OrdersApi: Send + Sync {
    /// Fetch the order list for `user_email`.
    fn fetch_orders(&self, user_email: &str) -> impl Future<Output = Result<Value>> + Send;
}

impl OrdersApi for ApiClient {
    async fn fetch_orders(&self, user_email: &str) -> Result<Value> {
        let request = self
            .http
            .get(self.url("/orders"))
            .query(&[("userEmail", user_email)]);
        let response = self.authorize(request).send().await?;
        Self::decode_value(response).await
    }
}
