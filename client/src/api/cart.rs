//! Cart API gateway.

use super::{normalize_payload, ApiClient};
use crate::error::Result;
use spindle_engine::{CartLine, CartSnapshot, RecordId};
use std::future::Future;

/// Remote cart persistence.
///
/// Both operations return the authoritative post-operation cart contents;
/// the snapshot stays externally sourced and this layer only consumes it.
pub trait CartGateway: Send + Sync {
    /// Persist an add of one unit of `record_id`.
    fn add_item(&self, record_id: RecordId) -> impl Future<Output = Result<CartSnapshot>> + Send;

    /// Persist a removal of one unit of `record_id`.
    fn remove_item(&self, record_id: RecordId)
        -> impl Future<Output = Result<CartSnapshot>> + Send;
}

impl CartGateway for ApiClient {
    async fn add_item(&self, record_id: RecordId) -> Result<CartSnapshot> {
        let request = self.http.post(self.url(&format!("/cart/items/{record_id}")));
        let response = self.authorize(request).send().await?;
        let payload = Self::decode_value(response).await?;
        Ok(snapshot_from(payload))
    }

    async fn remove_item(&self, record_id: RecordId) -> Result<CartSnapshot> {
        let request = self
            .http
            .delete(self.url(&format!("/cart/items/{record_id}")));
        let response = self.authorize(request).send().await?;
        let payload = Self::decode_value(response).await?;
        Ok(snapshot_from(payload))
    }
}

/// The cart comes back in the same envelope shapes as every other list.
fn snapshot_from(payload: serde_json::Value) -> CartSnapshot {
    let lines = normalize_payload::<CartLine>(payload, CartLine::looks_like, "cart");
    CartSnapshot::from_lines(lines)
}
