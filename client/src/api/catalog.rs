//! Catalog API gateway: records and groups.

use super::ApiClient;
use crate::error::Result;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use spindle_engine::{GroupId, Record, RecordId};
use std::future::Future;

/// Remote catalog operations.
///
/// Implementations must be thread-safe (`Send + Sync`); fetch methods
/// return the raw payload for the coordinator to normalize.
pub trait CatalogApi: Send + Sync {
    /// Fetch the full record list.
    fn fetch_records(&self) -> impl Future<Output = Result<Value>> + Send;

    /// Fetch the full group list.
    fn fetch_groups(&self) -> impl Future<Output = Result<Value>> + Send;

    /// Fetch one group by id.
    fn fetch_group(&self, id: GroupId) -> impl Future<Output = Result<Value>> + Send;

    /// Fetch the records belonging to one group.
    fn fetch_records_by_group(&self, id: GroupId) -> impl Future<Output = Result<Value>> + Send;

    /// Create a record from a draft (multipart form).
    fn create_record(&self, record: &Record) -> impl Future<Output = Result<()>> + Send;

    /// Update an existing record (multipart form including the id).
    fn update_record(&self, record: &Record) -> impl Future<Output = Result<()>> + Send;

    /// Delete a record.
    fn delete_record(&self, id: RecordId) -> impl Future<Output = Result<()>> + Send;

    /// Apply a signed stock adjustment server-side.
    fn update_stock(&self, id: RecordId, delta: i64) -> impl Future<Output = Result<()>> + Send;
}

/// Multipart form for record create/update. Cart fields never travel; the
/// photo part is attached only when a payload was selected.
fn record_form(record: &Record, include_id: bool) -> Form {
    let mut form = Form::new()
        .text("title", record.title.clone())
        .text("price", record.price.to_string())
        .text("stock", record.stock.to_string())
        .text("discontinued", record.discontinued.to_string());
    if include_id {
        form = form.text("id", record.id.to_string());
    }
    if let Some(year) = record.year {
        form = form.text("year", year.to_string());
    }
    if let Some(group_id) = record.group_id {
        form = form.text("groupId", group_id.to_string());
    }
    if let Some(photo) = &record.photo {
        let name = record
            .photo_name
            .clone()
            .unwrap_or_else(|| "photo".to_string());
        form = form.part("photo", Part::bytes(photo.clone()).file_name(name));
    }
    form
}

impl CatalogApi for ApiClient {
    async fn fetch_records(&self) -> Result<Value> {
        self.get_value("/records").await
    }

    async fn fetch_groups(&self) -> Result<Value> {
        self.get_value("/groups").await
    }

    async fn fetch_group(&self, id: GroupId) -> Result<Value> {
        self.get_value(&format!("/groups/{id}")).await
    }

    async fn fetch_records_by_group(&self, id: GroupId) -> Result<Value> {
        self.get_value(&format!("/groups/recordsByGroup/{id}")).await
    }

    async fn create_record(&self, record: &Record) -> Result<()> {
        let request = self
            .http
            .post(self.url("/records"))
            .multipart(record_form(record, false));
        let response = self.authorize(request).send().await?;
        Self::expect_ok(response).await
    }

    async fn update_record(&self, record: &Record) -> Result<()> {
        let request = self
            .http
            .put(self.url(&format!("/records/{}", record.id)))
            .multipart(record_form(record, true));
        let response = self.authorize(request).send().await?;
        Self::expect_ok(response).await
    }

    async fn delete_record(&self, id: RecordId) -> Result<()> {
        let request = self.http.delete(self.url(&format!("/records/{id}")));
        let response = self.authorize(request).send().await?;
        Self::expect_ok(response).await
    }

    async fn update_stock(&self, id: RecordId, delta: i64) -> Result<()> {
        let request = self
            .http
            .put(self.url(&format!("/records/{id}/updateStock/{delta}")));
        let response = self.authorize(request).send().await?;
        Self::expect_ok(response).await
    }
}
