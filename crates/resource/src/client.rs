//! HTTP accessor for the remote resource API

use async_trait::async_trait;
use bookshelf_kernel::settings::UpstreamSettings;
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::{ClientError, ClientResult, Envelope, Patch};

/// Operations offered by the resource API.
///
/// Every call is an independent round trip: no retries, no ordering between
/// calls, no client-side cache.
#[async_trait]
pub trait ResourceApi: Send + Sync {
    /// `GET {collection}({id})[?$expand=...]`. Any non-2xx is `NotFound`.
    async fn fetch_by_id(&self, collection: &str, id: i64, expand: &[&str]) -> ClientResult<Value>;

    /// `GET {collection}`. Failures degrade to an empty envelope.
    async fn fetch_collection(&self, collection: &str) -> Envelope<Value>;

    /// `POST {collection}` with the full entity body.
    async fn create(&self, collection: &str, entity: &Value) -> ClientResult<()>;

    /// `PATCH {collection}({id})` with only the fields carried by `patch`.
    async fn partial_update(&self, collection: &str, id: i64, patch: &Patch) -> ClientResult<()>;

    /// `DELETE {collection}({id})`.
    async fn delete(&self, collection: &str, id: i64) -> ClientResult<()>;
}

/// Fetch one entity and decode it as `T`.
pub async fn fetch_entity<T: DeserializeOwned>(
    api: &dyn ResourceApi,
    collection: &str,
    id: i64,
    expand: &[&str],
) -> ClientResult<T> {
    let value = api.fetch_by_id(collection, id, expand).await?;
    serde_json::from_value(value).map_err(|e| {
        ClientError::InvalidResponse(format!("{collection}({id}) did not decode: {e}"))
    })
}

/// Fetch a collection and decode its items as `T`.
///
/// Rows are decoded one at a time; a row that does not decode is skipped.
/// `count` is the upstream's figure and is left as served.
pub async fn fetch_entities<T: DeserializeOwned>(
    api: &dyn ResourceApi,
    collection: &str,
) -> Envelope<T> {
    let Envelope { value, count } = api.fetch_collection(collection).await;

    let items = value
        .into_iter()
        .enumerate()
        .filter_map(|(row, item)| match serde_json::from_value::<T>(item) {
            Ok(entity) => Some(entity),
            Err(e) => {
                tracing::warn!(collection, row, error = %e, "skipping collection row that did not decode");
                None
            }
        })
        .collect();

    Envelope { value: items, count }
}

/// Serialize `entity` in full and create it in `collection`.
pub async fn create_entity<T: Serialize + ?Sized>(
    api: &dyn ResourceApi,
    collection: &str,
    entity: &T,
) -> ClientResult<()> {
    let body = serde_json::to_value(entity)?;
    api.create(collection, &body).await
}

/// reqwest-backed [`ResourceApi`]
#[derive(Debug, Clone)]
pub struct HttpResourceClient {
    client: Client,
    base_url: String,
}

impl HttpResourceClient {
    /// Build a client from upstream settings
    pub fn new(settings: &UpstreamSettings) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout_ms) = settings.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }

        Ok(Self::with_client(builder.build()?, &settings.base_url))
    }

    /// Wrap an existing reqwest client
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.base_url, collection)
    }

    fn entity_url(&self, collection: &str, id: i64) -> String {
        format!("{}/{}({})", self.base_url, collection, id)
    }

    /// Send a write and map non-2xx to `Upstream`, logging status and body.
    async fn send_write(&self, op: &'static str, url: &str, request: RequestBuilder) -> ClientResult<()> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(op, url, error = %e, "upstream write failed in transport");
                return Err(e.into());
            }
        };

        let status = response.status();
        if status.is_success() {
            tracing::debug!(op, url, status = status.as_u16(), "upstream write accepted");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(
            op,
            url,
            status = status.as_u16(),
            body = %body,
            "upstream rejected write"
        );

        Err(ClientError::Upstream {
            status: status.as_u16(),
            body,
        })
    }
}

/// Render the `$expand` query for the named relations.
pub fn expand_query(expand: &[&str]) -> Option<String> {
    if expand.is_empty() {
        None
    } else {
        Some(format!("$expand={}", expand.join(",")))
    }
}

#[async_trait]
impl ResourceApi for HttpResourceClient {
    async fn fetch_by_id(&self, collection: &str, id: i64, expand: &[&str]) -> ClientResult<Value> {
        let mut url = self.entity_url(collection, id);
        if let Some(query) = expand_query(expand) {
            url.push('?');
            url.push_str(&query);
        }

        tracing::debug!(collection, id, url = %url, "fetching entity");
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            tracing::debug!(
                collection,
                id,
                status = response.status().as_u16(),
                "entity fetch answered non-2xx"
            );
            return Err(ClientError::NotFound { url });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    async fn fetch_collection(&self, collection: &str) -> Envelope<Value> {
        let url = self.collection_url(collection);
        tracing::debug!(collection, url = %url, "fetching collection");

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(collection, error = %e, "collection fetch failed, using empty list");
                return Envelope::empty();
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                collection,
                status = status.as_u16(),
                "collection fetch answered non-2xx, using empty list"
            );
            return Envelope::empty();
        }

        match response.json::<Envelope<Value>>().await {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(collection, error = %e, "collection envelope did not parse, using empty list");
                Envelope::empty()
            }
        }
    }

    async fn create(&self, collection: &str, entity: &Value) -> ClientResult<()> {
        let url = self.collection_url(collection);
        let request = self.client.post(&url).json(entity);
        self.send_write("create", &url, request).await
    }

    async fn partial_update(&self, collection: &str, id: i64, patch: &Patch) -> ClientResult<()> {
        let url = self.entity_url(collection, id);
        tracing::debug!(
            collection,
            id,
            fields = ?patch.keys().collect::<Vec<_>>(),
            "sending partial update"
        );
        let request = self.client.patch(&url).json(patch);
        self.send_write("patch", &url, request).await
    }

    async fn delete(&self, collection: &str, id: i64) -> ClientResult<()> {
        let url = self.entity_url(collection, id);
        let request = self.client.delete(&url);
        self.send_write("delete", &url, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_follow_odata_key_syntax() {
        let client = HttpResourceClient::with_client(Client::new(), "http://upstream.test/odata/");
        assert_eq!(client.base_url(), "http://upstream.test/odata");
        assert_eq!(client.collection_url("books"), "http://upstream.test/odata/books");
        assert_eq!(client.entity_url("books", 42), "http://upstream.test/odata/books(42)");
    }

    #[test]
    fn expand_query_joins_relations() {
        assert_eq!(expand_query(&[]), None);
        assert_eq!(
            expand_query(&["Location", "Press"]).as_deref(),
            Some("$expand=Location,Press")
        );
    }
}
