//! In-memory `ResourceApi` used by unit tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use bookshelf_resource::{ClientError, ClientResult, Envelope, Patch, ResourceApi};
use serde_json::{json, Value};

#[derive(Default)]
pub struct FakeResourceApi {
    entities: HashMap<(String, i64), Value>,
    collections: HashMap<String, Vec<Value>>,
    reject_writes: Option<(u16, String)>,
    pub patches: Mutex<Vec<(String, i64, Value)>>,
    pub created: Mutex<Vec<(String, Value)>>,
    pub deleted: Mutex<Vec<(String, i64)>>,
    pub collection_fetches: Mutex<Vec<String>>,
}

impl FakeResourceApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity(mut self, collection: &str, id: i64, entity: Value) -> Self {
        self.entities.insert((collection.to_string(), id), entity);
        self
    }

    /// Collections that are not registered answer like a failed fetch.
    pub fn with_collection(mut self, collection: &str, items: Vec<Value>) -> Self {
        self.collections.insert(collection.to_string(), items);
        self
    }

    pub fn rejecting_writes(mut self, status: u16, body: &str) -> Self {
        self.reject_writes = Some((status, body.to_string()));
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn patches(&self) -> Vec<(String, i64, Value)> {
        self.patches.lock().unwrap().clone()
    }

    fn write_outcome(&self) -> ClientResult<()> {
        match &self.reject_writes {
            Some((status, body)) => Err(ClientError::Upstream {
                status: *status,
                body: body.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ResourceApi for FakeResourceApi {
    async fn fetch_by_id(&self, collection: &str, id: i64, _expand: &[&str]) -> ClientResult<Value> {
        self.entities
            .get(&(collection.to_string(), id))
            .cloned()
            .ok_or_else(|| ClientError::NotFound {
                url: format!("{collection}({id})"),
            })
    }

    async fn fetch_collection(&self, collection: &str) -> Envelope<Value> {
        self.collection_fetches
            .lock()
            .unwrap()
            .push(collection.to_string());
        self.collections
            .get(collection)
            .cloned()
            .map(Envelope::new)
            .unwrap_or_default()
    }

    async fn create(&self, collection: &str, entity: &Value) -> ClientResult<()> {
        self.created
            .lock()
            .unwrap()
            .push((collection.to_string(), entity.clone()));
        self.write_outcome()
    }

    async fn partial_update(&self, collection: &str, id: i64, patch: &Patch) -> ClientResult<()> {
        self.patches
            .lock()
            .unwrap()
            .push((collection.to_string(), id, patch.to_value()));
        self.write_outcome()
    }

    async fn delete(&self, collection: &str, id: i64) -> ClientResult<()> {
        self.deleted
            .lock()
            .unwrap()
            .push((collection.to_string(), id));
        self.write_outcome()
    }
}

pub fn book_row(id: i64) -> Value {
    json!({
        "Id": id,
        "ISBN": "978-0441013593",
        "Title": "Dune",
        "Author": "Frank Herbert",
        "Price": 9.99,
        "PressId": 3,
        "LocationId": 7
    })
}

pub fn press_rows() -> Vec<Value> {
    vec![
        json!({"Id": 3, "Name": "Acme", "Email": "a@acme.test", "Category": "Fiction"}),
        json!({"Id": 4, "Name": "Penguin", "Email": "p@penguin.test", "Category": "Academic"}),
    ]
}

pub fn address_rows() -> Vec<Value> {
    vec![
        json!({"Id": 7, "City": "Reno", "Street": "Main St"}),
        json!({"Id": 8, "City": "Oslo", "Street": "Karl Johans gate"}),
    ]
}
