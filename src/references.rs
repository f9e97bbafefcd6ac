//! Reference Resolver: turns foreign-key target collections into
//! `{value, label}` option lists for selectors.

use bookshelf_resource::{fetch_entities, ResourceApi};
use serde::{de::DeserializeOwned, Serialize};

use crate::modules::books::models::{Address, Press};

pub const PRESSES: &str = "presses";
pub const ADDRESSES: &str = "addresses";

/// A selectable reference: the stringified id and a human label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceOption {
    pub value: String,
    pub label: String,
}

impl ReferenceOption {
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            value: id.to_string(),
            label: label.into(),
        }
    }
}

/// Entities that can be the target of a reference.
pub trait Referenced {
    fn id(&self) -> i64;
}

impl Referenced for Press {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Referenced for Address {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Fetch `collection` and project every entity into an option, in upstream order.
///
/// Never fails: an unavailable collection yields no options.
pub async fn resolve_options<T, F>(
    api: &dyn ResourceApi,
    collection: &str,
    label: F,
) -> Vec<ReferenceOption>
where
    T: DeserializeOwned + Referenced,
    F: Fn(&T) -> String,
{
    let options: Vec<ReferenceOption> = fetch_entities::<T>(api, collection)
        .await
        .into_items()
        .iter()
        .map(|entity| ReferenceOption::new(entity.id(), label(entity)))
        .collect();

    if options.is_empty() {
        tracing::debug!(collection, "no reference options available");
    }

    options
}

/// Options for the press selector, labelled by name.
pub async fn press_options(api: &dyn ResourceApi) -> Vec<ReferenceOption> {
    resolve_options::<Press, _>(api, PRESSES, Press::label).await
}

/// Options for the address selector, labelled "{City}, {Street}".
pub async fn address_options(api: &dyn ResourceApi) -> Vec<ReferenceOption> {
    resolve_options::<Address, _>(api, ADDRESSES, Address::label).await
}

/// Both option lists a book form needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceLists {
    pub presses: Vec<ReferenceOption>,
    pub addresses: Vec<ReferenceOption>,
}

impl ReferenceLists {
    /// Resolve presses and addresses concurrently.
    pub async fn resolve(api: &dyn ResourceApi) -> Self {
        let (presses, addresses) = tokio::join!(press_options(api), address_options(api));
        Self { presses, addresses }
    }
}
