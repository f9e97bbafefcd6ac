//! Client for the remote resource API: entity fetch with `$expand`,
//! enveloped collection listing, create, sparse PATCH and delete.

pub mod client;
pub mod envelope;
pub mod error;
pub mod patch;

pub use client::{create_entity, fetch_entities, fetch_entity, HttpResourceClient, ResourceApi};
pub use envelope::Envelope;
pub use error::{ClientError, ClientResult};
pub use patch::{Field, Patch};
pub use reqwest;
