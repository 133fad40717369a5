//! Item-store protocol and backend selection.
//!
//! This module provides:
//! - [`ItemStore`] - the query/response protocol of the platform item
//!   store: a typed request in, a status plus optional result out
//! - [`QueryResult`] - the result shapes a lookup can produce
//! - [`MemoryStore`] - in-process implementation for tests and fallback
//! - [`KeyringStore`] - OS keyring implementation (with the
//!   `keyring-store` feature)
//! - [`create_store`] - helper to select a backend based on availability
//!
//! The facade owns every interpretation decision: stores report raw
//! statuses (`ItemNotFound`, `InteractionNotAllowed`, `DuplicateItem`,
//! ...) and never translate them into domain errors themselves.

use std::sync::Arc;

use crate::attributes::AttributeBag;
use crate::model::PersistentRef;
use crate::query::{ItemQuery, WriteAttributes};
use crate::status::Status;

mod memory;
#[cfg(feature = "keyring-store")]
mod keyring;

pub use memory::MemoryStore;
#[cfg(feature = "keyring-store")]
pub use keyring::KeyringStore;

/// Successful result of a lookup, shaped by the query's return flags and
/// match limit.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// No return fields were requested; the match is an existence proof.
    Found,

    /// Raw value data of the single match.
    Data(Vec<u8>),

    /// Attribute bag of the single match. Requested payloads (data,
    /// reference, persistent reference) ride along inside the bag under
    /// their value keys.
    Attributes(AttributeBag),

    /// Attribute bags of every match (match limit All).
    Items(Vec<AttributeBag>),
}

/// The platform item-store protocol.
///
/// Each call is a single synchronous round trip. Implementations hold no
/// protocol state between calls; serialization and consistency guarantees
/// are whatever the backing store provides.
pub trait ItemStore: Send + Sync + std::fmt::Debug {
    /// Look up items matching `query` and return the payload its return
    /// flags requested. `Err(Status::ItemNotFound)` reports an empty
    /// match set; `Err(Status::InteractionNotAllowed)` reports matches
    /// that exist but are blocked behind user authentication.
    fn copy_matching(&self, query: &ItemQuery) -> Result<QueryResult, Status>;

    /// Insert a new item. Returns the persistent reference when the
    /// payload requested one. `Err(Status::DuplicateItem)` reports an
    /// existing item under the same identity.
    fn add(&self, attributes: &WriteAttributes) -> Result<Option<PersistentRef>, Status>;

    /// Apply an update payload to every item matching `query`.
    /// `Err(Status::ItemNotFound)` reports an empty match set.
    fn update(&self, query: &ItemQuery, attributes: &WriteAttributes) -> Result<(), Status>;

    /// Delete every item matching `query`. `Err(Status::ItemNotFound)`
    /// reports an empty match set; idempotency is the facade's call.
    fn delete(&self, query: &ItemQuery) -> Result<(), Status>;
}

/// Create an item store with automatic backend selection.
///
/// With `prefer_native` set and the `keyring-store` feature enabled this
/// tries the OS keyring first and falls back to an in-memory store with a
/// warning when the keyring is unavailable. Otherwise the in-memory
/// store is used directly.
pub fn create_store(prefer_native: bool) -> Arc<dyn ItemStore> {
    #[cfg(feature = "keyring-store")]
    if prefer_native {
        match KeyringStore::try_new() {
            Ok(store) => {
                tracing::debug!("using OS keyring for item storage");
                return Arc::new(store);
            }
            Err(status) => {
                tracing::warn!(
                    "OS keyring unavailable ({status}), falling back to memory store; \
                     items will not persist across restarts"
                );
            }
        }
    }

    #[cfg(not(feature = "keyring-store"))]
    if prefer_native {
        tracing::warn!(
            "native item storage requested but the keyring-store feature is not enabled; \
             using memory store"
        );
    }

    tracing::debug!("using in-memory item storage");
    Arc::new(MemoryStore::new())
}
