//! # Strongbox
//!
//! A thin, fluent facade over a platform-provided secure item store.
//!
//! Secrets (passwords, keys, certificates, identities) are addressed by a
//! composite query: item class plus service or server plus account key.
//! Callers configure a [`Keychain`] value and call
//! get/set/remove/contains/enumerate; the crate builds the underlying
//! typed store requests, issues them, and maps the resulting status codes
//! back to typed values and errors. Encryption, access-control
//! enforcement, and persistence belong to the backing store, never to
//! this crate.
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use strongbox::{Keychain, MemoryStore};
//!
//! let keychain = Keychain::generic_password("example.com")
//!     .with_store(Arc::new(MemoryStore::new()));
//!
//! keychain.set("secret123", "api-token")?;
//! assert_eq!(keychain.get("api-token")?.as_deref(), Some("secret123"));
//! assert!(keychain.contains("api-token")?);
//!
//! keychain.remove("api-token")?;
//! assert_eq!(keychain.get("api-token")?, None);
//! # Ok::<(), strongbox::Error>(())
//! ```
//!
//! ## Backends
//!
//! Factory constructors pick a backend automatically: the OS keyring when
//! the `keyring-store` feature (default) finds one, an in-memory store
//! otherwise. [`Keychain::with_store`] swaps in any
//! [`ItemStore`] implementation, which is also how tests run hermetically
//! against [`MemoryStore`].

pub mod attributes;
pub mod error;
pub mod keys;
pub mod model;
pub mod policy;
pub mod query;
pub mod shared;
pub mod status;
pub mod store;
pub mod summary;

mod keychain;
mod options;

pub use attributes::{AttrValue, AttributeBag, Attributes};

pub use error::Error;

pub use keychain::Keychain;

pub use model::{
    Accessibility,
    AuthenticationType,
    ItemClass,
    KeyClass,
    KeyType,
    PersistentRef,
    ProtocolType,
};

pub use policy::{
    AccessControl,
    AuthenticationContext,
    AuthenticationPolicy,
    AuthenticationUi,
    Protection,
};

pub use query::{
    ClassIdentity,
    ItemQuery,
    MatchLimit,
    ReturnFlags,
    SecretBytes,
    SynchronizableMatch,
    WriteAttributes,
};

pub use shared::{
    generate_password,
    MemorySharedCredentialStore,
    SharedCredential,
    SharedCredentialStore,
};

pub use status::Status;

pub use store::{create_store, ItemStore, MemoryStore, QueryResult};

#[cfg(feature = "keyring-store")]
pub use store::KeyringStore;

pub use summary::{ItemSummary, SummaryValue};
