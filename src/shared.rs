//! Shared web-credential protocol and password generation.
//!
//! Shared credentials live in a platform service separate from the item
//! store: a (domain, account, password) space apps and websites share.
//! The platform exposes it through completion callbacks; here those
//! become `async` operations. Delivery context and ordering remain
//! platform-defined, there is no cancellation, and results arrive
//! whenever the service answers.

use async_trait::async_trait;
use parking_lot::RwLock;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::status::Status;

/// One credential in the shared web-credential space.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedCredential {
    pub server: String,
    pub account: String,
    pub password: String,
}

impl fmt::Debug for SharedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCredential")
            .field("server", &self.server)
            .field("account", &self.account)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// The platform shared web-credential protocol.
///
/// Completion context is chosen by the platform; callers must not assume
/// delivery on the calling task. Once issued, an operation runs to
/// completion or failure as the platform reports it.
#[async_trait]
pub trait SharedCredentialStore: Send + Sync + std::fmt::Debug {
    /// Fetch credentials matching an optional domain and account filter.
    /// An empty result set is reported as [`Status::ItemNotFound`].
    async fn request(
        &self,
        domain: Option<&str>,
        account: Option<&str>,
    ) -> Result<Vec<SharedCredential>, Status>;

    /// Add or update a credential when `password` is present; remove it
    /// when `password` is `None`. Removal of a missing credential is
    /// reported as [`Status::ItemNotFound`].
    async fn store(
        &self,
        domain: &str,
        account: &str,
        password: Option<&str>,
    ) -> Result<(), Status>;
}

/// In-memory shared-credential service for tests and development.
#[derive(Default)]
pub struct MemorySharedCredentialStore {
    entries: RwLock<Vec<SharedCredential>>,
}

impl MemorySharedCredentialStore {
    pub fn new() -> MemorySharedCredentialStore {
        MemorySharedCredentialStore::default()
    }
}

impl fmt::Debug for MemorySharedCredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySharedCredentialStore")
            .field("entries", &self.entries.read().len())
            .finish()
    }
}

#[async_trait]
impl SharedCredentialStore for MemorySharedCredentialStore {
    async fn request(
        &self,
        domain: Option<&str>,
        account: Option<&str>,
    ) -> Result<Vec<SharedCredential>, Status> {
        let entries = self.entries.read();
        let matches: Vec<SharedCredential> = entries
            .iter()
            .filter(|credential| domain.is_none_or(|domain| credential.server == domain))
            .filter(|credential| account.is_none_or(|account| credential.account == account))
            .cloned()
            .collect();

        if matches.is_empty() {
            Err(Status::ItemNotFound)
        } else {
            Ok(matches)
        }
    }

    async fn store(
        &self,
        domain: &str,
        account: &str,
        password: Option<&str>,
    ) -> Result<(), Status> {
        let mut entries = self.entries.write();
        match password {
            Some(password) => {
                if let Some(existing) = entries
                    .iter_mut()
                    .find(|credential| credential.server == domain && credential.account == account)
                {
                    existing.password = password.to_string();
                } else {
                    entries.push(SharedCredential {
                        server: domain.to_string(),
                        account: account.to_string(),
                        password: password.to_string(),
                    });
                }
                Ok(())
            }
            None => {
                let before = entries.len();
                entries.retain(|credential| {
                    credential.server != domain || credential.account != account
                });
                if entries.len() == before {
                    Err(Status::ItemNotFound)
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Placeholder service for platforms without shared web credentials.
/// Every operation reports [`Status::Unimplemented`].
#[derive(Debug, Default)]
pub struct UnsupportedSharedCredentialStore;

#[async_trait]
impl SharedCredentialStore for UnsupportedSharedCredentialStore {
    async fn request(
        &self,
        _domain: Option<&str>,
        _account: Option<&str>,
    ) -> Result<Vec<SharedCredential>, Status> {
        Err(Status::Unimplemented)
    }

    async fn store(
        &self,
        _domain: &str,
        _account: &str,
        _password: Option<&str>,
    ) -> Result<(), Status> {
        Err(Status::Unimplemented)
    }
}

/// Alphabets for generated passwords. Ambiguous glyphs (l, 1, I, O, 0,
/// z, 2, j, i) are left out.
const LOWERCASE: &[u8] = b"abcdefghkmnopqrstuvwxy";
const UPPERCASE: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
const DIGITS: &[u8] = b"3456789";

/// Return a randomly generated password.
///
/// The result has the form `xxxx-xxxx-xxxx`: three hyphen-separated
/// groups drawn from the lowercase, uppercase, and digit alphabets, with
/// at least one character from each alphabet guaranteed.
pub fn generate_password() -> String {
    let mut rng = rand::thread_rng();

    let combined: Vec<u8> = [LOWERCASE, UPPERCASE, DIGITS].concat();
    let mut chars: Vec<u8> = vec![
        LOWERCASE[rng.gen_range(0..LOWERCASE.len())],
        UPPERCASE[rng.gen_range(0..UPPERCASE.len())],
        DIGITS[rng.gen_range(0..DIGITS.len())],
    ];
    while chars.len() < 12 {
        chars.push(combined[rng.gen_range(0..combined.len())]);
    }
    chars.shuffle(&mut rng);

    chars
        .chunks(4)
        .map(|group| String::from_utf8_lossy(group).into_owned())
        .collect::<Vec<String>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn request_filters_by_domain_and_account() {
        let store = MemorySharedCredentialStore::new();
        store
            .store("example.com", "alice", Some("pw1"))
            .await
            .unwrap();
        store
            .store("example.com", "bob", Some("pw2"))
            .await
            .unwrap();
        store
            .store("other.org", "alice", Some("pw3"))
            .await
            .unwrap();

        let example = store.request(Some("example.com"), None).await.unwrap();
        assert_eq!(example.len(), 2);

        let alice = store
            .request(Some("example.com"), Some("alice"))
            .await
            .unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].password, "pw1");
    }

    #[tokio::test]
    async fn empty_result_set_is_not_found() {
        let store = MemorySharedCredentialStore::new();
        let result = store.request(Some("example.com"), None).await;
        assert_eq!(result, Err(Status::ItemNotFound));
    }

    #[tokio::test]
    async fn storing_none_removes() {
        let store = MemorySharedCredentialStore::new();
        store
            .store("example.com", "alice", Some("pw"))
            .await
            .unwrap();
        store.store("example.com", "alice", None).await.unwrap();

        let result = store.request(Some("example.com"), None).await;
        assert_eq!(result, Err(Status::ItemNotFound));
    }

    #[tokio::test]
    async fn removing_missing_credential_is_not_found() {
        let store = MemorySharedCredentialStore::new();
        let result = store.store("example.com", "nobody", None).await;
        assert_eq!(result, Err(Status::ItemNotFound));
    }

    #[test]
    fn debug_output_redacts_passwords() {
        let credential = SharedCredential {
            server: "example.com".to_string(),
            account: "alice".to_string(),
            password: "hunter2".to_string(),
        };
        let debug = format!("{credential:?}");

        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn generated_passwords_have_the_documented_shape() {
        for _ in 0..64 {
            let password = generate_password();
            let groups: Vec<&str> = password.split('-').collect();

            assert_eq!(groups.len(), 3, "password: {password}");
            assert!(groups.iter().all(|group| group.len() == 4));

            let flat: Vec<u8> = password.bytes().filter(|byte| *byte != b'-').collect();
            assert!(flat.iter().any(|byte| LOWERCASE.contains(byte)));
            assert!(flat.iter().any(|byte| UPPERCASE.contains(byte)));
            assert!(flat.iter().any(|byte| DIGITS.contains(byte)));
            assert!(flat
                .iter()
                .all(|byte| LOWERCASE.contains(byte)
                    || UPPERCASE.contains(byte)
                    || DIGITS.contains(byte)));
        }
    }
}
