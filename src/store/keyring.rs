//! OS keyring-backed item-store implementation.
//!
//! Routes password items to the platform's native secret service through
//! the `keyring` crate:
//! - macOS: Keychain
//! - Linux: Secret Service API
//! - Windows: Credential Manager
//!
//! Platform keyring APIs expose a flat (service, account) -> secret
//! space. Generic passwords map onto it directly; internet passwords map
//! through a synthesized `scheme://host[:port]` service key. Certificate,
//! key, and identity classes, along with enumeration, have no portable
//! counterpart and report `Unimplemented`. On headless systems without a
//! keyring daemon, writes may be accepted without persisting; that is a
//! platform keyring limitation, not something this backend can detect.

use keyring::Entry;

use super::{ItemStore, QueryResult};
use crate::attributes::{AttrValue, AttributeBag};
use crate::keys;
use crate::model::{ItemClass, PersistentRef};
use crate::query::{ClassIdentity, ItemQuery, MatchLimit, WriteAttributes};
use crate::status::Status;

/// OS keyring-backed item store.
pub struct KeyringStore {
    _private: (),
}

impl KeyringStore {
    /// Try to create a keyring store.
    ///
    /// Fails with [`Status::NotAvailable`] when no keyring backend is
    /// usable on this platform.
    pub fn try_new() -> Result<KeyringStore, Status> {
        // Probe entry construction once so an unusable platform surfaces
        // here instead of on the first operation.
        match Entry::new("strongbox-availability-check", "strongbox") {
            Ok(_) => Ok(KeyringStore { _private: () }),
            Err(error) => {
                tracing::warn!("keyring backend not available: {error}");
                Err(Status::NotAvailable)
            }
        }
    }

    /// Resolve the flat (service, account) coordinates for a request.
    fn coordinates(
        class: ItemClass,
        identity: &ClassIdentity,
        account: Option<&str>,
    ) -> Result<(String, String), Status> {
        let service = match identity {
            ClassIdentity::Service { service } => {
                if service.is_empty() {
                    return Err(Status::Param);
                }
                service.clone()
            }
            ClassIdentity::Server {
                host,
                port,
                protocol,
                ..
            } => {
                if host.is_empty() {
                    return Err(Status::Param);
                }
                match port {
                    Some(port) => format!("{}://{host}:{port}", protocol.description()),
                    None => format!("{}://{host}", protocol.description()),
                }
            }
            ClassIdentity::Bare => {
                tracing::debug!("keyring backend cannot address {class} items");
                return Err(Status::Unimplemented);
            }
        };

        // The keyring space has no "any account" lookup.
        let account = account.ok_or(Status::Unimplemented)?;
        Ok((service, account.to_string()))
    }

    fn entry(service: &str, account: &str) -> Result<Entry, Status> {
        Entry::new(service, account).map_err(|error| {
            tracing::warn!("failed to create keyring entry: {error}");
            Status::NotAvailable
        })
    }
}

impl std::fmt::Debug for KeyringStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyringStore").finish()
    }
}

fn status_from_keyring(error: keyring::Error) -> Status {
    match error {
        keyring::Error::NoEntry => Status::ItemNotFound,
        keyring::Error::Ambiguous(_) => Status::DuplicateItem,
        keyring::Error::Invalid(_, _) => Status::Param,
        keyring::Error::TooLong(_, _) => Status::DataTooLarge,
        keyring::Error::NoStorageAccess(_) => Status::AuthFailed,
        keyring::Error::PlatformFailure(_) => Status::Io,
        _ => Status::UnexpectedError,
    }
}

fn bag_for(query: &ItemQuery, service: &str, account: &str, secret: &[u8]) -> AttributeBag {
    let mut bag = AttributeBag::new();
    bag.insert(
        keys::CLASS.to_string(),
        AttrValue::from(query.class.as_raw()),
    );
    match &query.identity {
        ClassIdentity::Server {
            host,
            protocol,
            authentication_type,
            ..
        } => {
            bag.insert(keys::ATTR_SERVER.to_string(), AttrValue::from(host.as_str()));
            bag.insert(
                keys::ATTR_PROTOCOL.to_string(),
                AttrValue::from(protocol.as_raw()),
            );
            bag.insert(
                keys::ATTR_AUTHENTICATION_TYPE.to_string(),
                AttrValue::from(authentication_type.as_raw()),
            );
        }
        _ => {
            bag.insert(keys::ATTR_SERVICE.to_string(), AttrValue::from(service));
        }
    }
    bag.insert(keys::ATTR_ACCOUNT.to_string(), AttrValue::from(account));
    bag.insert(keys::ATTR_SYNCHRONIZABLE.to_string(), AttrValue::from(false));
    let flags = query.return_flags;
    if flags.data {
        bag.insert(
            keys::VALUE_DATA.to_string(),
            AttrValue::from(secret.to_vec()),
        );
    }
    bag
}

impl ItemStore for KeyringStore {
    fn copy_matching(&self, query: &ItemQuery) -> Result<QueryResult, Status> {
        if query.limit == MatchLimit::All {
            // Platform keyrings have no portable enumeration.
            return Err(Status::Unimplemented);
        }

        let (service, account) =
            Self::coordinates(query.class, &query.identity, query.account.as_deref())?;
        let entry = Self::entry(&service, &account)?;

        let secret = entry.get_secret().map_err(status_from_keyring)?;

        let flags = query.return_flags;
        if flags.attributes {
            Ok(QueryResult::Attributes(bag_for(
                query, &service, &account, &secret,
            )))
        } else if flags.data {
            Ok(QueryResult::Data(secret))
        } else if flags.reference || flags.persistent_reference {
            Ok(QueryResult::Attributes(bag_for(
                query, &service, &account, &secret,
            )))
        } else {
            Ok(QueryResult::Found)
        }
    }

    fn add(&self, attributes: &WriteAttributes) -> Result<Option<PersistentRef>, Status> {
        let class = attributes.class.unwrap_or(ItemClass::Identity);
        let bare = ClassIdentity::Bare;
        let identity = attributes.identity.as_ref().unwrap_or(&bare);
        let (service, account) =
            Self::coordinates(class, identity, attributes.account.as_deref())?;
        let entry = Self::entry(&service, &account)?;

        // The protocol's add refuses to overwrite; emulate the duplicate
        // check the platform item store performs.
        match entry.get_secret() {
            Ok(_) => return Err(Status::DuplicateItem),
            Err(keyring::Error::NoEntry) => {}
            Err(error) => return Err(status_from_keyring(error)),
        }

        let value = attributes.value.as_ref().ok_or(Status::Param)?;
        entry
            .set_secret(value.expose())
            .map_err(status_from_keyring)?;

        // Persistent references are not part of the keyring space.
        Ok(None)
    }

    fn update(&self, query: &ItemQuery, attributes: &WriteAttributes) -> Result<(), Status> {
        let (service, account) =
            Self::coordinates(query.class, &query.identity, query.account.as_deref())?;
        let entry = Self::entry(&service, &account)?;

        // Update requires an existing item.
        match entry.get_secret() {
            Ok(_) => {}
            Err(error) => return Err(status_from_keyring(error)),
        }

        match &attributes.value {
            Some(value) => entry
                .set_secret(value.expose())
                .map_err(status_from_keyring),
            // Metadata-only updates have nowhere to land in the keyring
            // space; the item itself is untouched.
            None => Ok(()),
        }
    }

    fn delete(&self, query: &ItemQuery) -> Result<(), Status> {
        let (service, account) =
            Self::coordinates(query.class, &query.identity, query.account.as_deref())?;
        let entry = Self::entry(&service, &account)?;

        entry.delete_credential().map_err(status_from_keyring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AuthenticationType, ProtocolType};

    #[test]
    fn creation_reports_availability() {
        match KeyringStore::try_new() {
            Ok(_) => {}
            Err(Status::NotAvailable) => {
                // Expected on platforms without a keyring backend.
            }
            Err(status) => panic!("unexpected status: {status}"),
        }
    }

    #[test]
    fn non_password_classes_are_unimplemented() {
        let result =
            KeyringStore::coordinates(ItemClass::Certificate, &ClassIdentity::Bare, Some("key"));
        assert_eq!(result, Err(Status::Unimplemented));
    }

    #[test]
    fn missing_account_is_unimplemented() {
        let identity = ClassIdentity::Service {
            service: "example.com".to_string(),
        };
        let result = KeyringStore::coordinates(ItemClass::GenericPassword, &identity, None);
        assert_eq!(result, Err(Status::Unimplemented));
    }

    #[test]
    fn internet_identities_synthesize_a_service_key() {
        let identity = ClassIdentity::Server {
            host: "example.com".to_string(),
            port: Some(8443),
            protocol: ProtocolType::Https,
            authentication_type: AuthenticationType::Default,
        };
        let (service, account) =
            KeyringStore::coordinates(ItemClass::InternetPassword, &identity, Some("alice"))
                .unwrap();

        assert_eq!(service, "https://example.com:8443");
        assert_eq!(account, "alice");
    }

    #[test]
    fn empty_service_is_a_parameter_error() {
        let identity = ClassIdentity::Service {
            service: String::new(),
        };
        let result = KeyringStore::coordinates(ItemClass::GenericPassword, &identity, Some("a"));
        assert_eq!(result, Err(Status::Param));
    }
}
