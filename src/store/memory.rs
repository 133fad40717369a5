//! In-memory item-store implementation.
//!
//! Implements the full item-store protocol against process-local state:
//! identity matching, duplicate detection on insert, synchronizable match
//! modes, authentication gating, persistent references, and creation and
//! modification timestamps. Not persistent; contents are gone when the
//! process exits.
//!
//! Authentication gating is simulated structurally: an item whose
//! protection carries an authentication policy is only visible to queries
//! holding an authentication context. Without one, the item either
//! reports `InteractionNotAllowed` or, under the skip UI mode, is
//! silently excluded from matching.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::{ItemStore, QueryResult};
use crate::attributes::{AttrValue, AttributeBag};
use crate::keys;
use crate::model::{ItemClass, PersistentRef};
use crate::policy::{AuthenticationUi, Protection};
use crate::query::{
    ClassIdentity, ItemQuery, MatchLimit, ReturnFlags, SecretBytes, SynchronizableMatch,
    WriteAttributes,
};
use crate::status::Status;

struct StoredItem {
    class: ItemClass,
    identity: ClassIdentity,
    account: Option<String>,
    access_group: Option<String>,
    value: Option<SecretBytes>,
    named: AttributeBag,
    label: Option<String>,
    application_label: Option<String>,
    comment: Option<String>,
    protection: Protection,
    synchronizable: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    persistent_ref: Vec<u8>,
}

struct Inner {
    items: Vec<StoredItem>,
    next_ref: u64,
}

/// In-memory item store for tests, development, and fallback.
///
/// # Thread Safety
///
/// Uses interior mutability via `RwLock`; safe to share across threads.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> MemoryStore {
        MemoryStore {
            inner: RwLock::new(Inner {
                items: Vec::new(),
                next_ref: 1,
            }),
        }
    }

    /// Number of items currently stored.
    pub fn len(&self) -> usize {
        self.inner.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("items", &self.len())
            .finish()
    }
}

/// Whether `item` satisfies the structural constraints of `query`,
/// ignoring authentication gating.
fn matches(query: &ItemQuery, item: &StoredItem) -> bool {
    if query.class != item.class {
        return false;
    }

    // A bare query identity places no service/server constraint; this is
    // how class-wide enumeration addresses every item of a class.
    if query.identity != ClassIdentity::Bare && query.identity != item.identity {
        return false;
    }

    if let Some(account) = &query.account {
        if item.account.as_deref() != Some(account.as_str()) {
            return false;
        }
    }

    if let Some(group) = &query.access_group {
        if item.access_group.as_deref() != Some(group.as_str()) {
            return false;
        }
    }

    match query.synchronizable {
        SynchronizableMatch::Any => true,
        SynchronizableMatch::Exactly(state) => item.synchronizable == state,
    }
}

/// Visibility of a matching item under the query's authentication
/// modifiers.
enum Visibility {
    Visible,
    Blocked,
    Skipped,
}

fn visibility(query: &ItemQuery, item: &StoredItem) -> Visibility {
    if !item.protection.requires_authentication() || query.authentication_context.is_some() {
        return Visibility::Visible;
    }
    match query.authentication_ui {
        Some(AuthenticationUi::Skip) => Visibility::Skipped,
        None => Visibility::Blocked,
    }
}

fn bag_for(item: &StoredItem, flags: ReturnFlags) -> AttributeBag {
    let mut bag = AttributeBag::new();
    bag.insert(
        keys::CLASS.to_string(),
        AttrValue::from(item.class.as_raw()),
    );

    match &item.identity {
        ClassIdentity::Service { service } => {
            bag.insert(
                keys::ATTR_SERVICE.to_string(),
                AttrValue::from(service.as_str()),
            );
        }
        ClassIdentity::Server {
            host,
            port,
            protocol,
            authentication_type,
        } => {
            bag.insert(keys::ATTR_SERVER.to_string(), AttrValue::from(host.as_str()));
            if let Some(port) = port {
                bag.insert(keys::ATTR_PORT.to_string(), AttrValue::from(i64::from(*port)));
            }
            bag.insert(
                keys::ATTR_PROTOCOL.to_string(),
                AttrValue::from(protocol.as_raw()),
            );
            bag.insert(
                keys::ATTR_AUTHENTICATION_TYPE.to_string(),
                AttrValue::from(authentication_type.as_raw()),
            );
        }
        ClassIdentity::Bare => {}
    }

    if let Some(account) = &item.account {
        bag.insert(
            keys::ATTR_ACCOUNT.to_string(),
            AttrValue::from(account.as_str()),
        );
    }
    if let Some(group) = &item.access_group {
        bag.insert(
            keys::ATTR_ACCESS_GROUP.to_string(),
            AttrValue::from(group.as_str()),
        );
    }
    if let Some(label) = &item.label {
        bag.insert(keys::ATTR_LABEL.to_string(), AttrValue::from(label.as_str()));
    }
    if let Some(application_label) = &item.application_label {
        bag.insert(
            keys::ATTR_APPLICATION_LABEL.to_string(),
            AttrValue::from(application_label.as_str()),
        );
    }
    if let Some(comment) = &item.comment {
        bag.insert(
            keys::ATTR_COMMENT.to_string(),
            AttrValue::from(comment.as_str()),
        );
    }

    bag.insert(
        keys::ATTR_ACCESSIBLE.to_string(),
        AttrValue::from(item.protection.accessibility().as_raw()),
    );
    if let Protection::Control(control) = &item.protection {
        bag.insert(
            keys::ATTR_ACCESS_CONTROL.to_string(),
            AttrValue::from(i64::from(control.policy().bits())),
        );
    }
    bag.insert(
        keys::ATTR_SYNCHRONIZABLE.to_string(),
        AttrValue::from(item.synchronizable),
    );
    bag.insert(
        keys::ATTR_CREATION_DATE.to_string(),
        AttrValue::Date(item.created_at),
    );
    bag.insert(
        keys::ATTR_MODIFICATION_DATE.to_string(),
        AttrValue::Date(item.updated_at),
    );

    for (name, value) in &item.named {
        bag.insert(name.clone(), value.clone());
    }

    if flags.data {
        if let Some(value) = &item.value {
            bag.insert(
                keys::VALUE_DATA.to_string(),
                AttrValue::from(value.expose().to_vec()),
            );
        }
    }
    if flags.reference {
        bag.insert(
            keys::VALUE_REF.to_string(),
            AttrValue::from(item.persistent_ref.clone()),
        );
    }
    if flags.persistent_reference {
        bag.insert(
            keys::VALUE_PERSISTENT_REF.to_string(),
            AttrValue::from(item.persistent_ref.clone()),
        );
    }

    bag
}

impl ItemStore for MemoryStore {
    fn copy_matching(&self, query: &ItemQuery) -> Result<QueryResult, Status> {
        let inner = self.inner.read();

        let mut visible = Vec::new();
        let mut blocked = 0usize;
        for item in &inner.items {
            if !matches(query, item) {
                continue;
            }
            match visibility(query, item) {
                Visibility::Visible => visible.push(item),
                Visibility::Blocked => blocked += 1,
                Visibility::Skipped => {}
            }
        }

        if visible.is_empty() {
            return Err(if blocked > 0 {
                Status::InteractionNotAllowed
            } else {
                Status::ItemNotFound
            });
        }

        match query.limit {
            MatchLimit::All => Ok(QueryResult::Items(
                visible
                    .iter()
                    .map(|item| bag_for(item, query.return_flags))
                    .collect(),
            )),
            MatchLimit::One => {
                let item = visible[0];
                let flags = query.return_flags;
                if flags.attributes {
                    Ok(QueryResult::Attributes(bag_for(item, flags)))
                } else if flags.data {
                    match &item.value {
                        Some(value) => Ok(QueryResult::Data(value.expose().to_vec())),
                        None => Err(Status::DataNotAvailable),
                    }
                } else if flags.reference || flags.persistent_reference {
                    Ok(QueryResult::Attributes(bag_for(item, flags)))
                } else {
                    Ok(QueryResult::Found)
                }
            }
        }
    }

    fn add(&self, attributes: &WriteAttributes) -> Result<Option<PersistentRef>, Status> {
        let mut inner = self.inner.write();

        // The builder strips the class selector from identity inserts
        // only; that is the one payload shape arriving without a class.
        let class = attributes.class.unwrap_or(ItemClass::Identity);
        let identity = attributes
            .identity
            .clone()
            .unwrap_or(ClassIdentity::Bare);

        // A literal value-data attribute is a write into the value slot,
        // the shape raw certificate/key writes use.
        let mut named = attributes.named.clone();
        let value = match named.remove(keys::VALUE_DATA) {
            Some(AttrValue::Bytes(bytes)) => Some(SecretBytes::new(bytes)),
            Some(_) => return Err(Status::Param),
            None => attributes.value.clone(),
        };

        // Bare-identity classes are only distinguished by their literal
        // attributes, so those participate in the duplicate identity too.
        let duplicate = inner.items.iter().any(|item| {
            item.class == class
                && item.identity == identity
                && item.account == attributes.account
                && item.access_group == attributes.access_group
                && item.named == named
        });
        if duplicate {
            return Err(Status::DuplicateItem);
        }

        let reference = {
            let mut bytes = b"memref:".to_vec();
            bytes.extend_from_slice(&inner.next_ref.to_be_bytes());
            inner.next_ref += 1;
            bytes
        };

        let now = Utc::now();
        inner.items.push(StoredItem {
            class,
            identity,
            account: attributes.account.clone(),
            access_group: attributes.access_group.clone(),
            value,
            named,
            label: attributes.label.clone(),
            application_label: attributes.application_label.clone(),
            comment: attributes.comment.clone(),
            protection: attributes.protection,
            synchronizable: attributes.synchronizable,
            created_at: now,
            updated_at: now,
            persistent_ref: reference.clone(),
        });

        Ok(attributes
            .return_persistent_reference
            .then(|| PersistentRef::new(reference)))
    }

    fn update(&self, query: &ItemQuery, attributes: &WriteAttributes) -> Result<(), Status> {
        let mut inner = self.inner.write();

        let mut touched = 0usize;
        let mut blocked = 0usize;
        for item in inner.items.iter_mut() {
            if !matches(query, item) {
                continue;
            }
            match visibility(query, item) {
                Visibility::Skipped => continue,
                Visibility::Blocked => {
                    blocked += 1;
                    continue;
                }
                Visibility::Visible => {}
            }

            if let Some(value) = &attributes.value {
                item.value = Some(value.clone());
            }
            if let Some(account) = &attributes.account {
                item.account = Some(account.clone());
            }
            if let Some(label) = &attributes.label {
                item.label = Some(label.clone());
            }
            if let Some(application_label) = &attributes.application_label {
                item.application_label = Some(application_label.clone());
            }
            if let Some(comment) = &attributes.comment {
                item.comment = Some(comment.clone());
            }
            for (name, value) in &attributes.named {
                // Value-data attribute writes land in the value slot.
                if name == keys::VALUE_DATA {
                    if let AttrValue::Bytes(bytes) = value {
                        item.value = Some(SecretBytes::new(bytes.clone()));
                    }
                    continue;
                }
                item.named.insert(name.clone(), value.clone());
            }
            // Write payloads always restate protection and sync intent.
            item.protection = attributes.protection;
            item.synchronizable = attributes.synchronizable;
            item.updated_at = Utc::now();
            touched += 1;
        }

        if touched == 0 {
            Err(if blocked > 0 {
                Status::InteractionNotAllowed
            } else {
                Status::ItemNotFound
            })
        } else {
            Ok(())
        }
    }

    fn delete(&self, query: &ItemQuery) -> Result<(), Status> {
        let mut inner = self.inner.write();

        let mut removed = 0usize;
        let mut blocked = 0usize;
        inner.items.retain(|item| {
            if !matches(query, item) {
                return true;
            }
            match visibility(query, item) {
                Visibility::Visible => {
                    removed += 1;
                    false
                }
                Visibility::Blocked => {
                    blocked += 1;
                    true
                }
                Visibility::Skipped => true,
            }
        });

        if removed == 0 {
            Err(if blocked > 0 {
                Status::InteractionNotAllowed
            } else {
                Status::ItemNotFound
            })
        } else {
            Ok(())
        }
    }
}
