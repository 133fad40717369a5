//! Attribute values and the read-only attribute projection.
//!
//! Stores hand results back as attribute bags: ordered maps from native
//! key names (see [`crate::keys`]) to [`AttrValue`]s. [`Attributes`] wraps
//! one bag in a typed, read-only view. The view is a snapshot taken at
//! query time; it goes stale the moment the store changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::keys;
use crate::model::{
    Accessibility, AuthenticationType, ItemClass, KeyClass, KeyType, PersistentRef, ProtocolType,
};

/// A single attribute value in a request or result bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Text(String),
    Bytes(Vec<u8>),
    Bool(bool),
    Number(i64),
    Date(DateTime<Utc>),
}

impl AttrValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            AttrValue::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            AttrValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            AttrValue::Date(date) => Some(*date),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<Vec<u8>> for AttrValue {
    fn from(value: Vec<u8>) -> Self {
        AttrValue::Bytes(value)
    }
}

impl From<&[u8]> for AttrValue {
    fn from(value: &[u8]) -> Self {
        AttrValue::Bytes(value.to_vec())
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Number(value)
    }
}

/// Ordered attribute dictionary keyed by native key names.
pub type AttributeBag = BTreeMap<String, AttrValue>;

/// Read-only typed view over one item's returned attribute bag.
///
/// Accessors return `None` when the store did not include the attribute,
/// which depends on the item class and the return flags of the query that
/// produced the snapshot.
#[derive(Clone, PartialEq)]
pub struct Attributes {
    bag: AttributeBag,
}

impl Attributes {
    pub fn new(bag: AttributeBag) -> Attributes {
        Attributes { bag }
    }

    /// Raw lookup by native key name.
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.bag.get(key)
    }

    /// The underlying bag.
    pub fn bag(&self) -> &AttributeBag {
        &self.bag
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.bag.get(key).and_then(AttrValue::as_text)
    }

    fn bytes(&self, key: &str) -> Option<&[u8]> {
        self.bag.get(key).and_then(AttrValue::as_bytes)
    }

    fn boolean(&self, key: &str) -> Option<bool> {
        self.bag.get(key).and_then(AttrValue::as_bool)
    }

    fn date(&self, key: &str) -> Option<DateTime<Utc>> {
        self.bag.get(key).and_then(AttrValue::as_date)
    }

    pub fn class(&self) -> Option<ItemClass> {
        self.text(keys::CLASS).and_then(ItemClass::from_raw)
    }

    /// Raw value data, present when the query requested data.
    pub fn data(&self) -> Option<&[u8]> {
        self.bytes(keys::VALUE_DATA)
    }

    /// Item reference bytes, present when the query requested a reference.
    pub fn reference(&self) -> Option<&[u8]> {
        self.bytes(keys::VALUE_REF)
    }

    /// Storage-stable handle, present when the query requested one.
    pub fn persistent_ref(&self) -> Option<PersistentRef> {
        self.bytes(keys::VALUE_PERSISTENT_REF)
            .map(PersistentRef::new)
    }

    pub fn accessible(&self) -> Option<Accessibility> {
        self.text(keys::ATTR_ACCESSIBLE)
            .and_then(Accessibility::from_raw)
    }

    pub fn access_group(&self) -> Option<&str> {
        self.text(keys::ATTR_ACCESS_GROUP)
    }

    pub fn synchronizable(&self) -> Option<bool> {
        self.boolean(keys::ATTR_SYNCHRONIZABLE)
    }

    pub fn creation_date(&self) -> Option<DateTime<Utc>> {
        self.date(keys::ATTR_CREATION_DATE)
    }

    pub fn modification_date(&self) -> Option<DateTime<Utc>> {
        self.date(keys::ATTR_MODIFICATION_DATE)
    }

    pub fn attribute_description(&self) -> Option<&str> {
        self.text(keys::ATTR_DESCRIPTION)
    }

    pub fn comment(&self) -> Option<&str> {
        self.text(keys::ATTR_COMMENT)
    }

    pub fn creator(&self) -> Option<&str> {
        self.text(keys::ATTR_CREATOR)
    }

    pub fn item_type(&self) -> Option<&str> {
        self.text(keys::ATTR_TYPE)
    }

    pub fn label(&self) -> Option<&str> {
        self.text(keys::ATTR_LABEL)
    }

    pub fn is_invisible(&self) -> Option<bool> {
        self.boolean(keys::ATTR_IS_INVISIBLE)
    }

    pub fn is_negative(&self) -> Option<bool> {
        self.boolean(keys::ATTR_IS_NEGATIVE)
    }
}

/// Password attribute accessors.
impl Attributes {
    pub fn account(&self) -> Option<&str> {
        self.text(keys::ATTR_ACCOUNT)
    }

    pub fn service(&self) -> Option<&str> {
        self.text(keys::ATTR_SERVICE)
    }

    pub fn generic(&self) -> Option<&[u8]> {
        self.bytes(keys::ATTR_GENERIC)
    }

    pub fn security_domain(&self) -> Option<&str> {
        self.text(keys::ATTR_SECURITY_DOMAIN)
    }

    pub fn server(&self) -> Option<&str> {
        self.text(keys::ATTR_SERVER)
    }

    pub fn protocol(&self) -> Option<ProtocolType> {
        self.text(keys::ATTR_PROTOCOL)
            .and_then(ProtocolType::from_raw)
    }

    pub fn authentication_type(&self) -> Option<AuthenticationType> {
        self.text(keys::ATTR_AUTHENTICATION_TYPE)
            .and_then(AuthenticationType::from_raw)
    }

    pub fn port(&self) -> Option<u16> {
        self.bag
            .get(keys::ATTR_PORT)
            .and_then(AttrValue::as_number)
            .and_then(|port| u16::try_from(port).ok())
    }

    pub fn path(&self) -> Option<&str> {
        self.text(keys::ATTR_PATH)
    }
}

/// Certificate attribute accessors.
impl Attributes {
    pub fn subject(&self) -> Option<&str> {
        self.text(keys::ATTR_SUBJECT)
    }

    pub fn issuer(&self) -> Option<&str> {
        self.text(keys::ATTR_ISSUER)
    }

    pub fn serial_number(&self) -> Option<&str> {
        self.text(keys::ATTR_SERIAL_NUMBER)
    }

    pub fn public_key_hash(&self) -> Option<&[u8]> {
        self.bytes(keys::ATTR_PUBLIC_KEY_HASH)
    }
}

/// Cryptographic key attribute accessors.
impl Attributes {
    pub fn key_class(&self) -> Option<KeyClass> {
        self.text(keys::ATTR_KEY_CLASS).and_then(KeyClass::from_raw)
    }

    pub fn application_label(&self) -> Option<&str> {
        self.text(keys::ATTR_APPLICATION_LABEL)
    }

    pub fn application_tag(&self) -> Option<&str> {
        self.text(keys::ATTR_APPLICATION_TAG)
    }

    pub fn key_type(&self) -> Option<KeyType> {
        self.text(keys::ATTR_KEY_TYPE).and_then(KeyType::from_raw)
    }

    pub fn is_permanent(&self) -> Option<bool> {
        self.boolean(keys::ATTR_IS_PERMANENT)
    }

    pub fn is_sensitive(&self) -> Option<bool> {
        self.boolean(keys::ATTR_IS_SENSITIVE)
    }

    pub fn is_extractable(&self) -> Option<bool> {
        self.boolean(keys::ATTR_IS_EXTRACTABLE)
    }
}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Value data stays out of debug output.
        let mut map = f.debug_map();
        for (key, value) in &self.bag {
            if key == keys::VALUE_DATA {
                map.entry(key, &"[REDACTED]");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bag() -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.insert(keys::CLASS.to_string(), AttrValue::from(ItemClass::GenericPassword.as_raw()));
        bag.insert(keys::ATTR_SERVICE.to_string(), AttrValue::from("example.com"));
        bag.insert(keys::ATTR_ACCOUNT.to_string(), AttrValue::from("api-token"));
        bag.insert(keys::ATTR_SYNCHRONIZABLE.to_string(), AttrValue::from(false));
        bag.insert(
            keys::ATTR_ACCESSIBLE.to_string(),
            AttrValue::from(Accessibility::AfterFirstUnlock.as_raw()),
        );
        bag.insert(
            keys::VALUE_DATA.to_string(),
            AttrValue::from(b"secret123".as_slice()),
        );
        bag
    }

    #[test]
    fn typed_accessors_resolve_native_keys() {
        let attributes = Attributes::new(sample_bag());

        assert_eq!(attributes.class(), Some(ItemClass::GenericPassword));
        assert_eq!(attributes.service(), Some("example.com"));
        assert_eq!(attributes.account(), Some("api-token"));
        assert_eq!(attributes.synchronizable(), Some(false));
        assert_eq!(attributes.accessible(), Some(Accessibility::AfterFirstUnlock));
        assert_eq!(attributes.data(), Some(b"secret123".as_slice()));
    }

    #[test]
    fn absent_attributes_read_as_none() {
        let attributes = Attributes::new(sample_bag());

        assert_eq!(attributes.server(), None);
        assert_eq!(attributes.label(), None);
        assert_eq!(attributes.creation_date(), None);
        assert!(attributes.persistent_ref().is_none());
    }

    #[test]
    fn debug_output_redacts_value_data() {
        let attributes = Attributes::new(sample_bag());
        let debug = format!("{attributes:?}");

        assert!(!debug.contains("secret123"));
        assert!(debug.contains("REDACTED"));
        assert!(debug.contains("example.com"));
    }
}
