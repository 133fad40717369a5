//! Configuration state and the request builders.
//!
//! `Options` is the immutable-per-instance parameter set behind a
//! [`Keychain`](crate::Keychain). The facade never hands out a mutable
//! view; modifier methods clone, adjust, and wrap a fresh copy. The two
//! builders here translate a configuration into the typed store requests:
//! [`Options::query`] for lookups and [`Options::write_attributes`] for
//! insert/update payloads.

use url::Url;

use crate::attributes::{AttrValue, AttributeBag};
use crate::error::{security_error, Error};
use crate::keys;
use crate::model::{Accessibility, AuthenticationType, ItemClass, ProtocolType};
use crate::policy::{
    AccessControl, AuthenticationContext, AuthenticationPolicy, AuthenticationUi, Protection,
};
use crate::query::{
    ClassIdentity, ItemQuery, MatchLimit, ReturnFlags, SecretBytes, SynchronizableMatch,
    WriteAttributes,
};

#[derive(Debug, Clone)]
pub(crate) struct Options {
    pub item_class: ItemClass,

    /// Generic-password identity.
    pub service: String,

    /// Internet-password identity.
    pub server: Option<Url>,
    pub protocol: Option<ProtocolType>,
    pub authentication_type: AuthenticationType,

    pub access_group: Option<String>,

    pub accessibility: Accessibility,
    pub authentication_policy: Option<AuthenticationPolicy>,

    pub synchronizable: bool,
    /// Lookups ignore the synchronizable attribute unless asked not to.
    pub ignore_synchronizable: bool,

    pub label: Option<String>,
    pub application_label: Option<String>,
    pub comment: Option<String>,

    /// Extra attributes merged into write payloads, keyed by native key
    /// names.
    pub attributes: AttributeBag,

    pub authentication_ui: Option<AuthenticationUi>,
    pub authentication_context: Option<AuthenticationContext>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            item_class: ItemClass::GenericPassword,
            service: String::new(),
            server: None,
            protocol: None,
            authentication_type: AuthenticationType::Default,
            access_group: None,
            accessibility: Accessibility::default(),
            authentication_policy: None,
            synchronizable: false,
            ignore_synchronizable: true,
            label: None,
            application_label: None,
            comment: None,
            attributes: AttributeBag::new(),
            authentication_ui: None,
            authentication_context: None,
        }
    }
}

impl Options {
    /// Build the base lookup request for this configuration.
    ///
    /// Carries the class selector, the class-specific identity fields,
    /// the access group when set, the synchronizable match mode, and the
    /// authentication context when one was supplied. Match limit and
    /// return flags default to a bare existence probe; operations adjust
    /// them. Authentication-UI modes are attached per operation, not
    /// here.
    pub fn query(&self) -> ItemQuery {
        let identity = match self.item_class {
            ItemClass::GenericPassword => ClassIdentity::Service {
                service: self.service.clone(),
            },
            ItemClass::InternetPassword => {
                let (host, port) = match &self.server {
                    Some(server) => (
                        server.host_str().unwrap_or_default().to_string(),
                        server.port(),
                    ),
                    None => (String::new(), None),
                };
                ClassIdentity::Server {
                    host,
                    port,
                    protocol: self.protocol.unwrap_or(ProtocolType::Https),
                    authentication_type: self.authentication_type,
                }
            }
            ItemClass::Certificate | ItemClass::Key | ItemClass::Identity => ClassIdentity::Bare,
        };

        let synchronizable = if self.ignore_synchronizable {
            SynchronizableMatch::Any
        } else {
            SynchronizableMatch::Exactly(self.synchronizable)
        };

        ItemQuery {
            class: self.item_class,
            identity,
            account: None,
            access_group: self.access_group.clone(),
            synchronizable,
            limit: MatchLimit::One,
            return_flags: ReturnFlags::default(),
            authentication_ui: None,
            authentication_context: self.authentication_context,
            // Platform rule, not a caller choice.
            use_data_protection: cfg!(target_os = "macos"),
        }
    }

    /// Build an insert or update payload.
    ///
    /// `key` present means an insert: the payload carries the class
    /// selector and identity fields from the base query. `key` absent
    /// means an update payload applied against a separate query.
    ///
    /// For password classes the value must be bytes and lands in the
    /// value-data slot under the account. For other classes a present key
    /// is a literal attribute name assigned the value. Identity inserts
    /// refuse data/reference/attribute return requests, keep only the
    /// persistent-reference request, and drop the class selector.
    pub fn write_attributes(
        &self,
        key: Option<&str>,
        value: AttrValue,
    ) -> Result<WriteAttributes, Error> {
        let insert = key.is_some();
        let base = insert.then(|| self.query());

        let mut attributes = WriteAttributes {
            class: base.as_ref().map(|query| query.class),
            identity: base.map(|query| query.identity),
            account: None,
            access_group: self.access_group.clone(),
            value: None,
            named: AttributeBag::new(),
            label: self.label.clone(),
            application_label: self.application_label.clone(),
            comment: self.comment.clone(),
            protection: Protection::Plain(self.accessibility),
            synchronizable: self.synchronizable,
            use_data_protection: cfg!(target_os = "macos"),
            return_persistent_reference: false,
        };

        if self.item_class.is_password() {
            attributes.account = key.map(str::to_string);
            match value {
                AttrValue::Bytes(bytes) => attributes.value = Some(SecretBytes::new(bytes)),
                _ => {
                    return Err(Error::bad_request(format!(
                        "value for {} must be byte data",
                        self.item_class
                    )));
                }
            }
        } else if let Some(key) = key {
            attributes.named.insert(key.to_string(), value);
        }

        for (name, value) in &self.attributes {
            attributes.named.insert(name.clone(), value.clone());
        }

        if self.item_class == ItemClass::Identity {
            // Return requests other than the persistent reference make the
            // store reject the insert; a lingering class selector makes it
            // report success while adding nothing.
            for forbidden in [keys::RETURN_DATA, keys::RETURN_REF, keys::RETURN_ATTRIBUTES] {
                if attributes.named.contains_key(forbidden) {
                    return Err(Error::bad_request(format!(
                        "identity payloads cannot request {forbidden}"
                    )));
                }
            }
            attributes.return_persistent_reference = true;
            attributes.class = None;
        }

        if let Some(policy) = self.authentication_policy {
            let control =
                AccessControl::new(self.accessibility, policy).map_err(security_error)?;
            attributes.protection = Protection::Control(control);
        }

        Ok(attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;

    fn generic(service: &str) -> Options {
        Options {
            service: service.to_string(),
            ..Options::default()
        }
    }

    #[test]
    fn query_carries_generic_password_identity() {
        let options = generic("example.com");
        let query = options.query();

        assert_eq!(query.class, ItemClass::GenericPassword);
        assert_eq!(
            query.identity,
            ClassIdentity::Service {
                service: "example.com".to_string()
            }
        );
        assert_eq!(query.synchronizable, SynchronizableMatch::Any);
        assert!(!query.return_flags.any());
    }

    #[test]
    fn query_carries_internet_password_identity() {
        let options = Options {
            item_class: ItemClass::InternetPassword,
            server: Some(Url::parse("https://example.com:8443/login").unwrap()),
            protocol: Some(ProtocolType::Https),
            ..Options::default()
        };
        let query = options.query();

        assert_eq!(
            query.identity,
            ClassIdentity::Server {
                host: "example.com".to_string(),
                port: Some(8443),
                protocol: ProtocolType::Https,
                authentication_type: AuthenticationType::Default,
            }
        );
    }

    #[test]
    fn exact_synchronizable_matching_when_not_ignored() {
        let options = Options {
            synchronizable: true,
            ignore_synchronizable: false,
            ..generic("example.com")
        };

        assert_eq!(
            options.query().synchronizable,
            SynchronizableMatch::Exactly(true)
        );
    }

    #[test]
    fn insert_payload_carries_identity_and_value() {
        let options = generic("example.com");
        let payload = options
            .write_attributes(Some("api-token"), AttrValue::from(b"secret".as_slice()))
            .unwrap();

        assert_eq!(payload.class, Some(ItemClass::GenericPassword));
        assert_eq!(payload.account.as_deref(), Some("api-token"));
        assert_eq!(payload.value.as_ref().unwrap().expose(), b"secret");
        assert!(!payload.synchronizable);
    }

    #[test]
    fn update_payload_has_no_identity() {
        let options = generic("example.com");
        let payload = options
            .write_attributes(None, AttrValue::from(b"secret".as_slice()))
            .unwrap();

        assert_eq!(payload.class, None);
        assert_eq!(payload.identity, None);
        assert_eq!(payload.account, None);
        assert!(payload.value.is_some());
    }

    #[test]
    fn password_value_must_be_bytes() {
        let options = generic("example.com");
        let result = options.write_attributes(Some("api-token"), AttrValue::from("not bytes"));

        assert!(matches!(result, Err(Error::BadRequest { .. })));
    }

    #[test]
    fn non_password_key_becomes_named_attribute() {
        let options = Options {
            item_class: ItemClass::Certificate,
            ..Options::default()
        };
        let payload = options
            .write_attributes(Some(keys::ATTR_LABEL), AttrValue::from("my-cert"))
            .unwrap();

        assert_eq!(
            payload.named.get(keys::ATTR_LABEL),
            Some(&AttrValue::from("my-cert"))
        );
        assert!(payload.value.is_none());
    }

    #[test]
    fn identity_insert_strips_class_and_requests_persistent_ref() {
        let options = Options {
            item_class: ItemClass::Identity,
            ..Options::default()
        };
        let payload = options
            .write_attributes(Some(keys::ATTR_LABEL), AttrValue::from("pair"))
            .unwrap();

        assert_eq!(payload.class, None);
        assert!(payload.return_persistent_reference);
    }

    #[test]
    fn identity_insert_rejects_return_requests() {
        let mut extras = AttributeBag::new();
        extras.insert(keys::RETURN_DATA.to_string(), AttrValue::from(true));
        let options = Options {
            item_class: ItemClass::Identity,
            attributes: extras,
            ..Options::default()
        };

        let result = options.write_attributes(Some(keys::ATTR_LABEL), AttrValue::from("pair"));
        assert!(matches!(result, Err(Error::BadRequest { .. })));
    }

    #[test]
    fn configured_policy_becomes_access_control() {
        let options = Options {
            authentication_policy: Some(AuthenticationPolicy::USER_PRESENCE),
            ..generic("example.com")
        };
        let payload = options
            .write_attributes(Some("api-token"), AttrValue::from(b"secret".as_slice()))
            .unwrap();

        assert!(payload.protection.requires_authentication());
    }

    #[test]
    fn invalid_policy_surfaces_underlying_status() {
        let options = Options {
            authentication_policy: Some(AuthenticationPolicy::empty()),
            ..generic("example.com")
        };
        let result =
            options.write_attributes(Some("api-token"), AttrValue::from(b"secret".as_slice()));

        assert_eq!(result.unwrap_err(), Error::Platform(Status::Param));
    }

    #[test]
    fn extras_merge_into_payload() {
        let mut extras = AttributeBag::new();
        extras.insert(keys::ATTR_COMMENT.to_string(), AttrValue::from("rotated"));
        let options = Options {
            attributes: extras,
            ..generic("example.com")
        };
        let payload = options
            .write_attributes(None, AttrValue::from(b"secret".as_slice()))
            .unwrap();

        assert_eq!(
            payload.named.get(keys::ATTR_COMMENT),
            Some(&AttrValue::from("rotated"))
        );
    }
}
