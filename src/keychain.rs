//! The fluent keychain facade.
//!
//! A [`Keychain`] value bundles an immutable configuration with a handle
//! to an item store. Factories build the configuration, copy-on-write
//! modifiers refine it, and operations translate it into store requests:
//!
//! ```rust,ignore
//! use strongbox::Keychain;
//!
//! let keychain = Keychain::generic_password("example.com");
//! keychain.set("secret123", "api-token")?;
//! let token = keychain.get("api-token")?;
//! ```
//!
//! The facade is stateless beyond its configuration: every operation is a
//! fresh round trip to the store, nothing is cached, nothing is retried.

use std::fmt;
use std::sync::Arc;
use url::Url;

use crate::attributes::{AttrValue, AttributeBag, Attributes};
use crate::error::{security_error, Error};
use crate::keys;
use crate::model::{
    Accessibility, AuthenticationType, ItemClass, KeyClass, KeyType, PersistentRef, ProtocolType,
};
use crate::options::Options;
use crate::policy::{AuthenticationContext, AuthenticationPolicy, AuthenticationUi};
use crate::query::{ItemQuery, MatchLimit};
use crate::shared::{
    SharedCredential, SharedCredentialStore, UnsupportedSharedCredentialStore,
};
use crate::status::Status;
use crate::store::{create_store, ItemStore, QueryResult};
use crate::summary::{prettify, ItemSummary};

/// Fluent facade over a secure item store.
///
/// Configurations are immutable values: modifiers return a new `Keychain`
/// and never touch the receiver, so sharing one across threads for
/// concurrent reads is safe.
#[derive(Clone)]
pub struct Keychain {
    options: Options,
    store: Arc<dyn ItemStore>,
    shared: Arc<dyn SharedCredentialStore>,
}

impl Keychain {
    fn with_options(options: Options) -> Keychain {
        Keychain {
            options,
            store: create_store(true),
            shared: Arc::new(UnsupportedSharedCredentialStore),
        }
    }

    /// Keychain for the given item class with otherwise default
    /// configuration.
    pub fn for_item_class(item_class: ItemClass) -> Keychain {
        Keychain::with_options(Options {
            item_class,
            ..Options::default()
        })
    }

    /// Generic-password keychain scoped to a service name.
    pub fn generic_password(service: impl Into<String>) -> Keychain {
        Keychain::with_options(Options {
            service: service.into(),
            ..Options::default()
        })
    }

    /// Internet-password keychain scoped to a server and protocol.
    pub fn internet_password(server: Url, protocol: ProtocolType) -> Keychain {
        Keychain::with_options(Options {
            item_class: ItemClass::InternetPassword,
            server: Some(server),
            protocol: Some(protocol),
            ..Options::default()
        })
    }

    /// Certificate keychain.
    pub fn certificate() -> Keychain {
        Keychain::with_options(Options {
            item_class: ItemClass::Certificate,
            ..Options::default()
        })
    }

    /// Cryptographic-key keychain. The key class and type travel as
    /// attributes on written items.
    pub fn key(key_class: KeyClass, key_type: KeyType) -> Keychain {
        let mut attributes = AttributeBag::new();
        attributes.insert(
            keys::ATTR_KEY_CLASS.to_string(),
            AttrValue::from(key_class.as_raw()),
        );
        attributes.insert(
            keys::ATTR_KEY_TYPE.to_string(),
            AttrValue::from(key_type.as_raw()),
        );
        Keychain::with_options(Options {
            item_class: ItemClass::Key,
            attributes,
            ..Options::default()
        })
    }

    /// Identity keychain (certificate paired with its private key).
    pub fn identity() -> Keychain {
        Keychain::for_item_class(ItemClass::Identity)
    }
}

/// Configuration accessors.
impl Keychain {
    pub fn item_class(&self) -> ItemClass {
        self.options.item_class
    }

    pub fn service(&self) -> &str {
        &self.options.service
    }

    pub fn server(&self) -> Option<&Url> {
        self.options.server.as_ref()
    }

    pub fn protocol(&self) -> Option<ProtocolType> {
        self.options.protocol
    }

    pub fn authentication_type(&self) -> AuthenticationType {
        self.options.authentication_type
    }

    pub fn accessibility(&self) -> Accessibility {
        self.options.accessibility
    }

    pub fn authentication_policy(&self) -> Option<AuthenticationPolicy> {
        self.options.authentication_policy
    }

    pub fn synchronizable(&self) -> bool {
        self.options.synchronizable
    }

    pub fn access_group(&self) -> Option<&str> {
        self.options.access_group.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.options.label.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.options.comment.as_deref()
    }
}

/// Copy-on-write modifiers. Each returns a new `Keychain`; the receiver
/// is never mutated.
impl Keychain {
    fn map_options(&self, adjust: impl FnOnce(&mut Options)) -> Keychain {
        let mut options = self.options.clone();
        adjust(&mut options);
        Keychain {
            options,
            store: Arc::clone(&self.store),
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn with_accessibility(&self, accessibility: Accessibility) -> Keychain {
        self.map_options(|options| options.accessibility = accessibility)
    }

    /// Accessibility combined with an authentication policy; written
    /// items get a full access-control object.
    pub fn with_access_control(
        &self,
        accessibility: Accessibility,
        policy: AuthenticationPolicy,
    ) -> Keychain {
        self.map_options(|options| {
            options.accessibility = accessibility;
            options.authentication_policy = Some(policy);
        })
    }

    pub fn with_synchronizable(&self, synchronizable: bool) -> Keychain {
        self.map_options(|options| options.synchronizable = synchronizable)
    }

    /// Whether lookups ignore the synchronizable attribute during
    /// matching (the default) or require an exact match against the
    /// configured flag.
    pub fn ignoring_synchronizable(&self, ignore: bool) -> Keychain {
        self.map_options(|options| options.ignore_synchronizable = ignore)
    }

    pub fn with_label(&self, label: impl Into<String>) -> Keychain {
        self.map_options(|options| options.label = Some(label.into()))
    }

    pub fn with_application_label(&self, application_label: impl Into<String>) -> Keychain {
        self.map_options(|options| options.application_label = Some(application_label.into()))
    }

    pub fn with_comment(&self, comment: impl Into<String>) -> Keychain {
        self.map_options(|options| options.comment = Some(comment.into()))
    }

    pub fn with_access_group(&self, access_group: impl Into<String>) -> Keychain {
        self.map_options(|options| options.access_group = Some(access_group.into()))
    }

    pub fn with_authentication_type(
        &self,
        authentication_type: AuthenticationType,
    ) -> Keychain {
        self.map_options(|options| options.authentication_type = authentication_type)
    }

    /// Merge extra attributes into write payloads, keyed by native key
    /// names.
    pub fn with_attributes(
        &self,
        attributes: impl IntoIterator<Item = (String, AttrValue)>,
    ) -> Keychain {
        self.map_options(|options| options.attributes.extend(attributes))
    }

    pub fn with_authentication_ui(&self, authentication_ui: AuthenticationUi) -> Keychain {
        self.map_options(|options| options.authentication_ui = Some(authentication_ui))
    }

    pub fn with_authentication_context(&self, context: AuthenticationContext) -> Keychain {
        self.map_options(|options| options.authentication_context = Some(context))
    }

    /// Swap the backing item store. Useful for tests and for hosts that
    /// provide their own store implementation.
    pub fn with_store(&self, store: Arc<dyn ItemStore>) -> Keychain {
        Keychain {
            options: self.options.clone(),
            store,
            shared: Arc::clone(&self.shared),
        }
    }

    /// Swap the shared web-credential service.
    pub fn with_shared_credential_store(
        &self,
        shared: Arc<dyn SharedCredentialStore>,
    ) -> Keychain {
        Keychain {
            options: self.options.clone(),
            store: Arc::clone(&self.store),
            shared,
        }
    }
}

/// Reading.
impl Keychain {
    /// Base query with the account key applied according to the item
    /// class rules: password classes address by account; other classes
    /// refuse one.
    fn account_query(&self, key: Option<&str>) -> Result<ItemQuery, Error> {
        let mut query = self.options.query();
        if self.options.item_class.is_password() {
            query.account = key.map(str::to_string);
        } else if key.is_some() {
            return Err(Error::bad_request(format!(
                "{} items are not addressed by an account key",
                self.options.item_class
            )));
        }
        Ok(query)
    }

    /// Fetch the stored value as UTF-8 text. Equivalent to
    /// [`get_string`](Keychain::get_string).
    pub fn get<'a>(&self, key: impl Into<Option<&'a str>>) -> Result<Option<String>, Error> {
        self.get_string(key)
    }

    /// Fetch the stored value as UTF-8 text.
    ///
    /// `Ok(None)` when nothing matched; [`Error::Conversion`] when the
    /// stored bytes are not valid UTF-8.
    pub fn get_string<'a>(
        &self,
        key: impl Into<Option<&'a str>>,
    ) -> Result<Option<String>, Error> {
        match self.get_data(key)? {
            Some(data) => match String::from_utf8(data) {
                Ok(string) => Ok(Some(string)),
                Err(_) => {
                    tracing::warn!("stored value is not valid UTF-8 text");
                    Err(Error::Conversion)
                }
            },
            None => Ok(None),
        }
    }

    /// Fetch the stored value as raw bytes.
    ///
    /// `Ok(None)` when nothing matched. For certificate, key, and
    /// identity configurations pass `None` as the key; those classes are
    /// not addressed by account.
    pub fn get_data<'a>(
        &self,
        key: impl Into<Option<&'a str>>,
    ) -> Result<Option<Vec<u8>>, Error> {
        let mut query = self.account_query(key.into())?;
        query.limit = MatchLimit::One;
        query.return_flags.data = true;

        match self.store.copy_matching(&query) {
            Ok(QueryResult::Data(data)) => Ok(Some(data)),
            Ok(_) => Err(Error::Unexpected),
            Err(Status::ItemNotFound) => Ok(None),
            Err(status) => Err(security_error(status)),
        }
    }

    /// Structured read: fetch one match requesting data, reference,
    /// persistent reference, and attributes, and hand the snapshot to
    /// `handler`. The handler receives `None` when nothing matched and
    /// its product is returned as-is.
    pub fn get_with<'a, T>(
        &self,
        key: impl Into<Option<&'a str>>,
        handler: impl FnOnce(Option<Attributes>) -> T,
    ) -> Result<T, Error> {
        let mut query = self.account_query(key.into())?;
        query.limit = MatchLimit::One;
        query.return_flags.data = true;
        query.return_flags.reference = true;
        query.return_flags.persistent_reference = true;
        query.return_flags.attributes = true;

        match self.store.copy_matching(&query) {
            Ok(QueryResult::Attributes(bag)) => Ok(handler(Some(Attributes::new(bag)))),
            Ok(_) => Err(Error::Unexpected),
            Err(Status::ItemNotFound) => Ok(handler(None)),
            Err(status) => Err(security_error(status)),
        }
    }

    /// Probe whether an item exists without fetching it.
    ///
    /// A match blocked behind user authentication counts as absent here;
    /// use
    /// [`contains_without_authentication_ui`](Keychain::contains_without_authentication_ui)
    /// to count it as present.
    pub fn contains(&self, key: &str) -> Result<bool, Error> {
        self.probe(key, false)
    }

    /// Existence probe that treats authentication-blocked matches as
    /// present: the blocked status proves the item exists even though its
    /// value is out of reach without interaction.
    pub fn contains_without_authentication_ui(&self, key: &str) -> Result<bool, Error> {
        self.probe(key, true)
    }

    fn probe(&self, key: &str, without_authentication_ui: bool) -> Result<bool, Error> {
        let mut query = self.account_query(Some(key))?;
        query.authentication_ui = self.options.authentication_ui;

        match self.store.copy_matching(&query) {
            Ok(_) => Ok(true),
            Err(Status::InteractionNotAllowed) => Ok(without_authentication_ui),
            Err(Status::ItemNotFound) => Ok(false),
            Err(status) => Err(security_error(status)),
        }
    }
}

/// Writing.
impl Keychain {
    /// Store UTF-8 text under a key. See [`set_data`](Keychain::set_data).
    pub fn set(&self, value: impl AsRef<str>, key: &str) -> Result<(), Error> {
        self.set_data(value.as_ref().as_bytes().to_vec(), key)
    }

    /// Store raw bytes under a key, inserting or overwriting as needed.
    ///
    /// Upsert runs as probe-then-act because the store has distinct add
    /// and update calls with different payload shapes. An external writer
    /// racing between the two phases can make the act phase fail with a
    /// not-found-like status; that failure is surfaced, never retried.
    pub fn set_data(&self, value: impl Into<Vec<u8>>, key: &str) -> Result<(), Error> {
        if !self.options.item_class.is_password() {
            return Err(Error::bad_request(format!(
                "{} items do not take account-keyed values; use set_persistent_value",
                self.options.item_class
            )));
        }

        let value = value.into();
        let mut probe = self.account_query(Some(key))?;
        probe.authentication_ui = self.options.authentication_ui;

        match self.store.copy_matching(&probe) {
            Ok(_) => {
                let query = self.account_query(Some(key))?;
                let update = self
                    .options
                    .write_attributes(None, AttrValue::Bytes(value))?;
                match self.store.update(&query, &update) {
                    Ok(()) => Ok(()),
                    Err(status) => Err(security_error(status)),
                }
            }
            Err(Status::ItemNotFound) => {
                let insert = self
                    .options
                    .write_attributes(Some(key), AttrValue::Bytes(value))?;
                match self.store.add(&insert) {
                    Ok(_) => Ok(()),
                    Err(status) => Err(security_error(status)),
                }
            }
            Err(status) => Err(security_error(status)),
        }
    }

    /// Insert-only write for certificate, key, and identity items.
    ///
    /// The key names the attribute the value lands in. Returns the
    /// store's persistent reference; a success without one is an
    /// [`Error::Unexpected`]. Password classes must use
    /// [`set`](Keychain::set) / [`set_data`](Keychain::set_data) instead.
    pub fn set_persistent_value(
        &self,
        value: AttrValue,
        key: &str,
    ) -> Result<PersistentRef, Error> {
        if self.options.item_class.is_password() {
            return Err(Error::bad_request(format!(
                "{} items take account-keyed values; use set",
                self.options.item_class
            )));
        }

        let mut payload = self.options.write_attributes(Some(key), value)?;
        payload.return_persistent_reference = true;

        match self.store.add(&payload) {
            Ok(Some(reference)) => Ok(reference),
            Ok(None) => Err(Error::Unexpected),
            Err(status) => Err(security_error(status)),
        }
    }

    /// Delete the item under a key. Deleting a missing item succeeds.
    pub fn remove(&self, key: &str) -> Result<(), Error> {
        let query = self.account_query(Some(key))?;
        match self.store.delete(&query) {
            Ok(()) | Err(Status::ItemNotFound) => Ok(()),
            Err(status) => Err(security_error(status)),
        }
    }

    /// Delete every item this configuration addresses.
    pub fn remove_all(&self) -> Result<(), Error> {
        let mut query = self.options.query();
        query.limit = MatchLimit::All;
        match self.store.delete(&query) {
            Ok(()) | Err(Status::ItemNotFound) => Ok(()),
            Err(status) => Err(security_error(status)),
        }
    }
}

/// Best-effort accessors. Errors are discarded by design; use the
/// `Result`-returning operations when failures matter.
impl Keychain {
    /// Best-effort text read.
    pub fn value_for(&self, key: &str) -> Option<String> {
        self.get_string(key).ok().flatten()
    }

    /// Best-effort byte read.
    pub fn data_for(&self, key: &str) -> Option<Vec<u8>> {
        self.get_data(key).ok().flatten()
    }

    /// Best-effort attribute snapshot.
    pub fn attributes_for(&self, key: &str) -> Option<Attributes> {
        self.get_with(key, |attributes| attributes).ok().flatten()
    }

    /// Best-effort text write; `None` removes the item.
    pub fn put(&self, key: &str, value: Option<&str>) {
        let _ = match value {
            Some(value) => self.set(value, key),
            None => self.remove(key),
        };
    }

    /// Best-effort byte write; `None` removes the item.
    pub fn put_data(&self, key: &str, value: Option<&[u8]>) {
        let _ = match value {
            Some(value) => self.set_data(value.to_vec(), key),
            None => self.remove(key),
        };
    }
}

/// Enumeration.
impl Keychain {
    fn collect_items(&self, mut query: ItemQuery) -> Vec<AttributeBag> {
        query.limit = MatchLimit::All;
        query.return_flags.attributes = true;
        if cfg!(any(target_os = "ios", target_os = "watchos", target_os = "tvos")) {
            query.return_flags.data = true;
        }

        match self.store.copy_matching(&query) {
            Ok(QueryResult::Items(items)) => items,
            Ok(QueryResult::Attributes(bag)) => vec![bag],
            Ok(_) => Vec::new(),
            Err(Status::ItemNotFound) => Vec::new(),
            Err(status) => {
                let _ = security_error(status);
                Vec::new()
            }
        }
    }

    /// Summaries of every item this configuration addresses.
    pub fn all_items(&self) -> Vec<ItemSummary> {
        prettify(
            self.options.item_class,
            self.collect_items(self.options.query()),
        )
    }

    /// Keys of every item this configuration addresses. Order is not
    /// guaranteed.
    pub fn all_keys(&self) -> Vec<String> {
        self.all_items()
            .into_iter()
            .filter_map(|summary| summary.key)
            .collect()
    }

    /// Summaries of every item of a class, ignoring this configuration's
    /// service or server binding.
    pub fn all_items_of_class(&self, item_class: ItemClass) -> Vec<ItemSummary> {
        prettify(
            item_class,
            self.collect_items(ItemQuery::for_class(item_class)),
        )
    }

    /// (service-or-server, key) pairs of every item of a class.
    pub fn all_keys_of_class(&self, item_class: ItemClass) -> Vec<(String, String)> {
        self.all_items_of_class(item_class)
            .into_iter()
            .map(|summary| {
                let scope = match item_class {
                    ItemClass::InternetPassword => summary.server,
                    _ => summary.service,
                };
                (
                    scope.unwrap_or_default(),
                    summary.key.unwrap_or_default(),
                )
            })
            .collect()
    }
}

/// Shared web credentials.
///
/// These operations talk to the platform's shared-credential service
/// rather than the item store. Completion context is platform-defined;
/// results arrive whenever the service answers.
impl Keychain {
    fn shared_domain(&self) -> Result<String, Error> {
        match self
            .options
            .server
            .as_ref()
            .and_then(|server| server.host_str())
        {
            Some(host) => Ok(host.to_string()),
            None => Err(security_error(Status::Param)),
        }
    }

    /// First shared credential for this configuration's server domain.
    pub async fn get_shared_credential(&self) -> Result<Option<SharedCredential>, Error> {
        let domain = self.shared_domain()?;
        let mut credentials = self
            .request_shared_credentials(Some(&domain), None)
            .await?;
        Ok(if credentials.is_empty() {
            None
        } else {
            Some(credentials.remove(0))
        })
    }

    /// Shared password for an account under this configuration's server
    /// domain.
    pub async fn get_shared_password(&self, account: &str) -> Result<Option<String>, Error> {
        let domain = self.shared_domain()?;
        let credentials = self
            .request_shared_credentials(Some(&domain), Some(account))
            .await?;
        Ok(credentials
            .into_iter()
            .next()
            .map(|credential| credential.password))
    }

    /// Add or update a shared password.
    pub async fn set_shared_password(&self, password: &str, account: &str) -> Result<(), Error> {
        let domain = self.shared_domain()?;
        match self.shared.store(&domain, account, Some(password)).await {
            Ok(()) => Ok(()),
            Err(status) => Err(security_error(status)),
        }
    }

    /// Remove a shared password. Removing a missing credential succeeds.
    pub async fn remove_shared_password(&self, account: &str) -> Result<(), Error> {
        let domain = self.shared_domain()?;
        match self.shared.store(&domain, account, None).await {
            Ok(()) | Err(Status::ItemNotFound) => Ok(()),
            Err(status) => Err(security_error(status)),
        }
    }

    /// Fetch shared credentials matching an optional domain and account
    /// filter. An empty result set is not an error.
    pub async fn request_shared_credentials(
        &self,
        domain: Option<&str>,
        account: Option<&str>,
    ) -> Result<Vec<SharedCredential>, Error> {
        match self.shared.request(domain, account).await {
            Ok(credentials) => Ok(credentials),
            Err(Status::ItemNotFound) => Ok(Vec::new()),
            Err(status) => Err(security_error(status)),
        }
    }
}

impl fmt::Debug for Keychain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keychain")
            .field("class", &self.options.item_class)
            .field("service", &self.options.service)
            .field("server", &self.options.server)
            .field("access_group", &self.options.access_group)
            .field("synchronizable", &self.options.synchronizable)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Keychain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items = self.all_items();
        if items.is_empty() {
            return f.write_str("[]");
        }
        f.write_str("[\n")?;
        for item in items {
            let line = serde_json::to_string(&item).unwrap_or_else(|_| "{}".to_string());
            writeln!(f, "  {line}")?;
        }
        f.write_str("]")
    }
}
