//! Typed request records for the item-store protocol.
//!
//! Requests used to be untyped string-keyed dictionaries in stores of
//! this shape; here they are records, so a request can only carry the
//! identity fields its item class actually has. The native dictionary
//! key set survives as the mapping table in [`crate::keys`], which
//! backends use when they build result bags or talk to a real platform
//! store.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::attributes::AttributeBag;
use crate::model::{AuthenticationType, ItemClass, ProtocolType};
use crate::policy::{AuthenticationContext, AuthenticationUi, Protection};

/// How many matches a lookup may resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchLimit {
    One,
    All,
}

/// Which payloads a lookup asks the store to return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnFlags {
    pub data: bool,
    pub attributes: bool,
    pub reference: bool,
    pub persistent_reference: bool,
}

impl ReturnFlags {
    pub fn any(self) -> bool {
        self.data || self.attributes || self.reference || self.persistent_reference
    }
}

/// How a lookup treats the synchronizable attribute during matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SynchronizableMatch {
    /// Match items regardless of their synchronizable state.
    Any,

    /// Match only items whose synchronizable state equals the given
    /// value.
    Exactly(bool),
}

/// Class-specific identity fields of a query or insert payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassIdentity {
    /// Generic-password identity.
    Service { service: String },

    /// Internet-password identity.
    Server {
        host: String,
        port: Option<u16>,
        protocol: ProtocolType,
        authentication_type: AuthenticationType,
    },

    /// Certificate, key, and identity items carry no service or server
    /// binding.
    Bare,
}

/// Base lookup request against the item store.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemQuery {
    pub class: ItemClass,
    pub identity: ClassIdentity,
    pub account: Option<String>,
    pub access_group: Option<String>,
    pub synchronizable: SynchronizableMatch,
    pub limit: MatchLimit,
    pub return_flags: ReturnFlags,
    pub authentication_ui: Option<AuthenticationUi>,
    pub authentication_context: Option<AuthenticationContext>,
    /// Request routing to the platform-native protected store. Fixed by
    /// target-platform rules, not caller-configurable.
    pub use_data_protection: bool,
}

impl ItemQuery {
    /// Class-wide query matching every item of `class`, regardless of any
    /// service or server binding.
    pub fn for_class(class: ItemClass) -> ItemQuery {
        ItemQuery {
            class,
            identity: ClassIdentity::Bare,
            account: None,
            access_group: None,
            synchronizable: SynchronizableMatch::Any,
            limit: MatchLimit::All,
            return_flags: ReturnFlags::default(),
            authentication_ui: None,
            authentication_context: None,
            use_data_protection: cfg!(target_os = "macos"),
        }
    }
}

/// Secret bytes carried by a write payload.
///
/// The buffer is wiped when dropped and never appears in debug output.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretBytes(Vec<u8>);

impl SecretBytes {
    pub fn new(bytes: impl Into<Vec<u8>>) -> SecretBytes {
        SecretBytes(bytes.into())
    }

    /// Expose the secret bytes. Use sparingly and never log the result.
    pub fn expose(&self) -> &[u8] {
        &self.0
    }

    /// Consume the wrapper and return the inner buffer unwiped.
    pub fn into_bytes(mut self) -> Vec<u8> {
        std::mem::take(&mut self.0)
    }
}

impl fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBytes([REDACTED])")
    }
}

/// Insert or update payload against the item store.
///
/// Insert payloads carry the class selector and identity fields; update
/// payloads are applied against a separate [`ItemQuery`] and leave both
/// unset. An identity insert is the one payload shape that reaches the
/// store without a class selector: the store refuses the insert silently
/// when the selector is present, so the builder strips it.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteAttributes {
    pub class: Option<ItemClass>,
    pub identity: Option<ClassIdentity>,
    pub account: Option<String>,
    pub access_group: Option<String>,
    pub value: Option<SecretBytes>,
    /// Literal attribute writes (raw key/cert attributes, configured
    /// extras), keyed by native key names.
    pub named: AttributeBag,
    pub label: Option<String>,
    pub application_label: Option<String>,
    pub comment: Option<String>,
    pub protection: Protection,
    /// Always set explicitly so writes are unambiguous about sync intent.
    pub synchronizable: bool,
    pub use_data_protection: bool,
    pub return_persistent_reference: bool,
}
