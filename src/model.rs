//! Domain value vocabulary for the item-store protocol.
//!
//! This module defines the enumerated values a configuration is built
//! from:
//! - [`ItemClass`] - category of stored object
//! - [`Accessibility`] - lock-state policy for reads
//! - [`ProtocolType`] / [`AuthenticationType`] - internet-password identity
//! - [`KeyClass`] / [`KeyType`] - cryptographic key attributes
//! - [`PersistentRef`] - storage-stable item handle
//!
//! Each enum maps to the native constant values the store protocol uses
//! on the wire (`as_raw` / `from_raw`) and carries a human-readable
//! description for the enumeration projection.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::keys;

/// Category of stored object.
///
/// The item class decides which identity fields of a configuration are
/// meaningful: service for generic passwords, server/protocol/auth-type
/// for internet passwords, none of those for certificates, keys, and
/// identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemClass {
    /// Application password.
    GenericPassword,

    /// Web password.
    InternetPassword,

    Certificate,

    Key,

    /// Certificate paired with its associated private key. An identity is
    /// a virtual object assembled by the store at query time; storing the
    /// certificate and key separately is the more reliable arrangement.
    Identity,
}

impl ItemClass {
    /// Native class-selector value.
    pub fn as_raw(self) -> &'static str {
        match self {
            ItemClass::GenericPassword => keys::CLASS_GENERIC_PASSWORD,
            ItemClass::InternetPassword => keys::CLASS_INTERNET_PASSWORD,
            ItemClass::Certificate => keys::CLASS_CERTIFICATE,
            ItemClass::Key => keys::CLASS_KEY,
            ItemClass::Identity => keys::CLASS_IDENTITY,
        }
    }

    /// Resolve a native class-selector value.
    pub fn from_raw(raw: &str) -> Option<ItemClass> {
        match raw {
            keys::CLASS_GENERIC_PASSWORD => Some(ItemClass::GenericPassword),
            keys::CLASS_INTERNET_PASSWORD => Some(ItemClass::InternetPassword),
            keys::CLASS_CERTIFICATE => Some(ItemClass::Certificate),
            keys::CLASS_KEY => Some(ItemClass::Key),
            keys::CLASS_IDENTITY => Some(ItemClass::Identity),
            _ => None,
        }
    }

    /// Whether this class addresses items by an account key.
    pub fn is_password(self) -> bool {
        matches!(
            self,
            ItemClass::GenericPassword | ItemClass::InternetPassword
        )
    }
}

impl fmt::Display for ItemClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemClass::GenericPassword => "GenericPassword",
            ItemClass::InternetPassword => "InternetPassword",
            ItemClass::Certificate => "Certificate",
            ItemClass::Key => "Key",
            ItemClass::Identity => "Identity",
        };
        f.write_str(name)
    }
}

/// Policy governing when an item may be read relative to device lock
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    /// Item data can only be accessed while the device is unlocked.
    WhenUnlocked,

    /// Item data can be accessed once after the first unlock following a
    /// restart. Recommended for items that background processes read.
    AfterFirstUnlock,

    /// Item data can always be accessed regardless of lock state.
    /// Discouraged by the platform; kept for compatibility.
    Always,

    /// Item data can only be accessed while unlocked, and only if a
    /// passcode is set. No iCloud sync, no backup restore to another
    /// device.
    WhenPasscodeSetThisDeviceOnly,

    /// Like `WhenUnlocked`, without cross-device migration.
    WhenUnlockedThisDeviceOnly,

    /// Like `AfterFirstUnlock`, without cross-device migration.
    AfterFirstUnlockThisDeviceOnly,

    /// Like `Always`, without cross-device migration.
    AlwaysThisDeviceOnly,
}

impl Accessibility {
    /// Native accessibility attribute value.
    pub fn as_raw(self) -> &'static str {
        match self {
            Accessibility::WhenUnlocked => "ak",
            Accessibility::AfterFirstUnlock => "ck",
            Accessibility::Always => "dk",
            Accessibility::WhenPasscodeSetThisDeviceOnly => "akpu",
            Accessibility::WhenUnlockedThisDeviceOnly => "aku",
            Accessibility::AfterFirstUnlockThisDeviceOnly => "cku",
            Accessibility::AlwaysThisDeviceOnly => "dku",
        }
    }

    /// Resolve a native accessibility attribute value.
    pub fn from_raw(raw: &str) -> Option<Accessibility> {
        match raw {
            "ak" => Some(Accessibility::WhenUnlocked),
            "ck" => Some(Accessibility::AfterFirstUnlock),
            "dk" => Some(Accessibility::Always),
            "akpu" => Some(Accessibility::WhenPasscodeSetThisDeviceOnly),
            "aku" => Some(Accessibility::WhenUnlockedThisDeviceOnly),
            "cku" => Some(Accessibility::AfterFirstUnlockThisDeviceOnly),
            "dku" => Some(Accessibility::AlwaysThisDeviceOnly),
            _ => None,
        }
    }
}

impl Default for Accessibility {
    fn default() -> Self {
        Accessibility::AfterFirstUnlock
    }
}

impl fmt::Display for Accessibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Accessibility::WhenUnlocked => "WhenUnlocked",
            Accessibility::AfterFirstUnlock => "AfterFirstUnlock",
            Accessibility::Always => "Always",
            Accessibility::WhenPasscodeSetThisDeviceOnly => "WhenPasscodeSetThisDeviceOnly",
            Accessibility::WhenUnlockedThisDeviceOnly => "WhenUnlockedThisDeviceOnly",
            Accessibility::AfterFirstUnlockThisDeviceOnly => "AfterFirstUnlockThisDeviceOnly",
            Accessibility::AlwaysThisDeviceOnly => "AlwaysThisDeviceOnly",
        };
        f.write_str(name)
    }
}

/// Network protocol of an internet-password identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolType {
    Ftp,
    FtpAccount,
    Http,
    Irc,
    Nntp,
    Pop3,
    Smtp,
    Socks,
    Imap,
    Ldap,
    AppleTalk,
    Afp,
    Telnet,
    Ssh,
    Ftps,
    Https,
    HttpProxy,
    HttpsProxy,
    FtpProxy,
    Smb,
    Rtsp,
    RtspProxy,
    Daap,
    Eppc,
    Ipp,
    Nntps,
    Ldaps,
    TelnetS,
    Imaps,
    Ircs,
    Pop3S,
}

impl ProtocolType {
    /// Native protocol attribute value (four-character code).
    pub fn as_raw(self) -> &'static str {
        match self {
            ProtocolType::Ftp => "ftp ",
            ProtocolType::FtpAccount => "ftpa",
            ProtocolType::Http => "http",
            ProtocolType::Irc => "irc ",
            ProtocolType::Nntp => "nntp",
            ProtocolType::Pop3 => "pop3",
            ProtocolType::Smtp => "smtp",
            ProtocolType::Socks => "sox ",
            ProtocolType::Imap => "imap",
            ProtocolType::Ldap => "ldap",
            ProtocolType::AppleTalk => "atlk",
            ProtocolType::Afp => "afp ",
            ProtocolType::Telnet => "teln",
            ProtocolType::Ssh => "ssh ",
            ProtocolType::Ftps => "ftps",
            ProtocolType::Https => "htps",
            ProtocolType::HttpProxy => "htpx",
            ProtocolType::HttpsProxy => "htsx",
            ProtocolType::FtpProxy => "ftpx",
            ProtocolType::Smb => "smb ",
            ProtocolType::Rtsp => "rtsp",
            ProtocolType::RtspProxy => "rtsx",
            ProtocolType::Daap => "daap",
            ProtocolType::Eppc => "eppc",
            ProtocolType::Ipp => "ipp ",
            ProtocolType::Nntps => "ntps",
            ProtocolType::Ldaps => "ldps",
            ProtocolType::TelnetS => "tels",
            ProtocolType::Imaps => "imps",
            ProtocolType::Ircs => "ircs",
            ProtocolType::Pop3S => "pops",
        }
    }

    /// Resolve a native protocol attribute value.
    pub fn from_raw(raw: &str) -> Option<ProtocolType> {
        let protocol = match raw {
            "ftp " => ProtocolType::Ftp,
            "ftpa" => ProtocolType::FtpAccount,
            "http" => ProtocolType::Http,
            "irc " => ProtocolType::Irc,
            "nntp" => ProtocolType::Nntp,
            "pop3" => ProtocolType::Pop3,
            "smtp" => ProtocolType::Smtp,
            "sox " => ProtocolType::Socks,
            "imap" => ProtocolType::Imap,
            "ldap" => ProtocolType::Ldap,
            "atlk" => ProtocolType::AppleTalk,
            "afp " => ProtocolType::Afp,
            "teln" => ProtocolType::Telnet,
            "ssh " => ProtocolType::Ssh,
            "ftps" => ProtocolType::Ftps,
            "htps" => ProtocolType::Https,
            "htpx" => ProtocolType::HttpProxy,
            "htsx" => ProtocolType::HttpsProxy,
            "ftpx" => ProtocolType::FtpProxy,
            "smb " => ProtocolType::Smb,
            "rtsp" => ProtocolType::Rtsp,
            "rtsx" => ProtocolType::RtspProxy,
            "daap" => ProtocolType::Daap,
            "eppc" => ProtocolType::Eppc,
            "ipp " => ProtocolType::Ipp,
            "ntps" => ProtocolType::Nntps,
            "ldps" => ProtocolType::Ldaps,
            "tels" => ProtocolType::TelnetS,
            "imps" => ProtocolType::Imaps,
            "ircs" => ProtocolType::Ircs,
            "pops" => ProtocolType::Pop3S,
            _ => return None,
        };
        Some(protocol)
    }

    /// Scheme-style name used in summaries and synthesized service keys.
    pub fn description(self) -> &'static str {
        match self {
            ProtocolType::Ftp => "ftp",
            ProtocolType::FtpAccount => "ftpaccount",
            ProtocolType::Http => "http",
            ProtocolType::Irc => "irc",
            ProtocolType::Nntp => "nntp",
            ProtocolType::Pop3 => "pop3",
            ProtocolType::Smtp => "smtp",
            ProtocolType::Socks => "socks",
            ProtocolType::Imap => "imap",
            ProtocolType::Ldap => "ldap",
            ProtocolType::AppleTalk => "appletalk",
            ProtocolType::Afp => "afp",
            ProtocolType::Telnet => "telnet",
            ProtocolType::Ssh => "ssh",
            ProtocolType::Ftps => "ftps",
            ProtocolType::Https => "https",
            ProtocolType::HttpProxy => "httpproxy",
            ProtocolType::HttpsProxy => "httpsproxy",
            ProtocolType::FtpProxy => "ftpproxy",
            ProtocolType::Smb => "smb",
            ProtocolType::Rtsp => "rtsp",
            ProtocolType::RtspProxy => "rtspproxy",
            ProtocolType::Daap => "daap",
            ProtocolType::Eppc => "eppc",
            ProtocolType::Ipp => "ipp",
            ProtocolType::Nntps => "nntps",
            ProtocolType::Ldaps => "ldaps",
            ProtocolType::TelnetS => "telnets",
            ProtocolType::Imaps => "imaps",
            ProtocolType::Ircs => "ircs",
            ProtocolType::Pop3S => "pop3s",
        }
    }
}

impl fmt::Display for ProtocolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Authentication scheme of an internet-password identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationType {
    Ntlm,
    Msn,
    Dpa,
    Rpa,
    HttpBasic,
    HttpDigest,
    HtmlForm,
    Default,
}

impl AuthenticationType {
    /// Native authentication-type attribute value (four-character code).
    pub fn as_raw(self) -> &'static str {
        match self {
            AuthenticationType::Ntlm => "ntlm",
            AuthenticationType::Msn => "msna",
            AuthenticationType::Dpa => "dpaa",
            AuthenticationType::Rpa => "rpaa",
            AuthenticationType::HttpBasic => "http",
            AuthenticationType::HttpDigest => "httd",
            AuthenticationType::HtmlForm => "form",
            AuthenticationType::Default => "dflt",
        }
    }

    /// Resolve a native authentication-type attribute value.
    pub fn from_raw(raw: &str) -> Option<AuthenticationType> {
        let authentication_type = match raw {
            "ntlm" => AuthenticationType::Ntlm,
            "msna" => AuthenticationType::Msn,
            "dpaa" => AuthenticationType::Dpa,
            "rpaa" => AuthenticationType::Rpa,
            "http" => AuthenticationType::HttpBasic,
            "httd" => AuthenticationType::HttpDigest,
            "form" => AuthenticationType::HtmlForm,
            "dflt" => AuthenticationType::Default,
            _ => return None,
        };
        Some(authentication_type)
    }

    /// Name used in summaries.
    pub fn description(self) -> &'static str {
        match self {
            AuthenticationType::Ntlm => "ntlm",
            AuthenticationType::Msn => "msn",
            AuthenticationType::Dpa => "dpa",
            AuthenticationType::Rpa => "rpa",
            AuthenticationType::HttpBasic => "httpbasic",
            AuthenticationType::HttpDigest => "httpdigest",
            AuthenticationType::HtmlForm => "htmlform",
            AuthenticationType::Default => "default",
        }
    }
}

impl Default for AuthenticationType {
    fn default() -> Self {
        AuthenticationType::Default
    }
}

impl fmt::Display for AuthenticationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Role of a cryptographic key item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyClass {
    Public,
    Private,
    Symmetric,
}

impl KeyClass {
    /// Native key-class attribute value.
    pub fn as_raw(self) -> &'static str {
        match self {
            KeyClass::Public => "0",
            KeyClass::Private => "1",
            KeyClass::Symmetric => "2",
        }
    }

    /// Resolve a native key-class attribute value.
    pub fn from_raw(raw: &str) -> Option<KeyClass> {
        match raw {
            "0" => Some(KeyClass::Public),
            "1" => Some(KeyClass::Private),
            "2" => Some(KeyClass::Symmetric),
            _ => None,
        }
    }
}

impl fmt::Display for KeyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyClass::Public => "Public",
            KeyClass::Private => "Private",
            KeyClass::Symmetric => "Symmetric",
        };
        f.write_str(name)
    }
}

/// Algorithm of a cryptographic key item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyType {
    Rsa,
    Dsa,
    Aes,
    Des,
    TripleDes,
    Rc4,
    Rc2,
    Cast,
    /// Elliptic-curve keys. The native table aliases the legacy ECDSA
    /// constant to the same value; [`KeyType::from_raw`] resolves it here.
    Ec,
    Ecdsa,
}

impl KeyType {
    /// Native key-type attribute value (legacy algorithm identifier).
    pub fn as_raw(self) -> &'static str {
        match self {
            KeyType::Rsa => "42",
            KeyType::Dsa => "43",
            KeyType::Aes => "2147483649",
            KeyType::Des => "14",
            KeyType::TripleDes => "17",
            KeyType::Rc4 => "25",
            KeyType::Rc2 => "23",
            KeyType::Cast => "27",
            KeyType::Ec | KeyType::Ecdsa => "73",
        }
    }

    /// Resolve a native key-type attribute value.
    pub fn from_raw(raw: &str) -> Option<KeyType> {
        match raw {
            "42" => Some(KeyType::Rsa),
            "43" => Some(KeyType::Dsa),
            "2147483649" => Some(KeyType::Aes),
            "14" => Some(KeyType::Des),
            "17" => Some(KeyType::TripleDes),
            "25" => Some(KeyType::Rc4),
            "23" => Some(KeyType::Rc2),
            "27" => Some(KeyType::Cast),
            "73" => Some(KeyType::Ec),
            _ => None,
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyType::Rsa => "RSA",
            KeyType::Dsa => "DSA",
            KeyType::Aes => "AES",
            KeyType::Des => "DES",
            KeyType::TripleDes => "3DES",
            KeyType::Rc4 => "RC4",
            KeyType::Rc2 => "RC2",
            KeyType::Cast => "CAST",
            KeyType::Ec => "EC",
            KeyType::Ecdsa => "ECDSA",
        };
        f.write_str(name)
    }
}

/// Opaque, storage-stable handle to an item.
///
/// Persistent references survive process restarts and identify the item
/// to the store that issued them; the bytes carry no meaning to callers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersistentRef(Vec<u8>);

impl PersistentRef {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_class_raw_round_trip() {
        for class in [
            ItemClass::GenericPassword,
            ItemClass::InternetPassword,
            ItemClass::Certificate,
            ItemClass::Key,
            ItemClass::Identity,
        ] {
            assert_eq!(ItemClass::from_raw(class.as_raw()), Some(class));
        }
        assert_eq!(ItemClass::from_raw("nope"), None);
    }

    #[test]
    fn password_classes() {
        assert!(ItemClass::GenericPassword.is_password());
        assert!(ItemClass::InternetPassword.is_password());
        assert!(!ItemClass::Certificate.is_password());
        assert!(!ItemClass::Key.is_password());
        assert!(!ItemClass::Identity.is_password());
    }

    #[test]
    fn accessibility_raw_round_trip() {
        for accessibility in [
            Accessibility::WhenUnlocked,
            Accessibility::AfterFirstUnlock,
            Accessibility::Always,
            Accessibility::WhenPasscodeSetThisDeviceOnly,
            Accessibility::WhenUnlockedThisDeviceOnly,
            Accessibility::AfterFirstUnlockThisDeviceOnly,
            Accessibility::AlwaysThisDeviceOnly,
        ] {
            assert_eq!(
                Accessibility::from_raw(accessibility.as_raw()),
                Some(accessibility)
            );
        }
    }

    #[test]
    fn protocol_raw_values_are_four_characters() {
        for protocol in [
            ProtocolType::Ftp,
            ProtocolType::Https,
            ProtocolType::Ssh,
            ProtocolType::Smb,
            ProtocolType::Pop3S,
        ] {
            assert_eq!(protocol.as_raw().len(), 4);
            assert_eq!(ProtocolType::from_raw(protocol.as_raw()), Some(protocol));
        }
    }

    #[test]
    fn ec_aliases_legacy_ecdsa() {
        assert_eq!(KeyType::Ecdsa.as_raw(), KeyType::Ec.as_raw());
        assert_eq!(KeyType::from_raw("73"), Some(KeyType::Ec));
    }
}
