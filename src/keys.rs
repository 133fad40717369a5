//! Native key table for the platform item-store protocol.
//!
//! The store protocol is dictionary-shaped on the wire: requests and
//! returned attribute bags are keyed by short, fixed constant names. This
//! module is the single mapping table between the typed request records in
//! [`crate::query`] and that native key set. Backends key every attribute
//! bag they return with these constants, and the read-side projection in
//! [`crate::attributes`] resolves them back to typed accessors.

/// Item class selector.
pub const CLASS: &str = "class";

/// Class selector values.
pub const CLASS_GENERIC_PASSWORD: &str = "genp";
pub const CLASS_INTERNET_PASSWORD: &str = "inet";
pub const CLASS_CERTIFICATE: &str = "cert";
pub const CLASS_KEY: &str = "keys";
pub const CLASS_IDENTITY: &str = "idnt";

/// General attribute keys.
pub const ATTR_ACCESS_CONTROL: &str = "accc";
pub const ATTR_ACCESSIBLE: &str = "pdmn";
pub const ATTR_ACCESS_GROUP: &str = "agrp";
pub const ATTR_SYNCHRONIZABLE: &str = "sync";
pub const ATTR_CREATION_DATE: &str = "cdat";
pub const ATTR_MODIFICATION_DATE: &str = "mdat";
pub const ATTR_DESCRIPTION: &str = "desc";
pub const ATTR_COMMENT: &str = "icmt";
pub const ATTR_CREATOR: &str = "crtr";
pub const ATTR_TYPE: &str = "type";
pub const ATTR_LABEL: &str = "labl";
pub const ATTR_IS_INVISIBLE: &str = "invi";
pub const ATTR_IS_NEGATIVE: &str = "nega";

/// Password attribute keys.
pub const ATTR_ACCOUNT: &str = "acct";
pub const ATTR_SERVICE: &str = "svce";
pub const ATTR_GENERIC: &str = "gena";
pub const ATTR_SECURITY_DOMAIN: &str = "sdmn";
pub const ATTR_SERVER: &str = "srvr";
pub const ATTR_PROTOCOL: &str = "ptcl";
pub const ATTR_AUTHENTICATION_TYPE: &str = "atyp";
pub const ATTR_PORT: &str = "port";
pub const ATTR_PATH: &str = "path";

/// Certificate attribute keys.
pub const ATTR_SUBJECT: &str = "subj";
pub const ATTR_ISSUER: &str = "issr";
pub const ATTR_SERIAL_NUMBER: &str = "slnr";
pub const ATTR_SUBJECT_KEY_ID: &str = "skid";
pub const ATTR_PUBLIC_KEY_HASH: &str = "pkhh";
pub const ATTR_CERTIFICATE_TYPE: &str = "ctyp";
pub const ATTR_CERTIFICATE_ENCODING: &str = "cenc";

/// Cryptographic key attribute keys. The key-type attribute shares its
/// native name with the generic type attribute; the item class decides
/// which reading applies.
pub const ATTR_KEY_CLASS: &str = "kcls";
pub const ATTR_APPLICATION_LABEL: &str = "klbl";
pub const ATTR_APPLICATION_TAG: &str = "atag";
pub const ATTR_KEY_TYPE: &str = "type";
pub const ATTR_KEY_SIZE_IN_BITS: &str = "bsiz";
pub const ATTR_EFFECTIVE_KEY_SIZE: &str = "esiz";
pub const ATTR_TOKEN_ID: &str = "tkid";

/// Cryptographic key usage attribute keys.
pub const ATTR_IS_PERMANENT: &str = "perm";
pub const ATTR_IS_SENSITIVE: &str = "sens";
pub const ATTR_IS_EXTRACTABLE: &str = "extr";

/// Search keys.
pub const MATCH_LIMIT: &str = "m_Limit";
pub const MATCH_LIMIT_ONE: &str = "m_LimitOne";
pub const MATCH_LIMIT_ALL: &str = "m_LimitAll";
pub const SYNCHRONIZABLE_ANY: &str = "syna";

/// Return-type keys.
pub const RETURN_DATA: &str = "r_Data";
pub const RETURN_ATTRIBUTES: &str = "r_Attributes";
pub const RETURN_REF: &str = "r_Ref";
pub const RETURN_PERSISTENT_REF: &str = "r_PersistentRef";

/// Value-type keys.
pub const VALUE_DATA: &str = "v_Data";
pub const VALUE_REF: &str = "v_Ref";
pub const VALUE_PERSISTENT_REF: &str = "v_PersistentRef";

/// Call modifier keys.
pub const USE_AUTHENTICATION_UI: &str = "u_AuthUI";
pub const USE_AUTHENTICATION_UI_SKIP: &str = "u_AuthUISkip";
pub const USE_AUTHENTICATION_CONTEXT: &str = "u_AuthCtx";
pub const USE_DATA_PROTECTION: &str = "nleg";

/// Shared web-credential key.
pub const SHARED_PASSWORD: &str = "spwd";
