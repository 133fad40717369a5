//! Status codes returned by the item-store protocol.
//!
//! Every call into an [`ItemStore`](crate::store::ItemStore) terminates in
//! one of these codes. The facade treats a small subset specially
//! (`ItemNotFound` means absent on reads and deletes,
//! `InteractionNotAllowed` is an existence-but-blocked signal) and
//! surfaces everything else as a hard error with its numeric code and
//! description attached.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of a single item-store call.
///
/// Codes and descriptions mirror the native security subsystem's status
/// table. Codes unknown to this table collapse to [`Status::UnexpectedError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum Status {
    #[error("No error.")]
    Success,

    #[error("Function or operation not implemented.")]
    Unimplemented,

    #[error("The disk is full.")]
    DiskFull,

    #[error("I/O error (bummers).")]
    Io,

    #[error("File already open with write permission.")]
    OpWr,

    #[error("One or more parameters passed to a function were not valid.")]
    Param,

    #[error("Write permissions error.")]
    WrPerm,

    #[error("Failed to allocate memory.")]
    Allocate,

    #[error("User canceled the operation.")]
    UserCanceled,

    #[error("Bad parameter or invalid state for operation.")]
    BadReq,

    #[error("An internal component failed.")]
    InternalComponent,

    #[error("No keychain is available. You may need to restart your computer.")]
    NotAvailable,

    #[error("This keychain cannot be modified.")]
    ReadOnly,

    #[error("The user name or passphrase you entered is not correct.")]
    AuthFailed,

    #[error("The specified keychain could not be found.")]
    NoSuchKeychain,

    #[error("The specified keychain is not a valid keychain file.")]
    InvalidKeychain,

    #[error("A keychain with the same name already exists.")]
    DuplicateKeychain,

    #[error("The specified callback function is already installed.")]
    DuplicateCallback,

    #[error("The specified callback function is not valid.")]
    InvalidCallback,

    #[error("The specified item already exists in the keychain.")]
    DuplicateItem,

    #[error("The specified item could not be found in the keychain.")]
    ItemNotFound,

    #[error("There is not enough memory available to use the specified item.")]
    BufferTooSmall,

    #[error("This item contains information which is too large or in a format that cannot be displayed.")]
    DataTooLarge,

    #[error("The specified attribute does not exist.")]
    NoSuchAttr,

    #[error("The specified item is no longer valid. It may have been deleted from the keychain.")]
    InvalidItemRef,

    #[error("Unable to search the current keychain.")]
    InvalidSearchRef,

    #[error("The specified item does not appear to be a valid keychain item.")]
    NoSuchClass,

    #[error("A default keychain could not be found.")]
    NoDefaultKeychain,

    #[error("User interaction is not allowed.")]
    InteractionNotAllowed,

    #[error("The specified attribute could not be modified.")]
    ReadOnlyAttr,

    #[error("This keychain was created by a different version of the system software and cannot be opened.")]
    WrongSecVersion,

    #[error("This item specifies a key size which is too large.")]
    KeySizeNotAllowed,

    #[error("A required component (data storage module) could not be loaded.")]
    NoStorageModule,

    #[error("A required component (certificate module) could not be loaded.")]
    NoCertificateModule,

    #[error("A required component (policy module) could not be loaded.")]
    NoPolicyModule,

    #[error("User interaction is required, but is currently not allowed.")]
    InteractionRequired,

    #[error("The contents of this item cannot be retrieved.")]
    DataNotAvailable,

    #[error("The contents of this item cannot be modified.")]
    DataNotModifiable,

    #[error("One or more certificates required to validate this certificate cannot be found.")]
    CreateChainFailed,

    #[error("The specified access control list is not in standard (simple) form.")]
    AclNotSimple,

    #[error("The specified policy cannot be found.")]
    PolicyNotFound,

    #[error("Unable to decode the provided data.")]
    Decode,

    #[error("A required entitlement is not present.")]
    MissingEntitlement,

    #[error("A conversion error has occurred.")]
    ConversionError,

    #[error("Unexpected error has occurred.")]
    UnexpectedError,
}

impl Status {
    /// Numeric status code as reported by the native subsystem.
    pub fn code(self) -> i32 {
        match self {
            Status::Success => 0,
            Status::Unimplemented => -4,
            Status::DiskFull => -34,
            Status::Io => -36,
            Status::OpWr => -49,
            Status::Param => -50,
            Status::WrPerm => -61,
            Status::Allocate => -108,
            Status::UserCanceled => -128,
            Status::BadReq => -909,
            Status::InternalComponent => -2070,
            Status::NotAvailable => -25291,
            Status::ReadOnly => -25292,
            Status::AuthFailed => -25293,
            Status::NoSuchKeychain => -25294,
            Status::InvalidKeychain => -25295,
            Status::DuplicateKeychain => -25296,
            Status::DuplicateCallback => -25297,
            Status::InvalidCallback => -25298,
            Status::DuplicateItem => -25299,
            Status::ItemNotFound => -25300,
            Status::BufferTooSmall => -25301,
            Status::DataTooLarge => -25302,
            Status::NoSuchAttr => -25303,
            Status::InvalidItemRef => -25304,
            Status::InvalidSearchRef => -25305,
            Status::NoSuchClass => -25306,
            Status::NoDefaultKeychain => -25307,
            Status::InteractionNotAllowed => -25308,
            Status::ReadOnlyAttr => -25309,
            Status::WrongSecVersion => -25310,
            Status::KeySizeNotAllowed => -25311,
            Status::NoStorageModule => -25312,
            Status::NoCertificateModule => -25313,
            Status::NoPolicyModule => -25314,
            Status::InteractionRequired => -25315,
            Status::DataNotAvailable => -25316,
            Status::DataNotModifiable => -25317,
            Status::CreateChainFailed => -25318,
            Status::AclNotSimple => -25240,
            Status::PolicyNotFound => -25241,
            Status::Decode => -26275,
            Status::MissingEntitlement => -34018,
            Status::ConversionError => -67594,
            Status::UnexpectedError => -99999,
        }
    }

    /// Resolve a numeric status code.
    ///
    /// Codes outside the table collapse to [`Status::UnexpectedError`];
    /// callers still learn "some hard failure", which is all the facade
    /// promises for unrecognized codes.
    pub fn from_code(code: i32) -> Status {
        match code {
            0 => Status::Success,
            -4 => Status::Unimplemented,
            -34 => Status::DiskFull,
            -36 => Status::Io,
            -49 => Status::OpWr,
            -50 => Status::Param,
            -61 => Status::WrPerm,
            -108 => Status::Allocate,
            -128 => Status::UserCanceled,
            -909 => Status::BadReq,
            -2070 => Status::InternalComponent,
            -25291 => Status::NotAvailable,
            -25292 => Status::ReadOnly,
            -25293 => Status::AuthFailed,
            -25294 => Status::NoSuchKeychain,
            -25295 => Status::InvalidKeychain,
            -25296 => Status::DuplicateKeychain,
            -25297 => Status::DuplicateCallback,
            -25298 => Status::InvalidCallback,
            -25299 => Status::DuplicateItem,
            -25300 => Status::ItemNotFound,
            -25301 => Status::BufferTooSmall,
            -25302 => Status::DataTooLarge,
            -25303 => Status::NoSuchAttr,
            -25304 => Status::InvalidItemRef,
            -25305 => Status::InvalidSearchRef,
            -25306 => Status::NoSuchClass,
            -25307 => Status::NoDefaultKeychain,
            -25308 => Status::InteractionNotAllowed,
            -25309 => Status::ReadOnlyAttr,
            -25310 => Status::WrongSecVersion,
            -25311 => Status::KeySizeNotAllowed,
            -25312 => Status::NoStorageModule,
            -25313 => Status::NoCertificateModule,
            -25314 => Status::NoPolicyModule,
            -25315 => Status::InteractionRequired,
            -25316 => Status::DataNotAvailable,
            -25317 => Status::DataNotModifiable,
            -25318 => Status::CreateChainFailed,
            -25240 => Status::AclNotSimple,
            -25241 => Status::PolicyNotFound,
            -26275 => Status::Decode,
            -34018 => Status::MissingEntitlement,
            -67594 => Status::ConversionError,
            _ => Status::UnexpectedError,
        }
    }

    /// Whether this status reports success.
    pub fn is_success(self) -> bool {
        self == Status::Success
    }
}
