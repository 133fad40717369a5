//! Domain error type and status-to-error mapping.

use thiserror::Error;

use crate::status::Status;

/// Error surfaced by keychain operations.
///
/// Item absence is not an error: reads return `Ok(None)` and deletes
/// succeed when nothing matched. Everything here reports a real failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The request shape is not valid for the configured item class,
    /// e.g. an account key supplied to a certificate configuration, or a
    /// persistent write against a password class.
    #[error("invalid request: {message}")]
    BadRequest { message: String },

    /// Stored bytes were not valid UTF-8 when text was requested.
    #[error("stored value is not valid UTF-8 text")]
    Conversion,

    /// The store reported success without a usable payload.
    #[error("store returned success without a usable result")]
    Unexpected,

    /// The user dismissed an authentication prompt. Surfaced to the
    /// caller, kept out of the diagnostic log.
    #[error("operation canceled by the user")]
    UserCanceled,

    /// Any other non-success store status, with its code and description.
    #[error("{0}")]
    Platform(Status),
}

impl Error {
    pub(crate) fn bad_request(message: impl Into<String>) -> Error {
        Error::BadRequest {
            message: message.into(),
        }
    }

    /// The numeric status code behind this error, where one exists.
    pub fn status(&self) -> Option<Status> {
        match self {
            Error::Platform(status) => Some(*status),
            Error::UserCanceled => Some(Status::UserCanceled),
            Error::Conversion => Some(Status::ConversionError),
            Error::Unexpected => Some(Status::UnexpectedError),
            Error::BadRequest { .. } => None,
        }
    }
}

/// Map a non-success store status to a domain error.
///
/// Every status except user-cancel is logged with its code and
/// description before being surfaced; a canceled prompt is an expected
/// outcome and stays out of the log.
pub(crate) fn security_error(status: Status) -> Error {
    match status {
        Status::UserCanceled => Error::UserCanceled,
        status => {
            tracing::error!(code = status.code(), "keychain operation failed: {status}");
            Error::Platform(status)
        }
    }
}
