//! Error types for tpmstore operations.

use thiserror::Error;

/// Result type alias using [`TpmStoreError`].
pub type Result<T> = std::result::Result<T, TpmStoreError>;

/// Errors that terminate a lookup.
///
/// Every variant displays as its bare message so callers can surface it to
/// the user verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TpmStoreError {
    /// Malformed or insufficient caller input.
    #[error("{0}")]
    Validation(String),

    /// No entry matched and nothing was to be created.
    #[error("{0}")]
    NotFound(String),

    /// More than one entry matched the search.
    #[error("{0}")]
    AmbiguousMatch(String),

    /// The remote service or its client failed.
    #[error("{0}")]
    Remote(String),
}

/// Class of a [`TpmStoreError`], for callers that branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`TpmStoreError::Validation`].
    Validation,
    /// See [`TpmStoreError::NotFound`].
    NotFound,
    /// See [`TpmStoreError::AmbiguousMatch`].
    AmbiguousMatch,
    /// See [`TpmStoreError::Remote`].
    Remote,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::NotFound => write!(f, "not found"),
            Self::AmbiguousMatch => write!(f, "ambiguous match"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

impl TpmStoreError {
    /// Returns the class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::AmbiguousMatch(_) => ErrorKind::AmbiguousMatch,
            Self::Remote(_) => ErrorKind::Remote,
        }
    }

    /// Returns the message carried by this error.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(m) | Self::NotFound(m) | Self::AmbiguousMatch(m) | Self::Remote(m) => m,
        }
    }
}

/// Errors raised by a remote client implementation.
///
/// The lookup layer reclassifies these: [`ClientError::Config`] becomes a
/// [`TpmStoreError::Validation`] naming the URL, everything else becomes
/// [`TpmStoreError::Remote`] with the message unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The client could not be configured (malformed API URL).
    #[error("{0}")]
    Config(String),

    /// The service could not be reached.
    #[error("{0}")]
    Connection(String),

    /// The service rejected the request.
    #[error("{0}")]
    Api(String),

    /// The service answered with a body that could not be decoded.
    #[error("{0}")]
    Decode(String),
}

impl From<ClientError> for TpmStoreError {
    fn from(err: ClientError) -> Self {
        TpmStoreError::Remote(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(format!("Invalid JSON from TeamPasswordManager API: {}", err))
    }
}
