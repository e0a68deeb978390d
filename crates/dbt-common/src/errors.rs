use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Error codes attached to file, serialization and configuration failures.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, Serialize, Deserialize,
)]
pub enum ErrorCode {
    InvalidConfig,
    SerializationError,
    RemoteError,
}

impl ErrorCode {
    /// Stable numeric code, printed in front of messages as `dbt0NNN`.
    pub const fn code(&self) -> u16 {
        match self {
            ErrorCode::InvalidConfig => 10,
            ErrorCode::SerializationError => 12,
            ErrorCode::RemoteError => 30,
        }
    }
}

/// An error raised while reading or interpreting project files and profiles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("dbt{:04}: {}", .code.code(), .context)]
pub struct FsError {
    pub code: ErrorCode,
    pub context: String,
}

pub type FsResult<T, E = Box<FsError>> = Result<T, E>;

impl FsError {
    pub fn new(code: ErrorCode, context: impl Into<String>) -> Self {
        Self {
            code,
            context: context.into(),
        }
    }
}

impl From<serde_yaml::Error> for Box<FsError> {
    fn from(err: serde_yaml::Error) -> Self {
        Box::new(FsError::new(
            ErrorCode::SerializationError,
            format!("Failed to parse YAML: {err}"),
        ))
    }
}

/// Classification of adapter failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum AdapterErrorKind {
    /// The user-supplied configuration (profile, relation policy) is invalid
    Configuration,
    /// The remote backend rejected or failed to run a statement
    Driver,
    /// A failure surfaced to the user with model context attached
    Runtime,
    /// Credentials were rejected
    Authentication,
    /// The backend answered with something we could not interpret
    UnexpectedResult,
    NotSupported,
    Internal,
}

/// Error type returned across the adapter boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} error: {message}")]
pub struct AdapterError {
    kind: AdapterErrorKind,
    message: String,
}

pub type AdapterResult<T> = Result<T, AdapterError>;

impl AdapterError {
    pub fn new(kind: AdapterErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> AdapterErrorKind {
        self.kind
    }

    /// The message without the kind prefix.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<Box<FsError>> for AdapterError {
    fn from(err: Box<FsError>) -> Self {
        AdapterError::new(AdapterErrorKind::Configuration, err.to_string())
    }
}
