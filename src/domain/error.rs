//! # Domain Errors
//!
//! Error types shared between the application and infrastructure layers.

use std::path::PathBuf;
use thiserror::Error;

/// Failures talking to the social platform.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The platform answered, but rejected the request (duplicate, rate limit, auth...).
    #[error("platform error (HTTP {status}): {message}")]
    Platform {
        status: u16,
        code: Option<i64>,
        message: String,
    },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("could not decode platform response: {0}")]
    Decode(String),
    #[error("no credentials configured")]
    MissingCredentials,
}

impl ApiError {
    /// Platform-specific error code, when the platform reported one.
    pub fn platform_code(&self) -> Option<i64> {
        match self {
            ApiError::Platform { code, .. } => *code,
            _ => None,
        }
    }
}

/// Failures of the watermark store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} bucket not found")]
    UnknownBucket(String),
    #[error("store file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("store file {path:?} is not valid: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors that abort a bot cycle.
#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
