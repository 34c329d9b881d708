//! Error taxonomy for provisioning.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving, fetching or materializing artifacts.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Transport-level failure (DNS, connection refused, timeout).
    #[error("Network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// The remote answered with a non-2xx status.
    #[error("HTTP {status} {reason} from {url}")]
    Remote {
        url: String,
        status: u16,
        reason: String,
    },

    /// The body could not be decoded into the expected shape.
    #[error("Invalid response from {url}: {message}")]
    InvalidResponse { url: String, message: String },

    /// Local filesystem failure.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A referenced template or required field is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A downloaded artifact does not hash to the digest the source reported.
    #[error("Digest mismatch for {}: expected {expected}, got {actual}", path.display())]
    IntegrityMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}

impl ProvisionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// HTTP status carried by a [`ProvisionError::Remote`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure came from talking to a remote source.
    pub fn is_remote_side(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Remote { .. } | Self::InvalidResponse { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
