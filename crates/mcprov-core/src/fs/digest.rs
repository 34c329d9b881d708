//! Content digests for idempotent downloads
//!
//! Build indexes report SHA-256 for their artifacts, so local files are
//! hashed with the same algorithm before deciding whether to re-fetch.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::{ProvisionError, Result};

/// Compute the lower-case hex SHA-256 of a file's contents.
///
/// # Example
/// ```no_run
/// use mcprov_core::fs::sha256_file;
/// use std::path::Path;
///
/// let hash = sha256_file(Path::new("/srv/lobby/paper.jar"))?;
/// assert_eq!(hash.len(), 64);
/// # Ok::<(), mcprov_core::ProvisionError>(())
/// ```
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| ProvisionError::io(path, e))?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 64 * 1024];
    loop {
        let read = file
            .read(&mut buffer)
            .map_err(|e| ProvisionError::io(path, e))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Lower-case hex SHA-256 of an in-memory buffer.
pub fn sha256_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Snapshot of an artifact already on disk, taken for the idempotence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalArtifactState {
    pub path: PathBuf,
    /// `None` when the file does not exist.
    pub digest: Option<String>,
}

impl LocalArtifactState {
    pub fn inspect(path: &Path) -> Result<Self> {
        let digest = if path.is_file() {
            Some(sha256_file(path)?)
        } else {
            None
        };
        Ok(Self {
            path: path.to_path_buf(),
            digest,
        })
    }

    /// Whether the local copy already matches `expected`.
    pub fn matches(&self, expected: &str) -> bool {
        self.digest
            .as_deref()
            .is_some_and(|d| d.eq_ignore_ascii_case(expected))
    }
}
