//! Storage collaborator: durably stores an encoded buffer under a name.

use std::borrow::Cow;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::Engine;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// How the payload handed to [`Storage::write`] is encoded.
///
/// Storage always holds the decoded bytes, so the stored file is a playable
/// WAV whichever encoding the caller used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageEncoding {
    /// Raw bytes.
    #[default]
    Binary,
    /// Standard base64 text, decoded before it is stored.
    Base64,
}

impl StorageEncoding {
    /// Encodes raw bytes into a payload of this encoding.
    pub fn encode(self, bytes: &[u8]) -> Vec<u8> {
        match self {
            StorageEncoding::Binary => bytes.to_vec(),
            StorageEncoding::Base64 => base64::engine::general_purpose::STANDARD
                .encode(bytes)
                .into_bytes(),
        }
    }
}

/// Options for [`Storage::write`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Encoding of the payload being written.
    pub encoding: StorageEncoding,
}

/// Reference to a stored payload, returned by [`Storage::write`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredAudio {
    /// Name the payload was stored under.
    pub name: String,
    /// Location of the payload (`file://` or `memory://`).
    pub uri: String,
    /// Length of the stored (decoded) bytes.
    pub len: usize,
}

/// Durable byte storage.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Decodes `payload` per `options.encoding` and stores the bytes under
    /// `name`, replacing anything stored there before.
    async fn write(
        &self,
        payload: &[u8],
        name: &str,
        options: WriteOptions,
    ) -> Result<StoredAudio, StorageError>;

    /// Reads the stored bytes back.
    async fn read_back(&self, stored: &StoredAudio) -> Result<Vec<u8>, StorageError>;
}

/// Rejects names that are empty or would escape the storage root.
pub fn validate_name(name: &str) -> Result<(), StorageError> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if Path::new(name).file_name().and_then(|n| n.to_str()) != Some(name) {
        Some("name must be a plain file name")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(StorageError::InvalidName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

fn decode_payload<'a>(
    payload: &'a [u8],
    name: &str,
    encoding: StorageEncoding,
) -> Result<Cow<'a, [u8]>, StorageError> {
    match encoding {
        StorageEncoding::Binary => Ok(Cow::Borrowed(payload)),
        StorageEncoding::Base64 => base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map(Cow::Owned)
            .map_err(|e| StorageError::Decode {
                name: name.to_string(),
                message: e.to_string(),
            }),
    }
}

/// Filesystem storage rooted at a directory.
///
/// Writes go to a temporary sibling file that is renamed into place, so a
/// failed write never leaves a truncated payload under the final name.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Creates storage rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a name is stored at.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

#[async_trait]
impl Storage for FsStorage {
    async fn write(
        &self,
        payload: &[u8],
        name: &str,
        options: WriteOptions,
    ) -> Result<StoredAudio, StorageError> {
        validate_name(name)?;
        let bytes = decode_payload(payload, name, options.encoding)?;

        let path = self.path_for(name);
        let tmp_path = self.root.join(format!(".{}.tmp", name));
        let write_err = |source: io::Error| StorageError::Write {
            path: path.clone(),
            source,
        };

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(write_err)?;
        if let Err(e) = tokio::fs::write(&tmp_path, &bytes).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(write_err(e));
        }
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(write_err)?;

        tracing::debug!(
            path = %path.display(),
            bytes = bytes.len(),
            encoding = ?options.encoding,
            "stored audio"
        );

        let absolute = std::path::absolute(&path).unwrap_or_else(|_| path.clone());
        Ok(StoredAudio {
            name: name.to_string(),
            uri: format!("file://{}", absolute.display()),
            len: bytes.len(),
        })
    }

    async fn read_back(&self, stored: &StoredAudio) -> Result<Vec<u8>, StorageError> {
        validate_name(&stored.name)?;
        let path = self.path_for(&stored.name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StorageError::NotFound {
                name: stored.name.clone(),
            }),
            Err(source) => Err(StorageError::Read { path, source }),
        }
    }
}

/// In-memory storage, useful for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    /// Creates empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes stored under `name`.
    pub fn raw(&self, name: &str) -> Option<Vec<u8>> {
        self.entries.lock().get(name).cloned()
    }

    /// Number of stored payloads.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn write(
        &self,
        payload: &[u8],
        name: &str,
        options: WriteOptions,
    ) -> Result<StoredAudio, StorageError> {
        validate_name(name)?;
        let bytes = decode_payload(payload, name, options.encoding)?.into_owned();
        let len = bytes.len();
        self.entries.lock().insert(name.to_string(), bytes);

        Ok(StoredAudio {
            name: name.to_string(),
            uri: format!("memory://{}", name),
            len,
        })
    }

    async fn read_back(&self, stored: &StoredAudio) -> Result<Vec<u8>, StorageError> {
        self.raw(&stored.name).ok_or_else(|| StorageError::NotFound {
            name: stored.name.clone(),
        })
    }
}
