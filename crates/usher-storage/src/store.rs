// Copyright 2026 The Usher Authors
// SPDX-License-Identifier: Apache-2.0

//! File-backed blob storage.

use std::path::PathBuf;
use std::time::UNIX_EPOCH;

use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::debug;
use usher_core::{ObjectKey, Result};
use uuid::Uuid;

/// Metadata for one stored blob.
#[derive(Debug, Clone)]
pub struct BlobInfo {
    /// Filesystem path of the blob.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Last-modified time as unix seconds.
    pub mtime: u64,
}

/// File-backed blob store.
///
/// Objects live at `{data_dir}/{host}/{account}/{bucket}/{object}`. Writes
/// land in a temp file first and are renamed into place, so readers never
/// observe a partially written object.
#[derive(Debug)]
pub struct BlobStore {
    data_dir: PathBuf,
    temp_dir: PathBuf,
}

impl BlobStore {
    /// Opens a blob store, creating the data and temp directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories cannot be created.
    pub async fn open(data_dir: PathBuf, temp_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&data_dir).await?;
        fs::create_dir_all(&temp_dir).await?;
        Ok(Self { data_dir, temp_dir })
    }

    /// Reduces a host name to a safe directory label. `host:port` survives
    /// unchanged; anything that could alter the path does not.
    fn host_label(host: &str) -> String {
        host.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | ':' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    fn object_path(&self, host: &str, key: &ObjectKey) -> PathBuf {
        self.data_dir
            .join(Self::host_label(host))
            .join(&key.account)
            .join(&key.bucket)
            .join(&key.object)
    }

    fn temp_path(&self) -> PathBuf {
        self.temp_dir.join(format!("{}.tmp", Uuid::new_v4()))
    }

    /// Stores an object and returns the SHA-256 checksum of its content.
    ///
    /// # Errors
    ///
    /// Returns an error if the temp file, directory structure or final
    /// rename fails.
    pub async fn put(&self, host: &str, key: &ObjectKey, data: &[u8]) -> Result<String> {
        let temp = self.temp_path();
        fs::write(&temp, data).await?;

        let target = self.object_path(host, key);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::rename(&temp, &target).await?;

        let checksum = content_checksum(data);
        debug!(host = %host, key = %key, size = data.len(), "Stored object");
        Ok(checksum)
    }

    /// Reads an object's bytes, or `None` if it is not stored here.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failures other than the file being absent.
    pub async fn get(&self, host: &str, key: &ObjectKey) -> Result<Option<Vec<u8>>> {
        match fs::read(self.object_path(host, key)).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Stats an object, or `None` if it is not stored here.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failures other than the file being absent.
    pub async fn stat(&self, host: &str, key: &ObjectKey) -> Result<Option<BlobInfo>> {
        let path = self.object_path(host, key);
        match fs::metadata(&path).await {
            Ok(meta) => {
                let mtime = meta
                    .modified()
                    .ok()
                    .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                    .map_or(0, |d| d.as_secs());
                Ok(Some(BlobInfo { path, size: meta.len(), mtime }))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// SHA-256 checksum of a blob's content, as lowercase hex.
#[must_use]
pub fn content_checksum(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
