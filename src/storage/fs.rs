// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON document storage on the local filesystem.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{de::DeserializeOwned, Serialize};

use super::StoragePaths;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),
    /// Identifier cannot be used as a file name
    #[error("Invalid identifier: {0}")]
    InvalidId(String),
    /// Storage not initialized
    #[error("Storage not initialized")]
    NotInitialized,
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

static SCRATCH_SEQ: AtomicU64 = AtomicU64::new(0);

/// Sibling of `path` unique to this call, tagged with the process id.
/// Ends in `.tmp`.
fn scratch_path(path: &Path) -> PathBuf {
    let seq = SCRATCH_SEQ.fetch_add(1, Ordering::Relaxed);
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(format!(".{}.{seq}.tmp", std::process::id()));
    path.with_file_name(name)
}

/// Filesystem-backed document storage.
#[derive(Debug, Clone)]
pub struct FileStorage {
    paths: StoragePaths,
    initialized: bool,
}

impl FileStorage {
    /// Does NOT create the directory structure. Call `initialize()` first.
    pub fn new(paths: StoragePaths) -> Self {
        Self {
            paths,
            initialized: false,
        }
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Create the directory structure. Idempotent.
    pub fn initialize(&mut self) -> StorageResult<()> {
        fs::create_dir_all(self.paths.members_dir())?;
        self.initialized = true;
        Ok(())
    }

    /// Write-read-delete probe under the storage root.
    pub fn health_check(&self) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let probe = scratch_path(&self.paths.root().join(".health_check"));
        let data = b"health_check_data";

        fs::write(&probe, data)?;
        let read_back = fs::read(&probe);
        fs::remove_file(&probe)?;
        let read_back = read_back?;

        if read_back != data {
            return Err(StorageError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                "health check data mismatch",
            )));
        }

        Ok(())
    }

    /// Read a JSON file and deserialize it.
    pub fn read_json<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> StorageResult<T> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound(path.display().to_string()),
            _ => StorageError::Io(e),
        })?;
        let value = serde_json::from_reader(BufReader::new(file))?;
        Ok(value)
    }

    /// Write a JSON file (atomic write via rename).
    ///
    /// Concurrent writers of the same path each use their own temp file; the
    /// last rename wins.
    pub fn write_json<T: Serialize>(&self, path: impl AsRef<Path>, value: &T) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = scratch_path(path);
        let written = File::create(&temp_path)
            .map_err(StorageError::from)
            .and_then(|file| {
                let mut writer = BufWriter::new(file);
                serde_json::to_writer_pretty(&mut writer, value)?;
                writer.flush()?;
                Ok(())
            })
            .and_then(|()| fs::rename(&temp_path, path).map_err(StorageError::from));

        if written.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        written
    }

    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref().is_file()
    }

    /// File stems of every `*.{extension}` file in `dir`.
    pub fn list_files(&self, dir: impl AsRef<Path>, extension: &str) -> StorageResult<Vec<String>> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != extension) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}
