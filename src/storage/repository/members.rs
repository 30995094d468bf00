// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Member repository.
//!
//! ## Storage Layout
//!
//! ```text
//! {DATA_DIR}/members/{member_id}.json
//! ```
//!
//! Each record holds the member's identifier and granted authorities. The
//! repository is the [`CredentialStore`] the server authenticates against
//! when `DATA_DIR` is set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{CredentialStore, CredentialStoreError, Principal};
use crate::storage::paths::is_valid_id;
use crate::storage::{FileStorage, StorageError, StorageResult};

/// Member record stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StoredMember {
    /// Unique member identifier (the JWT `sub`)
    pub member_id: String,
    /// Granted authorities, e.g. `ROLE_USER`
    pub roles: Vec<String>,
    /// When the record was first written
    pub created_at: DateTime<Utc>,
}

impl StoredMember {
    pub fn new<S: Into<String>>(member_id: impl Into<String>, roles: impl IntoIterator<Item = S>) -> Self {
        Self {
            member_id: member_id.into(),
            roles: roles.into_iter().map(Into::into).collect(),
            created_at: Utc::now(),
        }
    }
}

impl From<StoredMember> for Principal {
    fn from(member: StoredMember) -> Self {
        Principal::new(member.member_id, member.roles)
    }
}

/// File-backed member repository.
#[derive(Debug, Clone)]
pub struct MemberRepository {
    storage: FileStorage,
}

impl MemberRepository {
    /// Wrap an initialized storage.
    pub fn new(storage: FileStorage) -> StorageResult<Self> {
        if !storage.is_initialized() {
            return Err(StorageError::NotInitialized);
        }
        Ok(Self { storage })
    }

    fn checked_id(member_id: &str) -> StorageResult<&str> {
        if is_valid_id(member_id) {
            Ok(member_id)
        } else {
            Err(StorageError::InvalidId(member_id.to_string()))
        }
    }

    /// Get a member by ID.
    pub fn get(&self, member_id: &str) -> StorageResult<StoredMember> {
        let member_id = Self::checked_id(member_id)?;
        let path = self.storage.paths().member(member_id);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound(format!("Member {member_id}")));
        }
        self.storage.read_json(path)
    }

    /// Create the member or replace its roles, keeping the original
    /// `created_at`.
    pub fn upsert(&self, member: &StoredMember) -> StorageResult<StoredMember> {
        let member_id = Self::checked_id(&member.member_id)?;
        let record = match self.get(member_id) {
            Ok(existing) => StoredMember {
                roles: member.roles.clone(),
                ..existing
            },
            Err(StorageError::NotFound(_)) => member.clone(),
            Err(e) => return Err(e),
        };
        self.storage
            .write_json(self.storage.paths().member(member_id), &record)?;
        Ok(record)
    }

    /// List all member IDs.
    pub fn list_ids(&self) -> StorageResult<Vec<String>> {
        self.storage
            .list_files(self.storage.paths().members_dir(), "json")
    }
}

impl CredentialStore for MemberRepository {
    fn load_principal_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Principal, CredentialStoreError> {
        match self.get(identifier) {
            Ok(member) => Ok(member.into()),
            Err(StorageError::NotFound(_) | StorageError::InvalidId(_)) => {
                Err(CredentialStoreError::NotFound(identifier.to_string()))
            }
            Err(e) => {
                tracing::error!(member_id = %identifier, error = %e, "Failed to read member record");
                Err(CredentialStoreError::Unavailable(e.to_string()))
            }
        }
    }

    fn health_check(&self) -> Result<(), CredentialStoreError> {
        self.storage
            .health_check()
            .map_err(|e| CredentialStoreError::Unavailable(e.to_string()))
    }
}
