// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential store: identifier → principal lookup.

use std::collections::HashMap;

use super::claims::Principal;

/// Credential store errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialStoreError {
    /// No member with this identifier
    #[error("Member not found: {0}")]
    NotFound(String),
    /// Backing datastore could not be read
    #[error("Credential store unavailable: {0}")]
    Unavailable(String),
}

/// Source of member principals for authentication.
///
/// Called on every authenticated request; implementations must be safe to
/// share across request handlers.
pub trait CredentialStore: Send + Sync {
    /// Load the principal for `identifier`.
    fn load_principal_by_identifier(&self, identifier: &str)
        -> Result<Principal, CredentialStoreError>;

    /// Check whether the backing datastore is reachable.
    fn health_check(&self) -> Result<(), CredentialStoreError> {
        Ok(())
    }
}

/// In-memory credential store, populated at startup.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCredentialStore {
    principals: HashMap<String, Principal>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a principal.
    pub fn insert(&mut self, principal: Principal) {
        self.principals
            .insert(principal.identifier.clone(), principal);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.insert(principal);
        self
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn load_principal_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Principal, CredentialStoreError> {
        self.principals
            .get(identifier)
            .cloned()
            .ok_or_else(|| CredentialStoreError::NotFound(identifier.to_string()))
    }
}
