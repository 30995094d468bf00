// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{
    AuthenticationResolver, CredentialStore, InMemoryCredentialStore, Principal, TokenCodec,
    TokenValidator,
};
use crate::config::{AuthSettings, ServerSettings};
use crate::storage::{FileStorage, MemberRepository, StoragePaths, StorageResult, StoredMember};

/// Shared application state.
///
/// Both members are immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenCodec>,
    pub credentials: Arc<dyn CredentialStore>,
}

impl AppState {
    pub fn new(tokens: TokenCodec, credentials: impl CredentialStore + 'static) -> Self {
        Self {
            tokens: Arc::new(tokens),
            credentials: Arc::new(credentials),
        }
    }

    pub fn validator(&self) -> TokenValidator<'_> {
        TokenValidator::new(&self.tokens)
    }

    pub fn resolver(&self) -> AuthenticationResolver<'_> {
        AuthenticationResolver::new(&self.tokens, self.credentials.as_ref())
    }

    /// Build the state the server runs with.
    ///
    /// Uses the file-backed member store when `data_dir` is set, otherwise an
    /// in-memory store. The seed member, if any, is written to whichever
    /// store is chosen.
    pub fn from_settings(auth: &AuthSettings, server: &ServerSettings) -> StorageResult<Self> {
        let tokens = TokenCodec::new(auth);

        match &server.data_dir {
            Some(dir) => {
                let mut storage = FileStorage::new(StoragePaths::new(dir));
                storage.initialize()?;
                let repo = MemberRepository::new(storage)?;

                if let Some(seed) = &server.seed_member {
                    repo.upsert(&StoredMember::new(seed.member_id.as_str(), seed.roles.iter().cloned()))?;
                    tracing::info!(member_id = %seed.member_id, "Seed member stored");
                }

                tracing::info!(
                    data_dir = %dir.display(),
                    members = repo.list_ids()?.len(),
                    "Using file-backed member store"
                );
                Ok(Self::new(tokens, repo))
            }
            None => {
                let mut store = InMemoryCredentialStore::new();
                if let Some(seed) = &server.seed_member {
                    store.insert(Principal::new(seed.member_id.as_str(), seed.roles.iter().cloned()));
                    tracing::info!(member_id = %seed.member_id, "Seed member stored");
                }

                tracing::warn!("DATA_DIR not set; members are kept in memory only");
                Ok(Self::new(tokens, store))
            }
        }
    }
}
