// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent member records as JSON documents on the local filesystem.
//!
//! ## Storage Layout
//!
//! ```text
//! {DATA_DIR}/
//!   members/
//!     {member_id}.json
//! ```
//!
//! Writes go to a sibling `.tmp` file and are renamed into place, so readers
//! never observe a partially written record.

pub mod fs;
pub mod paths;
pub mod repository;

pub use fs::{FileStorage, StorageError, StorageResult};
pub use paths::StoragePaths;
pub use repository::{MemberRepository, StoredMember};
