// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Storage layout.

use std::path::{Path, PathBuf};

/// Path utilities for the member store.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl StoragePaths {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory containing all member records.
    pub fn members_dir(&self) -> PathBuf {
        self.root.join("members")
    }

    /// Path to a member record.
    ///
    /// Callers must have checked `member_id` with [`is_valid_id`].
    pub fn member(&self, member_id: &str) -> PathBuf {
        self.members_dir().join(format!("{member_id}.json"))
    }
}

/// Whether `id` is safe to use as a file stem.
///
/// Allows `[A-Za-z0-9_.@-]`, 1–128 chars, not starting with `.`.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 128
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '@'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_path_layout() {
        let paths = StoragePaths::new("/tmp/tripko");
        assert_eq!(paths.members_dir(), PathBuf::from("/tmp/tripko/members"));
        assert_eq!(
            paths.member("user-42"),
            PathBuf::from("/tmp/tripko/members/user-42.json")
        );
    }

    #[test]
    fn id_validation() {
        for ok in ["user-42", "kim.minji@example.com", "A_1"] {
            assert!(is_valid_id(ok), "{ok}");
        }
        for bad in ["", ".hidden", "../etc/passwd", "a/b", "a b", "é"] {
            assert!(!is_valid_id(bad), "{bad}");
        }
        assert!(!is_valid_id(&"x".repeat(129)));
    }
}
