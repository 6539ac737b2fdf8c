//! Repo Accessor — read-only, memoising queries against a git repository.
//!
//! Submodules:
//! - `repository`: `RepoAccessor`, repo handle lifecycle, and the simple
//!   per-commit queries (`author`, `commit_parents`, `is_symlink`, ...).
//! - `cache`: the five process-owned cache tables of a mount session.
//! - `dates`: `years()` and `commits_by_date()`.
//! - `tree`: tree traversal, directory listing, blob content/size.
//! - `refs`: ref enumeration and ref-to-commit resolution.

pub mod cache;
pub mod dates;
pub mod refs;
pub mod repository;
pub mod tree;

pub use repository::RepoAccessor;

use std::fmt;

/// A 40-character lowercase hex commit id (spec §3 "Repo identifiers").
///
/// Always built from a `git2::Oid`, which already guarantees the hex
/// encoding, so the newtype carries no extra validation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommitId(String);

impl CommitId {
    /// Builds a `CommitId` from an already-validated hex string, e.g. one
    /// a handler confirmed against `RepoAccessor::all_commits` or
    /// `commit_of_ref`. Does not itself parse or validate the string.
    pub fn new(id: impl Into<String>) -> Self {
        CommitId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl From<git2::Oid> for CommitId {
    fn from(oid: git2::Oid) -> Self {
        CommitId(oid.to_string())
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CommitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
