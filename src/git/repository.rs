//! `RepoAccessor`: the repo handle, opened once at mount and closed at
//! unmount (spec §5 "Resource acquisition"), plus the accessor methods that
//! need no cache table of their own: `author`, `author_email`,
//! `commit_parents`, `commit_descendants`, `commit_names`,
//! `get_commit_time`, `is_symlink`, `file_contents`.
//!
//! The heavier, cache-backed methods (`years`, `all_commits`, `refs`,
//! `commit_of_ref`, `directory_contents`, `is_dir`, `file_size`) live in
//! sibling modules and are implemented as further `impl RepoAccessor`
//! blocks there, mirroring the teacher's one-`impl`-block-per-concern
//! split across `git/{repository,tree,history}.rs`.

use std::path::Path;
use std::sync::Mutex;

use git2::Repository;

use crate::error::{RepoError, RepoResult};

use super::cache::RepoCache;
use super::CommitId;

/// Raw tree-entry filemode for a symbolic link (`GIT_FILEMODE_LINK`).
const FILEMODE_LINK: i32 = 0o120000;

pub struct RepoAccessor {
    repo: Mutex<Repository>,
    pub(super) nocache: bool,
    pub(super) cache: Mutex<RepoCache>,
}

impl RepoAccessor {
    pub fn open<P: AsRef<Path>>(path: P, nocache: bool) -> RepoResult<Self> {
        let repo = Repository::discover(&path)
            .map_err(|_| RepoError::NotARepo(path.as_ref().display().to_string()))?;

        Ok(Self {
            repo: Mutex::new(repo),
            nocache,
            cache: Mutex::new(RepoCache::default()),
        })
    }

    /// Runs `f` with the repository locked. The mount is single-threaded
    /// (spec §5), so the lock never contends; it exists only because
    /// `git2::Repository` is `!Sync`.
    pub(super) fn with_repo<F, T>(&self, f: F) -> RepoResult<T>
    where
        F: FnOnce(&Repository) -> RepoResult<T>,
    {
        let repo = self
            .repo
            .lock()
            .map_err(|_| RepoError::Internal("repo lock poisoned".to_string()))?;
        f(&repo)
    }

    pub(super) fn lock_cache(&self) -> RepoResult<std::sync::MutexGuard<'_, RepoCache>> {
        self.cache
            .lock()
            .map_err(|_| RepoError::Internal("cache lock poisoned".to_string()))
    }

    fn find_commit<'r>(repo: &'r Repository, commit: &CommitId) -> RepoResult<git2::Commit<'r>> {
        let oid = git2::Oid::from_str(commit.as_str())?;
        Ok(repo.find_commit(oid)?)
    }

    pub fn author(&self, commit: &CommitId) -> RepoResult<String> {
        self.with_repo(|repo| {
            let c = Self::find_commit(repo, commit)?;
            Ok(c.author().name().unwrap_or("").to_string())
        })
    }

    pub fn author_email(&self, commit: &CommitId) -> RepoResult<String> {
        self.with_repo(|repo| {
            let c = Self::find_commit(repo, commit)?;
            Ok(c.author().email().unwrap_or("").to_string())
        })
    }

    pub fn get_commit_time(&self, commit: &CommitId) -> RepoResult<i64> {
        self.with_repo(|repo| {
            let c = Self::find_commit(repo, commit)?;
            Ok(c.time().seconds())
        })
    }

    pub fn commit_parents(&self, commit: &CommitId) -> RepoResult<Vec<CommitId>> {
        self.with_repo(|repo| {
            let c = Self::find_commit(repo, commit)?;
            Ok(c.parent_ids().map(CommitId::from).collect())
        })
    }

    /// Reserved by the namespace (spec §4.6, §9 "Cyclic ref graph"); the
    /// current design does not compute descendants, so this always
    /// returns an empty list.
    pub fn commit_descendants(&self, _commit: &CommitId) -> RepoResult<Vec<CommitId>> {
        Ok(Vec::new())
    }

    /// Reserved by the namespace (spec §4.6, §9); the current design does
    /// not map commits back to the names that point at them, so this
    /// always returns an empty list.
    pub fn commit_names(&self, _commit: &CommitId) -> RepoResult<Vec<String>> {
        Ok(Vec::new())
    }

    /// True iff the tree entry at `path` within `commit` is a symlink.
    /// The commit root itself is never a symlink.
    pub fn is_symlink(&self, commit: &CommitId, path: &str) -> RepoResult<bool> {
        if path.is_empty() {
            return Ok(false);
        }

        self.with_repo(|repo| {
            let c = Self::find_commit(repo, commit)?;
            let tree = c.tree()?;
            match tree.get_path(Path::new(path)) {
                Ok(entry) => Ok(entry.filemode() == FILEMODE_LINK),
                Err(_) => Ok(false),
            }
        })
    }

    /// Blob content at `path` within `commit`; empty when `path` does not
    /// resolve to a blob (spec §4.1).
    pub fn file_contents(&self, commit: &CommitId, path: &str) -> RepoResult<Vec<u8>> {
        self.with_repo(|repo| {
            let c = Self::find_commit(repo, commit)?;
            let tree = c.tree()?;
            let entry = match tree.get_path(Path::new(path)) {
                Ok(entry) => entry,
                Err(_) => return Ok(Vec::new()),
            };
            match entry.to_object(repo)?.into_blob() {
                Ok(blob) => Ok(blob.content().to_vec()),
                Err(_) => Ok(Vec::new()),
            }
        })
    }
}
