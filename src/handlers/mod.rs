//! Per-namespace handlers (spec §4.3-4.6): each implements `Handler` against
//! a parsed, namespace-relative path and the shared `RepoAccessor`.

pub mod commit_date;
pub mod commit_hash;
pub mod metadata;
pub mod refs;
pub mod root;

use crate::error::{FsError, FsResult, RepoError};
use crate::git::{CommitId, RepoAccessor};
use crate::path::{is_metadata_dir, metadata_names};

/// Directories that appear at the root of every commit (spec §4
/// "Metadata overlay"), the hash-tree bucket digits, and the ref kinds
/// addressable under `branches`/`tags` with `--no-ref-symlinks`.
pub const REF_TYPES: [&str; 3] = ["tags", "heads", "remotes"];

/// Uniform surface every namespace handler serves the dispatcher through
/// (spec §4 "Filesystem Dispatcher").
pub trait Handler {
    fn is_dir(&self) -> FsResult<bool>;
    fn is_symlink(&self) -> FsResult<bool>;
    fn readdir(&self) -> FsResult<Vec<String>>;
    fn file_contents(&self) -> FsResult<Vec<u8>>;
    fn file_size(&self) -> FsResult<u64>;
    /// The handler-specific, still-relative symlink target; the dispatcher
    /// turns this into an absolute path rooted at the mount point (spec §4
    /// "Four-way symlink target construction").
    fn symlink_target(&self) -> FsResult<String>;
    /// The commit this path names, if any — used by the dispatcher to date
    /// a directory entry's mtime from the commit's author time.
    fn commit(&self) -> Option<CommitId>;
    /// True iff this path is exactly `<metadata-dir>/<commit-id>` — the
    /// dispatcher checks this first, ahead of any namespace-specific
    /// symlink-target rule (spec §4 "Four-way symlink target construction").
    fn is_metadata_symlink(&self) -> FsResult<bool>;
}

/// One concrete handler per namespace, so the dispatcher can hold a single
/// value instead of a trait object across a borrow of `RepoAccessor`.
pub enum AnyHandler<'a> {
    Root(root::RootHandler),
    Date(commit_date::CommitDateHandler<'a>),
    Hash(commit_hash::CommitHashHandler<'a>),
    Ref(refs::RefHandler<'a>),
}

impl Handler for AnyHandler<'_> {
    fn is_dir(&self) -> FsResult<bool> {
        match self {
            AnyHandler::Root(h) => h.is_dir(),
            AnyHandler::Date(h) => h.is_dir(),
            AnyHandler::Hash(h) => h.is_dir(),
            AnyHandler::Ref(h) => h.is_dir(),
        }
    }

    fn is_symlink(&self) -> FsResult<bool> {
        match self {
            AnyHandler::Root(h) => h.is_symlink(),
            AnyHandler::Date(h) => h.is_symlink(),
            AnyHandler::Hash(h) => h.is_symlink(),
            AnyHandler::Ref(h) => h.is_symlink(),
        }
    }

    fn readdir(&self) -> FsResult<Vec<String>> {
        match self {
            AnyHandler::Root(h) => h.readdir(),
            AnyHandler::Date(h) => h.readdir(),
            AnyHandler::Hash(h) => h.readdir(),
            AnyHandler::Ref(h) => h.readdir(),
        }
    }

    fn file_contents(&self) -> FsResult<Vec<u8>> {
        match self {
            AnyHandler::Root(h) => h.file_contents(),
            AnyHandler::Date(h) => h.file_contents(),
            AnyHandler::Hash(h) => h.file_contents(),
            AnyHandler::Ref(h) => h.file_contents(),
        }
    }

    fn file_size(&self) -> FsResult<u64> {
        match self {
            AnyHandler::Root(h) => h.file_size(),
            AnyHandler::Date(h) => h.file_size(),
            AnyHandler::Hash(h) => h.file_size(),
            AnyHandler::Ref(h) => h.file_size(),
        }
    }

    fn symlink_target(&self) -> FsResult<String> {
        match self {
            AnyHandler::Root(h) => h.symlink_target(),
            AnyHandler::Date(h) => h.symlink_target(),
            AnyHandler::Hash(h) => h.symlink_target(),
            AnyHandler::Ref(h) => h.symlink_target(),
        }
    }

    fn commit(&self) -> Option<CommitId> {
        match self {
            AnyHandler::Root(h) => h.commit(),
            AnyHandler::Date(h) => h.commit(),
            AnyHandler::Hash(h) => h.commit(),
            AnyHandler::Ref(h) => h.commit(),
        }
    }

    fn is_metadata_symlink(&self) -> FsResult<bool> {
        match self {
            AnyHandler::Root(h) => h.is_metadata_symlink(),
            AnyHandler::Date(h) => h.is_metadata_symlink(),
            AnyHandler::Hash(h) => h.is_metadata_symlink(),
            AnyHandler::Ref(h) => h.is_metadata_symlink(),
        }
    }
}

fn repo_err_to_dir_listing(err: RepoError) -> FsError {
    match err {
        RepoError::NotATree(_) => FsError::NotADirectory,
        other => other.into(),
    }
}

/// Listing for `<commit>[/<commit_path>]`, shared by the commit-by-date and
/// commit-by-hash handlers (ported from the original's `CommitHandler`):
/// metadata directory names at the metadata overlay, tree children plus the
/// metadata vocabulary at the commit root, or a `NotFound`/`NotADirectory`
/// surfaced from the accessor otherwise.
pub(crate) fn commit_content(
    accessor: &RepoAccessor,
    commit_str: &str,
    commit_path: &str,
) -> FsResult<Vec<String>> {
    let all = accessor.all_commits("")?;
    if !all.iter().any(|c| c.as_str() == commit_str) {
        return Err(FsError::NotFound);
    }
    let commit = CommitId::new(commit_str.to_string());

    if is_metadata_dir(commit_path) {
        return metadata::metadata_dir_entries(accessor, &commit, commit_path);
    }

    let mut dirents = accessor
        .directory_contents(&commit, commit_path)
        .map_err(repo_err_to_dir_listing)?;

    if commit_path.is_empty() {
        dirents.extend(metadata_names());
    }

    Ok(dirents)
}
