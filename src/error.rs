//! Error types for the Repo Accessor and the namespace handlers.
//!
//! `RepoError` covers failures querying the repository itself; `FsError` is
//! the surface-level kind the dispatcher maps to an errno (`ENOENT`,
//! `ENOTDIR`, `EIO`). Accessor errors never escape a handler unconverted —
//! each handler call site decides whether a `RepoError` means `NotFound` or
//! `NotADirectory` for that particular operation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepoError {
    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    #[error("path is not a tree: {0}")]
    NotATree(String),

    #[error("not a git repository: {0}")]
    NotARepo(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type RepoResult<T> = std::result::Result<T, RepoError>;

/// Surface-level error kinds (spec §7). Each handler call surfaces exactly
/// one of these per failing operation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    #[error("not found")]
    NotFound,

    #[error("not a directory")]
    NotADirectory,

    #[error("internal error")]
    InternalError,
}

pub type FsResult<T> = std::result::Result<T, FsError>;

impl FsError {
    /// Maps to the errno the dispatcher hands back to the kernel.
    pub fn to_errno(self) -> i32 {
        match self {
            FsError::NotFound => libc::ENOENT,
            FsError::NotADirectory => libc::ENOTDIR,
            FsError::InternalError => libc::EIO,
        }
    }
}

/// Accessor errors are always resolved by the caller into a concrete
/// `FsError` kind appropriate to the operation being served; this
/// conversion is the default used when no operation-specific mapping
/// applies (e.g. generic repository I/O failures surface as `NotFound`).
impl From<RepoError> for FsError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotATree(_) => FsError::NotADirectory,
            RepoError::Git(_) | RepoError::NotARepo(_) => FsError::NotFound,
            RepoError::Internal(_) => FsError::InternalError,
        }
    }
}
