//! repofs: a read-only FUSE filesystem that projects a git repository's
//! commit/branch/tag history onto a hierarchical namespace.

pub mod error;
pub mod fs;
pub mod git;
pub mod handlers;
pub mod path;
