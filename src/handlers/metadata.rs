//! The metadata overlay (spec §4 "Metadata overlay vocabulary"): the
//! synthetic `.git-parents`/`.git-descendants`/`.git-names` directories and
//! `.author`/`.author-email` files present at every commit root.

use crate::error::{FsError, FsResult};
use crate::git::{CommitId, RepoAccessor};
use crate::path::{is_metadata_dir, is_metadata_file};

pub fn is_metadata_name(commit_path: &str) -> bool {
    is_metadata_dir(commit_path) || is_metadata_file(commit_path)
}

/// Listing for one of the three metadata directories; an unrecognized name
/// (shouldn't happen once `is_metadata_dir` gated the call) lists empty.
pub fn metadata_dir_entries(
    accessor: &RepoAccessor,
    commit: &CommitId,
    commit_path: &str,
) -> FsResult<Vec<String>> {
    let entries = match commit_path {
        ".git-parents" => accessor
            .commit_parents(commit)?
            .into_iter()
            .map(|c| c.to_string())
            .collect(),
        ".git-descendants" => accessor
            .commit_descendants(commit)?
            .into_iter()
            .map(|c| c.to_string())
            .collect(),
        ".git-names" => accessor.commit_names(commit)?,
        _ => Vec::new(),
    };
    Ok(entries)
}

/// Contents of one of the two metadata files. No trailing newline — these
/// are read with the author's name/email verbatim, not a formatted line.
pub fn metadata_file_contents(
    accessor: &RepoAccessor,
    commit: &CommitId,
    commit_path: &str,
) -> FsResult<Vec<u8>> {
    match commit_path {
        ".author" => Ok(accessor.author(commit)?.into_bytes()),
        ".author-email" => Ok(accessor.author_email(commit)?.into_bytes()),
        _ => Err(FsError::NotFound),
    }
}
