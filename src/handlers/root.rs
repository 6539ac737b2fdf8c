//! The filesystem root (spec §4.3 "Root namespace"): always a directory
//! listing the four top-level namespaces.

use crate::error::{FsError, FsResult};
use crate::git::CommitId;

use super::Handler;

#[derive(Debug, Default)]
pub struct RootHandler;

impl Handler for RootHandler {
    fn is_dir(&self) -> FsResult<bool> {
        Ok(true)
    }

    fn is_symlink(&self) -> FsResult<bool> {
        Ok(false)
    }

    fn readdir(&self) -> FsResult<Vec<String>> {
        Ok(vec![
            "commits-by-date".to_string(),
            "commits-by-hash".to_string(),
            "branches".to_string(),
            "tags".to_string(),
        ])
    }

    fn file_contents(&self) -> FsResult<Vec<u8>> {
        Err(FsError::NotFound)
    }

    fn file_size(&self) -> FsResult<u64> {
        Err(FsError::NotFound)
    }

    fn symlink_target(&self) -> FsResult<String> {
        Err(FsError::NotFound)
    }

    fn commit(&self) -> Option<CommitId> {
        None
    }

    fn is_metadata_symlink(&self) -> FsResult<bool> {
        Ok(false)
    }
}
