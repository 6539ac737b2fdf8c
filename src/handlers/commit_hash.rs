//! The `commits-by-hash` namespace (spec §4.4): flat `<commit>/...` or,
//! with `--hash-trees`, a 256-ary 3-level bucket prefix before the commit.

use crate::error::{FsError, FsResult};
use crate::git::{CommitId, RepoAccessor};
use crate::path::{demux_hash, is_metadata_file, is_metadata_symlink, HashPath};

use super::metadata::{is_metadata_name, metadata_file_contents};
use super::{commit_content, Handler};

fn hex_buckets() -> Vec<String> {
    (0u32..256).map(|b| format!("{b:02x}")).collect()
}

pub struct CommitHashHandler<'a> {
    accessor: &'a RepoAccessor,
    path: String,
    hash_trees: bool,
    path_data: HashPath,
}

impl<'a> CommitHashHandler<'a> {
    pub fn new(accessor: &'a RepoAccessor, path: &str, hash_trees: bool) -> Self {
        Self {
            accessor,
            path: path.to_string(),
            hash_trees,
            path_data: demux_hash(path, hash_trees),
        }
    }

    fn verify_hash_path(&self) -> FsResult<()> {
        if !self.hash_trees || self.path_data.htree_prefix.is_empty() {
            return Ok(());
        }
        let valid = hex_buckets();
        for elem in self.path_data.htree_prefix.split('/') {
            if !valid.iter().any(|v| v == elem) {
                return Err(FsError::NotFound);
            }
        }
        Ok(())
    }

    fn verify_commit(&self) -> FsResult<()> {
        if self.path_data.commit.is_empty() {
            return Ok(());
        }
        let all = self.accessor.all_commits("")?;
        if all.iter().any(|c| c.as_str() == self.path_data.commit) {
            Ok(())
        } else {
            Err(FsError::NotFound)
        }
    }

    fn commit_id(&self) -> CommitId {
        CommitId::new(self.path_data.commit.clone())
    }
}

impl Handler for CommitHashHandler<'_> {
    fn is_dir(&self) -> FsResult<bool> {
        if self.path.is_empty() {
            return Ok(true);
        }
        self.verify_hash_path()?;
        self.verify_commit()?;

        if self.path_data.commit_path.is_empty() {
            return Ok(true);
        }
        if crate::path::is_metadata_dir(&self.path_data.commit_path) {
            return Ok(true);
        }
        Ok(self.accessor.is_dir(&self.commit_id(), &self.path_data.commit_path)?)
    }

    fn is_symlink(&self) -> FsResult<bool> {
        if self.path_data.commit_path.is_empty() || is_metadata_name(&self.path_data.commit_path) {
            return Ok(false);
        }
        if self.is_metadata_symlink()? {
            return Ok(true);
        }
        Ok(self
            .accessor
            .is_symlink(&self.commit_id(), &self.path_data.commit_path)?)
    }

    fn readdir(&self) -> FsResult<Vec<String>> {
        if self.hash_trees {
            let htree_elems: Vec<&str> = if self.path_data.htree_prefix.is_empty() {
                Vec::new()
            } else {
                self.path_data.htree_prefix.split('/').collect()
            };

            if htree_elems.len() <= 2 {
                return Ok(hex_buckets());
            }
            if htree_elems.len() == 3 && self.path_data.commit.is_empty() {
                let prefix = htree_elems.join("");
                return Ok(self
                    .accessor
                    .all_commits(&prefix)?
                    .into_iter()
                    .map(|c| c.to_string())
                    .collect());
            }
        }

        if self.path_data.commit.is_empty() {
            return Ok(self
                .accessor
                .all_commits("")?
                .into_iter()
                .map(|c| c.to_string())
                .collect());
        }

        commit_content(self.accessor, &self.path_data.commit, &self.path_data.commit_path)
    }

    fn file_contents(&self) -> FsResult<Vec<u8>> {
        if is_metadata_file(&self.path_data.commit_path) {
            return metadata_file_contents(self.accessor, &self.commit_id(), &self.path_data.commit_path);
        }
        Ok(self
            .accessor
            .file_contents(&self.commit_id(), &self.path_data.commit_path)?)
    }

    fn file_size(&self) -> FsResult<u64> {
        if is_metadata_file(&self.path_data.commit_path) {
            return Ok(metadata_file_contents(self.accessor, &self.commit_id(), &self.path_data.commit_path)?
                .len() as u64);
        }
        Ok(self
            .accessor
            .file_size(&self.commit_id(), &self.path_data.commit_path)?)
    }

    fn symlink_target(&self) -> FsResult<String> {
        if self.path_data.commit_path.is_empty() {
            return Err(FsError::NotFound);
        }
        if self.is_metadata_symlink()? {
            let last = self.path_data.commit_path.rsplit('/').next().unwrap_or("");
            return Ok(last.to_string());
        }
        let raw = self
            .accessor
            .file_contents(&self.commit_id(), &self.path_data.commit_path)?;
        let target = String::from_utf8_lossy(&raw);
        Ok(if self.path_data.htree_prefix.is_empty() {
            format!("{}/{}", self.path_data.commit, target)
        } else {
            format!("{}/{}/{}", self.path_data.htree_prefix, self.path_data.commit, target)
        })
    }

    fn commit(&self) -> Option<CommitId> {
        if self.path_data.commit.is_empty() {
            None
        } else {
            Some(self.commit_id())
        }
    }

    fn is_metadata_symlink(&self) -> FsResult<bool> {
        let commits: Vec<String> = self
            .accessor
            .all_commits("")?
            .into_iter()
            .map(|c| c.to_string())
            .collect();
        Ok(is_metadata_symlink(&self.path_data.commit_path, &commits))
    }
}
