//! The `branches` and `tags` namespaces (spec §4.5): ref names resolved to
//! a symlink into `commits-by-hash`, or (with `--no-ref-symlinks`) the
//! commit's tree mounted directly under the ref.

use std::collections::BTreeSet;

use crate::error::{FsError, FsResult, RepoError};
use crate::git::{CommitId, RepoAccessor};
use crate::path::grammar::ref_suffix;
use crate::path::{demux_ref, is_metadata_file, is_metadata_symlink, RefPath};

use super::metadata::{metadata_dir_entries, metadata_file_contents};
use super::{Handler, REF_TYPES};

pub struct RefHandler<'a> {
    accessor: &'a RepoAccessor,
    path: String,
    no_ref_symlinks: bool,
    refs: Vec<String>,
    path_data: RefPath,
}

impl<'a> RefHandler<'a> {
    /// `roots` are the ref-name prefixes this handler serves (e.g.
    /// `["refs/heads/", "refs/remotes/"]` for `branches`, `["refs/tags"]`
    /// for `tags`).
    pub fn new(accessor: &'a RepoAccessor, path: &str, roots: &[&str], no_ref_symlinks: bool) -> FsResult<Self> {
        let refs: Vec<String> = accessor
            .refs(roots)?
            .into_iter()
            .filter_map(|line| line.split_once(' ').map(|(_, name)| name.to_string()))
            .collect();
        let path_data = demux_ref(path, &refs);
        Ok(Self {
            accessor,
            path: path.to_string(),
            no_ref_symlinks,
            refs,
            path_data,
        })
    }

    fn is_ref_prefix(&self) -> bool {
        let elements: Vec<&str> = if self.path_data.ref_name.is_empty() {
            Vec::new()
        } else {
            self.path_data.ref_name.split('/').collect()
        };
        self.refs.iter().any(|r| {
            let suffix = ref_suffix(r);
            let ref_elems: Vec<&str> = suffix.split('/').collect();
            elements.len() < ref_elems.len() && ref_elems[..elements.len()] == elements[..]
        })
    }

    fn is_full_ref(&self) -> bool {
        self.refs.iter().any(|r| ref_suffix(r) == self.path_data.ref_name)
    }

    fn get_refs(&self) -> Vec<String> {
        let ref_prefix: Vec<&str> = if self.path_data.ref_name.is_empty() {
            Vec::new()
        } else {
            self.path_data.ref_name.split('/').collect()
        };
        let mut result = BTreeSet::new();
        for r in &self.refs {
            let suffix = ref_suffix(r);
            let ref_elems: Vec<&str> = suffix.split('/').collect();
            if ref_elems.len() > ref_prefix.len() && ref_elems[..ref_prefix.len()] == ref_prefix[..] {
                result.insert(ref_elems[ref_prefix.len()].to_string());
            }
        }
        result.into_iter().collect()
    }

    fn get_commit(&self) -> FsResult<String> {
        if self.is_full_ref() {
            Ok(self.accessor.commit_of_ref(&self.path_data.ref_name)?)
        } else {
            Ok(String::new())
        }
    }
}

impl Handler for RefHandler<'_> {
    fn is_dir(&self) -> FsResult<bool> {
        if self.path_data.ref_name.is_empty() || REF_TYPES.contains(&self.path_data.ref_name.as_str()) {
            return Ok(true);
        }
        if self.is_ref_prefix() {
            return Ok(true);
        }
        if self.no_ref_symlinks {
            if !REF_TYPES.contains(&self.path_data.ref_type.as_str()) {
                return Ok(false);
            }
            if !self.is_full_ref() {
                return Ok(false);
            }
            if crate::path::is_metadata_dir(&self.path_data.commit_path) {
                return Ok(true);
            }
            let commit = self.get_commit()?;
            if commit.is_empty() {
                return Ok(false);
            }
            return Ok(self
                .accessor
                .is_dir(&CommitId::new(commit), &self.path_data.commit_path)?);
        }
        Ok(false)
    }

    fn is_symlink(&self) -> FsResult<bool> {
        if self.is_metadata_symlink()? {
            return Ok(true);
        }
        Ok(self.is_full_ref() && !self.no_ref_symlinks)
    }

    fn readdir(&self) -> FsResult<Vec<String>> {
        if self.path.is_empty() {
            return Ok(self.get_refs());
        }
        if !self.is_ref_prefix() && !self.is_full_ref() {
            return Err(FsError::NotFound);
        }
        if self.is_ref_prefix() {
            return Ok(self.get_refs());
        }
        if self.no_ref_symlinks && self.is_full_ref() {
            let commit = self.get_commit()?;
            if crate::path::is_metadata_dir(&self.path_data.commit_path) {
                return metadata_dir_entries(self.accessor, &CommitId::new(commit), &self.path_data.commit_path);
            }
            let mut dirents = self
                .accessor
                .directory_contents(&CommitId::new(commit), &self.path_data.commit_path)
                .map_err(|e| match e {
                    RepoError::NotATree(_) => FsError::NotADirectory,
                    other => other.into(),
                })?;
            if self.path_data.commit_path.is_empty() {
                dirents.extend(crate::path::metadata_names());
            }
            return Ok(dirents);
        }
        Err(FsError::NotFound)
    }

    fn file_contents(&self) -> FsResult<Vec<u8>> {
        let commit = self.get_commit()?;
        if is_metadata_file(&self.path_data.commit_path) {
            return metadata_file_contents(self.accessor, &CommitId::new(commit), &self.path_data.commit_path);
        }
        Ok(self
            .accessor
            .file_contents(&CommitId::new(commit), &self.path_data.commit_path)?)
    }

    fn file_size(&self) -> FsResult<u64> {
        let commit = self.get_commit()?;
        if is_metadata_file(&self.path_data.commit_path) {
            return Ok(
                metadata_file_contents(self.accessor, &CommitId::new(commit), &self.path_data.commit_path)?.len()
                    as u64,
            );
        }
        Ok(self
            .accessor
            .file_size(&CommitId::new(commit), &self.path_data.commit_path)?)
    }

    fn symlink_target(&self) -> FsResult<String> {
        self.get_commit()
    }

    fn commit(&self) -> Option<CommitId> {
        match self.get_commit() {
            Ok(commit) if !commit.is_empty() => Some(CommitId::new(commit)),
            _ => None,
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
