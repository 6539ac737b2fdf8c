//! Tree traversal: directory listing, the ancestor-walking `is_dir` cache
//! fill (spec §4.1 "Algorithmic notes"), and memoised blob sizes.

use std::path::Path;

use git2::ObjectType;

use crate::error::{RepoError, RepoResult};

use super::cache::RepoCache;
use super::CommitId;
use super::RepoAccessor;

impl RepoAccessor {
    /// Immediate child names at `path` within `commit`'s tree. Empty when
    /// `path` does not resolve to anything; `RepoError::NotATree` when it
    /// resolves to a blob.
    pub fn directory_contents(&self, commit: &CommitId, path: &str) -> RepoResult<Vec<String>> {
        self.with_repo(|repo| {
            let oid = git2::Oid::from_str(commit.as_str())?;
            let c = repo.find_commit(oid)?;
            let root = c.tree()?;

            let target = if path.is_empty() {
                root
            } else {
                let entry = match root.get_path(Path::new(path)) {
                    Ok(entry) => entry,
                    Err(_) => return Ok(Vec::new()),
                };
                match entry.kind() {
                    Some(ObjectType::Tree) => entry.to_object(repo)?.peel_to_tree()?,
                    _ => return Err(RepoError::NotATree(path.to_string())),
                }
            };

            Ok(target
                .iter()
                .map(|e| e.name().unwrap_or("").to_string())
                .collect())
        })
    }

    /// Walks `path`'s ancestors left to right, lazily enumerating each
    /// ancestor's children into the `trees` cache table exactly once
    /// (spec §4.1: "O(depth) queries per test rather than O(total-paths)").
    pub fn is_dir(&self, commit: &CommitId, path: &str) -> RepoResult<bool> {
        if path.is_empty() {
            return Ok(true);
        }

        if self.nocache {
            return self.with_repo(|repo| {
                let oid = git2::Oid::from_str(commit.as_str())?;
                let c = repo.find_commit(oid)?;
                let tree = c.tree()?;
                Ok(tree
                    .get_path(Path::new(path))
                    .ok()
                    .and_then(|e| e.kind())
                    == Some(ObjectType::Tree))
            });
        }

        let mut cache = self.lock_cache()?;
        if !cache.trees.contains_key(commit) {
            cache
                .trees
                .insert(commit.clone(), std::collections::HashSet::new());
            cache
                .trees_filled
                .insert(commit.clone(), std::collections::HashSet::new());
        }

        let elements: Vec<&str> = path.split('/').collect();
        for i in 0..elements.len() {
            let subpath = elements[..i].join("/");
            let already_filled = cache
                .trees_filled
                .get(commit)
                .is_some_and(|f| f.contains(&subpath));
            let is_known_tree =
                subpath.is_empty() || cache.trees.get(commit).is_some_and(|t| t.contains(&subpath));

            if is_known_tree && !already_filled {
                self.fill_tree_children(&mut cache, commit, &subpath)?;
            }
        }

        Ok(cache.trees.get(commit).is_some_and(|t| t.contains(path)))
    }

    fn fill_tree_children(
        &self,
        cache: &mut RepoCache,
        commit: &CommitId,
        subpath: &str,
    ) -> RepoResult<()> {
        let children = self.with_repo(|repo| {
            let oid = git2::Oid::from_str(commit.as_str())?;
            let c = repo.find_commit(oid)?;
            let root = c.tree()?;

            let target = if subpath.is_empty() {
                root
            } else {
                match root.get_path(Path::new(subpath)) {
                    Ok(entry) if entry.kind() == Some(ObjectType::Tree) => {
                        entry.to_object(repo)?.peel_to_tree()?
                    }
                    _ => return Ok(Vec::new()),
                }
            };

            Ok(target
                .iter()
                .filter(|e| e.kind() == Some(ObjectType::Tree))
                .map(|e| e.name().unwrap_or("").to_string())
                .collect::<Vec<_>>())
        })?;

        let entry = cache.trees.entry(commit.clone()).or_default();
        for name in children {
            let full = if subpath.is_empty() {
                name
            } else {
                format!("{subpath}/{name}")
            };
            entry.insert(full);
        }
        cache
            .trees_filled
            .entry(commit.clone())
            .or_default()
            .insert(subpath.to_string());
        Ok(())
    }

    /// Byte length of the blob at `path` within `commit`; `0` when `path`
    /// is not present. Memoised per `(commit, path)` (spec §4.1).
    pub fn file_size(&self, commit: &CommitId, path: &str) -> RepoResult<u64> {
        if !self.nocache
            && let Some(size) = self
                .lock_cache()?
                .sizes
                .get(commit)
                .and_then(|sizes| sizes.get(path))
        {
            return Ok(*size);
        }

        let size = self.with_repo(|repo| {
            let oid = git2::Oid::from_str(commit.as_str())?;
            let c = repo.find_commit(oid)?;
            let tree = c.tree()?;
            let entry = match tree.get_path(Path::new(path)) {
                Ok(entry) => entry,
                Err(_) => return Ok(0u64),
            };
            match entry.to_object(repo)?.into_blob() {
                Ok(blob) => Ok(blob.size() as u64),
                Err(_) => Ok(0u64),
            }
        })?;

        if !self.nocache {
            self.lock_cache()?
                .sizes
                .entry(commit.clone())
                .or_default()
                .insert(path.to_string(), size);
        }

        Ok(size)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Builds a scratch repository matching spec §8's literal scenario: a
    /// single commit dated 2007-01-15, authored by "repofs
    /// <repofs@example.com>", containing `file_a`, `link_a -> file_a`, and
    /// `dir_a/file_aa`, tagged `t20070115la`.
    pub(crate) fn fixture_repo() -> (TempDir, CommitId) {
        let dir = TempDir::new().expect("tempdir");
        let repo = git2::Repository::init(dir.path()).expect("init repo");

        let file_a = repo.blob(b"hello\n").unwrap();
        let link_a = repo.blob(b"file_a").unwrap();
        let file_aa = repo.blob(b"aa\n").unwrap();

        let mut dir_a_builder = repo.treebuilder(None).unwrap();
        dir_a_builder.insert("file_aa", file_aa, 0o100644).unwrap();
        let dir_a_tree = dir_a_builder.write().unwrap();

        let mut root_builder = repo.treebuilder(None).unwrap();
        root_builder.insert("file_a", file_a, 0o100644).unwrap();
        root_builder.insert("link_a", link_a, 0o120000).unwrap();
        root_builder.insert("dir_a", dir_a_tree, 0o040000).unwrap();
        let root_tree_oid = root_builder.write().unwrap();
        let root_tree = repo.find_tree(root_tree_oid).unwrap();

        // 2007-01-15T00:00:00Z
        let when = git2::Time::new(1_168_819_200, 0);
        let sig = git2::Signature::new("repofs", "repofs@example.com", &when).unwrap();

        let commit_oid = repo
            .commit(Some("HEAD"), &sig, &sig, "initial commit", &root_tree, &[])
            .unwrap();

        repo.reference("refs/tags/t20070115la", commit_oid, false, "fixture tag")
            .unwrap();

        (dir, CommitId::from(commit_oid))
    }

    #[test]
    fn directory_contents_lists_root_entries() {
        let (dir, commit) = fixture_repo();
        let accessor = RepoAccessor::open(dir.path(), false).unwrap();
        let mut names = accessor.directory_contents(&commit, "").unwrap();
        names.sort();
        assert_eq!(names, vec!["dir_a", "file_a", "link_a"]);
    }

    #[test]
    fn directory_contents_on_blob_is_not_a_tree() {
        let (dir, commit) = fixture_repo();
        let accessor = RepoAccessor::open(dir.path(), false).unwrap();
        let err = accessor.directory_contents(&commit, "file_a").unwrap_err();
        assert!(matches!(err, RepoError::NotATree(_)));
    }

    #[test]
    fn directory_contents_on_missing_path_is_empty() {
        let (dir, commit) = fixture_repo();
        let accessor = RepoAccessor::open(dir.path(), false).unwrap();
        assert!(accessor.directory_contents(&commit, "nope").unwrap().is_empty());
    }

    #[test]
    fn is_dir_true_for_root_and_nested_dir_false_for_file() {
        let (dir, commit) = fixture_repo();
        let accessor = RepoAccessor::open(dir.path(), false).unwrap();
        assert!(accessor.is_dir(&commit, "dir_a").unwrap());
        assert!(!accessor.is_dir(&commit, "file_a").unwrap());
        assert!(!accessor.is_dir(&commit, "dir_a/file_aa").unwrap());
        assert!(!accessor.is_dir(&commit, "does/not/exist").unwrap());
    }

    #[test]
    fn is_dir_matches_with_nocache() {
        let (dir, commit) = fixture_repo();
        let accessor = RepoAccessor::open(dir.path(), true).unwrap();
        assert!(accessor.is_dir(&commit, "dir_a").unwrap());
        assert!(!accessor.is_dir(&commit, "file_a").unwrap());
    }

    #[test]
    fn file_size_is_memoised_and_zero_for_missing_path() {
        let (dir, commit) = fixture_repo();
        let accessor = RepoAccessor::open(dir.path(), false).unwrap();
        assert_eq!(accessor.file_size(&commit, "file_a").unwrap(), 6);
        assert_eq!(accessor.file_size(&commit, "file_a").unwrap(), 6);
        assert_eq!(accessor.file_size(&commit, "missing").unwrap(), 0);
    }
}
