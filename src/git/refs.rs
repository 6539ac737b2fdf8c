//! Ref enumeration and ref-to-commit resolution for the refs namespace
//! (spec §4.5).

use git2::Sort;

use crate::error::RepoResult;

use super::CommitId;
use super::RepoAccessor;

impl RepoAccessor {
    /// `"<commit-id> <refname>"` lines for every ref under any of `roots`
    /// (e.g. `refs/heads`, `refs/tags`), one per matching ref. Annotated
    /// tags are peeled to the commit they ultimately point at.
    pub fn refs(&self, roots: &[&str]) -> RepoResult<Vec<String>> {
        self.with_repo(|repo| {
            let mut out = Vec::new();
            for r in repo.references()? {
                let r = r?;
                let Some(name) = r.name() else { continue };
                if !roots.iter().any(|root| name.starts_with(root)) {
                    continue;
                }
                let Ok(commit) = r.peel_to_commit() else {
                    continue;
                };
                out.push(format!("{} {}", commit.id(), name));
            }
            Ok(out)
        })
    }

    /// Resolves `refs/{user_ref}` to a commit id; `""` when it doesn't
    /// resolve to a commit. Memoised per ref name for the life of the mount.
    pub fn commit_of_ref(&self, user_ref: &str) -> RepoResult<String> {
        if !self.nocache
            && let Some(resolved) = self.lock_cache()?.refs_resolved.get(user_ref).cloned()
        {
            return Ok(resolved);
        }

        let resolved = self.with_repo(|repo| {
            let full_name = format!("refs/{user_ref}");
            let resolved = repo
                .find_reference(&full_name)
                .and_then(|r| r.peel_to_commit())
                .map(|c| c.id().to_string())
                .unwrap_or_default();
            Ok(resolved)
        })?;

        if !self.nocache {
            self.lock_cache()?
                .refs_resolved
                .insert(user_ref.to_string(), resolved.clone());
        }

        Ok(resolved)
    }

    /// Every commit reachable from any ref, optionally filtered to ids
    /// starting with `prefix` (pass `""` for no filter). The unfiltered
    /// listing is memoised; the prefix filter runs over the cached list.
    pub fn all_commits(&self, prefix: &str) -> RepoResult<Vec<CommitId>> {
        let all = self.all_commits_full()?;
        if prefix.is_empty() {
            return Ok(all);
        }
        Ok(all.into_iter().filter(|c| c.starts_with(prefix)).collect())
    }

    fn all_commits_full(&self) -> RepoResult<Vec<CommitId>> {
        if !self.nocache
            && let Some(commits) = self.lock_cache()?.commits_all.clone()
        {
            return Ok(commits);
        }

        let commits = self.with_repo(|repo| {
            let mut walk = repo.revwalk()?;
            walk.push_glob("refs/*")?;
            walk.set_sorting(Sort::TOPOLOGICAL)?;
            Ok(walk
                .filter_map(Result::ok)
                .map(CommitId::from)
                .collect::<Vec<_>>())
        })?;

        if !self.nocache {
            self.lock_cache()?.commits_all = Some(commits.clone());
        }

        Ok(commits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::tree::tests::fixture_repo;

    #[test]
    fn refs_lists_the_fixture_tag() {
        let (dir, commit) = fixture_repo();
        let accessor = RepoAccessor::open(dir.path(), false).unwrap();
        let refs = accessor.refs(&["refs/tags"]).unwrap();
        assert_eq!(refs, vec![format!("{commit} refs/tags/t20070115la")]);
    }

    #[test]
    fn commit_of_ref_resolves_tag_and_empty_for_unknown() {
        let (dir, commit) = fixture_repo();
        let accessor = RepoAccessor::open(dir.path(), false).unwrap();
        assert_eq!(
            accessor.commit_of_ref("tags/t20070115la").unwrap(),
            commit.to_string()
        );
        assert_eq!(accessor.commit_of_ref("tags/does-not-exist").unwrap(), "");
    }

    #[test]
    fn all_commits_contains_the_single_fixture_commit_and_filters_by_prefix() {
        let (dir, commit) = fixture_repo();
        let accessor = RepoAccessor::open(dir.path(), false).unwrap();
        assert_eq!(accessor.all_commits("").unwrap(), vec![commit.clone()]);
        let prefix = &commit.as_str()[..6];
        assert_eq!(accessor.all_commits(prefix).unwrap(), vec![commit]);
        assert!(accessor.all_commits("ffffff").unwrap().is_empty());
    }
}
