//! Pure, context-free path-demuxing grammar (spec §4.2 "Path Grammar").
//!
//! Every function here takes whatever repo state it needs (known ref names,
//! commit ids) as a plain argument and does no repository I/O of its own —
//! the handlers own the repo queries, this module only splits strings.

/// Synthetic directories added to every commit root (spec §4 "Metadata
/// overlay vocabulary").
pub const METADATA_DIRS: [&str; 3] = [".git-parents", ".git-descendants", ".git-names"];
/// Synthetic files added to every commit root.
pub const METADATA_FILES: [&str; 2] = [".author", ".author-email"];

/// A path under `commits-by-date`, split into its `yyyy/mm/dd` prefix and
/// whatever comes after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatePath {
    pub date_path: String,
    pub commit: String,
    pub commit_path: String,
}

/// Demuxes a `commits-by-date`-relative path. The first three `/`-separated
/// elements are always taken as the date prefix, whether or not they are
/// present or well-formed — validating them against the calendar is the
/// handler's job, not the grammar's.
pub fn demux_date(path: &str) -> DatePath {
    let elements: Vec<&str> = path.split('/').collect();
    let n = elements.len().min(3);
    let date_path = elements[..n].join("/");
    let rest = &elements[n..];

    let (commit, commit_path) = match rest.split_first() {
        Some((first, tail)) => (first.to_string(), tail.join("/")),
        None => (String::new(), String::new()),
    };

    DatePath {
        date_path,
        commit,
        commit_path,
    }
}

/// A path under `commits-by-hash`, split into its optional two-level hex
/// bucket prefix and whatever comes after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashPath {
    pub htree_prefix: String,
    pub commit: String,
    pub commit_path: String,
}

/// Demuxes a `commits-by-hash`-relative path. When `hash_trees` is off the
/// commit id is always the path's first element; when it's on, the first
/// three elements are consumed as the bucket prefix before the commit id.
pub fn demux_hash(path: &str, hash_trees: bool) -> HashPath {
    let mut elements: Vec<&str> = path.split('/').collect();
    let mut htree_prefix = String::new();

    if hash_trees {
        let n = elements.len().min(3);
        htree_prefix = elements[..n].join("/");
        elements = elements[n..].to_vec();
    }

    let (commit, commit_path) = match elements.split_first() {
        Some((first, tail)) => (first.to_string(), tail.join("/")),
        None => (String::new(), String::new()),
    };

    HashPath {
        htree_prefix,
        commit,
        commit_path,
    }
}

/// A path under `branches` or `tags`, split into the ref it names (if any)
/// and whatever path follows it into the commit's tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefPath {
    pub ref_type: String,
    pub ref_name: String,
    pub commit_path: String,
}

/// A known ref's name with its leading path component (`refs`) dropped,
/// e.g. `refs/heads/master` -> `heads/master`.
pub fn ref_suffix(refname: &str) -> String {
    refname.splitn(2, '/').nth(1).unwrap_or("").to_string()
}

/// The longest of `refs` whose suffix (spec `ref_suffix`) is a genuine
/// `/`-aligned prefix of `path` — not merely a string prefix, so
/// `heads/ma` never matches `heads/master`.
pub fn get_full_ref(path: &str, refs: &[String]) -> String {
    let elements: Vec<&str> = path.split('/').collect();

    for r in refs {
        let joined_ref = ref_suffix(r);
        if joined_ref.is_empty() || !path.starts_with(&joined_ref) {
            continue;
        }
        let ref_elements: Vec<&str> = joined_ref.split('/').collect();
        let n = ref_elements.len().min(elements.len());
        if elements[..n].join("/") == joined_ref {
            return joined_ref;
        }
    }

    String::new()
}

/// Demuxes a `branches`/`tags`-relative path against the known `refs`
/// (each a bare ref name, e.g. `heads/master` or `tags/v1.0`).
pub fn demux_ref(path: &str, refs: &[String]) -> RefPath {
    let elements: Vec<&str> = path.split('/').collect();
    let ref_type = elements[0].to_string();

    let full_ref = get_full_ref(path, refs);

    let (ref_name, commit_path) = if !full_ref.is_empty() {
        let consumed = full_ref.split('/').count().min(elements.len());
        (full_ref, elements[consumed..].join("/"))
    } else {
        (elements.join("/"), String::new())
    };

    RefPath {
        ref_type,
        ref_name,
        commit_path,
    }
}

/// True iff `path` is exactly `<metadata-dir>/<commit-id>` for a commit
/// actually present in `commits` — the exact-depth rule that distinguishes
/// a metadata symlink from the metadata directory listing itself.
pub fn is_metadata_symlink(path: &str, commits: &[String]) -> bool {
    let elements: Vec<&str> = path.split('/').collect();
    elements.len() == 2
        && METADATA_DIRS.contains(&elements[0])
        && commits.iter().any(|c| c == elements[1])
}

pub fn is_metadata_dir(path: &str) -> bool {
    let elements: Vec<&str> = path.split('/').collect();
    elements.len() == 1 && METADATA_DIRS.contains(&elements[0])
}

pub fn is_metadata_file(path: &str) -> bool {
    let elements: Vec<&str> = path.split('/').collect();
    elements.len() == 1 && METADATA_FILES.contains(&elements[0])
}

pub fn metadata_names() -> Vec<String> {
    METADATA_DIRS
        .iter()
        .chain(METADATA_FILES.iter())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demux_date_splits_year_month_day_commit_and_tail() {
        let p = demux_date("2007/01/15/abcd1234/foo/bar");
        assert_eq!(p.date_path, "2007/01/15");
        assert_eq!(p.commit, "abcd1234");
        assert_eq!(p.commit_path, "foo/bar");
    }

    #[test]
    fn demux_date_handles_short_and_empty_paths() {
        assert_eq!(demux_date(""), DatePath::default());
        let p = demux_date("2007");
        assert_eq!(p.date_path, "2007");
        assert_eq!(p.commit, "");
    }

    #[test]
    fn demux_hash_without_hash_trees_takes_first_element_as_commit() {
        let p = demux_hash("abcd1234/foo/bar", false);
        assert_eq!(p.htree_prefix, "");
        assert_eq!(p.commit, "abcd1234");
        assert_eq!(p.commit_path, "foo/bar");
    }

    #[test]
    fn demux_hash_with_hash_trees_consumes_the_bucket_prefix() {
        let p = demux_hash("ab/cd/ef/abcd1234ef/foo", true);
        assert_eq!(p.htree_prefix, "ab/cd/ef");
        assert_eq!(p.commit, "abcd1234ef");
        assert_eq!(p.commit_path, "foo");
    }

    #[test]
    fn get_full_ref_matches_on_path_boundaries_only() {
        let refs = vec!["refs/heads/master".to_string(), "refs/heads/ma".to_string()];
        assert_eq!(get_full_ref("master/src/lib.rs", &refs), "heads/master");
        assert_eq!(get_full_ref("ma/x", &refs), "heads/ma");
    }

    #[test]
    fn demux_ref_splits_known_ref_from_commit_path() {
        let refs = vec!["heads/master".to_string()];
        let p = demux_ref("heads/master/src/lib.rs", &refs);
        assert_eq!(p.ref_name, "heads/master");
        assert_eq!(p.commit_path, "src/lib.rs");
    }

    #[test]
    fn demux_ref_with_no_match_treats_whole_path_as_prefix() {
        let p = demux_ref("heads/unknown", &[]);
        assert_eq!(p.ref_name, "heads/unknown");
        assert_eq!(p.commit_path, "");
    }

    #[test]
    fn metadata_predicates_require_exact_depth() {
        let commits = vec!["abc123".to_string()];
        assert!(is_metadata_symlink(".git-parents/abc123", &commits));
        assert!(!is_metadata_symlink(".git-parents/abc123/extra", &commits));
        assert!(!is_metadata_symlink(".git-parents/unknown", &commits));
        assert!(is_metadata_dir(".git-names"));
        assert!(!is_metadata_dir(".git-names/abc123"));
        assert!(is_metadata_file(".author"));
        assert!(!is_metadata_file(".author/x"));
    }
}
