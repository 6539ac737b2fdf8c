//! Shared fixture repository for black-box path-resolution tests.
//!
//! Builds a small, real git repository under a temp directory with two
//! commits on `main` (one tagged, one not) and a second branch `feature`
//! diverging from the first commit, so namespace tests exercise ref
//! listing, ancestry, and commit ordering against an actual object graph
//! rather than mocked data.

use git2::{Repository, Signature, Time};
use tempfile::TempDir;

pub struct Fixture {
    pub dir: TempDir,
    pub first_commit: String,
    pub second_commit: String,
    pub feature_commit: String,
}

fn sig(secs: i64) -> Signature<'static> {
    Signature::new("repofs", "repofs@example.com", &Time::new(secs, 0)).unwrap()
}

/// 2007-01-15T00:00:00Z and 2007-02-20T00:00:00Z, in seconds since epoch.
const FIRST_TIME: i64 = 1_168_819_200;
const SECOND_TIME: i64 = 1_171_929_600;

pub fn build() -> Fixture {
    let dir = TempDir::new().expect("tempdir");
    let repo = Repository::init(dir.path()).expect("init repo");
    // Pin the branch name explicitly rather than relying on libgit2's
    // `init.defaultBranch` fallback, which varies by environment.
    repo.set_head("refs/heads/main").unwrap();

    let file_a = repo.blob(b"hello\n").unwrap();
    let link_a = repo.blob(b"file_a").unwrap();
    let file_aa = repo.blob(b"nested\n").unwrap();

    let mut sub_builder = repo.treebuilder(None).unwrap();
    sub_builder.insert("file_aa", file_aa, 0o100644).unwrap();
    let sub_tree = sub_builder.write().unwrap();

    let mut root_builder = repo.treebuilder(None).unwrap();
    root_builder.insert("file_a", file_a, 0o100644).unwrap();
    root_builder.insert("link_a", link_a, 0o120000).unwrap();
    root_builder.insert("dir_a", sub_tree, 0o040000).unwrap();
    let root_tree = repo.find_tree(root_builder.write().unwrap()).unwrap();

    let first_oid = repo
        .commit(Some("HEAD"), &sig(FIRST_TIME), &sig(FIRST_TIME), "first", &root_tree, &[])
        .unwrap();
    let first_commit = repo.find_commit(first_oid).unwrap();

    repo.reference("refs/tags/v1", first_oid, false, "fixture tag")
        .unwrap();
    repo.reference("refs/heads/feature", first_oid, false, "fixture branch")
        .unwrap();

    let file_b = repo.blob(b"second\n").unwrap();
    let mut second_builder = repo.treebuilder(Some(&root_tree)).unwrap();
    second_builder.insert("file_b", file_b, 0o100644).unwrap();
    let second_tree = repo.find_tree(second_builder.write().unwrap()).unwrap();

    let second_oid = repo
        .commit(
            Some("HEAD"),
            &sig(SECOND_TIME),
            &sig(SECOND_TIME),
            "second",
            &second_tree,
            &[&first_commit],
        )
        .unwrap();

    let feature_file = repo.blob(b"feature\n").unwrap();
    let mut feature_builder = repo.treebuilder(Some(&root_tree)).unwrap();
    feature_builder.insert("feature_file", feature_file, 0o100644).unwrap();
    let feature_tree = repo.find_tree(feature_builder.write().unwrap()).unwrap();

    let feature_oid = repo
        .commit(
            Some("refs/heads/feature"),
            &sig(SECOND_TIME),
            &sig(SECOND_TIME),
            "feature work",
            &feature_tree,
            &[&first_commit],
        )
        .unwrap();

    Fixture {
        dir,
        first_commit: first_oid.to_string(),
        second_commit: second_oid.to_string(),
        feature_commit: feature_oid.to_string(),
    }
}
