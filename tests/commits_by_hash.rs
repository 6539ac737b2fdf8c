//! Black-box path resolution through the `commits-by-hash` namespace,
//! including `--hash-trees` bucketing.

mod common;

use repofs::error::FsError;
use repofs::git::RepoAccessor;
use repofs::handlers::commit_hash::CommitHashHandler;
use repofs::handlers::Handler;

#[test]
fn flat_listing_contains_every_commit() {
    let fx = common::build();
    let accessor = RepoAccessor::open(fx.dir.path(), false).unwrap();
    let root = CommitHashHandler::new(&accessor, "", false);

    let mut commits = root.readdir().unwrap();
    commits.sort();
    let mut expected = vec![fx.first_commit.clone(), fx.second_commit.clone(), fx.feature_commit.clone()];
    expected.sort();
    assert_eq!(commits, expected);
}

#[test]
fn unknown_commit_id_is_not_found() {
    let fx = common::build();
    let accessor = RepoAccessor::open(fx.dir.path(), false).unwrap();
    let handler = CommitHashHandler::new(&accessor, "0000000000000000000000000000000000000000", false);
    assert!(matches!(handler.is_dir().unwrap_err(), FsError::NotFound));
}

#[test]
fn hash_trees_buckets_by_the_first_six_hex_digits() {
    let fx = common::build();
    let accessor = RepoAccessor::open(fx.dir.path(), true).unwrap();
    let prefix = &fx.first_commit[0..2];
    let bucket = CommitHashHandler::new(&accessor, prefix, true);

    assert!(bucket.is_dir().unwrap());
    let children = bucket.readdir().unwrap();
    assert!(children.len() <= 256);

    let full_prefix = format!("{}/{}/{}", &fx.first_commit[0..2], &fx.first_commit[2..4], &fx.first_commit[4..6]);
    let leaf = CommitHashHandler::new(&accessor, &full_prefix, true);
    assert_eq!(leaf.readdir().unwrap(), vec![fx.first_commit.clone()]);
}

#[test]
fn nested_file_resolves_through_a_subdirectory() {
    let fx = common::build();
    let accessor = RepoAccessor::open(fx.dir.path(), false).unwrap();
    let path = format!("{}/dir_a/file_aa", fx.first_commit);
    let handler = CommitHashHandler::new(&accessor, &path, false);

    assert!(!handler.is_dir().unwrap());
    assert_eq!(handler.file_contents().unwrap(), b"nested\n");
}

#[test]
fn commit_dir_mtime_source_matches_the_requested_commit() {
    let fx = common::build();
    let accessor = RepoAccessor::open(fx.dir.path(), false).unwrap();
    let handler = CommitHashHandler::new(&accessor, &fx.second_commit, false);
    assert_eq!(handler.commit().map(|c| c.to_string()), Some(fx.second_commit.clone()));
}
