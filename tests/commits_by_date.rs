//! Black-box path resolution through the `commits-by-date` namespace
//! against a real two-commit repository.

mod common;

use repofs::git::RepoAccessor;
use repofs::handlers::commit_date::CommitDateHandler;
use repofs::handlers::Handler;

#[test]
fn year_listing_spans_both_commit_years() {
    let fx = common::build();
    let accessor = RepoAccessor::open(fx.dir.path(), false).unwrap();
    let root = CommitDateHandler::new(&accessor, "");

    assert!(root.is_dir().unwrap());
    let mut years = root.readdir().unwrap();
    years.sort();
    assert_eq!(years, vec!["2007"]);
}

#[test]
fn day_listing_resolves_to_the_commit_on_that_day() {
    let fx = common::build();
    let accessor = RepoAccessor::open(fx.dir.path(), false).unwrap();
    let day = CommitDateHandler::new(&accessor, "2007/01/15");

    assert!(day.is_dir().unwrap());
    assert_eq!(day.readdir().unwrap(), vec![fx.first_commit.clone()]);
}

#[test]
fn commit_root_lists_tree_entries_plus_metadata_vocabulary() {
    let fx = common::build();
    let accessor = RepoAccessor::open(fx.dir.path(), false).unwrap();
    let path = format!("2007/01/15/{}", fx.first_commit);
    let commit = CommitDateHandler::new(&accessor, &path);

    let mut entries = commit.readdir().unwrap();
    entries.sort();
    assert_eq!(
        entries,
        vec![
            ".author",
            ".author-email",
            ".git-descendants",
            ".git-names",
            ".git-parents",
            "dir_a",
            "file_a",
            "link_a",
        ]
    );
}

#[test]
fn nonexistent_calendar_date_is_not_found() {
    let fx = common::build();
    let accessor = RepoAccessor::open(fx.dir.path(), false).unwrap();
    let bogus = CommitDateHandler::new(&accessor, "2007/02/30");
    assert!(bogus.is_dir().is_err());
}

#[test]
fn file_contents_and_size_agree_for_a_tracked_file() {
    let fx = common::build();
    let accessor = RepoAccessor::open(fx.dir.path(), false).unwrap();
    let path = format!("2007/01/15/{}/file_a", fx.first_commit);
    let handler = CommitDateHandler::new(&accessor, &path);

    assert!(!handler.is_dir().unwrap());
    assert!(!handler.is_symlink().unwrap());
    assert_eq!(handler.file_contents().unwrap(), b"hello\n");
    assert_eq!(handler.file_size().unwrap(), 6);
}

#[test]
fn a_tree_entry_marked_as_a_symlink_reports_is_symlink() {
    let fx = common::build();
    let accessor = RepoAccessor::open(fx.dir.path(), false).unwrap();
    let path = format!("2007/01/15/{}/link_a", fx.first_commit);
    let handler = CommitDateHandler::new(&accessor, &path);

    assert!(handler.is_symlink().unwrap());
    assert_eq!(handler.symlink_target().unwrap(), format!("2007/01/15/{}/file_a", fx.first_commit));
}

#[test]
fn author_metadata_file_contains_the_commit_authors_identity() {
    let fx = common::build();
    let accessor = RepoAccessor::open(fx.dir.path(), false).unwrap();
    let path = format!("2007/01/15/{}/.author", fx.first_commit);
    let handler = CommitDateHandler::new(&accessor, &path);

    assert_eq!(handler.file_contents().unwrap(), b"repofs");
}

#[test]
fn git_parents_dir_lists_ancestor_commit_for_the_second_commit() {
    let fx = common::build();
    let accessor = RepoAccessor::open(fx.dir.path(), false).unwrap();
    let path = format!("2007/02/20/{}/.git-parents", fx.second_commit);
    let handler = CommitDateHandler::new(&accessor, &path);

    assert!(handler.is_dir().unwrap());
    assert_eq!(handler.readdir().unwrap(), vec![fx.first_commit.clone()]);
}

#[test]
fn git_parents_entry_is_a_metadata_symlink_into_commits_by_hash() {
    let fx = common::build();
    let accessor = RepoAccessor::open(fx.dir.path(), false).unwrap();
    let path = format!("2007/02/20/{}/.git-parents/{}", fx.second_commit, fx.first_commit);
    let handler = CommitDateHandler::new(&accessor, &path);

    assert!(handler.is_metadata_symlink().unwrap());
    assert!(handler.is_symlink().unwrap());
    assert_eq!(handler.symlink_target().unwrap(), fx.first_commit);
}
