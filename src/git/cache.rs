//! Cache tables owned by a mount session (spec §3).
//!
//! Every table is write-once per key: once a path is recorded as a
//! directory, or a ref resolves to a commit, that answer holds for the
//! lifetime of the mount (spec §3 invariants 2-3). `RepoAccessor` is the
//! only thing that mutates these tables; nothing reaches in from outside.
//!
//! With `--nocache`, `RepoAccessor` still carries a `RepoCache` value (so
//! there is only one code path, not two) but never reads or writes it —
//! see `RepoAccessor`'s per-method `if self.nocache { .. } else { .. }`
//! branches.

use std::collections::{HashMap, HashSet};

use super::CommitId;

#[derive(Default)]
pub struct RepoCache {
    /// Paths known to be directories in a given commit.
    pub trees: HashMap<CommitId, HashSet<String>>,
    /// Paths whose immediate children have already been enumerated into
    /// `trees` for a given commit.
    pub trees_filled: HashMap<CommitId, HashSet<String>>,
    /// Blob byte length, indexed by commit then path.
    pub sizes: HashMap<CommitId, HashMap<String, u64>>,
    /// User-visible ref name -> resolved commit id ("" if unresolvable).
    pub refs_resolved: HashMap<String, String>,
    /// The full commit-id listing, computed once.
    pub commits_all: Option<Vec<CommitId>>,
    /// `(first_year, last_year)`, inclusive.
    pub years: Option<(i32, i32)>,
}
