//! Bidirectional inode <-> virtual path table (spec §4.7; SPEC_FULL §E
//! "`fs` (Filesystem Dispatcher)").
//!
//! `fuser` addresses everything by inode number, not path string, unlike
//! the Python `fusepy` binding the original targets. This table is pure
//! FUSE-protocol plumbing built lazily as `lookup`/`readdir` walk the
//! namespace; it has no counterpart among spec §3's Repo Accessor cache
//! tables and is never consulted by a `Handler`.

use std::collections::HashMap;

/// Inode 1 is always the mount root (`FUSE_ROOT_ID`).
pub const ROOT_INO: u64 = 1;

/// Virtual path for the mount root, stored with no leading or trailing
/// slash (the empty string), matching every other entry's convention.
const ROOT_PATH: &str = "";

#[derive(Default)]
pub struct InodeTable {
    path_to_ino: HashMap<String, u64>,
    ino_to_path: HashMap<u64, String>,
    next_ino: u64,
}

impl InodeTable {
    pub fn new() -> Self {
        let mut table = Self {
            path_to_ino: HashMap::new(),
            ino_to_path: HashMap::new(),
            next_ino: ROOT_INO + 1,
        };
        table.path_to_ino.insert(ROOT_PATH.to_string(), ROOT_INO);
        table.ino_to_path.insert(ROOT_INO, ROOT_PATH.to_string());
        table
    }

    pub fn path_of(&self, ino: u64) -> Option<&str> {
        self.ino_to_path.get(&ino).map(String::as_str)
    }

    /// Returns the inode for `path`, assigning a fresh one the first time
    /// this path is seen. Once assigned, an inode never changes for the
    /// life of the mount (mirrors the write-once semantics of the Repo
    /// Accessor's own cache tables, spec §3 invariant 3).
    pub fn ino_of(&mut self, path: &str) -> u64 {
        if let Some(&ino) = self.path_to_ino.get(path) {
            return ino;
        }
        let ino = self.next_ino;
        self.next_ino += 1;
        self.path_to_ino.insert(path.to_string(), ino);
        self.ino_to_path.insert(ino, path.to_string());
        ino
    }
}
