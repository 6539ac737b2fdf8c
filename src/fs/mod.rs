//! The Filesystem Dispatcher (spec §4.7): the `fuser::Filesystem` impl that
//! receives kernel callbacks, routes each virtual path to its namespace
//! handler, and translates the handler's answer into FUSE reply types.
//!
//! `fuser` addresses everything by inode, not path, so this module also
//! owns the `InodeTable` (`inode`) that recovers a virtual path from an
//! inode number; every other piece of state here mirrors
//! `examples/original_source/repofs/repofs.py`'s `RepoFS` class one for
//! one, generalized from path-based `fusepy` calls to inode-based `fuser`
//! calls.

mod inode;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use fuser::{FileAttr, FileType, Filesystem, ReplyAttr, ReplyData, ReplyDirectory, ReplyEntry, ReplyOpen, Request};
use libc::ENOENT;

use crate::error::FsError;
use crate::git::RepoAccessor;
use crate::handlers::commit_date::CommitDateHandler;
use crate::handlers::commit_hash::CommitHashHandler;
use crate::handlers::refs::RefHandler;
use crate::handlers::root::RootHandler;
use crate::handlers::{AnyHandler, Handler};

use inode::InodeTable;

const BRANCH_REFS: [&str; 2] = ["refs/heads/", "refs/remotes/"];
const TAG_REFS: [&str; 1] = ["refs/tags"];

/// TTL handed back to the kernel on every reply. The mount is a snapshot
/// of the repo at mount time (spec §3 invariant 3), so entries never need
/// to be revalidated; any positive value just bounds how long the kernel
/// trusts a cached answer before it asks us again.
const ATTR_TTL: Duration = Duration::from_secs(60);

pub struct RepoFs {
    repo: RepoAccessor,
    mount: PathBuf,
    hash_trees: bool,
    no_ref_symlinks: bool,
    mnt_mode: u16,
    inodes: InodeTable,
}

impl RepoFs {
    pub fn new(
        repo: RepoAccessor,
        repo_path: &Path,
        mount: &Path,
        hash_trees: bool,
        no_ref_symlinks: bool,
    ) -> std::io::Result<Self> {
        let mnt_mode = mount_permission_bits(repo_path)?;
        Ok(Self {
            repo,
            mount: mount.to_path_buf(),
            hash_trees,
            no_ref_symlinks,
            mnt_mode,
            inodes: InodeTable::new(),
        })
    }

    /// Builds the namespace handler for a virtual path (without leading or
    /// trailing slash; the empty string is the mount root). Free function
    /// rather than a `&self` method, so the borrow it returns is scoped to
    /// `repo` alone and callers remain free to mutate `self.inodes`
    /// alongside it (spec §9 "Dynamic dispatch over namespaces").
    fn build_handler<'a>(
        repo: &'a RepoAccessor,
        hash_trees: bool,
        no_ref_symlinks: bool,
        path: &str,
    ) -> Result<AnyHandler<'a>, FsError> {
        if path.is_empty() {
            return Ok(AnyHandler::Root(RootHandler));
        }
        let (namespace, rest) = path.split_once('/').unwrap_or((path, ""));
        match namespace {
            "commits-by-date" => Ok(AnyHandler::Date(CommitDateHandler::new(repo, rest))),
            "commits-by-hash" => Ok(AnyHandler::Hash(CommitHashHandler::new(repo, rest, hash_trees))),
            "branches" => Ok(AnyHandler::Ref(RefHandler::new(repo, rest, &BRANCH_REFS, no_ref_symlinks)?)),
            // A tag's ref_suffix (`refs/tags/v1` -> `tags/v1`) keeps the
            // `tags` segment, unlike `heads/...`/`remotes/...` for
            // branches, so the handler path must retain it too.
            "tags" => Ok(AnyHandler::Ref(RefHandler::new(repo, path, &TAG_REFS, no_ref_symlinks)?)),
            _ => Err(FsError::InternalError),
        }
    }

    fn handler_for<'a>(&'a self, path: &str) -> Result<AnyHandler<'a>, FsError> {
        Self::build_handler(&self.repo, self.hash_trees, self.no_ref_symlinks, path)
    }

    fn entry_kind(&self, path: &str) -> Result<FileType, FsError> {
        let handler = self.handler_for(path)?;
        if handler.is_dir()? {
            Ok(FileType::Directory)
        } else if handler.is_symlink()? {
            Ok(FileType::Symlink)
        } else {
            Ok(FileType::RegularFile)
        }
    }

    /// `stat`/`getattr` (spec §4.7): derive the kernel-facing attributes
    /// entirely from what the handler reports, in the same order the
    /// Python `RepoFS.getattr` checks them — `is_dir`, then `is_symlink`,
    /// then a plain file — so that an invalid commit/date/hash path is
    /// rejected by the directory check (the only one of the three that
    /// validates the whole path) before ever reaching `file_size`.
    fn attr_for(&self, req: &Request<'_>, ino: u64, path: &str) -> Result<FileAttr, FsError> {
        let handler = self.handler_for(path)?;

        let (kind, size) = if handler.is_dir()? {
            (FileType::Directory, 0u64)
        } else if handler.is_symlink()? {
            let target = self.symlink_target(&handler, path)?;
            (FileType::Symlink, target.len() as u64)
        } else {
            (FileType::RegularFile, handler.file_size()?)
        };

        let mtime = handler
            .commit()
            .and_then(|commit| self.repo.get_commit_time(&commit).ok())
            .and_then(|secs| UNIX_EPOCH.checked_add(Duration::from_secs(secs.max(0) as u64)))
            .unwrap_or_else(SystemTime::now);

        Ok(FileAttr {
            ino,
            size,
            blocks: size.div_ceil(512),
            atime: SystemTime::now(),
            mtime,
            ctime: mtime,
            crtime: mtime,
            kind,
            perm: self.mnt_mode,
            nlink: if kind == FileType::Directory { 2 } else { 1 },
            uid: req.uid(),
            gid: req.gid(),
            rdev: 0,
            blksize: 512,
            flags: 0,
        })
    }

    /// Absolute symlink target (spec §6 "Symlink target format";
    /// SPEC_FULL §D.5's four cases), ported from `RepoFS._target_from_symlink`.
    /// A metadata symlink is resolved first, regardless of namespace,
    /// exactly as the original checks `is_metadata_symlink()` before
    /// branching on the path prefix.
    fn symlink_target(&self, handler: &AnyHandler, path: &str) -> Result<String, FsError> {
        if handler.is_metadata_symlink()? {
            let commit = handler.symlink_target()?;
            return Ok(self.commit_hash_dir(&commit));
        }
        let relative = handler.symlink_target()?;
        if path.starts_with("commits-by-date") {
            return Ok(format!("{}/commits-by-date/{relative}", self.mount.display()));
        }
        if path.starts_with("commits-by-hash") {
            return Ok(format!("{}/commits-by-hash/{relative}", self.mount.display()));
        }
        if path.starts_with("branches/") || path.starts_with("tags/") {
            return Ok(self.commit_hash_dir(&relative));
        }
        Err(FsError::InternalError)
    }

    /// `<mount>/commits-by-hash[/aa/bb/cc]/<id>/` (spec §6).
    fn commit_hash_dir(&self, commit: &str) -> String {
        if self.hash_trees && commit.len() >= 6 {
            format!(
                "{}/commits-by-hash/{}/{}/{}/{}/",
                self.mount.display(),
                &commit[0..2],
                &commit[2..4],
                &commit[4..6],
                commit
            )
        } else {
            format!("{}/commits-by-hash/{}/", self.mount.display(), commit)
        }
    }

    fn parent_path(path: &str) -> &str {
        path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
    }
}

/// Mode bits on every virtual entry: the mount directory's own mode with
/// the write bits cleared (spec §6 "Permissions"), derived once at mount
/// time (SPEC_FULL §D.7), not recomputed per request.
fn mount_permission_bits(repo_path: &Path) -> std::io::Result<u16> {
    use std::os::unix::fs::PermissionsExt;
    let meta = std::fs::metadata(repo_path)?;
    let mode = meta.permissions().mode();
    Ok((mode & 0o7777 & !0o222) as u16)
}

impl Filesystem for RepoFs {
    fn lookup(&mut self, req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEntry) {
        let Some(parent_path) = self.inodes.path_of(parent).map(str::to_string) else {
            reply.error(ENOENT);
            return;
        };
        let Some(name) = name.to_str() else {
            reply.error(ENOENT);
            return;
        };
        let child_path = if parent_path.is_empty() {
            name.to_string()
        } else {
            format!("{parent_path}/{name}")
        };

        let ino = self.inodes.ino_of(&child_path);
        match self.attr_for(req, ino, &child_path) {
            Ok(attr) => reply.entry(&ATTR_TTL, &attr, 0),
            Err(e) => reply.error(e.to_errno()),
        }
    }

    fn getattr(&mut self, req: &Request<'_>, ino: u64, _fh: Option<u64>, reply: ReplyAttr) {
        let Some(path) = self.inodes.path_of(ino).map(str::to_string) else {
            reply.error(ENOENT);
            return;
        };
        match self.attr_for(req, ino, &path) {
            Ok(attr) => reply.attr(&ATTR_TTL, &attr),
            Err(e) => reply.error(e.to_errno()),
        }
    }

    fn readlink(&mut self, _req: &Request<'_>, ino: u64, reply: ReplyData) {
        let Some(path) = self.inodes.path_of(ino).map(str::to_string) else {
            reply.error(ENOENT);
            return;
        };
        let handler = match self.handler_for(&path) {
            Ok(h) => h,
            Err(e) => {
                reply.error(e.to_errno());
                return;
            }
        };
        match self.symlink_target(&handler, &path) {
            Ok(target) => reply.data(target.as_bytes()),
            Err(e) => reply.error(e.to_errno()),
        }
    }

    fn open(&mut self, _req: &Request<'_>, _ino: u64, _flags: i32, reply: ReplyOpen) {
        reply.opened(0, 0);
    }

    fn opendir(&mut self, _req: &Request<'_>, _ino: u64, _flags: i32, reply: ReplyOpen) {
        reply.opened(0, 0);
    }

    fn read(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _fh: u64,
        offset: i64,
        size: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyData,
    ) {
        let Some(path) = self.inodes.path_of(ino).map(str::to_string) else {
            reply.error(ENOENT);
            return;
        };
        let handler = match self.handler_for(&path) {
            Ok(h) => h,
            Err(e) => {
                reply.error(e.to_errno());
                return;
            }
        };
        let contents = match handler.file_contents() {
            Ok(c) => c,
            Err(e) => {
                reply.error(e.to_errno());
                return;
            }
        };

        let offset = offset.max(0) as usize;
        if offset >= contents.len() {
            reply.data(&[]);
            return;
        }
        let end = (offset + size as usize).min(contents.len());
        reply.data(&contents[offset..end]);
    }

    fn readdir(&mut self, _req: &Request<'_>, ino: u64, _fh: u64, offset: i64, mut reply: ReplyDirectory) {
        let Some(path) = self.inodes.path_of(ino).map(str::to_string) else {
            reply.error(ENOENT);
            return;
        };
        let handler = match self.handler_for(&path) {
            Ok(h) => h,
            Err(e) => {
                reply.error(e.to_errno());
                return;
            }
        };

        let names = match handler.readdir() {
            Ok(names) => names,
            Err(e) => {
                reply.error(e.to_errno());
                return;
            }
        };

        let parent_ino = self.inodes.ino_of(Self::parent_path(&path));

        let mut entries: Vec<(u64, FileType, String)> = vec![
            (ino, FileType::Directory, ".".to_string()),
            (parent_ino, FileType::Directory, "..".to_string()),
        ];
        for name in names {
            let child_path = if path.is_empty() { name.clone() } else { format!("{path}/{name}") };
            let kind = self.entry_kind(&child_path).unwrap_or(FileType::RegularFile);
            let child_ino = self.inodes.ino_of(&child_path);
            entries.push((child_ino, kind, name));
        }

        for (i, (entry_ino, kind, name)) in entries.into_iter().enumerate().skip(offset as usize) {
            let next_offset = (i + 1) as i64;
            if reply.add(entry_ino, next_offset, kind, &name) {
                break;
            }
        }
        reply.ok();
    }
}
