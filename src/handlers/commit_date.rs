//! The `commits-by-date` namespace (spec §4.3): `yyyy/mm/dd/<commit>/...`.

use crate::error::{FsError, FsResult};
use crate::git::dates::days_in_month;
use crate::git::{CommitId, RepoAccessor};
use crate::path::{demux_date, is_metadata_file, is_metadata_symlink, DatePath};

use super::metadata::{is_metadata_name, metadata_file_contents};
use super::{commit_content, Handler};

pub struct CommitDateHandler<'a> {
    accessor: &'a RepoAccessor,
    path: String,
    path_data: DatePath,
}

impl<'a> CommitDateHandler<'a> {
    pub fn new(accessor: &'a RepoAccessor, path: &str) -> Self {
        Self {
            accessor,
            path: path.to_string(),
            path_data: demux_date(path),
        }
    }

    /// Rejects a `yyyy[/mm[/dd]]` prefix that isn't a real calendar date
    /// within the repository's commit history (spec §4.3 "Edge cases").
    fn verify_date_path(&self) -> FsResult<()> {
        if self.path_data.date_path.is_empty() {
            return Ok(());
        }
        let parts: Vec<&str> = self.path_data.date_path.split('/').collect();
        let nums: Vec<i32> = parts
            .iter()
            .map(|p| p.parse::<i32>())
            .collect::<Result<_, _>>()
            .map_err(|_| FsError::NotFound)?;

        let (first_year, last_year) = self.accessor.years()?;
        if let Some(&y) = nums.first()
            && (y < first_year || y > last_year)
        {
            return Err(FsError::NotFound);
        }
        if let Some(&m) = nums.get(1)
            && !(1..=12).contains(&m)
        {
            return Err(FsError::NotFound);
        }
        if let Some(&d) = nums.get(2) {
            let days = days_in_month(nums[0], nums[1] as u32) as i32;
            if !(1..=days).contains(&d) {
                return Err(FsError::NotFound);
            }
        }
        Ok(())
    }

    fn verify_commit(&self) -> FsResult<()> {
        if self.path_data.commit.is_empty() {
            return Ok(());
        }
        let all = self.accessor.all_commits("")?;
        if all.iter().any(|c| c.as_str() == self.path_data.commit) {
            Ok(())
        } else {
            Err(FsError::NotFound)
        }
    }

    fn commit_id(&self) -> CommitId {
        CommitId::new(self.path_data.commit.clone())
    }
}

impl Handler for CommitDateHandler<'_> {
    fn is_dir(&self) -> FsResult<bool> {
        if self.path.is_empty() {
            return Ok(true);
        }
        self.verify_date_path()?;
        self.verify_commit()?;

        if self.path_data.commit_path.is_empty() {
            return Ok(true);
        }
        if crate::path::is_metadata_dir(&self.path_data.commit_path) {
            return Ok(true);
        }
        Ok(self.accessor.is_dir(&self.commit_id(), &self.path_data.commit_path)?)
    }

    fn is_symlink(&self) -> FsResult<bool> {
        if self.path_data.commit_path.is_empty() || is_metadata_name(&self.path_data.commit_path) {
            return Ok(false);
        }
        if self.is_metadata_symlink()? {
            return Ok(true);
        }
        Ok(self
            .accessor
            .is_symlink(&self.commit_id(), &self.path_data.commit_path)?)
    }

    fn readdir(&self) -> FsResult<Vec<String>> {
        if self.path_data.date_path.is_empty() {
            let (first, last) = self.accessor.years()?;
            return Ok((first..=last).map(|y| y.to_string()).collect());
        }

        self.verify_date_path()?;
        self.verify_commit()?;

        let parts: Vec<&str> = self.path_data.date_path.split('/').collect();
        match parts.len() {
            1 => Ok((1..=12u32).map(|m| m.to_string()).collect()),
            2 => {
                let year: i32 = parts[0].parse().map_err(|_| FsError::NotFound)?;
                let month: u32 = parts[1].parse().map_err(|_| FsError::NotFound)?;
                let days = days_in_month(year, month);
                Ok((1..=days).map(|d| d.to_string()).collect())
            }
            _ if self.path_data.commit.is_empty() => {
                let year: i32 = parts[0].parse().map_err(|_| FsError::NotFound)?;
                let month: u32 = parts[1].parse().map_err(|_| FsError::NotFound)?;
                let day: u32 = parts[2].parse().map_err(|_| FsError::NotFound)?;
                Ok(self
                    .accessor
                    .commits_by_date(year, month, day)?
                    .into_iter()
                    .map(|c| c.to_string())
                    .collect())
            }
            _ => commit_content(self.accessor, &self.path_data.commit, &self.path_data.commit_path),
        }
    }

    fn file_contents(&self) -> FsResult<Vec<u8>> {
        if is_metadata_file(&self.path_data.commit_path) {
            return metadata_file_contents(self.accessor, &self.commit_id(), &self.path_data.commit_path);
        }
        Ok(self
            .accessor
            .file_contents(&self.commit_id(), &self.path_data.commit_path)?)
    }

    fn file_size(&self) -> FsResult<u64> {
        if is_metadata_file(&self.path_data.commit_path) {
            return Ok(metadata_file_contents(self.accessor, &self.commit_id(), &self.path_data.commit_path)?
                .len() as u64);
        }
        Ok(self
            .accessor
            .file_size(&self.commit_id(), &self.path_data.commit_path)?)
    }

    fn symlink_target(&self) -> FsResult<String> {
        if self.path_data.commit_path.is_empty() {
            return Err(FsError::NotFound);
        }
        if self.is_metadata_symlink()? {
            let last = self.path_data.commit_path.rsplit('/').next().unwrap_or("");
            return Ok(last.to_string());
        }
        let raw = self
            .accessor
            .file_contents(&self.commit_id(), &self.path_data.commit_path)?;
        let target = String::from_utf8_lossy(&raw);
        Ok(format!(
            "{}/{}/{}",
            self.path_data.date_path, self.path_data.commit, target
        ))
    }

    fn commit(&self) -> Option<CommitId> {
        if self.path_data.commit.is_empty() {
            None
        } else {
            Some(self.commit_id())
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
