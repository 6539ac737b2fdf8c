//! Calendar queries: the year range spanned by the repository, commits
//! falling on a given day, and the "commits-by-date" namespace's month-length
//! arithmetic (spec §4.1, §4.3).

use chrono::{Datelike, NaiveDate, TimeZone, Utc};
use git2::{Sort, Time};

use crate::error::RepoResult;

use super::CommitId;
use super::RepoAccessor;

fn year_of(time: Time) -> i32 {
    Utc.timestamp_opt(time.seconds(), 0)
        .single()
        .expect("git commit time out of range")
        .year()
}

impl RepoAccessor {
    /// `(first_year, last_year)`, inclusive: `first_year` from the earliest
    /// commit on HEAD's own lineage (matching `git log --max-parents=0`,
    /// HEAD only, not `--all`), `last_year` from the most recently
    /// committed branch tip across every ref. Memoised for the life of the
    /// mount.
    pub fn years(&self) -> RepoResult<(i32, i32)> {
        if !self.nocache
            && let Some(years) = self.lock_cache()?.years
        {
            return Ok(years);
        }

        let years = self.with_repo(|repo| {
            let mut first_walk = repo.revwalk()?;
            first_walk.push_head()?;
            first_walk.set_sorting(Sort::TIME | Sort::REVERSE)?;
            let first_year = first_walk
                .filter_map(Result::ok)
                .next()
                .map(|oid| repo.find_commit(oid))
                .transpose()?
                .map(|c| year_of(c.time()))
                .unwrap_or_else(|| year_of(Time::new(0, 0)));

            let mut last_walk = repo.revwalk()?;
            last_walk.push_glob("refs/*")?;
            last_walk.set_sorting(Sort::TIME)?;
            let last_year = last_walk
                .filter_map(Result::ok)
                .next()
                .map(|oid| repo.find_commit(oid))
                .transpose()?
                .map(|c| year_of(c.time()))
                .unwrap_or(first_year);

            Ok((first_year, last_year))
        })?;

        if !self.nocache {
            self.lock_cache()?.years = Some(years);
        }

        Ok(years)
    }

    /// Commit ids whose author date falls within `[year-month-day,
    /// year-month-day + 1 day)` UTC, across every ref. Not memoised — the
    /// spec's cache table list has no entry for this query.
    pub fn commits_by_date(&self, year: i32, month: u32, day: u32) -> RepoResult<Vec<CommitId>> {
        let start = Utc
            .with_ymd_and_hms(year, month, day, 0, 0, 0)
            .single()
            .ok_or_else(|| crate::error::RepoError::Internal(format!("invalid date {year}-{month}-{day}")))?;
        let end = start + chrono::Duration::days(1);

        self.with_repo(|repo| {
            let mut walk = repo.revwalk()?;
            walk.push_glob("refs/*")?;

            let mut commits = Vec::new();
            for oid in walk.filter_map(Result::ok) {
                let commit = repo.find_commit(oid)?;
                let seconds = commit.time().seconds();
                if seconds >= start.timestamp() && seconds < end.timestamp() {
                    commits.push(CommitId::from(oid));
                }
            }
            Ok(commits)
        })
    }
}

/// Number of days in `month` of `year` (spec §4.3 "Algorithmic notes"):
/// step to the 28th, add four days, and the day-of-month of the result
/// minus one is the last day of the original month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let the28th = NaiveDate::from_ymd_opt(year, month, 28).expect("valid calendar month");
    let four_days_later = the28th + chrono::Duration::days(4);
    four_days_later.day() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::tree::tests::fixture_repo;

    #[test]
    fn days_in_month_matches_calendar() {
        assert_eq!(days_in_month(2007, 1), 31);
        assert_eq!(days_in_month(2007, 2), 28);
        assert_eq!(days_in_month(2008, 2), 29); // leap year
        assert_eq!(days_in_month(2007, 4), 30);
        assert_eq!(days_in_month(2007, 12), 31);
    }

    #[test]
    fn years_span_the_single_fixture_commit() {
        let (dir, _commit) = fixture_repo();
        let accessor = RepoAccessor::open(dir.path(), false).unwrap();
        assert_eq!(accessor.years().unwrap(), (2007, 2007));
    }

    #[test]
    fn commits_by_date_finds_the_fixture_commit_on_its_day() {
        let (dir, commit) = fixture_repo();
        let accessor = RepoAccessor::open(dir.path(), false).unwrap();
        assert_eq!(accessor.commits_by_date(2007, 1, 15).unwrap(), vec![commit]);
        assert!(accessor.commits_by_date(2007, 1, 16).unwrap().is_empty());
    }
}
