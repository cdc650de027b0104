//! Leaderboard persisted as a `Name,Score` CSV file

use crate::error::{Result, ResumeAtsError};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Score")]
    pub score: f64,
}

/// Rows kept sorted by descending score
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaderboardTable {
    rows: Vec<LeaderboardRow>,
}

impl LeaderboardTable {
    pub fn from_rows(rows: Vec<LeaderboardRow>) -> Self {
        let mut table = Self { rows };
        table.sort();
        table
    }

    pub fn push(&mut self, row: LeaderboardRow) {
        self.rows.push(row);
        self.sort();
    }

    // Stable, so equal scores keep submission order
    fn sort(&mut self) {
        self.rows.sort_by(|a, b| b.score.total_cmp(&a.score));
    }

    pub fn rows(&self) -> &[LeaderboardRow] {
        &self.rows
    }

    pub fn top(&self, n: usize) -> &[LeaderboardRow] {
        &self.rows[..n.min(self.rows.len())]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn read_csv<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let rows = csv_reader
            .deserialize::<LeaderboardRow>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let rows = rows
            .into_iter()
            .filter(|row| {
                let finite = row.score.is_finite();
                if !finite {
                    warn!("Skipping leaderboard row '{}' with non-finite score", row.name);
                }
                finite
            })
            .collect();
        Ok(Self::from_rows(rows))
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        // Explicit header so an empty table still has one
        csv_writer.write_record(["Name", "Score"])?;
        for row in &self.rows {
            csv_writer.write_record([row.name.as_str(), &row.score.to_string()])?;
        }
        csv_writer.flush().map_err(|e| ResumeAtsError::StorageIo(e.to_string()))?;
        Ok(())
    }
}

/// Storage contract: `submit` is load, append, sort, full rewrite.
///
/// Readers never see a partially written table. Writers from separate
/// processes are not coordinated; the last full rewrite wins.
pub trait LeaderboardRepository {
    fn load(&self) -> Result<LeaderboardTable>;
    fn submit(&self, name: &str, score: f64) -> Result<LeaderboardTable>;
}

pub struct CsvLeaderboard {
    path: PathBuf,
}

impl CsvLeaderboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, table: &LeaderboardTable) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| storage_error(&dir, e))?;

        // Same directory so the rename stays on one filesystem
        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| storage_error(&dir, e))?;
        table.write_csv(tmp.as_file_mut())?;
        tmp.as_file().sync_all().map_err(|e| storage_error(&self.path, e))?;
        tmp.persist(&self.path).map_err(|e| storage_error(&self.path, e.error))?;

        debug!("wrote {} leaderboard rows to {}", table.len(), self.path.display());
        Ok(())
    }
}

fn storage_error(path: &Path, err: std::io::Error) -> ResumeAtsError {
    ResumeAtsError::StorageIo(format!("{}: {}", path.display(), err))
}

impl LeaderboardRepository for CsvLeaderboard {
    fn load(&self) -> Result<LeaderboardTable> {
        if !self.path.exists() {
            return Ok(LeaderboardTable::default());
        }
        let file = File::open(&self.path).map_err(|e| storage_error(&self.path, e))?;
        LeaderboardTable::read_csv(file)
    }

    fn submit(&self, name: &str, score: f64) -> Result<LeaderboardTable> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ResumeAtsError::InvalidInput("leaderboard name must not be blank".to_string()));
        }
        if !score.is_finite() {
            return Err(ResumeAtsError::InvalidInput(format!("score must be a finite number, got {}", score)));
        }

        let mut table = self.load()?;
        table.push(LeaderboardRow {
            name: name.to_string(),
            score,
        });
        self.persist(&table)?;

        info!("Submitted {} with score {} ({} entries)", name, score, table.len());
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(table: &LeaderboardTable) -> Vec<&str> {
        table.rows().iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_missing_file_is_empty_table() {
        let dir = TempDir::new().unwrap();
        let board = CsvLeaderboard::new(dir.path().join("leaderboard.csv"));
        assert!(board.load().unwrap().is_empty());
    }

    #[test]
    fn test_order_is_independent_of_submission_order() {
        let entries = [("A", 90.0), ("B", 70.0), ("C", 80.0)];
        let orders = [[0, 1, 2], [2, 1, 0], [1, 0, 2], [1, 2, 0]];

        for order in orders {
            let dir = TempDir::new().unwrap();
            let board = CsvLeaderboard::new(dir.path().join("leaderboard.csv"));
            let mut table = LeaderboardTable::default();
            for i in order {
                table = board.submit(entries[i].0, entries[i].1).unwrap();
            }
            assert_eq!(names(&table), vec!["A", "C", "B"]);
        }
    }

    #[test]
    fn test_file_is_rewritten_sorted_with_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("leaderboard.csv");
        let board = CsvLeaderboard::new(&path);

        board.submit("Ann", 61.5).unwrap();
        board.submit("Bo", 88.25).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Name,Score\nBo,88.25\nAnn,61.5\n");
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let board = CsvLeaderboard::new(dir.path().join("board.csv"));

        let written = LeaderboardTable::from_rows(vec![
            LeaderboardRow { name: "Lee, J.".to_string(), score: 72.4 },
            LeaderboardRow { name: "Kim".to_string(), score: 91.0 },
            LeaderboardRow { name: "Ola".to_string(), score: -3.5 },
        ]);
        board.persist(&written).unwrap();

        let reloaded = board.load().unwrap();
        assert_eq!(reloaded, written);
        assert_eq!(names(&reloaded), vec!["Kim", "Lee, J.", "Ola"]);
    }

    #[test]
    fn test_ties_keep_submission_order() {
        let mut table = LeaderboardTable::default();
        table.push(LeaderboardRow { name: "first".to_string(), score: 50.0 });
        table.push(LeaderboardRow { name: "second".to_string(), score: 50.0 });
        table.push(LeaderboardRow { name: "top".to_string(), score: 51.0 });
        assert_eq!(names(&table), vec!["top", "first", "second"]);
        assert_eq!(table.top(2).len(), 2);
        assert_eq!(table.top(10).len(), 3);
    }

    #[test]
    fn test_blank_name_rejected() {
        let dir = TempDir::new().unwrap();
        let board = CsvLeaderboard::new(dir.path().join("leaderboard.csv"));
        let err = board.submit("   ", 10.0).unwrap_err();
        assert!(matches!(err, ResumeAtsError::InvalidInput(_)));
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("leaderboard.csv");
        std::fs::write(&path, "Name,Score\nAnn,not-a-number\n").unwrap();

        let err = CsvLeaderboard::new(&path).load().unwrap_err();
        assert!(matches!(err, ResumeAtsError::StorageIo(_)));
    }

    #[test]
    fn test_non_finite_rows_skipped_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("leaderboard.csv");
        std::fs::write(&path, "Name,Score\nAnn,NaN\nBo,50\nCy,inf\n").unwrap();

        let board = CsvLeaderboard::new(&path);
        let table = board.load().unwrap();
        assert_eq!(table.rows(), [LeaderboardRow { name: "Bo".to_string(), score: 50.0 }]);

        board.submit("Di", 75.0).unwrap();
        let csv = std::fs::read_to_string(&path).unwrap();
        assert_eq!(csv, "Name,Score\nDi,75\nBo,50\n");
    }
}
