//! Persistent storage

pub mod leaderboard;

pub use leaderboard::{CsvLeaderboard, LeaderboardRepository, LeaderboardRow, LeaderboardTable};
