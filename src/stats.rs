use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Only the best five times are kept.
const LEADERBOARD_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Solve time in seconds.
    pub time: u64,
    /// Unix timestamp of the solve.
    pub date: u64,
}

/// Lifetime solve statistics, persisted as JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub puzzles_solved: u64,
    pub fastest_time: Option<u64>,
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl Stats {
    /// Loads stats from `path`. A missing file yields fresh stats.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No stats file at {}, starting fresh", path.display());
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Records a finished puzzle with its solve time in seconds.
    pub fn record_solve(&mut self, time: u64) {
        self.record_solve_at(time, unix_now());
    }

    fn record_solve_at(&mut self, time: u64, date: u64) {
        self.puzzles_solved += 1;
        if self.fastest_time.map_or(true, |fastest| time < fastest) {
            self.fastest_time = Some(time);
        }
        self.leaderboard.push(LeaderboardEntry { time, date });
        self.leaderboard.sort_by_key(|entry| entry.time);
        self.leaderboard.truncate(LEADERBOARD_LIMIT);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
