use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod benchmark;
pub mod game;
pub mod generator;
pub mod stats;

#[derive(Debug, Error)]
pub enum SudokuError {
    #[error("Invalid board state")]
    InvalidBoard,
    #[error("Invalid value at position ({row}, {col}): {value}")]
    InvalidValue {
        row: usize,
        col: usize,
        value: i32,
    },
    #[error("Invalid clue count: {0} (expected at most 81)")]
    InvalidClueCount(u32),
    #[error("Cell ({row}, {col}) is a given clue and cannot be changed")]
    PrefilledCell { row: usize, col: usize },
    #[error("No completion found for an empty grid")]
    NoCompletion,
    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),
    #[error("Benchmark error: {0}")]
    BenchmarkError(String),
    #[error("Stats I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Stats serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Number of clues the digger aims to leave in the puzzle.
    ///
    /// The actual puzzle may end up with more clues than this when the
    /// digger runs out of safely removable cells, see
    /// [`generator::BoardGenerator::generate_puzzle`].
    pub fn clue_count(&self) -> u32 {
        match self {
            Difficulty::Easy => 40,
            Difficulty::Medium => 30,
            Difficulty::Hard => 20,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = SudokuError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(SudokuError::UnknownDifficulty(other.to_string())),
        }
    }
}

/// A generated board: the playable puzzle plus the solution it was dug from.
///
/// Every non-zero cell of `value` equals the corresponding cell of
/// `solution`; zero cells are for the player to fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    pub value: Vec<Vec<i32>>,
    pub solution: Vec<Vec<i32>>,
    pub difficulty: Difficulty,
}

impl Grid {
    /// Number of given clues (non-zero cells) in the puzzle.
    pub fn clue_cells(&self) -> u32 {
        self.value
            .iter()
            .flatten()
            .filter(|&&cell| cell != 0)
            .count() as u32
    }

    /// Mask of the given clues, derived once at generation time.
    pub fn prefilled_mask(&self) -> Vec<Vec<bool>> {
        self.value
            .iter()
            .map(|row| row.iter().map(|&cell| cell != 0).collect())
            .collect()
    }
}

pub type Result<T> = std::result::Result<T, SudokuError>;
