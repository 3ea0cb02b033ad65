use crate::generator::{is_valid_placement, BoardGenerator};
use crate::{Difficulty, Grid, Result, SudokuError};
use std::time::{Duration, Instant};
use tracing::debug;

/// A solve in progress: the player's board, the solution it must reach,
/// and the mask of given clues.
///
/// The mask is derived once from the generated puzzle and never recomputed.
/// Hint cells in particular stay outside the mask, so [`Game::reset`]
/// clears them along with the player's own entries.
pub struct Game {
    board: Vec<Vec<i32>>,
    solution: Vec<Vec<i32>>,
    prefilled: Vec<Vec<bool>>,
    difficulty: Difficulty,
    started_at: Instant,
}

impl Game {
    /// Starts a new game at the given difficulty.
    pub fn new(generator: &mut BoardGenerator, difficulty: Difficulty) -> Result<Self> {
        let grid = generator.generate(difficulty)?;
        Ok(Self::from_grid(grid))
    }

    /// Starts a game from an already generated board.
    pub fn from_grid(grid: Grid) -> Self {
        let prefilled = grid.prefilled_mask();
        Self {
            board: grid.value,
            solution: grid.solution,
            prefilled,
            difficulty: grid.difficulty,
            started_at: Instant::now(),
        }
    }

    pub fn board(&self) -> &[Vec<i32>] {
        &self.board
    }

    pub fn solution(&self) -> &[Vec<i32>] {
        &self.solution
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn is_prefilled(&self, row: usize, col: usize) -> bool {
        self.prefilled[row][col]
    }

    /// Time since the game started or was last reset.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Writes `value` at `(row, col)`, 0 meaning clear.
    ///
    /// Returns whether the placement is conflict-free, decided before the
    /// write. Conflicting values are still written, mirroring how the
    /// player is allowed to pencil in a wrong digit and see it flagged.
    /// Given clues cannot be changed.
    pub fn set_cell(&mut self, row: usize, col: usize, value: i32) -> Result<bool> {
        if row > 8 || col > 8 {
            return Err(SudokuError::InvalidBoard);
        }
        if !(0..=9).contains(&value) {
            return Err(SudokuError::InvalidValue { row, col, value });
        }
        if self.prefilled[row][col] {
            debug!("Rejected input at ({}, {}): cell is a given clue", row, col);
            return Err(SudokuError::PrefilledCell { row, col });
        }

        if value == 0 {
            self.board[row][col] = 0;
            return Ok(true);
        }

        // Clear the cell before testing so the old value cannot collide
        // with the new one.
        self.board[row][col] = 0;
        let consistent = is_valid_placement(&self.board, row, col, value);
        self.board[row][col] = value;
        Ok(consistent)
    }

    pub fn clear_cell(&mut self, row: usize, col: usize) -> Result<()> {
        self.set_cell(row, col, 0).map(|_| ())
    }

    /// Fills the first empty cell (row-major) with its solution value.
    ///
    /// Returns the cell and value, or `None` when the board is full.
    pub fn hint(&mut self) -> Option<(usize, usize, i32)> {
        for row in 0..9 {
            for col in 0..9 {
                if self.board[row][col] == 0 {
                    let value = self.solution[row][col];
                    self.board[row][col] = value;
                    debug!("Hint: {} at ({}, {})", value, row, col);
                    return Some((row, col, value));
                }
            }
        }
        None
    }

    /// Clears every cell the player (or a hint) filled and restarts the
    /// clock.
    pub fn reset(&mut self) {
        for row in 0..9 {
            for col in 0..9 {
                if !self.prefilled[row][col] {
                    self.board[row][col] = 0;
                }
            }
        }
        self.started_at = Instant::now();
    }

    /// Cells whose value clashes with their row, column, or box.
    ///
    /// Each cell is tested with itself temporarily cleared so it cannot
    /// collide with its own value.
    pub fn conflicts(&self) -> Vec<(usize, usize)> {
        let mut scratch = self.board.clone();
        let mut cells = Vec::new();
        for row in 0..9 {
            for col in 0..9 {
                let value = scratch[row][col];
                if value == 0 {
                    continue;
                }
                scratch[row][col] = 0;
                if !is_valid_placement(&scratch, row, col, value) {
                    cells.push((row, col));
                }
                scratch[row][col] = value;
            }
        }
        cells
    }

    pub fn is_complete(&self) -> bool {
        self.board.iter().flatten().all(|&cell| cell != 0)
    }

    pub fn is_correct(&self) -> bool {
        self.board == self.solution
    }
}
