use crate::{Difficulty, Grid, Result, SudokuError};
use rand::prelude::*;
use rand::rngs::SmallRng;
use tracing::{debug, trace};

/// Generates solved grids and digs them into unique-solution puzzles.
///
/// All randomness flows through the owned RNG, so a generator built with
/// [`BoardGenerator::from_seed`] produces the same boards every run.
pub struct BoardGenerator {
    rng: SmallRng,
}

impl BoardGenerator {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// A deterministic generator for reproducible boards.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Generates a puzzle and its solution for the given difficulty.
    pub fn generate(&mut self, difficulty: Difficulty) -> Result<Grid> {
        let solution = self.generate_solved_grid()?;
        let value = self.generate_puzzle(&solution, difficulty.clue_count())?;

        Ok(Grid {
            value,
            solution,
            difficulty,
        })
    }

    /// Generates a fully solved board via randomized backtracking.
    pub fn generate_solved_grid(&mut self) -> Result<Vec<Vec<i32>>> {
        let mut board = vec![vec![0; 9]; 9];
        if !self.fill_board(&mut board) {
            // An empty grid always has completions; getting here means the
            // search itself is broken, so don't retry.
            return Err(SudokuError::NoCompletion);
        }
        debug!("Generated solved grid");
        Ok(board)
    }

    /// Digs a fresh copy of `solved` down to roughly `clue_count` clues
    /// while keeping the solution unique.
    ///
    /// The result may hold more than `clue_count` clues: removals that would
    /// break uniqueness are rejected, and once the shuffled cell order is
    /// exhausted no reshuffle-and-retry is attempted.
    pub fn generate_puzzle(
        &mut self,
        solved: &[Vec<i32>],
        clue_count: u32,
    ) -> Result<Vec<Vec<i32>>> {
        validate_grid(solved)?;
        if clue_count > 81 {
            return Err(SudokuError::InvalidClueCount(clue_count));
        }

        let mut puzzle: Vec<Vec<i32>> = solved.to_vec();
        self.remove_numbers(&mut puzzle, clue_count);
        Ok(puzzle)
    }

    /// Fills every empty cell of `board` in place, trying candidates in a
    /// shuffled order per cell. Returns false if no completion exists.
    ///
    /// `board` must be 9x9 with values in 0-9; use [`validate_grid`] first
    /// for untrusted input.
    pub fn fill_board(&mut self, board: &mut Vec<Vec<i32>>) -> bool {
        if let Some((row, col)) = find_empty(board) {
            let mut numbers: Vec<i32> = (1..=9).collect();
            numbers.shuffle(&mut self.rng);

            for &num in &numbers {
                if is_valid_placement(board, row, col, num) {
                    board[row][col] = num;
                    if self.fill_board(board) {
                        return true;
                    }
                    board[row][col] = 0;
                }
            }
            false
        } else {
            true
        }
    }

    fn remove_numbers(&mut self, board: &mut [Vec<i32>], clue_count: u32) {
        let mut positions: Vec<(usize, usize)> = (0..9)
            .flat_map(|i| (0..9).map(move |j| (i, j)))
            .collect();
        positions.shuffle(&mut self.rng);

        let target = 81 - clue_count;
        let mut removed = 0;

        for (row, col) in positions {
            if removed >= target {
                break;
            }

            let temp = board[row][col];
            board[row][col] = 0;

            if count_solutions(board) != 1 {
                trace!("Keeping {} at ({}, {}): removal breaks uniqueness", temp, row, col);
                board[row][col] = temp;
            } else {
                removed += 1;
            }
        }

        if removed < target {
            debug!(
                "Removed {} of {} cells before running out of safely removable cells",
                removed, target
            );
        } else {
            debug!("Removed {} cells", removed);
        }
    }
}

impl Default for BoardGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks whether `num` can go at `(row, col)` without clashing with the
/// cell's row, column, or 3x3 box.
///
/// The cell under test is not excluded from the scan, so it must be
/// logically pending: check before writing the value, or zero the cell
/// first when re-checking one that is already filled.
pub fn is_valid_placement(board: &[Vec<i32>], row: usize, col: usize, num: i32) -> bool {
    // Check row
    if board[row].contains(&num) {
        return false;
    }

    // Check column
    if (0..9).any(|i| board[i][col] == num) {
        return false;
    }

    // Check 3x3 box
    let box_row = row - row % 3;
    let box_col = col - col % 3;
    for i in 0..3 {
        for j in 0..3 {
            if board[box_row + i][box_col + j] == num {
                return false;
            }
        }
    }

    true
}

/// Counts every completion of `board` by exhaustive backtracking.
///
/// Works on a private copy; the caller's grid is never mutated. The full
/// count is always computed, so only call this on grids that are close to
/// complete -- a sparse grid can have an astronomical number of completions.
pub fn count_solutions(board: &[Vec<i32>]) -> usize {
    let mut copy: Vec<Vec<i32>> = board.to_vec();
    let mut solutions = 0;
    count_completions(&mut copy, &mut solutions);
    solutions
}

fn count_completions(board: &mut Vec<Vec<i32>>, solutions: &mut usize) {
    if let Some((row, col)) = find_empty(board) {
        for num in 1..=9 {
            if is_valid_placement(board, row, col, num) {
                board[row][col] = num;
                count_completions(board, solutions);
                board[row][col] = 0;
            }
        }
    } else {
        *solutions += 1;
    }
}

/// First empty cell in row-major order.
fn find_empty(board: &[Vec<i32>]) -> Option<(usize, usize)> {
    for row in 0..9 {
        for col in 0..9 {
            if board[row][col] == 0 {
                return Some((row, col));
            }
        }
    }
    None
}

/// Rejects grids that are not 9x9 or hold values outside 0-9.
pub fn validate_grid(board: &[Vec<i32>]) -> Result<()> {
    if board.len() != 9 {
        return Err(SudokuError::InvalidBoard);
    }
    for (row, cells) in board.iter().enumerate() {
        if cells.len() != 9 {
            return Err(SudokuError::InvalidBoard);
        }
        for (col, &value) in cells.iter().enumerate() {
            if !(0..=9).contains(&value) {
                return Err(SudokuError::InvalidValue { row, col, value });
            }
        }
    }
    Ok(())
}

/// Checks that `board` is fully filled and every row, column, and 3x3 box
/// is a permutation of 1-9.
pub fn is_valid_solution(board: &[Vec<i32>]) -> bool {
    // Check each row
    for row in 0..9 {
        let mut seen = [false; 10];
        for &num in &board[row] {
            if num == 0 || seen[num as usize] {
                return false;
            }
            seen[num as usize] = true;
        }
    }

    // Check each column
    for col in 0..9 {
        let mut seen = [false; 10];
        for row in 0..9 {
            let num = board[row][col];
            if num == 0 || seen[num as usize] {
                return false;
            }
            seen[num as usize] = true;
        }
    }

    // Check each 3x3 box
    for box_row in 0..3 {
        for box_col in 0..3 {
            let mut seen = [false; 10];
            for i in 0..3 {
                for j in 0..3 {
                    let num = board[box_row * 3 + i][box_col * 3 + j];
                    if num == 0 || seen[num as usize] {
                        return false;
                    }
                    seen[num as usize] = true;
                }
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solved_grid() -> Vec<Vec<i32>> {
        vec![
            vec![5, 3, 4, 6, 7, 8, 9, 1, 2],
            vec![6, 7, 2, 1, 9, 5, 3, 4, 8],
            vec![1, 9, 8, 3, 4, 2, 5, 6, 7],
            vec![8, 5, 9, 7, 6, 1, 4, 2, 3],
            vec![4, 2, 6, 8, 5, 3, 7, 9, 1],
            vec![7, 1, 3, 9, 2, 4, 8, 5, 6],
            vec![9, 6, 1, 5, 3, 7, 2, 8, 4],
            vec![2, 8, 7, 4, 1, 9, 6, 3, 5],
            vec![3, 4, 5, 2, 8, 6, 1, 7, 9],
        ]
    }

    #[test]
    fn test_fill_board_from_empty() {
        let mut generator = BoardGenerator::from_seed(1);
        let mut board = vec![vec![0; 9]; 9];
        assert!(generator.fill_board(&mut board));
        assert!(
            board.iter().flatten().all(|&cell| cell != 0),
            "Filled board should have no empty cells"
        );
        assert!(is_valid_solution(&board));
    }

    #[test]
    fn test_solved_grid_rows_cols_boxes() {
        let mut generator = BoardGenerator::from_seed(7);
        let board = generator.generate_solved_grid().unwrap();

        for row in 0..9 {
            let mut nums = board[row].clone();
            nums.sort_unstable();
            assert_eq!(nums, (1..=9).collect::<Vec<i32>>(), "Row {} is not a permutation", row);
        }
        for col in 0..9 {
            let mut nums: Vec<i32> = (0..9).map(|row| board[row][col]).collect();
            nums.sort_unstable();
            assert_eq!(nums, (1..=9).collect::<Vec<i32>>(), "Column {} is not a permutation", col);
        }
        let board = &board;
        for box_row in 0..3 {
            for box_col in 0..3 {
                let mut nums: Vec<i32> = (0..3)
                    .flat_map(|i| (0..3).map(move |j| board[box_row * 3 + i][box_col * 3 + j]))
                    .collect();
                nums.sort_unstable();
                assert_eq!(
                    nums,
                    (1..=9).collect::<Vec<i32>>(),
                    "Box ({}, {}) is not a permutation",
                    box_row,
                    box_col
                );
            }
        }
    }

    #[test]
    fn test_board_generation() {
        let mut generator = BoardGenerator::from_seed(42);
        let grid = generator.generate(Difficulty::Medium).unwrap();

        // Verify board dimensions
        assert_eq!(grid.value.len(), 9);
        assert_eq!(grid.solution.len(), 9);
        for i in 0..9 {
            assert_eq!(grid.value[i].len(), 9);
            assert_eq!(grid.solution[i].len(), 9);
        }

        assert!(is_valid_solution(&grid.solution));

        // Every clue must agree with the solution
        for row in 0..9 {
            for col in 0..9 {
                if grid.value[row][col] != 0 {
                    assert_eq!(grid.value[row][col], grid.solution[row][col]);
                }
            }
        }
    }

    #[test]
    fn test_puzzle_never_digs_below_target() {
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let mut generator = BoardGenerator::from_seed(99);
            let grid = generator.generate(difficulty).unwrap();
            assert!(
                grid.clue_cells() >= difficulty.clue_count(),
                "{} puzzle ended with {} clues, below the target of {}",
                difficulty,
                grid.clue_cells(),
                difficulty.clue_count()
            );
        }
    }

    #[test]
    fn test_generated_puzzle_has_unique_solution() {
        let mut generator = BoardGenerator::from_seed(3);
        let grid = generator.generate(Difficulty::Hard).unwrap();
        assert_eq!(count_solutions(&grid.value), 1);
    }

    #[test]
    fn test_same_seed_same_boards() {
        let mut first = BoardGenerator::from_seed(1234);
        let mut second = BoardGenerator::from_seed(1234);

        let a = first.generate(Difficulty::Medium).unwrap();
        let b = second.generate(Difficulty::Medium).unwrap();

        assert_eq!(a.solution, b.solution);
        assert_eq!(a.value, b.value);
    }

    #[test]
    fn test_dig_with_all_81_clues_is_a_no_op() {
        let solved = solved_grid();
        let mut generator = BoardGenerator::from_seed(5);
        let puzzle = generator.generate_puzzle(&solved, 81).unwrap();
        assert_eq!(puzzle, solved);
        assert_eq!(count_solutions(&puzzle), 1);
    }

    #[test]
    fn test_count_solutions_forced_pair() {
        // Two holes in different rows, columns, and boxes: each is pinned
        // by its own row, so exactly one completion exists.
        let mut board = solved_grid();
        board[0][0] = 0;
        board[1][3] = 0;
        assert_eq!(count_solutions(&board), 1);
    }

    #[test]
    fn test_count_solutions_interchangeable_rectangle() {
        // Rows 3 and 4 hold 1/3 and 3/1 at columns 5 and 8, with each
        // column pair inside a single box. Emptying all four cells leaves
        // candidates {1, 3} everywhere, and the two assignments are
        // interchangeable: exactly two completions.
        let mut board = solved_grid();
        board[3][5] = 0;
        board[3][8] = 0;
        board[4][5] = 0;
        board[4][8] = 0;
        assert_eq!(count_solutions(&board), 2);
    }

    #[test]
    fn test_count_solutions_does_not_mutate_input() {
        let mut board = solved_grid();
        board[0][0] = 0;
        let before = board.clone();
        count_solutions(&board);
        assert_eq!(board, before);
    }

    #[test]
    fn test_is_valid_placement_does_not_mutate_input() {
        let mut board = solved_grid();
        board[0][0] = 0;
        let before = board.clone();
        assert!(is_valid_placement(&board, 0, 0, 5));
        assert!(!is_valid_placement(&board, 0, 0, 3));
        assert_eq!(board, before);
    }

    #[test]
    fn test_is_valid_placement_checks_row_col_and_box() {
        let mut board = vec![vec![0; 9]; 9];
        board[0][0] = 5;

        assert!(!is_valid_placement(&board, 0, 8, 5), "Row conflict");
        assert!(!is_valid_placement(&board, 8, 0, 5), "Column conflict");
        assert!(!is_valid_placement(&board, 1, 1, 5), "Box conflict");
        assert!(is_valid_placement(&board, 1, 1, 6));
    }

    #[test]
    fn test_malformed_grids_are_rejected() {
        let mut generator = BoardGenerator::from_seed(0);

        let short = vec![vec![0; 9]; 8];
        assert!(matches!(
            generator.generate_puzzle(&short, 30),
            Err(SudokuError::InvalidBoard)
        ));

        let ragged = vec![
            vec![0; 9],
            vec![0; 8],
            vec![0; 9],
            vec![0; 9],
            vec![0; 9],
            vec![0; 9],
            vec![0; 9],
            vec![0; 9],
            vec![0; 9],
        ];
        assert!(matches!(
            generator.generate_puzzle(&ragged, 30),
            Err(SudokuError::InvalidBoard)
        ));

        let mut out_of_range = solved_grid();
        out_of_range[4][4] = 10;
        assert!(matches!(
            generator.generate_puzzle(&out_of_range, 30),
            Err(SudokuError::InvalidValue { row: 4, col: 4, value: 10 })
        ));

        assert!(matches!(
            generator.generate_puzzle(&solved_grid(), 82),
            Err(SudokuError::InvalidClueCount(82))
        ));
    }

    #[test]
    fn test_fill_board_reports_unfillable_grids() {
        // Box 0 already holds 1-8, and the remaining cell (2,2) can take
        // neither 9 (blocked by its row) nor anything else.
        let mut board = vec![vec![0; 9]; 9];
        board[0][0] = 1;
        board[0][1] = 2;
        board[0][2] = 3;
        board[1][0] = 4;
        board[1][1] = 5;
        board[1][2] = 6;
        board[2][0] = 7;
        board[2][1] = 8;
        board[2][8] = 9;

        let mut generator = BoardGenerator::from_seed(11);
        assert!(!generator.fill_board(&mut board));
    }
}
