use crate::generator::{count_solutions, BoardGenerator};
use crate::{Difficulty, Result, SudokuError};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Results from a benchmark run
#[derive(Debug)]
pub struct BenchmarkResults {
    pub total_duration: Duration,
    pub average_duration: Duration,
    pub min_duration: Duration,
    pub max_duration: Duration,
    pub total_puzzles: usize,
    pub difficulty: Difficulty,
    pub target_clues: u32,
    pub total_clues: u64,
    /// Puzzles where the digger stopped above the clue target.
    pub above_target: usize,
    pub unique_solutions: usize,
}

impl BenchmarkResults {
    /// Average number of clues per generated puzzle
    pub fn average_clues(&self) -> f64 {
        self.total_clues as f64 / self.total_puzzles as f64
    }

    /// Share of puzzles that reached the clue target, as a percentage
    pub fn target_hit_rate(&self) -> f64 {
        ((self.total_puzzles - self.above_target) as f64 / self.total_puzzles as f64) * 100.0
    }

    /// Share of puzzles with a verified unique solution, as a percentage
    pub fn unique_solution_rate(&self) -> f64 {
        (self.unique_solutions as f64 / self.total_puzzles as f64) * 100.0
    }

    /// Pretty prints the benchmark results
    pub fn print_results(&self) {
        println!("\n=== Benchmark Results ===");
        println!("Difficulty: {} ({} clue target)", self.difficulty, self.target_clues);
        println!("Total Duration: {:?}", self.total_duration);
        println!("Average Duration: {:?}", self.average_duration);
        println!("Min Duration: {:?}", self.min_duration);
        println!("Max Duration: {:?}", self.max_duration);
        println!("Total Puzzles: {}", self.total_puzzles);
        println!("Average Clues: {:.1}", self.average_clues());
        println!(
            "Reached Clue Target: {} ({:.1}%)",
            self.total_puzzles - self.above_target,
            self.target_hit_rate()
        );
        println!(
            "Unique Solutions: {} ({:.1}%)",
            self.unique_solutions,
            self.unique_solution_rate()
        );
    }
}

/// Generates the specified number of puzzles and aggregates timing and
/// clue-count statistics, verifying uniqueness for every puzzle.
pub fn run_benchmark(puzzle_count: usize, difficulty: Difficulty) -> Result<BenchmarkResults> {
    if puzzle_count == 0 {
        return Err(SudokuError::BenchmarkError(
            "Puzzle count must be greater than 0".to_string(),
        ));
    }

    info!(
        "Starting benchmark: {} {} puzzles...",
        puzzle_count, difficulty
    );
    let start = Instant::now();
    let mut min_duration = Duration::from_secs(u64::MAX);
    let mut max_duration = Duration::from_secs(0);
    let mut total_duration = Duration::from_secs(0);
    let mut total_clues: u64 = 0;
    let mut above_target = 0;
    let mut unique_solutions = 0;

    let target_clues = difficulty.clue_count();
    let mut generator = BoardGenerator::new();

    for i in 0..puzzle_count {
        debug!("Generating puzzle {}/{}", i + 1, puzzle_count);

        let generate_start = Instant::now();
        let grid = generator.generate(difficulty)?;
        let duration = generate_start.elapsed();

        min_duration = min_duration.min(duration);
        max_duration = max_duration.max(duration);
        total_duration += duration;

        let clues = grid.clue_cells();
        total_clues += u64::from(clues);
        if clues > target_clues {
            debug!(
                "Puzzle {} stopped at {} clues (target {})",
                i + 1,
                clues,
                target_clues
            );
            above_target += 1;
        }
        if count_solutions(&grid.value) == 1 {
            unique_solutions += 1;
        }
    }

    let results = BenchmarkResults {
        total_duration: start.elapsed(),
        average_duration: total_duration / puzzle_count as u32,
        min_duration,
        max_duration,
        total_puzzles: puzzle_count,
        difficulty,
        target_clues,
        total_clues,
        above_target,
        unique_solutions,
    };

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benchmark_small() {
        let results = run_benchmark(3, Difficulty::Easy).unwrap();
        assert_eq!(results.total_puzzles, 3);
        assert!(results.total_duration > Duration::from_secs(0));
        assert_eq!(
            results.unique_solutions, 3,
            "Every generated puzzle must have a unique solution"
        );
        assert!(results.average_clues() >= f64::from(Difficulty::Easy.clue_count()));
    }

    #[test]
    fn test_benchmark_invalid_count() {
        match run_benchmark(0, Difficulty::Easy) {
            Ok(_) => panic!("Should fail with zero puzzles"),
            Err(SudokuError::BenchmarkError(_)) => (),
            Err(e) => panic!("Unexpected error: {}", e),
        }
    }
}
