//! A Sudoku puzzle generator built on randomized backtracking.
//!
//! This program:
//! 1. Generates a fully solved 9x9 grid
//! 2. Digs out cells while keeping the solution unique
//! 3. Verifies uniqueness of the final puzzle
//! 4. Displays the puzzle and its solution
//!
//! It can also benchmark puzzle generation and show saved solve statistics.

use std::env;
use std::path::Path;
use sudokugen::generator::{count_solutions, BoardGenerator};
use sudokugen::stats::Stats;
use sudokugen::{benchmark, Difficulty};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_STATS_PATH: &str = "sudoku_stats.json";

fn main() {
    // Initialize logging with debug level
    FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_thread_names(true)
        .with_ansi(true)
        .pretty()
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    match args.get(1).map(|s| s.as_str()) {
        Some("benchmark") => {
            let count = args.get(2)
                .and_then(|s| s.parse().ok())
                .unwrap_or(100);
            let difficulty = args.get(3)
                .and_then(|s| s.parse().ok())
                .unwrap_or(Difficulty::Medium);

            info!("Running benchmark with {} {} puzzles...", count, difficulty);
            match benchmark::run_benchmark(count, difficulty) {
                Ok(results) => results.print_results(),
                Err(e) => error!("Benchmark failed: {}", e),
            }
        }
        Some("stats") => {
            let path = args.get(2).map(String::as_str).unwrap_or(DEFAULT_STATS_PATH);
            match Stats::load(Path::new(path)) {
                Ok(stats) => print_stats(&stats),
                Err(e) => error!("Failed to load stats from {}: {}", path, e),
            }
        }
        arg => {
            let difficulty = arg
                .and_then(|s| s.parse().ok())
                .unwrap_or(Difficulty::Medium);

            info!("Generating new {} puzzle...", difficulty);
            let mut generator = BoardGenerator::new();
            match generator.generate(difficulty) {
                Ok(grid) => {
                    info!("Puzzle ({} clues):", grid.clue_cells());
                    print_board(&grid.value);

                    info!("Solution:");
                    print_board(&grid.solution);

                    if count_solutions(&grid.value) == 1 {
                        info!("✅ This puzzle has a unique solution!");
                    } else {
                        error!("❌ This puzzle has multiple valid solutions!");
                    }
                }
                Err(e) => error!("Failed to generate puzzle: {}", e),
            }
        }
    }
}

/// Prints a Sudoku board in a pretty format with grid lines.
///
/// # Arguments
///
/// * `board` - A 9x9 grid represented as a slice of vectors containing integers.
///            Empty cells are represented by 0.
fn print_board(board: &[Vec<i32>]) {
    println!("┌───────┬───────┬───────┐");
    for (i, row) in board.iter().enumerate() {
        print!("│ ");
        for (j, &cell) in row.iter().enumerate() {
            if cell == 0 {
                print!("· ");
            } else {
                print!("{} ", cell);
            }
            if (j + 1) % 3 == 0 && j < 8 {
                print!("│ ");
            }
        }
        println!("│");
        if (i + 1) % 3 == 0 && i < 8 {
            println!("├───────┼───────┼───────┤");
        }
    }
    println!("└───────┴───────┴───────┘");
}

/// Prints saved solve statistics: totals, fastest time, and the leaderboard.
fn print_stats(stats: &Stats) {
    println!("\n=== Solve Statistics ===");
    println!("Puzzles Solved: {}", stats.puzzles_solved);
    match stats.fastest_time {
        Some(time) => println!("Fastest Time: {}", format_time(time)),
        None => println!("Fastest Time: --:--"),
    }
    if stats.leaderboard.is_empty() {
        println!("Leaderboard: (empty)");
    } else {
        println!("Leaderboard:");
        for (i, entry) in stats.leaderboard.iter().enumerate() {
            println!("  {}. {}", i + 1, format_time(entry.time));
        }
    }
}

/// Formats a duration in seconds as mm:ss.
fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
