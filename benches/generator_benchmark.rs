use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use sudokugen::generator::BoardGenerator;
use sudokugen::Difficulty;

fn generate_benchmark(c: &mut Criterion) {
    // Create a benchmark group
    let mut group = c.benchmark_group("sudoku_generator");
    group.sample_size(10); // Uniqueness checks make each generation expensive

    for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
        group.bench_with_input(
            BenchmarkId::new("generate", difficulty),
            &difficulty,
            |b, &difficulty| {
                b.iter(|| {
                    let mut generator = BoardGenerator::from_seed(42);
                    generator.generate(difficulty).unwrap()
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, generate_benchmark);
criterion_main!(benches);
