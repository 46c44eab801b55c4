use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use unblock_board::parser::puzzle_from_str;
use unblock_board::{GameState, Puzzle};
use unblock_solver::heuristics::registry;
use unblock_solver::{AStar, BreadthFirst, Solver};

fn bench_solvers(c: &mut Criterion) {
    let bench_data = bench_puzzles();

    let mut group = c.benchmark_group("Unblock Solver");
    for (puzzle, start, moves) in &bench_data {
        group.bench_function(BenchmarkId::new("Breadth-First", moves), |b| {
            b.iter(|| BreadthFirst::new().solve(puzzle, start.clone()))
        });
        for (key, heuristic) in registry() {
            let mut solver = AStar::new(heuristic);
            group.bench_function(BenchmarkId::new(format!("A* {}", key), moves), |b| {
                b.iter(|| solver.solve(puzzle, start.clone()))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_solvers);
criterion_main!(benches);

/// Fixture puzzles paired with their optimal move count.
fn bench_puzzles() -> Vec<(Puzzle, GameState, usize)> {
    let two_move = "\
6
2
1 h 2 1 3
2 v 1 5 3
";
    let four_move = "\
6
5
1 h 2 2 3
2 v 3 4 2
3 h 2 5 5
4 v 2 1 5
5 v 3 6 1
";

    vec![(two_move, 2), (four_move, 4)]
        .into_iter()
        .map(|(text, moves)| {
            let (puzzle, start) = puzzle_from_str(text).expect("the fixture puzzles are valid");
            (puzzle, start, moves)
        })
        .collect()
}
