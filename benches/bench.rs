use criterion::{criterion_group, criterion_main, Criterion};
use nonogram_solver::puzzle::parse::parse_puzzle_text;
use nonogram_solver::solver::engine::{SolveOptions, Solver};
use std::hint::black_box;

const HEART: &str = "\
rows
1 1
5
5
3
1
columns
2
4
4
4
2
";

const FLAG: &str = "\
color red r
color blue b
rows
1blue 1red
1blue 1red
1blue 1red
columns
3blue
0
3red
";

const XOR: &str = "\
rows
1
1
columns
1
1
";

fn bench_propagation(c: &mut Criterion) {
    let board = parse_puzzle_text(HEART).unwrap();
    let solver = Solver::new(SolveOptions::default());

    c.bench_function("heart 5x5 - propagation only", |b| {
        b.iter(|| {
            let result = solver.solve(black_box(&board));
            black_box(result);
        })
    });
}

fn bench_colored(c: &mut Criterion) {
    let board = parse_puzzle_text(FLAG).unwrap();
    let solver = Solver::new(SolveOptions::default());

    c.bench_function("flag 3x3 - colored", |b| {
        b.iter(|| {
            let result = solver.solve(black_box(&board));
            black_box(result);
        })
    });
}

fn bench_search(c: &mut Criterion) {
    let board = parse_puzzle_text(XOR).unwrap();
    let solver = Solver::new(SolveOptions::default());

    c.bench_function("xor 2x2 - probing and search", |b| {
        b.iter(|| {
            let result = solver.solve(black_box(&board));
            black_box(result);
        })
    });
}

criterion_group!(benches, bench_propagation, bench_colored, bench_search);
criterion_main!(benches);
