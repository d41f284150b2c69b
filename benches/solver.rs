use criterion::{criterion_group, criterion_main, Criterion};
use satori::sat::cnf::Cnf;
use satori::sat::solver::Solver;
use satori::sudoku::solver::Board;
use std::hint::black_box;

/// Pigeonhole formula over `pigeons * holes` variables; unsatisfiable when
/// pigeons exceed holes.
fn pigeonhole(pigeons: i32, holes: i32) -> Cnf {
    let var = |p: i32, h: i32| (p - 1) * holes + h;
    let mut clauses: Vec<Vec<i32>> = Vec::new();
    for p in 1..=pigeons {
        clauses.push((1..=holes).map(|h| var(p, h)).collect());
    }
    for h in 1..=holes {
        for p in 1..=pigeons {
            for q in (p + 1)..=pigeons {
                clauses.push(vec![-var(p, h), -var(q, h)]);
            }
        }
    }
    Cnf::new(clauses)
}

/// A long implication chain anchored by a unit; pure propagation.
fn chain(n: i32) -> Cnf {
    let mut clauses: Vec<Vec<i32>> = vec![vec![1]];
    for v in 1..n {
        clauses.push(vec![-v, v + 1]);
    }
    Cnf::new(clauses)
}

fn bench_pigeonhole(c: &mut Criterion) {
    let cnf = pigeonhole(6, 5);
    c.bench_function("pigeonhole 6 into 5", |b| {
        b.iter(|| {
            let mut solver = Solver::new(cnf.clone());
            black_box(solver.solve());
        });
    });
}

fn bench_chain(c: &mut Criterion) {
    let cnf = chain(5_000);
    c.bench_function("implication chain 5k", |b| {
        b.iter(|| {
            let mut solver = Solver::new(cnf.clone());
            black_box(solver.solve());
        });
    });
}

fn bench_sudoku(c: &mut Criterion) {
    let board = Board::parse(
        "530070000\n600195000\n098000060\n800060003\n400803001\n700020006\n060000280\n000419005\n000080079\n",
    )
    .unwrap();
    let cnf: Cnf = board.to_cnf();
    c.bench_function("sudoku classic", |b| {
        b.iter(|| {
            let mut solver = Solver::new(cnf.clone());
            black_box(solver.solve());
        });
    });
}

criterion_group!(benches, bench_pigeonhole, bench_chain, bench_sudoku);
criterion_main!(benches);
