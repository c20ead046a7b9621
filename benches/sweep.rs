//! Performance measurement for message-passing sweeps at varying grid sizes

// Criterion macros generate undocumented functions
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use loopypatch::algorithm::engine::{EngineParams, LoopyEngine};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

const PATCH_SIZE: usize = 8;
const OVERLAP_WIDTH: usize = 2;
const DICTIONARY_SIZE: usize = 32;
const CANDIDATES_PER_NODE: usize = 4;

fn synthetic_engine(grid_rows: usize, grid_cols: usize) -> Option<LoopyEngine> {
    let mut rng = StdRng::seed_from_u64(12345);

    let dictionary = Array2::from_shape_fn(
        (DICTIONARY_SIZE, PATCH_SIZE * PATCH_SIZE),
        |_| rng.random_range(0..256),
    );

    let node_count = grid_rows * grid_cols;
    let candidates = Array2::from_shape_fn((node_count, CANDIDATES_PER_NODE), |_| {
        rng.random_range(0..DICTIONARY_SIZE)
    });
    let uniform = 1.0 / CANDIDATES_PER_NODE as f64;
    let priors = Array2::from_elem((node_count, CANDIDATES_PER_NODE), uniform);

    let params = EngineParams {
        grid_rows,
        grid_cols,
        patch_size: PATCH_SIZE,
        overlap_width: OVERLAP_WIDTH,
        two_sigma_squared: 0.1,
        seed: 6789,
    };
    LoopyEngine::new(params, &dictionary, &candidates, &priors).ok()
}

/// Measures a full sweep as the grid grows from 4x4 to 16x16
fn bench_execute_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("execute_sweep");

    for side in &[4_usize, 8, 16] {
        let Some(mut engine) = synthetic_engine(*side, *side) else {
            group.finish();
            return;
        };

        group.bench_with_input(BenchmarkId::from_parameter(side), side, |b, _| {
            b.iter(|| {
                if engine.execute_sweep().is_err() {
                    unreachable!("sweep on synthetic inputs must succeed");
                }
                black_box(engine.sweeps_executed());
            });
        });
    }

    group.finish();
}

/// Measures posterior extraction after the messages have settled
fn bench_posterior_readout(c: &mut Criterion) {
    let Some(mut engine) = synthetic_engine(8, 8) else {
        return;
    };
    for _ in 0..5 {
        if engine.execute_sweep().is_err() {
            return;
        }
    }

    c.bench_function("posterior_readout_8x8", |b| {
        b.iter(|| black_box(engine.posteriors()));
    });
}

criterion_group!(benches, bench_execute_sweep, bench_posterior_readout);
criterion_main!(benches);
