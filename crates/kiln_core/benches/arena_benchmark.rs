//! # Arena Benchmark
//!
//! Measures the per-frame costs the host pays on the arenas:
//! 1. Bump allocation of many small scratch blocks
//! 2. `clear` (cursor rewind) versus `reset` (zero fill)
//! 3. Merging two input sources into one controller

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kiln_core::{Button, ControllerState, MemoryArena, PERSISTENT_MEMORY_SIZE, TRANSIENT_MEMORY_SIZE};

/// Fills the transient pool with small blocks, then rewinds.
fn bench_bump_allocation(c: &mut Criterion) {
    let mut group = c.benchmark_group("arena_bump_allocation");

    for block in [16usize, 64, 256] {
        let mut arena = MemoryArena::new(TRANSIENT_MEMORY_SIZE);
        let blocks = TRANSIENT_MEMORY_SIZE / block;

        group.throughput(criterion::Throughput::Bytes(TRANSIENT_MEMORY_SIZE as u64));
        group.bench_with_input(BenchmarkId::new("fill_then_clear", block), &block, |b, &size| {
            b.iter(|| {
                for _ in 0..blocks {
                    black_box(arena.allocate(size));
                }
                arena.clear();
            });
        });
    }

    group.finish();
}

/// Rewind versus zero fill on both pool sizes.
fn bench_clear_vs_reset(c: &mut Criterion) {
    let mut group = c.benchmark_group("arena_clear_vs_reset");

    for (name, capacity) in [("transient", TRANSIENT_MEMORY_SIZE), ("persistent", PERSISTENT_MEMORY_SIZE)] {
        let mut arena = MemoryArena::new(capacity);

        group.bench_function(BenchmarkId::new("clear", name), |b| {
            b.iter(|| {
                arena.allocate(64);
                arena.clear();
            });
        });

        group.bench_function(BenchmarkId::new("reset", name), |b| {
            b.iter(|| {
                arena.allocate(64);
                arena.reset();
            });
        });
    }

    group.finish();
}

/// Keyboard then gamepad merge, once per frame.
fn bench_controller_merge(c: &mut Criterion) {
    let rest = ControllerState::NEUTRAL;
    let mut keyboard = rest;
    keyboard.left_x = -1.0;
    keyboard.set_button(Button::A, true);
    let mut gamepad = rest;
    gamepad.right_y = 0.5;
    gamepad.set_button(Button::Start, true);

    c.bench_function("controller_merge_two_sources", |b| {
        let mut combined = ControllerState::NEUTRAL;
        b.iter(|| {
            combined.apply_differences(black_box(&rest), black_box(&keyboard));
            combined.apply_differences(black_box(&rest), black_box(&gamepad));
            black_box(combined);
        });
    });
}

criterion_group!(
    benches,
    bench_bump_allocation,
    bench_clear_vs_reset,
    bench_controller_merge,
);
criterion_main!(benches);
