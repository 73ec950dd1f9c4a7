//! # Bridge Attestation Benchmarks
//!
//! | Operation | Shape |
//! |-----------|-------|
//! | Power normalization | O(n) over the validator table |
//! | Outgoing tx put | One existence check, one write |
//! | Kind listing | Reverse range scan, stops at the limit |
//! | Unsigned view | One confirmation lookup per artifact |

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use qc_18_bridge_attestation::{
    build_signer_set, prefix_upper_bound, ConfirmationLedger, OutgoingTxKind, OutgoingTxQueue,
    StoreIndex, ValidatorPower,
};
use qc_tests::support::{batch, eth, memory_keeper, validator};

// ============================================================================
// Signer set construction
// ============================================================================

fn bench_build_signer_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-18-signer-set");

    for size in [10u64, 100, 1_000] {
        let powers: Vec<ValidatorPower> = (0..size)
            .map(|i| ValidatorPower::new(validator((i % 256) as u8), 1_000_000 + i * 7))
            .collect();

        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("build", size), &powers, |b, powers| {
            b.iter(|| black_box(build_signer_set(100, powers, |_| Ok(Some(eth(1)))).is_ok()))
        });
    }

    group.finish();
}

// ============================================================================
// Outgoing tx queue
// ============================================================================

fn bench_outgoing_queue(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-18-outgoing");

    group.bench_function("put_batch", |b| {
        b.iter_batched(
            || memory_keeper(1),
            |mut keeper| black_box(keeper.put_outgoing_tx(&batch(eth(1), 1, 10)).is_ok()),
            BatchSize::SmallInput,
        )
    });

    let mut keeper = memory_keeper(1);
    for nonce in 1..=500 {
        let _ = keeper.put_outgoing_tx(&batch(eth((nonce % 4) as u8), nonce, 2));
        if nonce % 2 == 0 {
            let index = StoreIndex::batch(&eth((nonce % 4) as u8), nonce);
            let _ = keeper.put_confirmation(&index, &validator(1), b"sig");
        }
    }

    for limit in [10usize, 100] {
        group.bench_with_input(BenchmarkId::new("list_batches", limit), &limit, |b, &limit| {
            b.iter(|| black_box(keeper.outgoing_txs_by_kind(OutgoingTxKind::Batch, limit)))
        });
    }

    group.bench_function("unsigned_batches", |b| {
        b.iter(|| {
            black_box(keeper.outgoing_txs_unsigned_by(OutgoingTxKind::Batch, &validator(1)))
        })
    });

    group.finish();
}

// ============================================================================
// Key utilities
// ============================================================================

fn bench_prefix_upper_bound(c: &mut Criterion) {
    let prefix = [0x08, 0x01, 0xFF, 0xFF, 0xFF, 0xFF];
    c.bench_function("qc-18-prefix-upper-bound", |b| {
        b.iter(|| black_box(prefix_upper_bound(black_box(&prefix))))
    });
}

criterion_group!(
    benches,
    bench_build_signer_set,
    bench_outgoing_queue,
    bench_prefix_upper_bound
);
criterion_main!(benches);
