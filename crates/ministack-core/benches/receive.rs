use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ministack_core::{ManualClock, QueueEngine, RocksDbStorage};
use std::sync::Arc;

/// Build a queue with `hidden` messages parked behind a long visibility
/// timeout and a single visible message in front of them.
fn engine_with_hidden_backlog(hidden: usize) -> (QueueEngine, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(RocksDbStorage::open(dir.path()).unwrap());
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let engine = QueueEngine::with_clock(storage, clock);
    engine.create_queue("bench").unwrap();
    for i in 0..hidden {
        engine.send("bench", i.to_string().into_bytes()).unwrap();
    }
    engine.receive("bench", hidden, 3600).unwrap();
    engine.send("bench", b"visible".to_vec()).unwrap();
    (engine, dir)
}

/// Receive cost should track eligible messages, not partition size.
fn bench_receive_with_hidden_backlog(c: &mut Criterion) {
    let mut group = c.benchmark_group("receive_hidden_backlog");

    for hidden in [0usize, 1_000, 10_000] {
        let (engine, _dir) = engine_with_hidden_backlog(hidden);
        group.bench_with_input(BenchmarkId::from_parameter(hidden), &hidden, |b, _| {
            b.iter(|| black_box(engine.receive("bench", 1, 0).unwrap()));
        });
    }

    group.finish();
}

/// Send cost: counter read, record, index entry and counter in one batch.
fn bench_send(c: &mut Criterion) {
    let (engine, _dir) = engine_with_hidden_backlog(0);
    c.bench_function("send_1kb", |b| {
        let payload = vec![b'x'; 1024];
        b.iter(|| black_box(engine.send("bench", payload.clone()).unwrap()));
    });
}

criterion_group!(benches, bench_receive_with_hidden_backlog, bench_send);
criterion_main!(benches);
