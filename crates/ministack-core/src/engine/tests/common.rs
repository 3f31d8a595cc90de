use super::*;

/// Fixed start time for the manual clock: 2023-11-14T22:13:20Z.
pub(super) const START_MS: u64 = 1_700_000_000_000;

pub(super) fn test_setup() -> (QueueEngine, Arc<ManualClock>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(RocksDbStorage::open(dir.path()).unwrap());
    let clock = Arc::new(ManualClock::new(START_MS));
    let engine = QueueEngine::with_clock(storage, clock.clone());
    (engine, clock, dir)
}

/// Helper: create an engine sharing an existing storage (for restart tests).
pub(super) fn test_setup_with_storage(
    storage: Arc<dyn Storage>,
    clock: Arc<ManualClock>,
) -> QueueEngine {
    QueueEngine::with_clock(storage, clock)
}

/// Helper: payloads of received messages as strings, in delivery order.
pub(super) fn bodies(messages: &[Message]) -> Vec<String> {
    messages
        .iter()
        .map(|m| String::from_utf8(m.payload.clone()).unwrap())
        .collect()
}

pub(super) fn send_str(engine: &QueueEngine, queue: &str, body: &str) -> uuid::Uuid {
    engine.send(queue, body.as_bytes().to_vec()).unwrap()
}
