use super::*;

use std::collections::HashSet;
use std::thread;

#[test]
fn concurrent_senders_get_unique_sequences() {
    let (engine, _clock, _dir) = test_setup();
    engine.create_queue("q").unwrap();
    let engine = Arc::new(engine);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for i in 0..25 {
                    engine
                        .send("q", format!("{t}-{i}").into_bytes())
                        .unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let received = engine.receive("q", 1000, 0).unwrap();
    assert_eq!(received.len(), 100);
    let ids: HashSet<_> = received.iter().map(|m| m.id).collect();
    assert_eq!(ids.len(), 100);

    let mut sequences = HashSet::new();
    for m in &received {
        let key = engine.locate_message("q", &m.id).unwrap().unwrap();
        assert!(sequences.insert(key.sequence), "sequence reused");
    }
    assert_eq!(sequences, (1..=100).collect::<HashSet<u64>>());
}

#[test]
fn concurrent_receivers_never_share_a_hidden_message() {
    let (engine, _clock, _dir) = test_setup();
    engine.create_queue("q").unwrap();
    for i in 0..50 {
        send_str(&engine, "q", &i.to_string());
    }
    let engine = Arc::new(engine);

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let mut got = Vec::new();
                loop {
                    let batch = engine.receive("q", 3, 300).unwrap();
                    if batch.is_empty() {
                        break;
                    }
                    got.extend(batch.into_iter().map(|m| m.id));
                }
                got
            })
        })
        .collect();

    let mut all = Vec::new();
    for h in handles {
        all.extend(h.join().unwrap());
    }
    assert_eq!(all.len(), 50, "each message delivered exactly once");
    let unique: HashSet<_> = all.into_iter().collect();
    assert_eq!(unique.len(), 50);
}

#[test]
fn concurrent_create_of_same_queue_is_single_entry() {
    let (engine, _clock, _dir) = test_setup();
    let engine = Arc::new(engine);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || engine.create_queue("shared").unwrap())
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(engine.list_queues().unwrap().len(), 1);
}
