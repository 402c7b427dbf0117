//! Races between allocation, free and the lock-free lookup path.

mod harness;

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::bounded;
use ioasid::{Ioasid, IoasidAllocator, SetToken};

use harness::{Payload, init_tracing};

fn allocator() -> Arc<IoasidAllocator<Payload>> {
    init_tracing();
    let allocator = IoasidAllocator::new();
    allocator.install_capacity(4096);
    Arc::new(allocator)
}

#[test]
fn test_concurrent_allocation_yields_unique_ids() {
    let allocator = allocator();
    const THREADS: usize = 4;
    const PER_THREAD: u32 = 128;

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let allocator = allocator.clone();
            thread::spawn(move || {
                let set = allocator
                    .alloc_set(SetToken::Mm(t as u64 + 1), PER_THREAD)
                    .unwrap();
                (0..PER_THREAD)
                    .map(|_| allocator.alloc(&set, 0, 4095, None).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut all = Vec::new();
    for handle in handles {
        all.extend(handle.join().unwrap());
    }

    let unique: HashSet<_> = all.iter().copied().collect();
    assert_eq!(unique.len(), THREADS * PER_THREAD as usize, "duplicate IDs minted");
}

#[test]
fn test_find_races_with_allocation() {
    let allocator = allocator();
    let set = allocator.alloc_set(SetToken::Mm(0x1), 512).unwrap();
    let (tx, rx) = bounded::<Ioasid>(64);

    let finder = {
        let allocator = allocator.clone();
        thread::spawn(move || {
            for id in rx {
                // The producer only sends after alloc returned, so the ID
                // must already be published.
                let payload = allocator
                    .find(None, id, None)
                    .expect("allocated ID not visible")
                    .expect("payload missing");
                assert_eq!(*payload, id.to_string());
            }
        })
    };

    for _ in 0..256 {
        let id = allocator.alloc(&set, 0, 4095, None).unwrap();
        allocator
            .attach_data(id, Some(Arc::new(id.to_string())))
            .unwrap();
        tx.send(id).unwrap();
    }
    drop(tx);
    finder.join().unwrap();
}

#[test]
fn test_find_races_with_free() {
    let allocator = allocator();
    let set = allocator.alloc_set(SetToken::Mm(0x1), 512).unwrap();

    let ids: Vec<Ioasid> = (0..256)
        .map(|_| {
            let id = allocator.alloc(&set, 0, 4095, None).unwrap();
            allocator
                .attach_data(id, Some(Arc::new(id.to_string())))
                .unwrap();
            id
        })
        .collect();

    let reader = {
        let allocator = allocator.clone();
        let ids = ids.clone();
        thread::spawn(move || {
            // Keep sweeping until every ID is gone. Each lookup must see
            // either the correct payload or nothing: never garbage.
            loop {
                let mut alive = 0;
                for &id in &ids {
                    if let Ok(Some(payload)) = allocator.find(None, id, None) {
                        assert_eq!(*payload, id.to_string());
                        alive += 1;
                    }
                }
                if alive == 0 {
                    break;
                }
            }
        })
    };

    for id in ids {
        allocator.free(&set, id);
    }
    reader.join().unwrap();
}

#[test]
fn test_concurrent_get_put_balance() {
    let allocator = allocator();
    let set = allocator.alloc_set(SetToken::Mm(0x1), 4).unwrap();
    let id = allocator.alloc(&set, 0, 100, None).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let allocator = allocator.clone();
            thread::spawn(move || {
                for _ in 0..1000 {
                    if allocator.get(None, id).is_ok() {
                        allocator.put(None, id);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Balanced gets and puts leave exactly the allocation reference, so
    // one free reclaims the ID.
    allocator.free(&set, id);
    assert!(allocator.find(None, id, None).is_err());
}
