use std::time::Duration;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use serde_json::json;

use brisadb_storage::Store;

const TTL: Duration = Duration::from_secs(30);

fn bench_set_get_sequential(c: &mut Criterion) {
    c.bench_function("set_get_sequential_10k", |b| {
        b.iter(|| {
            let store = Store::new();
            for i in 0..10_000 {
                let key = format!("key:{i}");
                store.set(key.clone(), json!(format!("value:{i}")), TTL);
                black_box(store.get(&key));
            }
        })
    });
}

fn bench_mixed_concurrent(c: &mut Criterion) {
    c.bench_function("set_get_delete_4_threads_10k", |b| {
        b.iter(|| {
            let store = Store::new();
            let handles: Vec<_> = (0..4)
                .map(|t| {
                    let store = store.clone();
                    std::thread::spawn(move || {
                        for i in 0..2_500 {
                            let key = format!("key:{}", i % 200);
                            store.set(key.clone(), json!({"t": t, "i": i}), TTL);
                            black_box(store.get(&key));
                            if i % 3 == 0 {
                                store.delete(&key);
                            }
                        }
                    })
                })
                .collect();

            for h in handles {
                h.join().unwrap();
            }
        })
    });
}

fn bench_snapshot_restore(c: &mut Criterion) {
    let store = Store::new();
    for i in 0..10_000 {
        store.set(format!("key:{i}"), json!({"n": i, "tags": ["a", "b"]}), TTL);
    }

    c.bench_function("snapshot_restore_10k", |b| {
        b.iter(|| {
            let snapshot = store.snapshot();
            let target = Store::new();
            target.restore(black_box(snapshot));
        })
    });
}

fn bench_purge_expired(c: &mut Criterion) {
    c.bench_function("purge_expired_10k_half_dead", |b| {
        b.iter(|| {
            let store = Store::new();
            for i in 0..10_000 {
                let ttl = if i % 2 == 0 { Duration::ZERO } else { TTL };
                store.set(format!("key:{i}"), json!(i), ttl);
            }
            black_box(store.purge_expired());
        })
    });
}

criterion_group!(
    benches,
    bench_set_get_sequential,
    bench_mixed_concurrent,
    bench_snapshot_restore,
    bench_purge_expired,
);
criterion_main!(benches);
