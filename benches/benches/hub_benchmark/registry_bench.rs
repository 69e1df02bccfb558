use std::{
    hint::black_box,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use statehub::{listener_fn, Listener, NotificationHub};

fn noop(i: usize) -> Arc<dyn Listener<u64>> {
    listener_fn(format!("l{i}"), |_: &u64| Ok(()))
}

/// register + unregister одного слушателя при разном размере реестра.
pub fn bench_register_unregister(c: &mut Criterion) {
    let mut group = c.benchmark_group("register_unregister");

    for &size in &[0usize, 16, 256] {
        let hub = NotificationHub::new(0u64);
        for i in 0..size {
            hub.register(noop(i)).unwrap();
        }
        let probe = noop(usize::MAX);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                hub.register(probe.clone()).unwrap();
                black_box(hub.unregister(&probe));
            });
        });
    }

    group.finish();
}

/// `current_state` под конкурирующей записью из фонового потока.
pub fn bench_contended_read(c: &mut Criterion) {
    let hub = Arc::new(NotificationHub::new(0u64));
    for i in 0..8 {
        hub.register(noop(i)).unwrap();
    }

    let stop = Arc::new(AtomicBool::new(false));
    let writer = {
        let hub = Arc::clone(&hub);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut v = 0;
            while !stop.load(Ordering::Relaxed) {
                v += 1;
                let _ = hub.set_state(v);
            }
        })
    };

    c.bench_function("current_state_contended", |b| {
        b.iter(|| black_box(hub.current_state()));
    });

    stop.store(true, Ordering::Relaxed);
    let _ = writer.join();
}

criterion_group!(benches, bench_register_unregister, bench_contended_read);
criterion_main!(benches);
