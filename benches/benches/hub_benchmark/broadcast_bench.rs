use std::{
    hint::black_box,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use statehub::{listener_fn, NotificationHub};

fn hub_with_listeners(
    count: usize,
    sink: &Arc<AtomicU64>,
) -> NotificationHub<u64> {
    let hub = NotificationHub::new(0u64);
    for i in 0..count {
        let sink = Arc::clone(sink);
        hub.register(listener_fn(format!("l{i}"), move |s: &u64| {
            sink.fetch_add(*s, Ordering::Relaxed);
            Ok(())
        }))
        .unwrap();
    }
    hub
}

/// Стоимость `set_state` в зависимости от числа слушателей.
pub fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_state_fan_out");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));

    for &count in &[0usize, 1, 8, 64, 512] {
        let sink = Arc::new(AtomicU64::new(0));
        let hub = hub_with_listeners(count, &sink);
        group.throughput(Throughput::Elements(count.max(1) as u64));

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            let mut v = 0u64;
            b.iter(|| {
                v += 1;
                hub.set_state(black_box(v)).unwrap();
            });
        });
    }

    group.finish();
}

/// Цена `catch_unwind` на 64 слушателях.
pub fn bench_catch_panics(c: &mut Criterion) {
    let mut group = c.benchmark_group("catch_panics");
    let sink = Arc::new(AtomicU64::new(0));

    for catch in [true, false] {
        let hub = NotificationHub::builder(0u64).catch_panics(catch).build();
        for i in 0..64 {
            let sink = Arc::clone(&sink);
            hub.register(listener_fn(format!("l{i}"), move |s: &u64| {
                sink.fetch_add(*s, Ordering::Relaxed);
                Ok(())
            }))
            .unwrap();
        }

        group.bench_function(BenchmarkId::from_parameter(catch), |b| {
            b.iter(|| hub.update_state(|s| black_box(s + 1)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fan_out, bench_catch_panics);
criterion_main!(benches);
