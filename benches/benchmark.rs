use criterion::measurement::WallTime;
use criterion::BenchmarkGroup;
use criterion::BenchmarkId;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::{
    sync::{atomic::AtomicBool, Arc},
    thread::*,
};

extern crate libtwolock;

use libtwolock::dekker::*;
use libtwolock::harness::run_participant;
use libtwolock::mutex_lock::*;
use libtwolock::peterson::*;
use libtwolock::spin_lock::*;
use libtwolock::*;

const ITERATION: u64 = 10_000;
const THREAD_NUM: usize = 2;

pub fn lock_bench(bencher: &mut Criterion) {
    let mut group = bencher.benchmark_group("Two Participant Locks");

    for iterations in [ITERATION, ITERATION * 10].iter() {
        bench_inner(MutexLock::new().into(), &mut group, *iterations);
        bench_inner(SpinLock::new().into(), &mut group, *iterations);
        bench_inner(PetersonLock::new().into(), &mut group, *iterations);
        bench_inner(DekkerLock::new().into(), &mut group, *iterations);
    }

    group.finish();
}

#[inline]
fn bench_inner(lock: LockType, bencher: &mut BenchmarkGroup<WallTime>, iterations: u64) {
    let name = lock.to_string();
    let lock = Arc::new(lock);

    bencher.bench_with_input(BenchmarkId::new(name, iterations), &iterations, |b, i| {
        b.iter(|| {
            let counter = Arc::new(SharedCounter::new());
            black_box(contended_counter(lock.clone(), counter.clone(), *i));
            assert_eq!(counter.get(), 0);
        });
    });
}

fn contended_counter(lock: Arc<LockType>, counter: Arc<SharedCounter>, iterations: u64) {
    let abort = Arc::new(AtomicBool::new(false));

    let res = (0..THREAD_NUM)
        .map(|id| {
            let lock = lock.clone();
            let counter = counter.clone();
            let abort = abort.clone();
            Builder::new()
                .name(id.to_string())
                .spawn(move || {
                    run_participant(lock.as_ref(), id, iterations, &counter, &abort)
                        .expect("mutual exclusion violated")
                })
                .unwrap()
        })
        .collect::<Vec<_>>();

    for thread in res {
        thread.join().unwrap();
    }
}

criterion_group!(benches, lock_bench);

criterion_main!(benches);
