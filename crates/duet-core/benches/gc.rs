//! Collector benchmarks: allocation churn and full-cycle cost on a
//! live graph.

use criterion::{criterion_group, criterion_main, Criterion};
use duet_core::Vm;
use std::hint::black_box;

fn bench_alloc_churn(c: &mut Criterion) {
    c.bench_function("alloc_churn_10k", |b| {
        b.iter(|| {
            let mut vm = Vm::new();
            for i in 0..10_000 {
                vm.push_int(black_box(i)).unwrap();
                if vm.stack_depth() > 32 {
                    vm.pop().unwrap();
                }
            }
            black_box(vm.live_objects())
        })
    });
}

fn bench_collect_live_chain(c: &mut Criterion) {
    c.bench_function("collect_chain_10k", |b| {
        let mut vm = Vm::new();
        vm.push_int(0).unwrap();
        vm.push_int(1).unwrap();
        vm.push_pair().unwrap();
        for i in 0..10_000 {
            vm.push_int(i).unwrap();
            vm.push_pair().unwrap();
        }

        // Everything stays rooted: each iteration re-marks and
        // re-sweeps the whole live chain.
        b.iter(|| black_box(vm.collect()))
    });
}

criterion_group!(benches, bench_alloc_churn, bench_collect_live_chain);
criterion_main!(benches);
