//! Benchmarks for the scheduling hot path.
//!
//! Benchmarks cover:
//! - First-fit admission over large pending lists
//! - Full scheduler ticks with a scripted launcher

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::time::Duration;

use sim_batch_scheduler::core::{admit, BatchScheduler, JobDescriptor, JobId, Phase, SchedulerLimits};
use sim_batch_scheduler::infra::launcher::{Script, ScriptedLauncher};
use tokio::runtime::Runtime;

// ============================================================================
// Admission
// ============================================================================

fn requirements(n: usize) -> Vec<(JobId, u32)> {
    (0..n)
        .map(|i| (JobId(i), u32::try_from(i % 7 + 1).unwrap_or(1)))
        .collect()
}

fn bench_admit(c: &mut Criterion) {
    let mut group = c.benchmark_group("admit");
    for size in [10usize, 100, 1_000, 10_000] {
        let pending = requirements(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &pending, |b, pending| {
            b.iter(|| admit(black_box(pending.iter().copied()), black_box(64)));
        });
    }
    group.finish();
}

// ============================================================================
// Full batch
// ============================================================================

fn bench_full_batch(c: &mut Criterion) {
    let rt = Runtime::new().expect("tokio runtime");
    let mut group = c.benchmark_group("batch");
    for jobs in [50usize, 500] {
        group.bench_with_input(BenchmarkId::from_parameter(jobs), &jobs, |b, &jobs| {
            b.iter(|| {
                rt.block_on(async {
                    let descriptors = (0..jobs)
                        .map(|i| JobDescriptor::new(format!("jobs/{i}.sh"), u32::try_from(i % 4 + 1).unwrap_or(1)))
                        .collect();
                    let limits = SchedulerLimits::new(16).with_poll_interval(Duration::ZERO);
                    let mut scheduler =
                        BatchScheduler::new(limits, ScriptedLauncher::new(Script::instant(0)));
                    scheduler.seed(descriptors).expect("seed");
                    while scheduler.phase() != Phase::Terminated {
                        black_box(scheduler.tick().await.expect("tick"));
                    }
                });
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_admit, bench_full_batch);
criterion_main!(benches);
