//! Benchmarks for the scheduler's queue operations.
//!
//! Benchmarks cover:
//! - Enqueue/pop across mixed priority classes
//! - Preemptive removal by name (linear scan)
//! - Synchronous drain end to end

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use jobtick::config::SchedulerConfig;
use jobtick::core::{Job, JobExecutor, Priority, PriorityQueues, Scheduler};

// ============================================================================
// Helper Functions
// ============================================================================

fn priority_for(i: usize) -> Priority {
    match i % 3 {
        0 => Priority::High,
        1 => Priority::Normal,
        _ => Priority::Low,
    }
}

fn build_job(i: usize) -> Job<u64> {
    Job::new(format!("job-{i}"), i as u64, priority_for(i))
}

#[derive(Clone)]
struct NoOpExecutor;

impl JobExecutor<u64, u64> for NoOpExecutor {
    fn execute(&self, payload: u64) -> u64 {
        payload
    }
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_enqueue_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue/enqueue_pop");
    for size in [100usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut q = PriorityQueues::new();
                for i in 0..size {
                    q.enqueue(build_job(i));
                }
                while let Some(job) = q.pop_next() {
                    black_box(job);
                }
            });
        });
    }
    group.finish();
}

fn bench_remove_by_name(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue/remove_by_name");
    for size in [100usize, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let mut q = PriorityQueues::new();
                    for i in 0..size {
                        q.enqueue(Job::new(format!("job-{i}"), i as u64, Priority::Normal));
                    }
                    q
                },
                |mut q| {
                    // Worst case: the target sits at the back of its class.
                    black_box(q.remove_by_name(&format!("job-{}", size - 1), Priority::Normal));
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_process_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduler/process_all");
    for size in [100usize, 1_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let sched =
                        Scheduler::new(SchedulerConfig::new(), NoOpExecutor).unwrap();
                    for i in 0..size {
                        sched
                            .schedule(format!("job-{i}"), i as u64, priority_for(i))
                            .unwrap();
                    }
                    sched
                },
                |sched| black_box(sched.process_all()),
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_enqueue_pop, bench_remove_by_name, bench_process_all);
criterion_main!(benches);
