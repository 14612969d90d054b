//! Scheduler controller: shared pending state, background worker lifecycle,
//! and the preemption hand-off path.
//!
//! # Design
//!
//! - **One lock over the pending state**: the priority queues and the name
//!   registry mutate together inside a single critical section, so the two
//!   views can never disagree. The lock is held only around the
//!   pop/enqueue/remove step, never while the executor runs.
//! - **No busy-polling**: the worker thread blocks on
//!   `crossbeam_channel::select!` over {stop signal, immediate hand-off,
//!   timer tick} and wakes only when one of them fires.
//! - **Zero-loss preemption**: `process_now` hands the job to the worker
//!   through a bounded channel; when the channel is saturated or no worker is
//!   running, the caller's own thread executes the job instead.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, select, tick, Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::SchedulerConfig;

use super::error::SchedulerError;
use super::executor::JobExecutor;
use super::job::{Job, Priority};
use super::queue::PriorityQueues;
use super::registry::JobRegistry;

/// Snapshot of scheduler activity.
#[derive(Debug, Clone, Default)]
pub struct SchedulerStats {
    /// Jobs accepted by `schedule` since creation.
    pub scheduled_jobs: u64,
    /// Jobs executed to completion, over all paths combined.
    pub completed_jobs: u64,
    /// Jobs pulled out of their queue by `process_now`.
    pub preempted_jobs: u64,
    /// Jobs currently pending in the priority queues.
    pub pending_jobs: usize,
}

/// Lock-free activity counters.
#[derive(Debug, Default)]
struct SchedCounters {
    scheduled: AtomicU64,
    completed: AtomicU64,
    preempted: AtomicU64,
}

impl SchedCounters {
    fn snapshot(&self, pending_jobs: usize) -> SchedulerStats {
        SchedulerStats {
            scheduled_jobs: self.scheduled.load(Ordering::Relaxed),
            completed_jobs: self.completed.load(Ordering::Relaxed),
            preempted_jobs: self.preempted.load(Ordering::Relaxed),
            pending_jobs,
        }
    }
}

/// Queues and registry composed under one lock.
///
/// Invariant: a pending job is in exactly one priority deque AND in the
/// registry. Every method here maintains both sides in the same step.
#[derive(Debug)]
struct PendingSet<P> {
    queues: PriorityQueues<P>,
    registry: JobRegistry,
}

impl<P> PendingSet<P> {
    fn new() -> Self {
        Self {
            queues: PriorityQueues::new(),
            registry: JobRegistry::new(),
        }
    }

    fn insert(&mut self, job: Job<P>) -> Result<(), SchedulerError> {
        self.registry.register(&job.name, job.priority)?;
        self.queues.enqueue(job);
        Ok(())
    }

    fn pop_next(&mut self) -> Option<Job<P>> {
        let job = self.queues.pop_next()?;
        self.registry.unregister(&job.name);
        Some(job)
    }

    fn take(&mut self, name: &str) -> Result<Job<P>, SchedulerError> {
        let priority = self
            .registry
            .lookup(name)
            .ok_or_else(|| SchedulerError::JobNotFound(name.to_string()))?;
        let Some(job) = self.queues.remove_by_name(name, priority) else {
            // Registered but not queued under its recorded class. The
            // registry entry is left in place for post-mortem inspection.
            return Err(SchedulerError::InconsistentState(name.to_string()));
        };
        self.registry.unregister(name);
        Ok(job)
    }

    fn len(&self) -> usize {
        self.queues.len()
    }
}

/// Worker lifecycle state: thread handle, stop signal, hand-off channel.
struct Lifecycle<P> {
    worker: Option<JoinHandle<()>>,
    /// Dropping this sender is the stop signal; the worker's `recv` errors.
    stop_tx: Option<Sender<()>>,
    immediate_tx: Sender<Job<P>>,
    immediate_rx: Receiver<Job<P>>,
}

/// In-process priority job scheduler.
///
/// Generic over payload `P`, result `R`, and the execution engine `E`. All
/// methods take `&self`; the scheduler is safe to share across threads (for
/// example behind an `Arc`) with any number of callers invoking `schedule`,
/// `process_now`, `process_all`, `start`, and `stop` concurrently.
pub struct Scheduler<P, R, E>
where
    P: Send + 'static,
    R: Send + 'static,
    E: JobExecutor<P, R>,
{
    config: SchedulerConfig,
    executor: E,
    pending: Arc<Mutex<PendingSet<P>>>,
    counters: Arc<SchedCounters>,
    lifecycle: Mutex<Lifecycle<P>>,
    _result: PhantomData<fn() -> R>,
}

impl<P, R, E> Scheduler<P, R, E>
where
    P: Send + 'static,
    R: Send + 'static,
    E: JobExecutor<P, R>,
{
    /// Create a scheduler in the `Stopped` state.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfig`] if the configuration fails
    /// validation.
    pub fn new(config: SchedulerConfig, executor: E) -> Result<Self, SchedulerError> {
        config.validate().map_err(SchedulerError::InvalidConfig)?;
        let (immediate_tx, immediate_rx) = bounded(config.immediate_capacity);
        Ok(Self {
            config,
            executor,
            pending: Arc::new(Mutex::new(PendingSet::new())),
            counters: Arc::new(SchedCounters::default()),
            lifecycle: Mutex::new(Lifecycle {
                worker: None,
                stop_tx: None,
                immediate_tx,
                immediate_rx,
            }),
            _result: PhantomData,
        })
    }

    /// Schedule a new job.
    ///
    /// Registers the name and enqueues the job in one critical section.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::DuplicateJob`] if a job with this name is
    /// already pending; the existing job is untouched.
    pub fn schedule(
        &self,
        name: impl Into<String>,
        payload: P,
        priority: Priority,
    ) -> Result<(), SchedulerError> {
        let name = name.into();
        {
            let mut pending = self.pending.lock();
            pending.insert(Job::new(name.clone(), payload, priority))?;
        }
        self.counters.scheduled.fetch_add(1, Ordering::Relaxed);
        debug!(job = %name, priority = %priority, "job scheduled");
        Ok(())
    }

    /// Synchronously drain every pending job, highest class first, FIFO
    /// within a class. Returns the result of each executed job keyed by name.
    ///
    /// Independent of the background worker: may be called whether or not
    /// `start` has been called. When a worker is running concurrently, both
    /// contend for the same queues under the same lock; which of the two
    /// claims any given job is implementation-defined.
    pub fn process_all(&self) -> HashMap<String, R> {
        let mut results = HashMap::new();
        loop {
            let job = self.pending.lock().pop_next();
            let Some(job) = job else { break };
            let name = job.name.clone();
            let result = execute_job(&self.executor, &self.counters, job, "drain");
            results.insert(name, result);
        }
        results
    }

    /// Start the background worker. Idempotent: a second call while running
    /// is a no-op, so exactly one worker thread ever exists.
    ///
    /// The worker waits on the first of {stop signal, immediate hand-off,
    /// tick}. On a tick it pops one job by priority and executes it; a job
    /// waiting in the immediate slot always goes first.
    pub fn start(&self) {
        let mut lifecycle = self.lifecycle.lock();
        if lifecycle.worker.is_some() {
            debug!("worker already running, start is a no-op");
            return;
        }

        let (stop_tx, stop_rx) = bounded::<()>(0);
        let pending = Arc::clone(&self.pending);
        let counters = Arc::clone(&self.counters);
        let executor = self.executor.clone();
        let immediate_rx = lifecycle.immediate_rx.clone();
        let tick_interval = self.config.tick_interval();

        let handle = thread::Builder::new()
            .name(self.config.worker_thread_name.clone())
            .spawn(move || {
                run_worker::<P, R, E>(pending, counters, executor, immediate_rx, stop_rx, tick_interval);
            })
            .expect("failed to spawn scheduler worker thread");

        lifecycle.stop_tx = Some(stop_tx);
        lifecycle.worker = Some(handle);
        info!(
            tick_ms = self.config.tick_interval_ms,
            "scheduler worker started"
        );
    }

    /// Stop the background worker. Idempotent: a no-op when not running.
    ///
    /// Raises the stop signal and blocks until the worker thread has fully
    /// exited, then resets the stop signal and the immediate slot so a
    /// subsequent `start` begins from a clean state. Any preempted job still
    /// sitting in the immediate slot when the worker exits is executed
    /// synchronously here rather than discarded.
    pub fn stop(&self) {
        let drained = {
            let mut lifecycle = self.lifecycle.lock();
            let Some(handle) = lifecycle.worker.take() else {
                debug!("worker not running, stop is a no-op");
                return;
            };

            // Dropping the sender is the stop signal.
            lifecycle.stop_tx.take();
            if handle.join().is_err() {
                warn!("scheduler worker thread panicked");
            }

            // Fresh channels for the next start.
            let (immediate_tx, immediate_rx) = bounded(self.config.immediate_capacity);
            let old_rx = std::mem::replace(&mut lifecycle.immediate_rx, immediate_rx);
            lifecycle.immediate_tx = immediate_tx;

            let mut drained = Vec::new();
            while let Ok(job) = old_rx.try_recv() {
                drained.push(job);
            }
            drained
        };

        // Executed outside the lifecycle lock.
        for job in drained {
            warn!(job = %job.name, "executing job left in immediate slot at stop");
            let _ = execute_job(&self.executor, &self.counters, job, "stop-drain");
        }
        info!("scheduler worker stopped");
    }

    /// Preempt a pending job: remove it from its queue and fast-track its
    /// execution ahead of tick-driven work.
    ///
    /// The job is removed from its queue and unregistered in one atomic step,
    /// then handed to the running worker through the bounded immediate slot
    /// (non-blocking). When the slot is saturated, or no worker is running,
    /// the job is executed synchronously on the calling thread, outside every
    /// lock. Either branch executes the job exactly once.
    ///
    /// # Errors
    ///
    /// - [`SchedulerError::JobNotFound`] if no job with this name is pending.
    /// - [`SchedulerError::InconsistentState`] if the registry and the queues
    ///   disagree on the job's location (internal defect).
    pub fn process_now(&self, name: &str) -> Result<(), SchedulerError> {
        let job = {
            let mut pending = self.pending.lock();
            pending.take(name)?
        };
        self.counters.preempted.fetch_add(1, Ordering::Relaxed);

        // The lifecycle lock is held across the try_send so a concurrent
        // `stop` cannot swap the channels out from under a hand-off that
        // already succeeded. The send itself never blocks.
        let job = {
            let lifecycle = self.lifecycle.lock();
            if lifecycle.worker.is_some() {
                match lifecycle.immediate_tx.try_send(job) {
                    Ok(()) => {
                        debug!(job = name, "preempted job handed to worker");
                        return Ok(());
                    }
                    Err(TrySendError::Full(job)) => {
                        warn!(job = name, "immediate slot saturated, executing on caller thread");
                        job
                    }
                    Err(TrySendError::Disconnected(job)) => job,
                }
            } else {
                job
            }
        };

        let _ = execute_job(&self.executor, &self.counters, job, "caller");
        Ok(())
    }

    /// Current activity counters and pending-job count.
    pub fn stats(&self) -> SchedulerStats {
        let pending_jobs = self.pending.lock().len();
        self.counters.snapshot(pending_jobs)
    }
}

impl<P, R, E> Drop for Scheduler<P, R, E>
where
    P: Send + 'static,
    R: Send + 'static,
    E: JobExecutor<P, R>,
{
    fn drop(&mut self) {
        // Signal the worker but do not join; it exits at its next wait point.
        let mut lifecycle = self.lifecycle.lock();
        if lifecycle.worker.take().is_some() {
            lifecycle.stop_tx.take();
            debug!("scheduler dropped while running, worker detached");
        }
    }
}

/// Execute one job and record completion. Never called under a lock.
fn execute_job<P, R, E>(
    executor: &E,
    counters: &SchedCounters,
    job: Job<P>,
    path: &'static str,
) -> R
where
    P: Send + 'static,
    R: Send + 'static,
    E: JobExecutor<P, R>,
{
    let Job {
        name,
        payload,
        priority,
    } = job;
    debug!(job = %name, priority = %priority, path, "executing job");
    let result = executor.execute(payload);
    counters.completed.fetch_add(1, Ordering::Relaxed);
    debug!(job = %name, path, "job completed");
    result
}

/// Background worker loop: blocks on the first of {stop, hand-off, tick}.
fn run_worker<P, R, E>(
    pending: Arc<Mutex<PendingSet<P>>>,
    counters: Arc<SchedCounters>,
    executor: E,
    immediate_rx: Receiver<Job<P>>,
    stop_rx: Receiver<()>,
    tick_interval: Duration,
) where
    P: Send + 'static,
    R: Send + 'static,
    E: JobExecutor<P, R>,
{
    let ticker = tick(tick_interval);
    debug!("worker loop entered");

    loop {
        select! {
            recv(stop_rx) -> _ => {
                // Sender dropped (or signalled): cooperative shutdown.
                debug!("stop signal observed, worker exiting");
                break;
            }
            recv(immediate_rx) -> msg => {
                match msg {
                    Ok(job) => {
                        let _ = execute_job(&executor, &counters, job, "immediate");
                    }
                    Err(_) => {
                        debug!("immediate slot closed, worker exiting");
                        break;
                    }
                }
            }
            recv(ticker) -> _ => {
                // A preempted job that arrived between wake-ups goes ahead of
                // any tick-popped job.
                if let Ok(job) = immediate_rx.try_recv() {
                    let _ = execute_job(&executor, &counters, job, "immediate");
                    continue;
                }
                let job = pending.lock().pop_next();
                if let Some(job) = job {
                    let _ = execute_job(&executor, &counters, job, "tick");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::executor::GroupByLength;

    fn config() -> SchedulerConfig {
        SchedulerConfig::new()
    }

    /// Echoes the payload back and records execution order.
    #[derive(Clone)]
    struct RecordingExecutor {
        log: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingExecutor {
        fn new() -> Self {
            Self {
                log: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn executed(&self) -> Vec<String> {
            self.log.lock().clone()
        }
    }

    impl JobExecutor<String, String> for RecordingExecutor {
        fn execute(&self, payload: String) -> String {
            self.log.lock().push(payload.clone());
            payload
        }
    }

    fn recording_scheduler() -> (Scheduler<String, String, RecordingExecutor>, RecordingExecutor) {
        let executor = RecordingExecutor::new();
        let sched = Scheduler::new(config(), executor.clone()).unwrap();
        (sched, executor)
    }

    #[test]
    fn test_schedule_duplicate_name() {
        let (sched, _) = recording_scheduler();
        sched.schedule("job1", "a".into(), Priority::Normal).unwrap();

        let err = sched
            .schedule("job1", "b".into(), Priority::High)
            .unwrap_err();
        assert!(matches!(err, SchedulerError::DuplicateJob(name) if name == "job1"));

        // Original job unaffected.
        let results = sched.process_all();
        assert_eq!(results["job1"], "a");
    }

    #[test]
    fn test_process_all_priority_order() {
        let (sched, executor) = recording_scheduler();
        sched.schedule("h", "h".into(), Priority::High).unwrap();
        sched.schedule("n", "n".into(), Priority::Normal).unwrap();
        sched.schedule("l", "l".into(), Priority::Low).unwrap();

        let results = sched.process_all();
        assert_eq!(results.len(), 3);
        assert_eq!(executor.executed(), vec!["h", "n", "l"]);
    }

    #[test]
    fn test_process_all_fifo_within_class() {
        let (sched, executor) = recording_scheduler();
        for name in ["a", "b", "c"] {
            sched.schedule(name, name.into(), Priority::Normal).unwrap();
        }

        sched.process_all();
        assert_eq!(executor.executed(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_process_all_drains_to_empty() {
        let (sched, _) = recording_scheduler();
        sched.schedule("only", "only".into(), Priority::Low).unwrap();

        assert_eq!(sched.process_all().len(), 1);
        assert!(sched.process_all().is_empty());
        assert_eq!(sched.stats().pending_jobs, 0);
    }

    #[test]
    fn test_process_now_unknown_job() {
        let (sched, _) = recording_scheduler();
        let err = sched.process_now("ghost").unwrap_err();
        assert!(matches!(err, SchedulerError::JobNotFound(name) if name == "ghost"));
    }

    #[test]
    fn test_process_now_without_worker_runs_on_caller() {
        let (sched, executor) = recording_scheduler();
        sched.schedule("x", "x".into(), Priority::Low).unwrap();

        // No worker running: synchronous fallback on this thread.
        sched.process_now("x").unwrap();
        assert_eq!(executor.executed(), vec!["x"]);

        // The job left both queue and registry; a drain never re-processes it.
        assert!(sched.process_all().is_empty());
        let err = sched.process_now("x").unwrap_err();
        assert!(matches!(err, SchedulerError::JobNotFound(_)));
    }

    #[test]
    fn test_stats_counters() {
        let (sched, _) = recording_scheduler();
        sched.schedule("a", "a".into(), Priority::Normal).unwrap();
        sched.schedule("b", "b".into(), Priority::High).unwrap();

        let stats = sched.stats();
        assert_eq!(stats.scheduled_jobs, 2);
        assert_eq!(stats.pending_jobs, 2);
        assert_eq!(stats.completed_jobs, 0);

        sched.process_now("a").unwrap();
        sched.process_all();

        let stats = sched.stats();
        assert_eq!(stats.completed_jobs, 2);
        assert_eq!(stats.preempted_jobs, 1);
        assert_eq!(stats.pending_jobs, 0);
    }

    #[test]
    fn test_group_by_length_end_to_end() {
        let sched = Scheduler::new(config(), GroupByLength).unwrap();
        sched
            .schedule(
                "fruit",
                vec!["apple".to_string(), "kiwi".to_string(), "grape".to_string()],
                Priority::Normal,
            )
            .unwrap();

        let results = sched.process_all();
        let grouped = &results["fruit"];
        assert_eq!(grouped[&5], vec!["apple".to_string(), "grape".to_string()]);
        assert_eq!(grouped[&4], vec!["kiwi".to_string()]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cfg = SchedulerConfig::new().with_tick_interval_ms(0);
        let err = Scheduler::new(cfg, GroupByLength)
            .err()
            .expect("zero tick interval must be rejected");
        assert!(matches!(err, SchedulerError::InvalidConfig(_)));
    }
}
