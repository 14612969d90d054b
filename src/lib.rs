//! # Jobtick
//!
//! An in-process priority job scheduler with three execution modes:
//! synchronous drain, ticked background execution, and preemptive "run now".
//!
//! Jobs are named, carry an opaque payload, and belong to one of three
//! priority classes (HIGH, NORMAL, LOW). Pending jobs live in per-class FIFO
//! queues plus a name registry, both guarded by a single lock so the two views
//! never disagree. Execution of a job's payload is delegated to a pluggable
//! [`core::JobExecutor`], which the scheduler treats as a black box.
//!
//! ## Execution Modes
//!
//! - **Synchronous drain** ([`core::Scheduler::process_all`]): pop-and-execute
//!   until every class is empty, collecting results by job name.
//! - **Ticked background execution** ([`core::Scheduler::start`] /
//!   [`core::Scheduler::stop`]): a dedicated worker thread pops one job per
//!   timer tick. The worker blocks on the first of {stop signal, immediate
//!   hand-off, tick} - no busy-polling.
//! - **Preemptive bypass** ([`core::Scheduler::process_now`]): a named pending
//!   job is removed from its queue and handed to the worker through a bounded
//!   channel ahead of any tick-popped job; if the channel is saturated or no
//!   worker is running, the caller's own thread executes it.
//!
//! ## Example
//!
//! ```rust,ignore
//! use jobtick::config::SchedulerConfig;
//! use jobtick::core::{GroupByLength, Priority, Scheduler};
//!
//! let sched = Scheduler::new(SchedulerConfig::new(), GroupByLength)?;
//!
//! sched.schedule("urgent", vec!["alpha".into(), "beta".into()], Priority::High)?;
//! sched.schedule("later", vec!["x".into()], Priority::Low)?;
//!
//! // Drain synchronously...
//! let results = sched.process_all();
//!
//! // ...or run in the background and preempt a specific job.
//! sched.start();
//! sched.schedule("slow", vec!["gamma".into()], Priority::Low)?;
//! sched.process_now("slow")?;
//! sched.stop();
//! ```
//!
//! The scheduler guarantees a pending job executes exactly once across all
//! three paths combined, under any interleaving of caller threads and the
//! background worker.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

/// Scheduling core: jobs, queues, registry, the scheduler controller.
pub mod core;
/// Configuration models for the scheduler.
pub mod config;
/// Shared utilities.
pub mod util;
