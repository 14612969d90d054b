//! Scheduling core: jobs, queues, registry, the scheduler controller.

pub mod error;
pub mod executor;
pub mod job;
pub mod queue;
pub mod registry;
pub mod scheduler;

pub use error::{AppResult, SchedulerError};
pub use executor::{GroupByLength, JobExecutor};
pub use job::{Job, Priority};
pub use queue::PriorityQueues;
pub use registry::JobRegistry;
pub use scheduler::{Scheduler, SchedulerStats};
