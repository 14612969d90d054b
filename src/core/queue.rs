//! Per-class FIFO queues with a fixed pop order across classes.

use std::collections::VecDeque;

use super::job::{Job, Priority};

/// Three ordered sequences of pending jobs, one per priority class.
///
/// Insertion order is preserved within each class. `pop_next` imposes the
/// total order HIGH > NORMAL > LOW regardless of interleaving; ordering
/// across classes is otherwise unaffected by enqueues.
///
/// This type is not synchronized; the scheduler guards it (together with the
/// registry) behind a single lock.
#[derive(Debug)]
pub struct PriorityQueues<P> {
    high: VecDeque<Job<P>>,
    normal: VecDeque<Job<P>>,
    low: VecDeque<Job<P>>,
}

impl<P> Default for PriorityQueues<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> PriorityQueues<P> {
    /// Create an empty queue set.
    pub fn new() -> Self {
        Self {
            high: VecDeque::new(),
            normal: VecDeque::new(),
            low: VecDeque::new(),
        }
    }

    fn class_mut(&mut self, priority: Priority) -> &mut VecDeque<Job<P>> {
        match priority {
            Priority::High => &mut self.high,
            Priority::Normal => &mut self.normal,
            Priority::Low => &mut self.low,
        }
    }

    /// Append a job to the back of the sequence matching its priority.
    pub fn enqueue(&mut self, job: Job<P>) {
        self.class_mut(job.priority).push_back(job);
    }

    /// Pop the next job: front of HIGH if non-empty, else NORMAL, else LOW.
    ///
    /// Returns `None` when all three classes are empty.
    pub fn pop_next(&mut self) -> Option<Job<P>> {
        self.high
            .pop_front()
            .or_else(|| self.normal.pop_front())
            .or_else(|| self.low.pop_front())
    }

    /// Remove the job with the given name from the given class.
    ///
    /// Linear scan; relative order of the remaining jobs is preserved. The
    /// caller is expected to know the job's class from the registry. Returns
    /// `None` when no such job is queued in that class.
    pub fn remove_by_name(&mut self, name: &str, priority: Priority) -> Option<Job<P>> {
        let class = self.class_mut(priority);
        let idx = class.iter().position(|job| job.name == name)?;
        class.remove(idx)
    }

    /// Total number of pending jobs across all classes.
    pub fn len(&self) -> usize {
        self.high.len() + self.normal.len() + self.low.len()
    }

    /// Whether every class is empty.
    pub fn is_empty(&self) -> bool {
        self.high.is_empty() && self.normal.is_empty() && self.low.is_empty()
    }
}
