//! Name index over pending jobs.

use std::collections::HashMap;

use super::error::SchedulerError;
use super::job::Priority;

/// Mapping from job name to the priority class the job is queued under.
///
/// Used for duplicate detection on schedule and for preemption lookup: the
/// recorded class tells `remove_by_name` which sequence to scan. The queues
/// own the jobs themselves; the registry only records where each one sits.
///
/// Not synchronized; the scheduler mutates it in the same critical section as
/// the queues so the two views always agree.
#[derive(Debug, Default)]
pub struct JobRegistry {
    entries: HashMap<String, Priority>,
}

impl JobRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a pending job with this name exists.
    pub fn exists(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Look up the priority class a pending job is queued under.
    pub fn lookup(&self, name: &str) -> Option<Priority> {
        self.entries.get(name).copied()
    }

    /// Record a pending job.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::DuplicateJob`] if the name is already
    /// registered; the existing entry is untouched.
    pub fn register(&mut self, name: &str, priority: Priority) -> Result<(), SchedulerError> {
        if self.entries.contains_key(name) {
            return Err(SchedulerError::DuplicateJob(name.to_string()));
        }
        self.entries.insert(name.to_string(), priority);
        Ok(())
    }

    /// Remove a pending job's entry, returning its recorded class.
    ///
    /// Must be called in the same critical section as the matching queue
    /// removal.
    pub fn unregister(&mut self, name: &str) -> Option<Priority> {
        self.entries.remove(name)
    }

    /// Number of pending jobs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no job is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
