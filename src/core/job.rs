//! Job and priority-class definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Priority class of a job.
///
/// Determines pop order only: every pending HIGH job is popped before any
/// NORMAL, and every NORMAL before any LOW. Within one class, order matches
/// scheduling (arrival) order. The class says nothing about when a tick fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Popped only when no NORMAL or HIGH job is pending.
    Low,
    /// Popped when no HIGH job is pending.
    Normal,
    /// Always popped first.
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "HIGH"),
            Self::Normal => write!(f, "NORMAL"),
            Self::Low => write!(f, "LOW"),
        }
    }
}

/// A scheduled unit of work.
///
/// Immutable once created; only its location changes (which queue it sits in,
/// whether it is still pending). A job is consumed when it is popped for
/// execution or preempted - it is never re-enqueued.
#[derive(Debug, Clone)]
pub struct Job<P> {
    /// Unique name; string identity across the whole scheduler.
    pub name: String,
    /// Opaque payload handed to the executor. The scheduler never inspects it.
    pub payload: P,
    /// Priority class; fixed at creation.
    pub priority: Priority,
}

impl<P> Job<P> {
    /// Create a new job.
    pub fn new(name: impl Into<String>, payload: P, priority: Priority) -> Self {
        Self {
            name: name.into(),
            payload,
            priority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_display() {
        assert_eq!(Priority::High.to_string(), "HIGH");
        assert_eq!(Priority::Normal.to_string(), "NORMAL");
        assert_eq!(Priority::Low.to_string(), "LOW");
    }

    #[test]
    fn test_priority_serde_round_trip() {
        let json = serde_json::to_string(&Priority::Normal).unwrap();
        assert_eq!(json, "\"normal\"");
        let back: Priority = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Priority::Normal);
    }
}
