//! Job execution traits and the placeholder execution engine.

use std::collections::HashMap;

/// Abstraction for executing a job payload and producing a result.
///
/// The executor is the business-logic seam of the scheduler: payload in,
/// result out, no side effects visible to the scheduler beyond the return
/// value. It is invoked synchronously, once per job, either by the background
/// worker or (on preemption backpressure) directly by the caller thread.
///
/// The scheduler assumes nothing about running time beyond "does not block
/// indefinitely"; a slow executor stalls the worker's tick loop, which is an
/// accepted limitation.
///
/// # Example
///
/// ```rust,ignore
/// use jobtick::core::JobExecutor;
///
/// #[derive(Clone)]
/// struct WordCount;
///
/// impl JobExecutor<String, usize> for WordCount {
///     fn execute(&self, payload: String) -> usize {
///         payload.split_whitespace().count()
///     }
/// }
/// ```
pub trait JobExecutor<P, R>: Send + Sync + Clone + 'static
where
    P: Send + 'static,
    R: Send + 'static,
{
    /// Execute a job payload and return the result.
    ///
    /// Called from a worker thread or a caller thread; never while the
    /// scheduler's queue lock is held.
    fn execute(&self, payload: P) -> R;
}

/// Placeholder execution engine: groups strings by their length.
///
/// Stands in for real payload processing; only its signature matters to the
/// scheduler contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupByLength;

impl JobExecutor<Vec<String>, HashMap<usize, Vec<String>>> for GroupByLength {
    fn execute(&self, payload: Vec<String>) -> HashMap<usize, Vec<String>> {
        let mut grouped: HashMap<usize, Vec<String>> = HashMap::new();
        for item in payload {
            grouped.entry(item.len()).or_default().push(item);
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_length() {
        let engine = GroupByLength;
        let input = vec![
            "apple".to_string(),
            "kiwi".to_string(),
            "grape".to_string(),
            "fig".to_string(),
        ];
        let grouped = engine.execute(input);

        assert_eq!(grouped[&5], vec!["apple".to_string(), "grape".to_string()]);
        assert_eq!(grouped[&4], vec!["kiwi".to_string()]);
        assert_eq!(grouped[&3], vec!["fig".to_string()]);
    }

    #[test]
    fn test_group_by_length_empty_payload() {
        let engine = GroupByLength;
        assert!(engine.execute(vec![]).is_empty());
    }
}
