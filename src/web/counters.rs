use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Receives process-wide observability events from the HTTP layer.
///
/// The pipeline itself never touches a sink.
pub trait MetricsSink: Send + Sync {
    fn request_started(&self);
    fn request_failed(&self);
    fn logs_processed(&self, count: usize);
    fn snapshot(&self) -> CounterSnapshot;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CounterSnapshot {
    pub total_requests: u64,
    pub total_logs: u64,
    pub total_errors: u64,
}

/// Lock-free counters living for the lifetime of the server process.
#[derive(Debug, Default)]
pub struct ProcessCounters {
    total_requests: AtomicU64,
    total_logs: AtomicU64,
    total_errors: AtomicU64,
}

impl ProcessCounters {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetricsSink for ProcessCounters {
    fn request_started(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    fn request_failed(&self) {
        self.total_errors.fetch_add(1, Ordering::Relaxed);
    }

    fn logs_processed(&self, count: usize) {
        self.total_logs.fetch_add(count as u64, Ordering::Relaxed);
    }

    fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            total_logs: self.total_logs.load(Ordering::Relaxed),
            total_errors: self.total_errors.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_counters_accumulate() {
        let counters = ProcessCounters::new();
        counters.request_started();
        counters.request_started();
        counters.request_failed();
        counters.logs_processed(5);

        assert_eq!(
            counters.snapshot(),
            CounterSnapshot {
                total_requests: 2,
                total_logs: 5,
                total_errors: 1,
            }
        );
    }

    #[test]
    fn test_counters_across_threads() {
        let counters = Arc::new(ProcessCounters::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counters = Arc::clone(&counters);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        counters.request_started();
                        counters.logs_processed(2);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.total_requests, 8000);
        assert_eq!(snapshot.total_logs, 16000);
        assert_eq!(snapshot.total_errors, 0);
    }
}
