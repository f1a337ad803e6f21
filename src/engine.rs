use crate::counters::Counters;
use crate::output::ResultSink;
use crate::queue::WorkQueue;
use crate::resolver::Resolve;
use crate::types::{Hit, ResolutionOutcome, ScanError, ScanSummary};
use crate::utils;
use log::{debug, info, trace};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Fixed-size set of workers draining one [`WorkQueue`] against one target domain.
pub struct WorkerPool {
    domain: Arc<str>,
    threads: usize,
    resolver: Arc<dyn Resolve>,
    sink: Arc<dyn ResultSink>,
}

impl WorkerPool {
    pub fn new(
        domain: &str,
        threads: usize,
        resolver: Arc<dyn Resolve>,
        sink: Arc<dyn ResultSink>,
    ) -> Result<Self, ScanError> {
        if threads == 0 {
            return Err(ScanError::ConfigError("Thread count must be at least 1".to_string()));
        }

        Ok(Self {
            domain: Arc::from(domain),
            threads,
            resolver,
            sink,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Drain `queue` and report what happened.
    ///
    /// Returns once every worker has stopped, either because the queue ran
    /// dry or because `cancel` fired. The summary is read only after that
    /// point, so no worker is still touching the counters.
    pub async fn scan(&self, queue: WorkQueue, cancel: CancellationToken) -> ScanSummary {
        let counters = Arc::new(Counters::new());
        let start = Instant::now();

        self.run(Arc::new(queue), counters.clone(), cancel.clone()).await;

        let (found, tried) = counters.snapshot();
        ScanSummary {
            found,
            tried,
            elapsed: start.elapsed(),
            interrupted: cancel.is_cancelled(),
        }
    }

    /// Spawn the workers and wait for all of them to exit.
    ///
    /// A panicking worker is a logic bug and is re-raised here rather than
    /// reported as a scan result.
    pub async fn run(&self, queue: Arc<WorkQueue>, counters: Arc<Counters>, cancel: CancellationToken) {
        info!(
            "Scanning {} candidates against {} with {} workers",
            queue.len(),
            self.domain,
            self.threads
        );

        let mut workers = JoinSet::new();
        for id in 0..self.threads {
            let worker = Worker {
                id,
                domain: self.domain.clone(),
                queue: queue.clone(),
                counters: counters.clone(),
                resolver: self.resolver.clone(),
                sink: self.sink.clone(),
                cancel: cancel.clone(),
            };
            workers.spawn(worker.run());
        }

        let mut handled = 0;
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(count) => handled += count,
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(e) => panic!("worker task aborted: {}", e),
            }
        }

        let (found, tried) = counters.snapshot();
        info!(
            "Workers finished: {} handled, {} found, {} left in queue",
            handled,
            found,
            queue.len()
        );
        debug_assert!(found <= tried);
    }
}

struct Worker {
    id: usize,
    domain: Arc<str>,
    queue: Arc<WorkQueue>,
    counters: Arc<Counters>,
    resolver: Arc<dyn Resolve>,
    sink: Arc<dyn ResultSink>,
    cancel: CancellationToken,
}

impl Worker {
    async fn run(self) -> usize {
        let mut handled = 0;

        loop {
            if self.cancel.is_cancelled() {
                trace!("worker {} stopping on cancellation", self.id);
                break;
            }

            let Some(prefix) = self.queue.try_pop() else {
                break;
            };

            let fqdn = utils::fqdn(&prefix, &self.domain);
            match self.resolver.resolve(&fqdn).await {
                ResolutionOutcome::Success { addresses } => {
                    self.counters.record(true);
                    debug!("{} resolved to {} address(es)", fqdn, addresses.len());
                    self.sink.record(&Hit { fqdn, addresses });
                }
                ResolutionOutcome::Failure { reason } => {
                    self.counters.record(false);
                    trace!("{} not found ({})", fqdn, reason);
                }
            }
            handled += 1;
        }

        trace!("worker {} exiting after {} lookups", self.id, handled);
        handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FailureReason;
    use async_trait::async_trait;

    struct NeverFound;

    #[async_trait]
    impl Resolve for NeverFound {
        async fn resolve(&self, _fqdn: &str) -> ResolutionOutcome {
            ResolutionOutcome::failure(FailureReason::NxDomain)
        }
    }

    struct NullSink;

    impl ResultSink for NullSink {
        fn record(&self, _hit: &Hit) {}
    }

    #[test]
    fn test_zero_threads_rejected() {
        let result = WorkerPool::new("example.com", 0, Arc::new(NeverFound), Arc::new(NullSink));
        assert!(matches!(result, Err(ScanError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_empty_queue_finishes_immediately() {
        let pool = WorkerPool::new("example.com", 4, Arc::new(NeverFound), Arc::new(NullSink)).unwrap();
        let summary = pool.scan(WorkQueue::new(), CancellationToken::new()).await;

        assert_eq!(summary.tried, 0);
        assert_eq!(summary.found, 0);
        assert!(!summary.interrupted);
    }

    #[tokio::test]
    async fn test_pre_cancelled_pool_does_no_work() {
        let pool = WorkerPool::new("example.com", 4, Arc::new(NeverFound), Arc::new(NullSink)).unwrap();
        let queue: WorkQueue = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let summary = pool.scan(queue, cancel).await;
        assert_eq!(summary.tried, 0);
        assert!(summary.interrupted);
    }
}
