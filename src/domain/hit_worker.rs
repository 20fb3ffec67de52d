//! Background hit counting for served redirects.
//!
//! The routing layer hands hits to a [`HitLogger`], which only enqueues them.
//! [`run_hit_worker`] persists them off the request path. Failures are logged
//! and counted; they are never retried and never reach the request that
//! produced the hit.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc, mpsc::error::TrySendError};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::domain::hit_event::HitEvent;
use crate::domain::repositories::RedirectRepository;

/// Cloneable, non-blocking handle for queueing redirect hits.
#[derive(Debug, Clone)]
pub struct HitLogger {
    sender: mpsc::Sender<HitEvent>,
}

impl HitLogger {
    /// Creates a logger and the receiving end of its bounded queue.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<HitEvent>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    /// Queues a hit for the given rule.
    ///
    /// Never waits and never fails: when the queue is full or the worker is
    /// gone, the hit is dropped with a warning.
    pub fn log_hit(&self, rule_id: i64) {
        match self.sender.try_send(HitEvent::new(rule_id)) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                metrics::counter!("redirect_hits_dropped_total", "reason" => "full").increment(1);
                warn!(rule_id = event.rule_id, "Hit queue full, dropping redirect hit");
            }
            Err(TrySendError::Closed(event)) => {
                metrics::counter!("redirect_hits_dropped_total", "reason" => "closed").increment(1);
                warn!(rule_id = event.rule_id, "Hit queue closed, dropping redirect hit");
            }
        }
    }

    /// Returns true if the worker has stopped receiving.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Remaining free slots in the queue.
    pub fn capacity(&self) -> usize {
        self.sender.capacity()
    }
}

/// Drains queued hits and persists them through the repository.
///
/// At most `concurrency` writes run at once, each bounded by `timeout`.
/// Returns after every [`HitLogger`] clone is dropped and all in-flight
/// writes have finished.
pub async fn run_hit_worker(
    mut rx: mpsc::Receiver<HitEvent>,
    repository: Arc<dyn RedirectRepository>,
    concurrency: usize,
    timeout: Duration,
) {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut in_flight = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };

        let repository = repository.clone();
        in_flight.spawn(async move {
            record_hit(repository.as_ref(), event, timeout).await;
            drop(permit);
        });

        while in_flight.try_join_next().is_some() {}
    }

    while in_flight.join_next().await.is_some() {}
    info!("Hit worker stopped");
}

async fn record_hit(repository: &dyn RedirectRepository, event: HitEvent, timeout: Duration) {
    match tokio::time::timeout(timeout, repository.record_hit(event.rule_id, event.hit_at)).await {
        Ok(Ok(())) => {
            debug!(rule_id = event.rule_id, "Recorded redirect hit");
        }
        Ok(Err(e)) => {
            metrics::counter!("redirect_hit_failures_total").increment(1);
            warn!(rule_id = event.rule_id, error = %e, "Failed to record redirect hit");
        }
        Err(_) => {
            metrics::counter!("redirect_hit_failures_total").increment(1);
            warn!(
                rule_id = event.rule_id,
                timeout_ms = timeout.as_millis() as u64,
                "Timed out recording redirect hit"
            );
        }
    }
}
