// Request Queue - ordered pending store with atomic position assignment

use crate::domain::GenerationRequest;
use std::collections::VecDeque;
use thiserror::Error;
use tokio::sync::{Mutex, Notify};

/// Submission failures, returned synchronously to the submitter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("Queue is shut down and no longer accepts submissions")]
    QueueUnavailable,
}

struct Inner {
    pending: VecDeque<GenerationRequest>,
    /// 1 while the worker owns a dequeued request, 0 otherwise. Counted
    /// into the position snapshot so "#2 in line" includes the request
    /// currently being rendered.
    in_flight: usize,
    closed: bool,
}

/// Thread-safe FIFO holding area for pending generation requests.
///
/// Position assignment and insertion happen under one lock acquisition,
/// so two concurrent submissions can never observe the same position and
/// positions are consistent with processing order. The lock is never held
/// across collaborator calls; throughput here is not the bottleneck, the
/// generation backend is.
pub struct RequestQueue {
    inner: Mutex<Inner>,
    available: Notify,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                pending: VecDeque::new(),
                in_flight: 0,
                closed: false,
            }),
            available: Notify::new(),
        }
    }

    /// Append a request to the back of the queue.
    ///
    /// Returns the 1-indexed queue position: the number of requests in
    /// the queue (pending plus in-flight, including this one) at the
    /// instant of insertion. The position is a snapshot and is never
    /// recomputed as earlier requests finish.
    ///
    /// Fails with `QueueUnavailable` once the queue is closed; the
    /// request is not enqueued in that case.
    pub async fn submit(&self, request: GenerationRequest) -> Result<usize, SubmissionError> {
        let position = {
            let mut inner = self.inner.lock().await;
            if inner.closed {
                return Err(SubmissionError::QueueUnavailable);
            }
            inner.pending.push_back(request);
            inner.pending.len() + inner.in_flight
        };
        self.available.notify_one();
        Ok(position)
    }

    /// Remove and return the front request, waiting while the queue is
    /// open and empty. Returns `None` once the queue has been closed;
    /// requests still pending at that point are abandoned.
    ///
    /// Consumed only by the worker; a popped request is owned by the
    /// worker until it calls [`finish`](Self::finish).
    pub(crate) async fn next(&self) -> Option<GenerationRequest> {
        loop {
            let notified = self.available.notified();
            {
                let mut inner = self.inner.lock().await;
                if inner.closed {
                    return None;
                }
                if let Some(request) = inner.pending.pop_front() {
                    inner.in_flight = 1;
                    return Some(request);
                }
            }
            notified.await;
        }
    }

    /// Clear the in-flight marker once the dequeued request reached a
    /// terminal status and its outcome delivery was attempted.
    pub(crate) async fn finish(&self) {
        let mut inner = self.inner.lock().await;
        inner.in_flight = 0;
    }

    /// Stop accepting submissions and wake the worker so it can observe
    /// the close between requests.
    pub async fn close(&self) {
        {
            let mut inner = self.inner.lock().await;
            inner.closed = true;
        }
        // notify_one stores a permit when the worker is not parked yet,
        // so the wakeup cannot be lost between its check and its wait.
        self.available.notify_one();
    }

    /// Number of requests currently pending plus in-flight (diagnostic)
    pub async fn depth(&self) -> usize {
        let inner = self.inner.lock().await;
        inner.pending.len() + inner.in_flight
    }

    pub async fn is_closed(&self) -> bool {
        self.inner.lock().await.closed
    }
}

impl Default for RequestQueue {
    fn default() -> Self {
        Self::new()
    }
}
