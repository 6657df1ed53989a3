//! Request ordering helpers for search-as-you-type flows
//!
//! A slow, stale response must never overwrite the result of a request
//! issued after it. Acceptance is decided at completion time against a
//! monotonically increasing sequence, not by arrival order; the token
//! additionally lets an in-flight request be aborted early.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Handle for one issued request
#[derive(Debug, Clone)]
pub struct RequestTicket {
    seq: u64,
    token: CancellationToken,
}

impl RequestTicket {
    /// Token to `select!` against the request future for early abort
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

/// Last-issued-wins coordinator for one logical resource
///
/// Call [`RequestCoordinator::begin`] before issuing a request and keep
/// the returned ticket; apply the response only when
/// [`RequestCoordinator::is_current`] still holds for that ticket.
#[derive(Debug, Default, Clone)]
pub struct RequestCoordinator {
    sequence: Arc<AtomicU64>,
    active: Arc<Mutex<Option<CancellationToken>>>,
}

impl RequestCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket, invalidating and cancelling every earlier
    /// one
    pub fn begin(&self) -> RequestTicket {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();
        let previous = {
            let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
            active.replace(token.clone())
        };
        if let Some(previous) = previous {
            previous.cancel();
        }
        RequestTicket { seq, token }
    }

    /// Whether the ticket is still the most recently issued
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.sequence.load(Ordering::SeqCst) == ticket.seq
    }
}

/// Trailing-edge debouncer for text inputs (~300ms)
///
/// Each keystroke calls [`Debouncer::wait`]; only the call belonging to
/// the final keystroke of a burst resolves to `true`.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    coordinator: RequestCoordinator,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            coordinator: RequestCoordinator::new(),
        }
    }

    pub async fn wait(&self) -> bool {
        let ticket = self.coordinator.begin();
        tokio::time::sleep(self.delay).await;
        self.coordinator.is_current(&ticket)
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(300))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_ticket_is_rejected() {
        let coordinator = RequestCoordinator::new();
        let first = coordinator.begin();
        let second = coordinator.begin();

        assert!(!coordinator.is_current(&first));
        assert!(coordinator.is_current(&second));
    }

    #[test]
    fn test_begin_cancels_previous_token() {
        let coordinator = RequestCoordinator::new();
        let first = coordinator.begin();
        assert!(!first.token().is_cancelled());

        let second = coordinator.begin();
        assert!(first.token().is_cancelled());
        assert!(!second.token().is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_last_burst_call_fires() {
        let debouncer = Debouncer::new(Duration::from_millis(300));

        let first = debouncer.wait();
        let second = debouncer.wait();
        let (first, second) = tokio::join!(first, second);

        assert!(!first);
        assert!(second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separated_calls_both_fire() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        assert!(debouncer.wait().await);
        assert!(debouncer.wait().await);
    }
}
