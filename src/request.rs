use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier handed out for each scheduled unit of async work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Monotonic generation counter used to discard stale completions.
///
/// Every debounce timer and every fetch takes a ticket with [`RequestGuard::issue`].
/// When the work resumes after a suspension point it checks
/// [`RequestGuard::is_current`]; anything issued later wins and the older
/// completion becomes a no-op. Cloning shares the same counter.
#[derive(Debug, Clone, Default)]
pub struct RequestGuard {
    latest: Arc<AtomicU64>,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket, invalidating every ticket issued before it.
    pub fn issue(&self) -> RequestId {
        RequestId(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Invalidate all outstanding tickets without issuing a usable one.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_current(&self, id: RequestId) -> bool {
        self.latest.load(Ordering::SeqCst) == id.0
    }

    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_is_current() {
        let guard = RequestGuard::new();
        let first = guard.issue();
        assert!(guard.is_current(first));
        let second = guard.issue();
        assert!(!guard.is_current(first), "older ticket must be stale");
        assert!(guard.is_current(second));
        assert!(second > first, "ids must increase monotonically");
    }

    #[test]
    fn test_invalidate_stales_everything() {
        let guard = RequestGuard::new();
        let id = guard.issue();
        guard.invalidate();
        assert!(!guard.is_current(id));
    }

    #[test]
    fn test_clones_share_counter() {
        let guard = RequestGuard::new();
        let other = guard.clone();
        let id = guard.issue();
        other.issue();
        assert!(!guard.is_current(id));
    }
}
