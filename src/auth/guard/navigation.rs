//! Navigation supersession tracking

use std::sync::atomic::{AtomicU64, Ordering};

/// Handle for one navigation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NavigationTicket(u64);

impl NavigationTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Issues tickets; only the most recent one is current
#[derive(Debug, Default)]
pub struct NavigationTracker {
    latest: AtomicU64,
}

impl NavigationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a navigation, superseding every earlier ticket
    pub fn begin(&self) -> NavigationTicket {
        NavigationTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: NavigationTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Supersede every outstanding ticket without starting a navigation
    pub fn cancel_all(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}
