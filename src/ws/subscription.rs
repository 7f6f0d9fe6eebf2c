//! Per-connection subscription manager.
//!
//! Tracks which employee ids a WebSocket client wants events for. The bus
//! pushes every event to every connection; filtering is this connection's
//! responsibility. New connections start wide open (all employees) and may
//! narrow to specific ids; `"*"` resets to all.

use std::collections::HashSet;

/// Manages the employee filter for a single WebSocket connection.
///
/// `None` means no filter: every employee's events are forwarded.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    filter: Option<HashSet<i32>>,
}

impl SubscriptionManager {
    /// Creates a new manager subscribed to all employees.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Narrows the filter to the given employee ids, or resets to all
    /// employees when `all` is set (wildcard `"*"`).
    pub fn subscribe(&mut self, ids: &[i32], all: bool) {
        if all {
            self.filter = None;
            return;
        }
        self.filter.get_or_insert_with(HashSet::new).extend(ids);
    }

    /// Removes employee ids from the filter. A connection currently
    /// subscribed to all employees is unaffected.
    pub fn unsubscribe(&mut self, ids: &[i32]) {
        if let Some(set) = self.filter.as_mut() {
            for id in ids {
                set.remove(id);
            }
        }
    }

    /// Returns `true` if events for the given employee should be forwarded.
    #[must_use]
    pub fn matches(&self, employee_id: i32) -> bool {
        match &self.filter {
            None => true,
            Some(set) => set.contains(&employee_id),
        }
    }

    /// Returns the number of explicitly subscribed employee ids.
    #[must_use]
    pub fn count(&self) -> usize {
        self.filter.as_ref().map_or(0, HashSet::len)
    }

    /// Returns `true` if the connection receives all employees' events.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.filter.is_none()
    }
}
