//! Explicit per-entity ID allocation.
//!
//! RULE: Every sink entity has exactly one owning stage, and that stage
//! holds the only allocator for it. Allocators are passed in explicitly —
//! there is no shared counter state between stages. Stages that may run
//! against a pre-populated sink (subscriptions, app installs, discounts)
//! construct their allocator from the sink's current maximum.

use crate::types::RowId;

/// Monotonically increasing integer ID source with a single `next()`.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: RowId,
}

impl IdAllocator {
    /// Start at a fixed origin (1 for most entities).
    pub fn starting_at(first: RowId) -> Self {
        Self { next: first }
    }

    /// Continue after the sink's current maximum, or start at `first`
    /// when the table is empty. This is what makes re-runs safe.
    pub fn after_max(max: Option<RowId>, first: RowId) -> Self {
        Self {
            next: max.map(|m| m + 1).unwrap_or(first),
        }
    }

    pub fn next(&mut self) -> RowId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The id the next call to `next()` would return. Used in logs only.
    pub fn peek(&self) -> RowId {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_monotonically_from_origin() {
        let mut ids = IdAllocator::starting_at(1);
        assert_eq!(ids.next(), 1);
        assert_eq!(ids.next(), 2);
        assert_eq!(ids.next(), 3);
    }

    #[test]
    fn resumes_after_existing_maximum() {
        let mut ids = IdAllocator::after_max(Some(41), 1);
        assert_eq!(ids.next(), 42);

        let mut fresh = IdAllocator::after_max(None, 900_000);
        assert_eq!(fresh.next(), 900_000);
    }
}
