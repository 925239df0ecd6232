//! Stable node-identifier allocation.
//!
//! Every node placed on the canvas gets a human-readable id of the form
//! `"{type}-{counter}"`. Counters are tracked per type and only ever move
//! forward, even across node deletion: removing `text-2` never causes a
//! later allocation to hand out `text-2` again. The counter table is part of
//! the persisted graph snapshot so restored sessions keep allocating past
//! previously used numbers.

use rustc_hash::FxHashMap;

/// Allocates unique, human-readable node identifiers per type.
///
/// Owned exclusively by [`GraphStore`](crate::graph::GraphStore); the
/// single-writer discipline is what makes a plain `&mut self` increment
/// sufficient (the host runs mutations on one thread).
///
/// # Examples
///
/// ```rust
/// use pipeweave::graph::IdentifierAllocator;
///
/// let mut ids = IdentifierAllocator::new();
/// assert_eq!(ids.allocate("text"), "text-1");
/// assert_eq!(ids.allocate("text"), "text-2");
/// assert_eq!(ids.allocate("gemini"), "gemini-1");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdentifierAllocator {
    counters: FxHashMap<String, u64>,
}

impl IdentifierAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an allocator from a persisted counter table.
    #[must_use]
    pub fn from_counters(counters: FxHashMap<String, u64>) -> Self {
        Self { counters }
    }

    /// Allocate the next identifier for `type_name`.
    ///
    /// Looks up the counter for the type (defaulting to 0), increments it,
    /// and returns `"{type}-{n}"`. Must be called exactly once per node
    /// creation; the counter never decrements.
    pub fn allocate(&mut self, type_name: &str) -> String {
        let counter = self.counters.entry(type_name.to_string()).or_insert(0);
        *counter += 1;
        format!("{type_name}-{counter}")
    }

    /// The last-assigned sequence number for a type, if any was allocated.
    #[must_use]
    pub fn last_assigned(&self, type_name: &str) -> Option<u64> {
        self.counters.get(type_name).copied()
    }

    /// The full counter table, for snapshot persistence.
    #[must_use]
    pub fn counters(&self) -> &FxHashMap<String, u64> {
        &self.counters
    }
}
