//! Cell identifiers and subscriber bookkeeping.
//!
//! Every cell gets a [`CellId`] when it is created. Identifiers come from an
//! [`IdGenerator`] owned by the [`Runtime`](super::Runtime) that built the
//! cell, so two runtimes never share counter state.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::runtime::Reactive;

/// Unique identifier for a cell.
///
/// Identifiers are unique within the runtime that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(u64);

impl CellId {
    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owned sequence generator for [`CellId`]s.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next: Cell<u64>,
}

impl IdGenerator {
    /// Create a generator whose first ID is `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator whose first ID is `first`.
    ///
    /// Useful when an embedder wants cell IDs from disjoint ranges.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: Cell::new(first),
        }
    }

    /// Issue the next identifier.
    pub fn next_id(&self) -> CellId {
        let id = self.next.get();
        self.next.set(id + 1);
        CellId(id)
    }

    /// Number of identifiers issued so far, counted from the starting point.
    pub fn peek(&self) -> u64 {
        self.next.get()
    }
}

/// The dependents of a cell, kept in registration order.
///
/// A formula that reads the same cell through several inputs is registered
/// once.
#[derive(Default)]
pub(crate) struct SubscriberSet {
    entries: IndexMap<CellId, Rc<dyn Reactive>>,
}

impl SubscriberSet {
    pub(crate) fn insert(&mut self, subscriber: Rc<dyn Reactive>) {
        self.entries.entry(subscriber.id()).or_insert(subscriber);
    }

    pub(crate) fn remove(&mut self, id: CellId) {
        // Preserve the order of the remaining subscribers.
        self.entries.shift_remove(&id);
    }

    pub(crate) fn contains(&self, id: CellId) -> bool {
        self.entries.contains_key(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Copy of the current subscribers, for notifying without a borrow held.
    pub(crate) fn snapshot(&self) -> Vec<Rc<dyn Reactive>> {
        self.entries.values().cloned().collect()
    }

    /// Remove and return every subscriber.
    pub(crate) fn take(&mut self) -> Vec<Rc<dyn Reactive>> {
        self.entries.drain(..).map(|(_, subscriber)| subscriber).collect()
    }
}

impl fmt::Debug for SubscriberSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    struct Stub(CellId);

    impl Reactive for Stub {
        fn id(&self) -> CellId {
            self.0
        }

        fn recompute(&self) -> Result<()> {
            Ok(())
        }

        fn destroy(&self) {}

        fn is_destroyed(&self) -> bool {
            false
        }
    }

    #[test]
    fn ids_are_unique_and_sequential() {
        let ids = IdGenerator::new();
        let a = ids.next_id();
        let b = ids.next_id();
        let c = ids.next_id();

        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_eq!(c.raw(), 2);
        assert_eq!(ids.peek(), 3);
    }

    #[test]
    fn generators_do_not_share_state() {
        let first = IdGenerator::new();
        let second = IdGenerator::starting_at(100);

        assert_eq!(first.next_id().raw(), 0);
        assert_eq!(second.next_id().raw(), 100);
        assert_eq!(first.next_id().raw(), 1);
    }

    #[test]
    fn subscriber_set_keeps_registration_order() {
        let ids = IdGenerator::new();
        let (a, b, c) = (ids.next_id(), ids.next_id(), ids.next_id());

        let mut set = SubscriberSet::default();
        set.insert(Rc::new(Stub(b)));
        set.insert(Rc::new(Stub(a)));
        set.insert(Rc::new(Stub(c)));
        set.insert(Rc::new(Stub(b)));

        assert_eq!(set.len(), 3);
        set.remove(a);

        let order: Vec<_> = set.snapshot().iter().map(|s| s.id()).collect();
        assert_eq!(order, vec![b, c]);
        assert!(!set.contains(a));

        assert_eq!(set.take().len(), 2);
        assert_eq!(set.len(), 0);
    }
}
