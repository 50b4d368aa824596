//! Cell Nodes
//!
//! The state every kind of cell carries: its identity, its cached value,
//! its subscribers, and whether it has been destroyed.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::error::{CellError, Result};

use super::runtime::{Observable, Reactive, Runtime};
use super::subscriber::{CellId, SubscriberSet};

/// The kind of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// A source cell. These are the roots of the graph; they are set
    /// directly and have no inputs.
    Source,

    /// A formula cell. These have inputs and may have subscribers.
    /// They cache their computed value.
    Formula,

    /// An effect cell. These are leaves of the graph: they have inputs but
    /// never subscribers.
    Effect,
}

pub(crate) struct Node<T> {
    id: CellId,
    kind: CellKind,
    runtime: Runtime,
    state: RefCell<NodeState<T>>,
}

struct NodeState<T> {
    value: T,
    subscribers: SubscriberSet,
    destroyed: bool,
}

impl<T> Node<T>
where
    T: Clone + PartialEq,
{
    pub(crate) fn new(runtime: Runtime, kind: CellKind, value: T) -> Self {
        let id = runtime.next_id();
        Self::with_id(id, runtime, kind, value)
    }

    pub(crate) fn with_id(id: CellId, runtime: Runtime, kind: CellKind, value: T) -> Self {
        Self {
            id,
            kind,
            runtime,
            state: RefCell::new(NodeState {
                value,
                subscribers: SubscriberSet::default(),
                destroyed: false,
            }),
        }
    }

    pub(crate) fn id(&self) -> CellId {
        self.id
    }

    pub(crate) fn kind(&self) -> CellKind {
        self.kind
    }

    pub(crate) fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Read the cached value.
    pub(crate) fn get(&self) -> Result<T> {
        let state = self.state.borrow();
        if state.destroyed {
            return Err(CellError::Destroyed { id: self.id });
        }
        Ok(state.value.clone())
    }

    pub(crate) fn is_destroyed(&self) -> bool {
        self.state.borrow().destroyed
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.state.borrow().subscribers.len()
    }

    pub(crate) fn has_subscriber(&self, id: CellId) -> bool {
        self.state.borrow().subscribers.contains(id)
    }

    /// Store `value` as the cached value.
    ///
    /// Returns the subscribers to notify, or `None` when `value` equals the
    /// previous value and nothing downstream needs to hear about it.
    pub(crate) fn replace(&self, value: T) -> Result<Option<Vec<Rc<dyn Reactive>>>> {
        let mut state = self.state.borrow_mut();
        if state.destroyed {
            return Err(CellError::Destroyed { id: self.id });
        }
        if state.value == value {
            return Ok(None);
        }
        state.value = value;
        Ok(Some(state.subscribers.snapshot()))
    }

    /// Recompute `subscribers` depth-first, in order.
    ///
    /// Subscribers destroyed earlier in the same propagation are skipped.
    pub(crate) fn notify(&self, subscribers: Vec<Rc<dyn Reactive>>) -> Result<()> {
        for subscriber in subscribers {
            if subscriber.is_destroyed() {
                continue;
            }
            trace!(cell = %self.id, subscriber = %subscriber.id(), "propagating change");
            subscriber.recompute()?;
        }
        Ok(())
    }

    /// First half of teardown: destroy every subscriber, children before
    /// parent, leaving the subscriber set empty.
    ///
    /// Returns `false` if the cell was already destroyed.
    pub(crate) fn destroy_subscribers(&self) -> bool {
        let subscribers = {
            let mut state = self.state.borrow_mut();
            if state.destroyed {
                return false;
            }
            state.subscribers.take()
        };
        for subscriber in subscribers {
            subscriber.destroy();
        }
        true
    }

    /// Last step of teardown.
    pub(crate) fn mark_destroyed(&self) {
        let mut state = self.state.borrow_mut();
        state.destroyed = true;
        // A reentrant subscribe during teardown must not outlive it.
        state.subscribers.take();
    }
}

impl<T> Observable for Node<T>
where
    T: Clone + PartialEq,
{
    fn id(&self) -> CellId {
        self.id
    }

    fn subscribe(&self, subscriber: Rc<dyn Reactive>) {
        self.state.borrow_mut().subscribers.insert(subscriber);
    }

    fn unsubscribe(&self, id: CellId) {
        self.state.borrow_mut().subscribers.remove(id);
    }
}

impl<T> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("subscribers", &state.subscribers)
            .field("destroyed", &state.destroyed)
            .finish()
    }
}
