//! Persistent log of applied events.
//!
//! `EventChain` is a cons list of `Arc` nodes with the newest event at the
//! head. Appending allocates one node and shares everything behind it, so a
//! `GameProgress` and its successor share their whole history.

use std::sync::Arc;

use crate::events::GameEvent;

#[derive(Debug)]
struct ChainNode {
    event: GameEvent,
    prev: Option<Arc<ChainNode>>,
}

/// Append-only, structurally shared event history.
#[derive(Clone, Debug, Default)]
pub struct EventChain {
    head: Option<Arc<ChainNode>>,
    len: usize,
}

impl EventChain {
    /// An empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A new chain with `event` appended. `self` is untouched.
    #[must_use]
    pub fn append(&self, event: GameEvent) -> Self {
        Self {
            head: Some(Arc::new(ChainNode {
                event,
                prev: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The most recently applied event.
    #[must_use]
    pub fn last(&self) -> Option<&GameEvent> {
        self.head.as_deref().map(|node| &node.event)
    }

    /// Iterate newest to oldest.
    pub fn iter(&self) -> EventChainIter<'_> {
        EventChainIter {
            next: self.head.as_deref(),
        }
    }

    /// Collect oldest to newest.
    #[must_use]
    pub fn to_vec(&self) -> Vec<GameEvent> {
        let mut events: Vec<GameEvent> = self.iter().cloned().collect();
        events.reverse();
        events
    }

    /// Whether both chains share the same head node.
    #[must_use]
    pub fn is_same(&self, other: &EventChain) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Drop for EventChain {
    // Unlink uniquely owned nodes one at a time so long histories do not
    // overflow the stack through recursive drops.
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut node) => next = node.prev.take(),
                Err(_) => break,
            }
        }
    }
}

/// Iterator over an [`EventChain`], newest first.
pub struct EventChainIter<'a> {
    next: Option<&'a ChainNode>,
}

impl<'a> Iterator for EventChainIter<'a> {
    type Item = &'a GameEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.prev.as_deref();
        Some(&node.event)
    }
}

impl<'a> IntoIterator for &'a EventChain {
    type Item = &'a GameEvent;
    type IntoIter = EventChainIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
