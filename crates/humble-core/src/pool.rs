//! Bookkeeping for views detached during a cycle.
//!
//! Removed views are parked by [`NodeKey`] while a cycle is applied so an
//! insert of the same key later in the script can move the live view back
//! instead of building a new one. Whatever is still parked when the cycle
//! ends is handed to the [`ViewPool`], which keeps a bounded number of views
//! per kind for later inserts.

use std::collections::VecDeque;

use crate::collections::map::HashMap;
use crate::node::{NodeKey, ViewKind};

/// Views removed in the current cycle, keyed by the node they showed.
pub struct MovedViews<V> {
    parked: HashMap<NodeKey, VecDeque<V>>,
}

impl<V> Default for MovedViews<V> {
    fn default() -> Self {
        Self {
            parked: HashMap::new(),
        }
    }
}

impl<V> MovedViews<V> {
    pub fn park(&mut self, key: NodeKey, view: V) {
        self.parked.entry(key).or_default().push_back(view);
    }

    /// Takes the earliest view parked under `key`.
    pub fn take(&mut self, key: &NodeKey) -> Option<V> {
        let queue = self.parked.get_mut(key)?;
        let view = queue.pop_front();
        if queue.is_empty() {
            self.parked.remove(key);
        }
        view
    }

    pub fn len(&self) -> usize {
        self.parked.values().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.parked.is_empty()
    }

    /// Empties the parking area in key order.
    pub fn drain(&mut self) -> Vec<(NodeKey, V)> {
        let mut keys: Vec<NodeKey> = self.parked.keys().copied().collect();
        keys.sort();
        let mut out = Vec::new();
        for key in keys {
            if let Some(queue) = self.parked.remove(&key) {
                out.extend(queue.into_iter().map(|view| (key, view)));
            }
        }
        out
    }
}

/// Recycled views per kind, capped at `limit_per_kind`.
pub struct ViewPool<V> {
    limit_per_kind: usize,
    free: HashMap<ViewKind, Vec<V>>,
}

impl<V> ViewPool<V> {
    pub fn new(limit_per_kind: usize) -> Self {
        Self {
            limit_per_kind,
            free: HashMap::new(),
        }
    }

    /// Stores `view` for reuse. Returns `false` when the kind is full and the
    /// view was dropped.
    pub fn recycle(&mut self, kind: ViewKind, view: V) -> bool {
        let slot = self.free.entry(kind).or_default();
        if slot.len() >= self.limit_per_kind {
            return false;
        }
        slot.push(view);
        true
    }

    pub fn acquire(&mut self, kind: ViewKind) -> Option<V> {
        self.free.get_mut(&kind).and_then(Vec::pop)
    }

    pub fn available(&self, kind: ViewKind) -> usize {
        self.free.get(&kind).map(Vec::len).unwrap_or(0)
    }
}
