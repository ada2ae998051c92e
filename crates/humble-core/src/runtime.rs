//! Observer registry linking state cells to their update handler.
//!
//! Cells never hold their handler directly. They carry an [`ObserverId`] and
//! look it up here on every write, so the registry entry is the only strong
//! reference to a handler and removing it tears the association down.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread_local;

use crate::collections::map::HashMap;

/// Receives a notification after an observed cell was written.
pub trait StateUpdateHandler {
    fn state_did_update(&self);
}

/// Handle naming one update handler in the registry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(usize);

static NEXT_OBSERVER_ID: AtomicUsize = AtomicUsize::new(1);

impl ObserverId {
    /// Allocates a fresh id. Nothing is registered under it yet.
    pub fn new() -> Self {
        Self(NEXT_OBSERVER_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn raw(self) -> usize {
        self.0
    }

    pub fn is_registered(self) -> bool {
        REGISTRY.with(|registry| registry.borrow().contains_key(&self))
    }
}

impl Default for ObserverId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObserverId({})", self.0)
    }
}

thread_local! {
    static REGISTRY: RefCell<HashMap<ObserverId, Rc<dyn StateUpdateHandler>>> =
        RefCell::new(HashMap::new());
}

/// Registers `handler` under `id`, replacing any previous handler.
pub fn register_observer(id: ObserverId, handler: Rc<dyn StateUpdateHandler>) {
    let previous = REGISTRY.with(|registry| registry.borrow_mut().insert(id, handler));
    if previous.is_some() {
        log::warn!("observer {id:?} re-registered; previous handler dropped");
    }
}

/// Removes the handler registered under `id`, returning it.
pub fn unregister_observer(id: ObserverId) -> Option<Rc<dyn StateUpdateHandler>> {
    REGISTRY.with(|registry| registry.borrow_mut().remove(&id))
}

/// Delivers a notification to the handler registered under `id`.
///
/// Returns `false` when no handler is registered. The handler is cloned out of
/// the registry before it runs so it may write cells and notify again.
pub fn notify_observer(id: ObserverId) -> bool {
    let handler = REGISTRY.with(|registry| registry.borrow().get(&id).cloned());
    match handler {
        Some(handler) => {
            handler.state_did_update();
            true
        }
        None => {
            log::trace!("observer {id:?} gone; write stays silent");
            false
        }
    }
}
