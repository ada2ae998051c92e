use std::cell::RefCell;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::runtime::{notify_observer, ObserverId};

/// Identifies a [`StateCell`] without keeping it alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(u64);

static NEXT_CELL_ID: AtomicU64 = AtomicU64::new(1);

impl CellId {
    fn next() -> Self {
        Self(NEXT_CELL_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// When a write notifies the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifyPolicy {
    /// Every write notifies, even when the value is unchanged.
    #[default]
    Always,
    /// Writes that leave the value equal to the previous one are silent.
    OnChange,
}

struct StateCellInner<T> {
    id: CellId,
    value: RefCell<T>,
    observer: Option<ObserverId>,
    policy: NotifyPolicy,
}

/// Observable single-value holder.
///
/// Cloning yields another handle to the same cell. A write updates the value
/// and then synchronously notifies the observer the cell is bound to, so any
/// render triggered by the write sees the new value.
pub struct StateCell<T> {
    inner: Rc<StateCellInner<T>>,
}

impl<T> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for StateCell<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Eq for StateCell<T> {}

impl<T: Clone + Eq + Hash> StateCell<T> {
    /// Creates a cell bound to `observer`.
    pub fn new(observer: ObserverId, value: T) -> Self {
        Self::build(Some(observer), value, NotifyPolicy::default())
    }

    pub fn with_policy(observer: ObserverId, value: T, policy: NotifyPolicy) -> Self {
        Self::build(Some(observer), value, policy)
    }

    /// Creates a cell with no observer. Writes never notify.
    pub fn detached(value: T) -> Self {
        Self::build(None, value, NotifyPolicy::default())
    }

    fn build(observer: Option<ObserverId>, value: T, policy: NotifyPolicy) -> Self {
        Self {
            inner: Rc::new(StateCellInner {
                id: CellId::next(),
                value: RefCell::new(value),
                observer,
                policy,
            }),
        }
    }

    pub fn id(&self) -> CellId {
        self.inner.id
    }

    pub fn policy(&self) -> NotifyPolicy {
        self.inner.policy
    }

    pub fn observer(&self) -> Option<ObserverId> {
        self.inner.observer
    }

    pub fn read(&self) -> T {
        self.inner.value.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let value = self.inner.value.borrow();
        f(&value)
    }

    /// Replaces the value and notifies according to the cell's policy.
    pub fn write(&self, value: T) {
        let changed = {
            let mut slot = self.inner.value.borrow_mut();
            let changed = *slot != value;
            *slot = value;
            changed
        };
        self.notify(changed);
    }

    /// Mutates the value in place, then notifies like [`StateCell::write`].
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let (result, changed) = {
            let mut slot = self.inner.value.borrow_mut();
            let before = match self.inner.policy {
                NotifyPolicy::OnChange => Some(slot.clone()),
                NotifyPolicy::Always => None,
            };
            let result = f(&mut slot);
            let changed = before.map(|before| before != *slot).unwrap_or(true);
            (result, changed)
        };
        self.notify(changed);
        result
    }

    fn notify(&self, changed: bool) {
        if self.inner.policy == NotifyPolicy::OnChange && !changed {
            return;
        }
        if let Some(observer) = self.inner.observer {
            notify_observer(observer);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for StateCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateCell")
            .field("id", &self.inner.id)
            .field("value", &*self.inner.value.borrow())
            .finish()
    }
}
