//! The render → diff → apply → commit cycle.
//!
//! A [`Reconciler`] owns a component, the hosting surface showing it and the
//! factory building its views. It registers itself as the update handler of
//! an [`ObserverId`]; every write to a cell bound to that id runs one full
//! cycle before the write returns.
//!
//! Writes issued while a cycle is being applied (for example by a view that
//! fires a callback while it is reconfigured) do not re-enter the cycle. They
//! mark it pending and one more cycle runs once the current one has
//! committed, observing every value written in the meantime. The same holds
//! for writes made while [`Reconciler::with_host`] or
//! [`Reconciler::with_host_mut`] lend out the surface.
//!
//! A script is checked against the surface before the first change is
//! applied. If applying still fails partway, the surface no longer matches
//! the committed keys and the reconciler refuses every later cycle with the
//! same error.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::diff::{Change, DiffingProvider, LcsDiff};
use crate::error::{EditOp, ReconcileError};
use crate::host::{HostingSurface, StateUpdatable, ViewComponent, ViewFactory};
use crate::node::{NodeKey, ViewKind, ViewNode};
use crate::options::ReconcilerOptions;
use crate::pool::{MovedViews, ViewPool};
use crate::runtime::{register_observer, unregister_observer, ObserverId, StateUpdateHandler};

/// What a call into the reconciler did to the hosting surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Cycles run, including ones triggered by reentrant writes.
    pub cycles: usize,
    pub inserted: usize,
    pub removed: usize,
    /// Views reconfigured in place.
    pub replaced: usize,
    /// Views built by the factory.
    pub created: usize,
    /// Inserted views taken from the moved set or the pool.
    pub reused: usize,
    /// Replaces applied as remove + insert.
    pub fallbacks: usize,
    /// The call arrived during a running cycle and was folded into the next.
    pub deferred: bool,
}

impl CycleReport {
    /// No view was inserted, removed or reconfigured.
    pub fn is_noop(&self) -> bool {
        self.inserted == 0 && self.removed == 0 && self.replaced == 0
    }

    fn absorb(&mut self, other: CycleReport) {
        self.cycles += other.cycles;
        self.inserted += other.inserted;
        self.removed += other.removed;
        self.replaced += other.replaced;
        self.created += other.created;
        self.reused += other.reused;
        self.fallbacks += other.fallbacks;
    }

    fn deferred() -> Self {
        Self {
            deferred: true,
            ..Self::default()
        }
    }
}

struct CycleState<H: HostingSurface, F, D> {
    host: H,
    factory: F,
    diff: D,
    committed: Vec<NodeKey>,
    last_script: Vec<Change<NodeKey>>,
    pool: ViewPool<H::View>,
    cycles: usize,
    /// Set when an apply failed after the surface was touched.
    poisoned: Option<ReconcileError>,
}

struct Driver<C, H: HostingSurface, F, D> {
    component: C,
    options: ReconcilerOptions,
    running: Cell<bool>,
    pending: Cell<bool>,
    state: RefCell<CycleState<H, F, D>>,
}

/// Clears the running flag even when a cycle unwinds.
struct RunningGuard<'a>(&'a Cell<bool>);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<C, H, F, D> Driver<C, H, F, D>
where
    C: ViewComponent,
    H: HostingSurface,
    F: ViewFactory<View = H::View>,
    D: DiffingProvider,
{
    fn run(&self) -> Result<CycleReport, ReconcileError> {
        if self.running.get() {
            log::trace!("update requested during a cycle; deferring");
            self.pending.set(true);
            return Ok(CycleReport::deferred());
        }
        self.running.set(true);
        let _guard = RunningGuard(&self.running);

        let mut total = CycleReport::default();
        loop {
            self.pending.set(false);
            total.absorb(self.cycle()?);
            if !self.pending.get() {
                return Ok(total);
            }
        }
    }

    fn cycle(&self) -> Result<CycleReport, ReconcileError> {
        let nodes = self.component.render();
        let keys: Vec<NodeKey> = nodes.iter().map(ViewNode::key).collect();

        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        if let Some(err) = &state.poisoned {
            return Err(err.clone());
        }
        let script = state.diff.difference(&state.committed, &keys);
        log::debug!(
            "cycle {}: {} -> {} nodes, {} changes",
            state.cycles + 1,
            state.committed.len(),
            keys.len(),
            script.len()
        );
        check_script(&script, state.host.len(), &nodes)?;

        let mut report = CycleReport {
            cycles: 1,
            ..CycleReport::default()
        };
        let mut patch = Patch {
            host: &mut state.host,
            factory: &mut state.factory,
            pool: &mut state.pool,
            moved: MovedViews::default(),
            options: self.options,
            nodes: &nodes,
            report: &mut report,
        };
        let applied = script.iter().try_for_each(|change| patch.apply(change));
        patch.finish();
        if let Err(err) = applied {
            log::error!("apply failed partway ({err}); surface no longer matches committed keys");
            state.poisoned = Some(err.clone());
            return Err(err);
        }

        state.committed = keys;
        state.last_script = script;
        state.cycles += 1;
        Ok(report)
    }

    /// Runs `f` as if a cycle were in progress, then catches up on any write
    /// it made.
    fn hold<R>(&self, f: impl FnOnce() -> R) -> R {
        if self.running.get() {
            return f();
        }
        let result = {
            self.running.set(true);
            let _guard = RunningGuard(&self.running);
            f()
        };
        if self.pending.get() {
            log::trace!("running cycle deferred while the surface was lent out");
            self.state_did_update();
        }
        result
    }
}

fn violation(op: EditOp, offset: usize, len: usize) -> ReconcileError {
    ReconcileError::DiffInvariantViolation { op, offset, len }
}

/// Walks `script` against a surface of `len` children without touching it.
fn check_script(
    script: &[Change<NodeKey>],
    mut len: usize,
    nodes: &[ViewNode],
) -> Result<(), ReconcileError> {
    let rendered = |offset: usize, key: &NodeKey, op: EditOp| match nodes.get(offset) {
        Some(node) if node.key() == *key => Ok(()),
        _ => Err(violation(op, offset, nodes.len())),
    };
    for change in script {
        match change {
            Change::Insert { offset, element } => {
                if *offset > len {
                    return Err(violation(EditOp::Insert, *offset, len));
                }
                rendered(*offset, element, EditOp::Insert)?;
                len += 1;
            }
            Change::Remove { offset, .. } => {
                if *offset >= len {
                    return Err(violation(EditOp::Remove, *offset, len));
                }
                len -= 1;
            }
            Change::Replace { offset, new, .. } => {
                if *offset >= len {
                    return Err(violation(EditOp::Replace, *offset, len));
                }
                rendered(*offset, new, EditOp::Replace)?;
            }
        }
    }
    Ok(())
}

impl<C, H, F, D> StateUpdateHandler for Driver<C, H, F, D>
where
    C: ViewComponent,
    H: HostingSurface,
    F: ViewFactory<View = H::View>,
    D: DiffingProvider,
{
    fn state_did_update(&self) {
        if let Err(err) = self.run() {
            log::error!("update cycle failed: {err}");
            debug_assert!(false, "update cycle failed: {err}");
        }
    }
}

/// Applies one script to the hosting surface.
struct Patch<'a, H: HostingSurface, F> {
    host: &'a mut H,
    factory: &'a mut F,
    pool: &'a mut ViewPool<H::View>,
    moved: MovedViews<H::View>,
    options: ReconcilerOptions,
    nodes: &'a [ViewNode],
    report: &'a mut CycleReport,
}

impl<H, F> Patch<'_, H, F>
where
    H: HostingSurface,
    F: ViewFactory<View = H::View>,
{
    fn apply(&mut self, change: &Change<NodeKey>) -> Result<(), ReconcileError> {
        log::trace!("apply {change:?}");
        match change {
            Change::Insert { offset, element } => self.insert(*offset, element, EditOp::Insert),
            Change::Remove { offset, element } => self.remove(*offset, element, EditOp::Remove),
            Change::Replace { offset, old, new } => self.replace(*offset, old, new),
        }
    }

    fn node(&self, offset: usize, key: &NodeKey, op: EditOp) -> Result<&ViewNode, ReconcileError> {
        match self.nodes.get(offset) {
            Some(node) if node.key() == *key => Ok(node),
            _ => Err(violation(op, offset, self.nodes.len())),
        }
    }

    fn out_of_bounds(&self, op: EditOp, offset: usize) -> ReconcileError {
        violation(op, offset, self.host.len())
    }

    fn insert(&mut self, offset: usize, key: &NodeKey, op: EditOp) -> Result<(), ReconcileError> {
        if offset > self.host.len() {
            return Err(self.out_of_bounds(op, offset));
        }
        let state = self.node(offset, key, op)?.state();

        let mut recycled = None;
        if self.options.reuse_moved_views {
            recycled = self.moved.take(key);
        }
        if recycled.is_none() {
            recycled = self.pool.acquire(key.kind);
        }

        let mut view = match recycled {
            Some(view) => {
                self.report.reused += 1;
                view
            }
            None => {
                self.report.created += 1;
                self.factory.create(key.kind)
            }
        };
        view.setup(&state)?;
        self.host.insert_child(view, offset);
        self.report.inserted += 1;
        Ok(())
    }

    fn remove(&mut self, offset: usize, key: &NodeKey, op: EditOp) -> Result<(), ReconcileError> {
        let Some(view) = self.host.remove_child(offset) else {
            return Err(self.out_of_bounds(op, offset));
        };
        if self.options.reuse_moved_views {
            self.moved.park(*key, view);
        } else {
            self.pool.recycle(view.kind(), view);
        }
        self.report.removed += 1;
        Ok(())
    }

    fn replace(&mut self, offset: usize, old: &NodeKey, new: &NodeKey) -> Result<(), ReconcileError> {
        if offset >= self.host.len() {
            return Err(self.out_of_bounds(EditOp::Replace, offset));
        }
        let state = self.node(offset, new, EditOp::Replace)?.state();

        if old.kind != new.kind {
            log::trace!("replace at {offset} changes kind {} -> {}", old.kind, new.kind);
            return self.fallback(offset, old, new);
        }

        let len = self.host.len();
        let Some(view) = self.host.child_mut(offset) else {
            return Err(violation(EditOp::Replace, offset, len));
        };
        match view.setup(&state) {
            Ok(()) => {
                self.report.replaced += 1;
                Ok(())
            }
            Err(err) if err.is_type_mismatch() => {
                log::warn!("view at {offset} rejected new state ({err}); rebuilding slot");
                self.fallback(offset, old, new)
            }
            Err(err) => Err(err),
        }
    }

    fn fallback(&mut self, offset: usize, old: &NodeKey, new: &NodeKey) -> Result<(), ReconcileError> {
        self.report.fallbacks += 1;
        self.remove(offset, old, EditOp::Replace)?;
        self.insert(offset, new, EditOp::Replace)
    }

    /// Releases views parked during the cycle that nothing claimed.
    fn finish(mut self) {
        for (_, view) in self.moved.drain() {
            self.pool.recycle(view.kind(), view);
        }
    }
}

/// Drives a component's output into a hosting surface.
pub struct Reconciler<C, H, F, D = LcsDiff>
where
    C: ViewComponent + 'static,
    H: HostingSurface + 'static,
    F: ViewFactory<View = H::View> + 'static,
    D: DiffingProvider + 'static,
{
    observer: ObserverId,
    driver: Rc<Driver<C, H, F, D>>,
}

impl<C, H, F> Reconciler<C, H, F, LcsDiff>
where
    C: ViewComponent + 'static,
    H: HostingSurface + 'static,
    F: ViewFactory<View = H::View> + 'static,
{
    pub fn new(observer: ObserverId, component: C, host: H, factory: F) -> Self {
        Self::with_options(observer, component, host, factory, ReconcilerOptions::default())
    }

    pub fn with_options(
        observer: ObserverId,
        component: C,
        host: H,
        factory: F,
        options: ReconcilerOptions,
    ) -> Self {
        Self::with_provider(observer, component, host, factory, LcsDiff, options)
    }
}

impl<C, H, F, D> Reconciler<C, H, F, D>
where
    C: ViewComponent + 'static,
    H: HostingSurface + 'static,
    F: ViewFactory<View = H::View> + 'static,
    D: DiffingProvider + 'static,
{
    /// Builds a reconciler with a custom diffing provider.
    ///
    /// `diff` must emit changes in application order with insert and replace
    /// offsets equal to the element's index in the new sequence.
    pub fn with_provider(
        observer: ObserverId,
        component: C,
        host: H,
        factory: F,
        diff: D,
        options: ReconcilerOptions,
    ) -> Self {
        if !host.is_empty() {
            log::warn!("hosting surface starts with {} unmanaged children", host.len());
        }
        let driver = Rc::new(Driver {
            component,
            options,
            running: Cell::new(false),
            pending: Cell::new(false),
            state: RefCell::new(CycleState {
                host,
                factory,
                diff,
                committed: Vec::new(),
                last_script: Vec::new(),
                pool: ViewPool::new(options.pool_limit_per_kind),
                cycles: 0,
                poisoned: None,
            }),
        });
        register_observer(observer, driver.clone());
        Self { observer, driver }
    }

    /// Mounts the component's initial output.
    pub fn start(&self) -> Result<CycleReport, ReconcileError> {
        if self.cycle_count() > 0 {
            log::debug!("start called on a mounted reconciler; running an update");
        }
        self.driver.run()
    }

    /// Runs a cycle now.
    pub fn update(&self) -> Result<CycleReport, ReconcileError> {
        self.driver.run()
    }

    pub fn observer(&self) -> ObserverId {
        self.observer
    }

    pub fn component(&self) -> &C {
        &self.driver.component
    }

    /// Borrows the hosting surface. Panics if called from inside a cycle.
    ///
    /// Cell writes made by `f`, such as a tapped button's action, are
    /// deferred and run as one cycle after `f` returns.
    pub fn with_host<R>(&self, f: impl FnOnce(&H) -> R) -> R {
        self.driver.hold(|| {
            let state = self.driver.state.borrow();
            f(&state.host)
        })
    }

    /// Mutably borrows the hosting surface, deferring writes like
    /// [`with_host`](Self::with_host).
    ///
    /// Changing the children behind the reconciler's back invalidates the
    /// committed snapshot; later cycles may fail with
    /// [`ReconcileError::DiffInvariantViolation`].
    pub fn with_host_mut<R>(&self, f: impl FnOnce(&mut H) -> R) -> R {
        self.driver.hold(|| {
            let mut state = self.driver.state.borrow_mut();
            f(&mut state.host)
        })
    }

    /// Keys committed by the last successful cycle.
    pub fn committed_keys(&self) -> Vec<NodeKey> {
        self.driver.state.borrow().committed.clone()
    }

    /// Script applied by the last successful cycle.
    pub fn last_script(&self) -> Vec<Change<NodeKey>> {
        self.driver.state.borrow().last_script.clone()
    }

    pub fn cycle_count(&self) -> usize {
        self.driver.state.borrow().cycles
    }

    /// Views of `kind` waiting in the pool.
    pub fn pooled(&self, kind: ViewKind) -> usize {
        self.driver.state.borrow().pool.available(kind)
    }
}

impl<C, H, F, D> Drop for Reconciler<C, H, F, D>
where
    C: ViewComponent + 'static,
    H: HostingSurface + 'static,
    F: ViewFactory<View = H::View> + 'static,
    D: DiffingProvider + 'static,
{
    fn drop(&mut self) {
        unregister_observer(self.observer);
    }
}

#[cfg(test)]
#[path = "tests/reconciler_tests.rs"]
mod tests;
