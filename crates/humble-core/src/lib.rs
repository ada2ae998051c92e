//! Declarative view reconciliation.
//!
//! Components describe their UI as an ordered list of [`ViewNode`]s built
//! from [`StateCell`]s. A [`Reconciler`] diffs each new list against the
//! previous one and patches a [`HostingSurface`] with the resulting
//! [`Change`]s, reconfiguring views in place when a slot only changed state.

pub mod collections;
pub mod diff;
pub mod error;
pub mod hash;
pub mod host;
pub mod node;
pub mod options;
pub mod pool;
pub mod reconciler;
pub mod runtime;
pub mod state;

pub use diff::{apply, coalesce, difference, raw_difference, Change, DiffingProvider, LcsDiff};
pub use error::{EditOp, ReconcileError};
pub use host::{HostingSurface, StateUpdatable, ViewComponent, ViewFactory};
pub use node::{
    Action, Bound, ButtonState, LabelState, NodeKey, TileState, ViewKind, ViewNode, ViewState,
};
pub use options::ReconcilerOptions;
pub use pool::{MovedViews, ViewPool};
pub use reconciler::{CycleReport, Reconciler};
pub use runtime::{
    notify_observer, register_observer, unregister_observer, ObserverId, StateUpdateHandler,
};
pub use state::{CellId, NotifyPolicy, StateCell};
