//! Seams between the reconciler and a concrete view toolkit.

use crate::error::ReconcileError;
use crate::node::{ViewKind, ViewNode, ViewState};

/// A view that can be reconfigured from a [`ViewState`].
pub trait StateUpdatable {
    /// Kind of state this view accepts.
    fn kind(&self) -> ViewKind;

    /// Applies `state` to the view. Fails with
    /// [`ReconcileError::TypeMismatch`] when `state` belongs to another kind.
    fn setup(&mut self, state: &ViewState) -> Result<(), ReconcileError>;
}

/// Ordered container of live views mutated by the reconciler.
///
/// Implementations must not reorder or drop children on their own; the
/// reconciler's stored snapshot assumes it is the only writer.
pub trait HostingSurface {
    type View: StateUpdatable;

    /// Inserts `view` so that it ends up at `index`.
    fn insert_child(&mut self, view: Self::View, index: usize);

    /// Removes and returns the child at `index`, or `None` when out of range.
    fn remove_child(&mut self, index: usize) -> Option<Self::View>;

    fn child_mut(&mut self, index: usize) -> Option<&mut Self::View>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Instantiates fresh, unconfigured views.
pub trait ViewFactory {
    type View: StateUpdatable;

    fn create(&mut self, kind: ViewKind) -> Self::View;
}

/// Produces the complete desired UI on demand.
///
/// `render` may only read state cells; it is called once per cycle.
pub trait ViewComponent {
    fn render(&self) -> Vec<ViewNode>;
}

impl<F> ViewComponent for F
where
    F: Fn() -> Vec<ViewNode>,
{
    fn render(&self) -> Vec<ViewNode> {
        self()
    }
}
