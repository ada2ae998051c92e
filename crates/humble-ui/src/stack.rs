use humble_core::{Action, HostingSurface};

use crate::views::{HostedView, ViewId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    #[default]
    Vertical,
    Horizontal,
}

/// Ordered container of live views.
#[derive(Debug, Default)]
pub struct StackHost {
    axis: Axis,
    spacing: u16,
    children: Vec<HostedView>,
}

impl StackHost {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            spacing: 0,
            children: Vec::new(),
        }
    }

    pub fn vertical() -> Self {
        Self::new(Axis::Vertical)
    }

    pub fn with_spacing(mut self, spacing: u16) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn spacing(&self) -> u16 {
        self.spacing
    }

    pub fn children(&self) -> &[HostedView] {
        &self.children
    }

    pub fn ids(&self) -> Vec<ViewId> {
        self.children.iter().map(HostedView::id).collect()
    }

    /// The tap handler of the button at `index`.
    ///
    /// Returned by value so the caller can invoke it after releasing any
    /// borrow of the host; the action usually writes state that reconciles
    /// this same host.
    pub fn action_at(&self, index: usize) -> Option<Action> {
        self.children.get(index)?.as_button()?.action()
    }

    /// Descriptions of the visible children, in order.
    pub fn visible_lines(&self) -> Vec<String> {
        self.children
            .iter()
            .filter(|view| !view.is_hidden())
            .map(HostedView::describe)
            .collect()
    }

    pub fn dump(&self) -> String {
        let mut output = format!(
            "Stack {:?} spacing={} children={}\n",
            self.axis,
            self.spacing,
            self.children.len()
        );
        for (index, view) in self.children.iter().enumerate() {
            output.push_str(&format!("  [{}] {}\n", index, view.describe()));
        }
        output
    }
}

impl HostingSurface for StackHost {
    type View = HostedView;

    fn insert_child(&mut self, view: HostedView, index: usize) {
        log::trace!("stack: insert {} at {index}", view.id());
        self.children.insert(index, view);
    }

    fn remove_child(&mut self, index: usize) -> Option<HostedView> {
        if index >= self.children.len() {
            return None;
        }
        let view = self.children.remove(index);
        log::trace!("stack: removed {} from {index}", view.id());
        Some(view)
    }

    fn child_mut(&mut self, index: usize) -> Option<&mut HostedView> {
        self.children.get_mut(index)
    }

    fn len(&self) -> usize {
        self.children.len()
    }
}
