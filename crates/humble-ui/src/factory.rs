use humble_core::{ViewFactory, ViewKind};

use crate::views::HostedView;

/// Builds one [`HostedView`] variant per kind and counts what it built.
#[derive(Debug, Default)]
pub struct DefaultViewFactory {
    created: usize,
}

impl DefaultViewFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> usize {
        self.created
    }
}

impl ViewFactory for DefaultViewFactory {
    type View = HostedView;

    fn create(&mut self, kind: ViewKind) -> HostedView {
        self.created += 1;
        let view = HostedView::new(kind);
        log::trace!("factory: built {kind} {}", view.id());
        view
    }
}
