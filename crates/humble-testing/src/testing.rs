use std::fmt::Debug;

use humble_core::{
    apply, Change, HostingSurface, ReconcileError, StateUpdatable, ViewFactory, ViewKind,
    ViewState,
};

/// A mutation observed by a [`RecordingHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert { index: usize, view: usize },
    Remove { index: usize, view: usize },
}

/// View that remembers the last state it was configured with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestView {
    pub id: usize,
    pub kind: ViewKind,
    pub state: Option<ViewState>,
    pub setups: usize,
}

impl TestView {
    pub fn new(id: usize, kind: ViewKind) -> Self {
        Self {
            id,
            kind,
            state: None,
            setups: 0,
        }
    }

    /// Text shown by the view, empty while unconfigured.
    pub fn text(&self) -> String {
        match &self.state {
            Some(ViewState::Label(state)) => state.text.clone().unwrap_or_default(),
            Some(ViewState::Button(state)) => state.title.clone().unwrap_or_default(),
            Some(ViewState::Tile(state)) => state.title.clone(),
            None => String::new(),
        }
    }

    pub fn is_hidden(&self) -> bool {
        match &self.state {
            Some(ViewState::Label(state)) => state.is_hidden,
            Some(ViewState::Button(state)) => state.is_hidden,
            _ => false,
        }
    }
}

impl StateUpdatable for TestView {
    fn kind(&self) -> ViewKind {
        self.kind
    }

    fn setup(&mut self, state: &ViewState) -> Result<(), ReconcileError> {
        if state.kind() != self.kind {
            return Err(ReconcileError::TypeMismatch {
                expected: self.kind,
                found: state.kind(),
            });
        }
        self.state = Some(state.clone());
        self.setups += 1;
        Ok(())
    }
}

/// Vec-backed hosting surface that logs every insert and remove.
#[derive(Debug, Default)]
pub struct RecordingHost {
    children: Vec<TestView>,
    operations: Vec<Operation>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn children(&self) -> &[TestView] {
        &self.children
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn take_operations(&mut self) -> Vec<Operation> {
        std::mem::take(&mut self.operations)
    }

    pub fn ids(&self) -> Vec<usize> {
        self.children.iter().map(|view| view.id).collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.children.iter().map(TestView::text).collect()
    }
}

impl HostingSurface for RecordingHost {
    type View = TestView;

    fn insert_child(&mut self, view: TestView, index: usize) {
        self.operations.push(Operation::Insert {
            index,
            view: view.id,
        });
        self.children.insert(index, view);
    }

    fn remove_child(&mut self, index: usize) -> Option<TestView> {
        if index >= self.children.len() {
            return None;
        }
        let view = self.children.remove(index);
        self.operations.push(Operation::Remove {
            index,
            view: view.id,
        });
        Some(view)
    }

    fn child_mut(&mut self, index: usize) -> Option<&mut TestView> {
        self.children.get_mut(index)
    }

    fn len(&self) -> usize {
        self.children.len()
    }
}

/// Factory handing out [`TestView`]s with ids 1, 2, 3, ...
#[derive(Debug, Default)]
pub struct TestFactory {
    created: usize,
}

impl TestFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> usize {
        self.created
    }
}

impl ViewFactory for TestFactory {
    type View = TestView;

    fn create(&mut self, kind: ViewKind) -> TestView {
        self.created += 1;
        TestView::new(self.created, kind)
    }
}

/// Applies `script` to `old`, panicking with both inputs when it does not
/// fit.
pub fn replay<T: Clone + Debug>(script: &[Change<T>], old: &[T]) -> Vec<T> {
    match apply(script, old) {
        Some(result) => result,
        None => panic!("script {script:?} does not apply to {old:?}"),
    }
}

/// Remove at P directly followed by insert at P, which coalescing should
/// have turned into a replace.
pub fn uncoalesced_pair<T>(script: &[Change<T>]) -> Option<usize> {
    script.windows(2).find_map(|pair| match pair {
        [Change::Remove { offset: removed, .. }, Change::Insert { offset: inserted, .. }]
            if removed == inserted =>
        {
            Some(*removed)
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use humble_core::{difference, LabelState};

    #[test]
    fn recording_host_logs_mutations() {
        let mut host = RecordingHost::new();
        let mut factory = TestFactory::new();
        host.insert_child(factory.create(ViewKind::Label), 0);
        host.insert_child(factory.create(ViewKind::Button), 0);
        assert_eq!(host.ids(), vec![2, 1]);
        assert!(host.remove_child(5).is_none());
        let removed = host.remove_child(1).expect("child 1");
        assert_eq!(removed.id, 1);
        assert_eq!(
            host.take_operations(),
            vec![
                Operation::Insert { index: 0, view: 1 },
                Operation::Insert { index: 0, view: 2 },
                Operation::Remove { index: 1, view: 1 },
            ]
        );
        assert!(host.operations().is_empty());
    }

    #[test]
    fn test_view_rejects_foreign_state() {
        let mut view = TestView::new(1, ViewKind::Button);
        let err = view
            .setup(&ViewState::Label(LabelState::new("x")))
            .expect_err("label state on a button");
        assert!(err.is_type_mismatch());
        assert_eq!(view.setups, 0);
    }

    #[test]
    fn replay_and_pair_detection() {
        let script = difference(&[1, 2], &[3, 2]);
        assert_eq!(replay(&script, &[1, 2]), vec![3, 2]);
        assert_eq!(uncoalesced_pair(&script), None);

        let raw = vec![
            Change::Remove {
                offset: 0,
                element: 1,
            },
            Change::Insert {
                offset: 0,
                element: 3,
            },
        ];
        assert_eq!(uncoalesced_pair(&raw), Some(0));
    }
}
