use super::*;
use crate::node::{Bound, ButtonState, LabelState, TileState, ViewState};
use crate::state::{NotifyPolicy, StateCell};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Insert { index: usize, view: usize },
    Remove { index: usize, view: usize },
}

type SetupHook = Rc<dyn Fn(&ViewState)>;

struct TestView {
    id: usize,
    kind: ViewKind,
    state: Option<ViewState>,
    setups: usize,
    hook: Option<SetupHook>,
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
        if let Some(hook) = &self.hook {
            hook(state);
        }
        Ok(())
    }
}

#[derive(Default)]
struct TestHost {
    children: Vec<TestView>,
    operations: Vec<Operation>,
}

impl TestHost {
    fn ids(&self) -> Vec<usize> {
        self.children.iter().map(|view| view.id).collect()
    }

    fn texts(&self) -> Vec<String> {
        self.children
            .iter()
            .map(|view| match &view.state {
                Some(ViewState::Label(state)) => state.text.clone().unwrap_or_default(),
                Some(ViewState::Button(state)) => state.title.clone().unwrap_or_default(),
                Some(ViewState::Tile(state)) => state.title.clone(),
                None => String::new(),
            })
            .collect()
    }
}

impl HostingSurface for TestHost {
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

#[derive(Default)]
struct TestFactory {
    next_id: usize,
    hook: Option<SetupHook>,
    /// Builds button views when asked for labels.
    broken: Rc<Cell<bool>>,
}

impl ViewFactory for TestFactory {
    type View = TestView;

    fn create(&mut self, kind: ViewKind) -> TestView {
        self.next_id += 1;
        let kind = match kind {
            ViewKind::Label if self.broken.get() => ViewKind::Button,
            kind => kind,
        };
        TestView {
            id: self.next_id,
            kind,
            state: None,
            setups: 0,
            hook: self.hook.clone(),
        }
    }
}

struct Screen {
    label1: StateCell<LabelState>,
    label3: StateCell<LabelState>,
    button2: StateCell<ButtonState>,
}

impl Screen {
    fn new(observer: ObserverId) -> Self {
        Self {
            label1: StateCell::new(observer, LabelState::new("Label 1")),
            label3: StateCell::new(observer, LabelState::new("Label 3").hidden(true)),
            button2: StateCell::new(observer, ButtonState::new("Button")),
        }
    }
}

impl ViewComponent for Screen {
    fn render(&self) -> Vec<ViewNode> {
        vec![
            ViewNode::label(&self.label1),
            ViewNode::label(&self.label3),
            ViewNode::button(&self.button2),
        ]
    }
}

fn mounted_screen() -> Reconciler<Screen, TestHost, TestFactory> {
    let observer = ObserverId::new();
    let reconciler = Reconciler::new(
        observer,
        Screen::new(observer),
        TestHost::default(),
        TestFactory::default(),
    );
    reconciler.start().expect("initial mount");
    reconciler.with_host_mut(|host| host.operations.clear());
    reconciler
}

#[test]
fn start_mounts_every_node_in_order() {
    let observer = ObserverId::new();
    let reconciler = Reconciler::new(
        observer,
        Screen::new(observer),
        TestHost::default(),
        TestFactory::default(),
    );
    let report = reconciler.start().expect("mount");

    assert_eq!(report.inserted, 3);
    assert_eq!(report.created, 3);
    assert_eq!(report.cycles, 1);
    reconciler.with_host(|host| {
        assert_eq!(
            host.operations,
            vec![
                Operation::Insert { index: 0, view: 1 },
                Operation::Insert { index: 1, view: 2 },
                Operation::Insert { index: 2, view: 3 },
            ]
        );
        assert_eq!(host.texts(), vec!["Label 1", "Label 3", "Button"]);
        let kinds: Vec<ViewKind> = host.children.iter().map(|view| view.kind).collect();
        assert_eq!(kinds, vec![ViewKind::Label, ViewKind::Label, ViewKind::Button]);
    });
    assert_eq!(reconciler.committed_keys().len(), 3);
}

#[test]
fn state_change_reconfigures_the_same_view() {
    let reconciler = mounted_screen();
    let before = reconciler.with_host(TestHost::ids);

    reconciler
        .component()
        .label1
        .update(|state| state.text = Some("Label 1 updated".into()));

    let script = reconciler.last_script();
    assert_eq!(script.len(), 1);
    assert!(matches!(script[0], Change::Replace { offset: 0, .. }));
    reconciler.with_host(|host| {
        assert!(host.operations.is_empty());
        assert_eq!(host.ids(), before);
        assert_eq!(host.children[0].setups, 2);
        assert_eq!(host.texts()[0], "Label 1 updated");
    });
}

#[test]
fn hiding_the_middle_label_touches_only_offset_one() {
    let reconciler = mounted_screen();
    reconciler
        .component()
        .label3
        .update(|state| state.is_hidden = !state.is_hidden);

    assert_eq!(reconciler.last_script().len(), 1);
    assert_eq!(reconciler.last_script()[0].offset(), 1);
    reconciler.with_host(|host| {
        assert!(host.operations.is_empty());
        assert_eq!(
            host.children[1].state,
            Some(ViewState::Label(LabelState::new("Label 3").hidden(false)))
        );
        assert_eq!(host.children[0].setups, 1);
        assert_eq!(host.children[2].setups, 1);
    });
}

#[test]
fn unchanged_render_is_a_noop_cycle() {
    let reconciler = mounted_screen();
    let report = reconciler.update().expect("update");

    assert!(report.is_noop());
    assert_eq!(report.cycles, 1);
    assert!(reconciler.last_script().is_empty());
    reconciler.with_host(|host| assert!(host.operations.is_empty()));
}

#[test]
fn each_write_runs_its_own_cycle_with_the_current_value() {
    let reconciler = mounted_screen();
    let cell = reconciler.component().button2.clone();

    cell.write(ButtonState::new("first"));
    cell.write(ButtonState::new("second"));

    assert_eq!(reconciler.cycle_count(), 3);
    reconciler.with_host(|host| assert_eq!(host.texts()[2], "second"));
}

#[test]
fn unchanged_write_still_cycles_under_always_policy() {
    let reconciler = mounted_screen();
    let cell = reconciler.component().label1.clone();
    cell.write(cell.read());
    assert_eq!(reconciler.cycle_count(), 2);
    assert!(reconciler.last_script().is_empty());
}

#[test]
fn on_change_cells_skip_equal_writes() {
    let observer = ObserverId::new();
    let cell = StateCell::with_policy(observer, LabelState::new("same"), NotifyPolicy::OnChange);
    let render_cell = cell.clone();
    let reconciler = Reconciler::new(
        observer,
        move || vec![ViewNode::label(&render_cell)],
        TestHost::default(),
        TestFactory::default(),
    );
    reconciler.start().expect("mount");

    cell.write(LabelState::new("same"));
    assert_eq!(reconciler.cycle_count(), 1);

    cell.write(LabelState::new("other"));
    assert_eq!(reconciler.cycle_count(), 2);
}

#[test]
fn kind_change_in_a_slot_rebuilds_the_view() {
    let observer = ObserverId::new();
    let as_button = StateCell::new(observer, false);
    let flag = as_button.clone();
    let label = StateCell::new(observer, LabelState::new("slot"));
    let button = StateCell::new(observer, ButtonState::new("slot"));
    let reconciler = Reconciler::new(
        observer,
        move || {
            if flag.read() {
                vec![ViewNode::button(&button)]
            } else {
                vec![ViewNode::label(&label)]
            }
        },
        TestHost::default(),
        TestFactory::default(),
    );
    reconciler.start().expect("mount");
    reconciler.with_host_mut(|host| host.operations.clear());

    as_button.write(true);

    assert!(matches!(
        reconciler.last_script()[..],
        [Change::Replace { offset: 0, .. }]
    ));
    reconciler.with_host(|host| {
        assert_eq!(
            host.operations,
            vec![
                Operation::Remove { index: 0, view: 1 },
                Operation::Insert { index: 0, view: 2 },
            ]
        );
        assert_eq!(host.children[0].kind, ViewKind::Button);
    });
}

#[test]
fn writes_during_apply_are_deferred_to_a_follow_up_cycle() {
    let observer = ObserverId::new();
    let trigger = StateCell::new(observer, LabelState::new("idle"));
    let echo = StateCell::new(observer, LabelState::new("quiet"));

    let echo_writer = echo.clone();
    let hook: SetupHook = Rc::new(move |state: &ViewState| {
        if let ViewState::Label(label) = state {
            if label.text.as_deref() == Some("ping") {
                echo_writer.write(LabelState::new("pong"));
            }
        }
    });

    let (render_trigger, render_echo) = (trigger.clone(), echo.clone());
    let reconciler = Reconciler::new(
        observer,
        move || vec![ViewNode::label(&render_trigger), ViewNode::label(&render_echo)],
        TestHost::default(),
        TestFactory {
            hook: Some(hook),
            ..TestFactory::default()
        },
    );
    reconciler.start().expect("mount");

    trigger.write(LabelState::new("ping"));

    assert_eq!(reconciler.cycle_count(), 3);
    reconciler.with_host(|host| assert_eq!(host.texts(), vec!["ping", "pong"]));
}

#[test]
fn notification_during_mount_runs_one_follow_up_cycle() {
    let observer = ObserverId::new();
    let cell = StateCell::detached(LabelState::new("a"));
    let notified = Rc::new(Cell::new(None));
    let seen = notified.clone();
    let hook: SetupHook = Rc::new(move |_state: &ViewState| {
        seen.set(Some(crate::runtime::notify_observer(observer)));
    });
    let render_cell = cell.clone();
    let reconciler = Reconciler::new(
        observer,
        move || vec![ViewNode::label(&render_cell)],
        TestHost::default(),
        TestFactory {
            hook: Some(hook),
            ..TestFactory::default()
        },
    );

    let report = reconciler.start().expect("mount");
    assert_eq!(notified.get(), Some(true));
    assert_eq!(report.cycles, 2);
    assert!(!report.deferred);
    assert_eq!(reconciler.with_host(|host| host.children[0].setups), 1);
}

#[test]
fn dropping_the_reconciler_silences_cells() {
    let reconciler = mounted_screen();
    let observer = reconciler.observer();
    let cell = reconciler.component().label1.clone();
    drop(reconciler);

    assert!(!observer.is_registered());
    cell.write(LabelState::new("after teardown"));
    assert_eq!(cell.read().text.as_deref(), Some("after teardown"));
}

struct Tiles {
    tiles: Vec<StateCell<TileState>>,
    order: StateCell<Vec<usize>>,
}

impl ViewComponent for Tiles {
    fn render(&self) -> Vec<ViewNode> {
        self.order
            .read()
            .into_iter()
            .map(|index| ViewNode::tile(&self.tiles[index]))
            .collect()
    }
}

fn tiles(options: ReconcilerOptions) -> Reconciler<Tiles, TestHost, TestFactory> {
    let observer = ObserverId::new();
    let tiles = Tiles {
        tiles: (0..3)
            .map(|i| StateCell::new(observer, TileState::new(i, format!("tile {i}"), 100)))
            .collect(),
        order: StateCell::new(observer, vec![0, 1, 2]),
    };
    let reconciler = Reconciler::with_options(
        observer,
        tiles,
        TestHost::default(),
        TestFactory::default(),
        options,
    );
    reconciler.start().expect("mount");
    reconciler
}

#[test]
fn moving_a_view_later_reuses_the_instance() {
    let reconciler = tiles(ReconcilerOptions::default());
    reconciler.component().order.write(vec![1, 2, 0]);

    reconciler.with_host(|host| {
        assert_eq!(host.ids(), vec![2, 3, 1]);
        assert_eq!(host.texts(), vec!["tile 1", "tile 2", "tile 0"]);
    });
}

#[test]
fn moving_a_view_earlier_pools_the_leftover() {
    let reconciler = tiles(ReconcilerOptions::default());
    reconciler.component().order.write(vec![2, 0, 1]);

    reconciler.with_host(|host| {
        assert_eq!(host.ids(), vec![4, 1, 2]);
        assert_eq!(host.texts(), vec!["tile 2", "tile 0", "tile 1"]);
    });
    assert_eq!(reconciler.pooled(ViewKind::Tile), 1);

    reconciler.component().order.write(vec![2, 0, 1, 0]);
    reconciler.with_host(|host| assert_eq!(host.ids(), vec![4, 1, 2, 3]));
    assert_eq!(reconciler.pooled(ViewKind::Tile), 0);
}

#[test]
fn reuse_can_be_disabled() {
    let reconciler = tiles(ReconcilerOptions::without_reuse());
    reconciler.component().order.write(vec![1, 2, 0]);

    reconciler.with_host(|host| assert_eq!(host.ids(), vec![2, 3, 4]));
    assert_eq!(reconciler.pooled(ViewKind::Tile), 0);
}

#[test]
fn external_mutation_is_reported_and_not_committed() {
    let observer = ObserverId::new();
    let cell = StateCell::detached(LabelState::new("a"));
    let render_cell = cell.clone();
    let reconciler = Reconciler::new(
        observer,
        move || vec![ViewNode::label(&render_cell)],
        TestHost::default(),
        TestFactory::default(),
    );
    reconciler.start().expect("mount");
    let committed = reconciler.committed_keys();

    reconciler.with_host_mut(|host| host.children.clear());
    cell.write(LabelState::new("b"));
    let err = reconciler.update().expect_err("surface no longer matches");

    assert_eq!(
        err,
        ReconcileError::DiffInvariantViolation {
            op: EditOp::Replace,
            offset: 0,
            len: 0,
        }
    );
    assert_eq!(reconciler.committed_keys(), committed);
}

#[test]
fn rejected_state_falls_back_to_a_fresh_view() {
    let observer = ObserverId::new();
    let cell = StateCell::detached(LabelState::new("a"));
    let render_cell = cell.clone();
    let reconciler = Reconciler::new(
        observer,
        move || vec![ViewNode::label(&render_cell)],
        TestHost::default(),
        TestFactory::default(),
    );
    reconciler.start().expect("mount");

    reconciler.with_host_mut(|host| {
        host.children[0].kind = ViewKind::Button;
        host.operations.clear();
    });
    cell.write(LabelState::new("b"));
    let report = reconciler.update().expect("fallback succeeds");

    assert_eq!(report.fallbacks, 1);
    assert_eq!(report.replaced, 0);
    reconciler.with_host(|host| {
        assert_eq!(host.children.len(), 1);
        assert_eq!(host.children[0].kind, ViewKind::Label);
        assert_eq!(host.texts(), vec!["b"]);
    });
}

fn labels(cell: &StateCell<Vec<&'static str>>) -> Vec<ViewNode> {
    cell.read()
        .into_iter()
        .map(|text| ViewNode::Label(Bound::constant(LabelState::new(text))))
        .collect()
}

/// Emits one out-of-range script, then diffs normally.
#[derive(Default)]
struct OutOfRangeOnce {
    fired: Cell<bool>,
}

impl DiffingProvider for OutOfRangeOnce {
    fn difference<T>(&self, old: &[T], new: &[T]) -> Vec<Change<T>>
    where
        T: Clone + Eq + std::hash::Hash,
    {
        match old.first() {
            Some(first) if !self.fired.replace(true) => vec![
                Change::Remove {
                    offset: 0,
                    element: first.clone(),
                },
                Change::Insert {
                    offset: 9,
                    element: first.clone(),
                },
            ],
            _ => LcsDiff.difference(old, new),
        }
    }
}

#[test]
fn bad_script_is_rejected_before_touching_the_surface() {
    let observer = ObserverId::new();
    let items = StateCell::detached(vec!["a", "b", "c"]);
    let render_items = items.clone();
    let reconciler = Reconciler::with_provider(
        observer,
        move || labels(&render_items),
        TestHost::default(),
        TestFactory::default(),
        OutOfRangeOnce::default(),
        ReconcilerOptions::default(),
    );
    reconciler.start().expect("mount");
    reconciler.with_host_mut(|host| host.operations.clear());
    let committed = reconciler.committed_keys();

    let err = reconciler.update().expect_err("insert past the end");
    assert_eq!(
        err,
        ReconcileError::DiffInvariantViolation {
            op: EditOp::Insert,
            offset: 9,
            len: 2,
        }
    );
    reconciler.with_host(|host| {
        assert!(host.operations.is_empty());
        assert_eq!(host.texts(), vec!["a", "b", "c"]);
    });
    assert_eq!(reconciler.committed_keys(), committed);

    let report = reconciler.update().expect("surface still in step");
    assert!(report.is_noop());
    reconciler.with_host(|host| assert_eq!(host.texts(), vec!["a", "b", "c"]));
}

#[test]
fn failure_after_the_surface_changed_poisons_later_cycles() {
    let observer = ObserverId::new();
    let items = StateCell::detached(vec!["a", "b"]);
    let render_items = items.clone();
    let factory = TestFactory::default();
    let broken = factory.broken.clone();
    let reconciler = Reconciler::new(
        observer,
        move || labels(&render_items),
        TestHost::default(),
        factory,
    );
    reconciler.start().expect("mount");

    broken.set(true);
    items.write(vec!["b", "c"]);
    let err = reconciler.update().expect_err("fresh view rejects its state");
    assert!(err.is_type_mismatch());
    reconciler.with_host(|host| assert_eq!(host.texts(), vec!["b"]));
    assert_eq!(reconciler.committed_keys().len(), 2);

    broken.set(false);
    assert_eq!(reconciler.update(), Err(err));
    assert_eq!(reconciler.cycle_count(), 1);
}

#[test]
fn writes_while_the_surface_is_lent_out_run_afterwards() {
    let reconciler = mounted_screen();
    let cell = reconciler.component().label1.clone();

    let seen = reconciler.with_host(|host| {
        cell.write(LabelState::new("inside"));
        host.texts()[0].clone()
    });

    assert_eq!(seen, "Label 1");
    assert_eq!(reconciler.cycle_count(), 2);
    reconciler.with_host(|host| assert_eq!(host.texts()[0], "inside"));
}

#[test]
fn several_writes_under_with_host_mut_fold_into_one_cycle() {
    let reconciler = mounted_screen();
    let screen = reconciler.component();

    reconciler.with_host_mut(|host| {
        screen.label1.write(LabelState::new("one"));
        screen.button2.write(ButtonState::new("two"));
        host.operations.clear();
    });

    assert_eq!(reconciler.cycle_count(), 2);
    reconciler.with_host(|host| {
        assert_eq!(host.texts(), vec!["one", "Label 3", "two"]);
        assert!(host.operations.is_empty());
    });
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "update cycle failed")]
fn failed_notification_cycle_panics_in_debug_builds() {
    let reconciler = mounted_screen();
    let cell = reconciler.component().label1.clone();
    reconciler.with_host_mut(|host| host.children.clear());
    cell.write(LabelState::new("lost"));
}
