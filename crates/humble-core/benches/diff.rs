use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use humble_core::{
    difference, ButtonState, HostingSurface, LabelState, NodeKey, ObserverId, ReconcileError,
    Reconciler, StateCell, StateUpdatable, ViewComponent, ViewFactory, ViewKind, ViewNode,
    ViewState,
};

const ELEMENT_SAMPLES: &[usize] = &[16, 64, 256];
const EDIT_STRIDE: usize = 7;

/// `len` keys with every `EDIT_STRIDE`-th one changed, one dropped and one
/// appended.
fn edited(len: usize) -> (Vec<u64>, Vec<u64>) {
    let old: Vec<u64> = (0..len as u64).collect();
    let mut new: Vec<u64> = old
        .iter()
        .map(|&key| {
            if key as usize % EDIT_STRIDE == 0 {
                key + 10_000
            } else {
                key
            }
        })
        .collect();
    new.remove(len / 2);
    new.push(u64::MAX);
    (old, new)
}

fn bench_difference(c: &mut Criterion) {
    let mut group = c.benchmark_group("difference");
    for &len in ELEMENT_SAMPLES {
        let (old, new) = edited(len);
        group.bench_with_input(BenchmarkId::new("edited", len), &(old, new), |b, (old, new)| {
            b.iter(|| black_box(difference(old, new)));
        });
        let unchanged: Vec<u64> = (0..len as u64).collect();
        group.bench_with_input(BenchmarkId::new("unchanged", len), &unchanged, |b, keys| {
            b.iter(|| black_box(difference(keys, keys)));
        });
    }
    group.finish();
}

struct NullView(ViewKind);

impl StateUpdatable for NullView {
    fn kind(&self) -> ViewKind {
        self.0
    }

    fn setup(&mut self, state: &ViewState) -> Result<(), ReconcileError> {
        black_box(state);
        Ok(())
    }
}

#[derive(Default)]
struct NullHost(Vec<NullView>);

impl HostingSurface for NullHost {
    type View = NullView;

    fn insert_child(&mut self, view: NullView, index: usize) {
        self.0.insert(index, view);
    }

    fn remove_child(&mut self, index: usize) -> Option<NullView> {
        (index < self.0.len()).then(|| self.0.remove(index))
    }

    fn child_mut(&mut self, index: usize) -> Option<&mut NullView> {
        self.0.get_mut(index)
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

struct NullFactory;

impl ViewFactory for NullFactory {
    type View = NullView;

    fn create(&mut self, kind: ViewKind) -> NullView {
        NullView(kind)
    }
}

struct Rows {
    labels: Vec<StateCell<LabelState>>,
    footer: StateCell<ButtonState>,
}

impl ViewComponent for Rows {
    fn render(&self) -> Vec<ViewNode> {
        self.labels
            .iter()
            .map(ViewNode::label)
            .chain(std::iter::once(ViewNode::button(&self.footer)))
            .collect()
    }
}

fn bench_cycle(c: &mut Criterion) {
    let observer = ObserverId::new();
    let rows = Rows {
        labels: (0..255)
            .map(|i| StateCell::new(observer, LabelState::new(format!("Row {i}"))))
            .collect(),
        footer: StateCell::new(observer, ButtonState::new("More")),
    };
    let reconciler = Reconciler::new(observer, rows, NullHost::default(), NullFactory);
    reconciler.start().expect("mount");
    let middle = reconciler.component().labels[128].clone();

    c.bench_function("cycle_single_replace_256", |b| {
        b.iter(|| {
            middle.update(|state| state.is_hidden = !state.is_hidden);
        });
    });

    c.bench_function("cycle_noop_256", |b| {
        b.iter(|| black_box(reconciler.update().expect("update")));
    });

    let keys: Vec<NodeKey> = reconciler.committed_keys();
    c.bench_function("keys_unchanged_256", |b| {
        b.iter(|| black_box(difference(&keys, &keys)));
    });
}

criterion_group!(diff, bench_difference, bench_cycle);
criterion_main!(diff);
