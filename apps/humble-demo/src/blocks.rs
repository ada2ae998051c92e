//! A list of priced blocks under a running total.

use humble_core::{
    Bound, LabelState, ObserverId, ReconcileError, Reconciler, ReconcilerOptions, StateCell,
    TileState, ViewComponent, ViewNode,
};
use humble_ui::{DefaultViewFactory, StackHost};

use crate::Transcript;

/// Blocks the rotate action cycles through.
const ROTATE_WINDOW: usize = 105;
const NEW_BLOCK_PRICE: u32 = 300;

/// Deterministic price spread between 100 and 899.
fn price_of(id: u64) -> u32 {
    100 + (id * 137 % 800) as u32
}

/// Hint shown under the total; `None` hides the line.
pub fn message_for(total: u32) -> Option<String> {
    match total {
        t if t > 3000 => Some("Too much!".to_string()),
        t if t > 2000 => Some("Sale price eligible!!".to_string()),
        t if t > 1000 => Some(format!("Add {} more!", 2000 - t)),
        _ => None,
    }
}

pub struct Blocks {
    tiles: StateCell<Vec<TileState>>,
}

impl Blocks {
    pub fn new(observer: ObserverId, count: usize) -> Self {
        let tiles = (0..count as u64)
            .map(|id| TileState::new(id, id.to_string(), price_of(id)))
            .collect();
        Self {
            tiles: StateCell::new(observer, tiles),
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.with(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_price(&self) -> u32 {
        self.tiles.with(|tiles| {
            tiles
                .iter()
                .filter(|tile| tile.selected)
                .map(|tile| tile.price)
                .sum()
        })
    }

    /// Flips the selection of the block at `index`. Out of range is a no-op.
    pub fn toggle(&self, index: usize) {
        if index >= self.len() {
            log::warn!("no block at {index}");
            return;
        }
        self.tiles
            .update(|tiles| tiles[index].selected = !tiles[index].selected);
    }

    /// Inserts a "New" block at `index`, clamped to the end of the list.
    pub fn insert(&self, index: usize) {
        self.tiles.update(|tiles| {
            let id = tiles.iter().map(|tile| tile.id + 1).max().unwrap_or(0);
            let index = index.min(tiles.len());
            tiles.insert(index, TileState::new(id, "New", NEW_BLOCK_PRICE));
        });
    }

    /// Moves the first block of the leading window to the window's end.
    pub fn rotate(&self) {
        self.tiles.update(|tiles| {
            let window = tiles.len().min(ROTATE_WINDOW);
            if window > 1 {
                tiles[..window].rotate_left(1);
            }
        });
    }

    pub fn reset(&self) {
        self.tiles.update(|tiles| {
            for tile in tiles.iter_mut() {
                tile.selected = false;
            }
        });
    }
}

impl ViewComponent for Blocks {
    fn render(&self) -> Vec<ViewNode> {
        let total = self.total_price();
        let message = match message_for(total) {
            Some(text) => LabelState::new(text),
            None => LabelState::default().hidden(true),
        };
        let mut nodes = vec![
            ViewNode::Label(Bound::constant(LabelState::new(format!("${total}")))),
            ViewNode::Label(Bound::constant(message)),
        ];
        self.tiles.with(|tiles| {
            nodes.extend(
                tiles
                    .iter()
                    .map(|tile| ViewNode::Tile(Bound::constant(tile.clone()))),
            );
        });
        nodes
    }
}

pub type BlocksReconciler = Reconciler<Blocks, StackHost, DefaultViewFactory>;

pub fn mount(options: ReconcilerOptions, count: usize) -> Result<BlocksReconciler, ReconcileError> {
    let observer = ObserverId::new();
    let reconciler = Reconciler::with_options(
        observer,
        Blocks::new(observer, count),
        StackHost::vertical().with_spacing(8),
        DefaultViewFactory::new(),
        options,
    );
    let report = reconciler.start()?;
    log::info!("blocks mounted: {} views", report.inserted);
    Ok(reconciler)
}

pub fn run(options: ReconcilerOptions, count: usize) -> Result<Transcript, ReconcileError> {
    let reconciler = mount(options, count)?;
    let blocks = reconciler.component();
    let mut transcript = Transcript::default();
    transcript.record("mount", &reconciler);

    for index in [5, 11, 10] {
        blocks.toggle(index);
        transcript.record(format!("select {index}"), &reconciler);
    }

    blocks.insert(2);
    transcript.record("insert at 2", &reconciler);

    blocks.rotate();
    transcript.record("rotate", &reconciler);

    blocks.reset();
    transcript.record("reset", &reconciler);

    Ok(transcript)
}
