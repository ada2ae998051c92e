use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use humble_core::{
    Action, ButtonState, LabelState, ReconcileError, StateUpdatable, TileState, ViewKind,
    ViewState,
};

/// Identity of a view instance, stable across reconfiguration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(usize);

static NEXT_VIEW_ID: AtomicUsize = AtomicUsize::new(1);

impl ViewId {
    fn next() -> Self {
        Self(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> usize {
        self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct LabelView {
    pub id: ViewId,
    pub text: String,
    pub is_hidden: bool,
}

impl LabelView {
    fn apply(&mut self, state: &LabelState) {
        self.text = state.text.clone().unwrap_or_default();
        self.is_hidden = state.is_hidden;
    }
}

#[derive(Debug, Clone)]
pub struct ButtonView {
    pub id: ViewId,
    pub title: String,
    pub is_hidden: bool,
    action: Option<Action>,
}

impl ButtonView {
    fn apply(&mut self, state: &ButtonState) {
        self.title = state.title.clone().unwrap_or_default();
        self.is_hidden = state.is_hidden;
        self.action = state.action.clone();
    }

    /// The tap handler, if the button is visible and has one.
    pub fn action(&self) -> Option<Action> {
        if self.is_hidden {
            return None;
        }
        self.action.clone()
    }
}

#[derive(Debug, Clone)]
pub struct TileView {
    pub id: ViewId,
    pub tile_id: u64,
    pub title: String,
    pub price: u32,
    pub selected: bool,
}

impl TileView {
    fn apply(&mut self, state: &TileState) {
        self.tile_id = state.id;
        self.title = state.title.clone();
        self.price = state.price;
        self.selected = state.selected;
    }
}

/// A live view owned by a [`StackHost`](crate::StackHost).
#[derive(Debug, Clone)]
pub enum HostedView {
    Label(LabelView),
    Button(ButtonView),
    Tile(TileView),
}

impl HostedView {
    /// An unconfigured view of `kind` with a fresh id.
    pub fn new(kind: ViewKind) -> Self {
        let id = ViewId::next();
        match kind {
            ViewKind::Label => HostedView::Label(LabelView {
                id,
                text: String::new(),
                is_hidden: false,
            }),
            ViewKind::Button => HostedView::Button(ButtonView {
                id,
                title: String::new(),
                is_hidden: false,
                action: None,
            }),
            ViewKind::Tile => HostedView::Tile(TileView {
                id,
                tile_id: 0,
                title: String::new(),
                price: 0,
                selected: false,
            }),
        }
    }

    pub fn id(&self) -> ViewId {
        match self {
            HostedView::Label(view) => view.id,
            HostedView::Button(view) => view.id,
            HostedView::Tile(view) => view.id,
        }
    }

    pub fn is_hidden(&self) -> bool {
        match self {
            HostedView::Label(view) => view.is_hidden,
            HostedView::Button(view) => view.is_hidden,
            HostedView::Tile(_) => false,
        }
    }

    pub fn as_button(&self) -> Option<&ButtonView> {
        match self {
            HostedView::Button(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_tile(&self) -> Option<&TileView> {
        match self {
            HostedView::Tile(view) => Some(view),
            _ => None,
        }
    }

    /// One-line description used by stack dumps.
    pub fn describe(&self) -> String {
        let mut line = match self {
            HostedView::Label(view) => format!("Label {} {:?}", view.id, view.text),
            HostedView::Button(view) => format!("Button {} {:?}", view.id, view.title),
            HostedView::Tile(view) => {
                let marker = if view.selected { " selected" } else { "" };
                format!(
                    "Tile {} {:?} ${}{}",
                    view.id, view.title, view.price, marker
                )
            }
        };
        if self.is_hidden() {
            line.push_str(" (hidden)");
        }
        line
    }
}

impl StateUpdatable for HostedView {
    fn kind(&self) -> ViewKind {
        match self {
            HostedView::Label(_) => ViewKind::Label,
            HostedView::Button(_) => ViewKind::Button,
            HostedView::Tile(_) => ViewKind::Tile,
        }
    }

    fn setup(&mut self, state: &ViewState) -> Result<(), ReconcileError> {
        match (self, state) {
            (HostedView::Label(view), ViewState::Label(state)) => view.apply(state),
            (HostedView::Button(view), ViewState::Button(state)) => view.apply(state),
            (HostedView::Tile(view), ViewState::Tile(state)) => view.apply(state),
            (view, state) => {
                return Err(ReconcileError::TypeMismatch {
                    expected: view.kind(),
                    found: state.kind(),
                })
            }
        }
        Ok(())
    }
}
