//! View nodes: the render output diffed by the reconciler.
//!
//! A [`ViewNode`] is a closed sum over the supported view kinds. Each variant
//! carries the state value read from its cell at render time, so factories
//! and updaters dispatch on the variant instead of inspecting types at
//! runtime.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::hash::hash_one;
use crate::state::{CellId, StateCell};

/// Which concrete view a node is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViewKind {
    Label,
    Button,
    Tile,
}

impl ViewKind {
    pub const ALL: [ViewKind; 3] = [ViewKind::Label, ViewKind::Button, ViewKind::Tile];

    pub fn name(self) -> &'static str {
        match self {
            ViewKind::Label => "label",
            ViewKind::Button => "button",
            ViewKind::Tile => "tile",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LabelState {
    pub is_hidden: bool,
    pub text: Option<String>,
}

impl LabelState {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            is_hidden: false,
            text: Some(text.into()),
        }
    }

    pub fn hidden(mut self, is_hidden: bool) -> Self {
        self.is_hidden = is_hidden;
        self
    }
}

/// Callback attached to a button.
///
/// Actions never take part in equality or hashing: two buttons that look the
/// same are the same node. Swapping only the action of a live button yields
/// an empty script, so the hosted view keeps its previous action until some
/// visible field changes or the view is inserted again.
#[derive(Clone)]
pub struct Action(Rc<dyn Fn()>);

impl Action {
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn invoke(&self) {
        (self.0)()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}

#[derive(Debug, Clone, Default)]
pub struct ButtonState {
    pub is_hidden: bool,
    pub title: Option<String>,
    pub action: Option<Action>,
}

impl ButtonState {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            is_hidden: false,
            title: Some(title.into()),
            action: None,
        }
    }

    pub fn hidden(mut self, is_hidden: bool) -> Self {
        self.is_hidden = is_hidden;
        self
    }

    pub fn on_tap(mut self, f: impl Fn() + 'static) -> Self {
        self.action = Some(Action::new(f));
        self
    }
}

impl PartialEq for ButtonState {
    fn eq(&self, other: &Self) -> bool {
        self.is_hidden == other.is_hidden && self.title == other.title
    }
}

impl Eq for ButtonState {}

impl Hash for ButtonState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.is_hidden.hash(state);
        self.title.hash(state);
    }
}

/// A priced, selectable block in a grid of items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TileState {
    pub id: u64,
    pub title: String,
    pub price: u32,
    pub selected: bool,
}

impl TileState {
    pub fn new(id: u64, title: impl Into<String>, price: u32) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            selected: false,
        }
    }
}

/// State snapshot handed to a view for configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewState {
    Label(LabelState),
    Button(ButtonState),
    Tile(TileState),
}

impl ViewState {
    pub fn kind(&self) -> ViewKind {
        match self {
            ViewState::Label(_) => ViewKind::Label,
            ViewState::Button(_) => ViewKind::Button,
            ViewState::Tile(_) => ViewKind::Tile,
        }
    }
}

/// A state value paired with the cell it was read from.
#[derive(Debug, Clone)]
pub struct Bound<T> {
    value: T,
    source: Option<CellId>,
}

impl<T: Clone + Eq + Hash> Bound<T> {
    /// Reads the current value of `cell`.
    pub fn read(cell: &StateCell<T>) -> Self {
        Self {
            value: cell.read(),
            source: Some(cell.id()),
        }
    }

    /// A constant with no backing cell.
    pub fn constant(value: T) -> Self {
        Self {
            value,
            source: None,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn source(&self) -> Option<CellId> {
        self.source
    }
}

/// Key compared by the diff: the kind tag plus a hash of the state.
///
/// Unchanged state yields the same key across cycles; any change to a field
/// that affects rendering yields a different one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    pub kind: ViewKind,
    pub hash: u64,
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:016x}", self.kind, self.hash)
    }
}

/// One renderable unit of a component's output.
#[derive(Debug, Clone)]
pub enum ViewNode {
    Label(Bound<LabelState>),
    Button(Bound<ButtonState>),
    Tile(Bound<TileState>),
}

impl ViewNode {
    pub fn label(cell: &StateCell<LabelState>) -> Self {
        ViewNode::Label(Bound::read(cell))
    }

    pub fn button(cell: &StateCell<ButtonState>) -> Self {
        ViewNode::Button(Bound::read(cell))
    }

    pub fn tile(cell: &StateCell<TileState>) -> Self {
        ViewNode::Tile(Bound::read(cell))
    }

    pub fn kind(&self) -> ViewKind {
        match self {
            ViewNode::Label(_) => ViewKind::Label,
            ViewNode::Button(_) => ViewKind::Button,
            ViewNode::Tile(_) => ViewKind::Tile,
        }
    }

    pub fn state(&self) -> ViewState {
        match self {
            ViewNode::Label(bound) => ViewState::Label(bound.value.clone()),
            ViewNode::Button(bound) => ViewState::Button(bound.value.clone()),
            ViewNode::Tile(bound) => ViewState::Tile(bound.value.clone()),
        }
    }

    pub fn source(&self) -> Option<CellId> {
        match self {
            ViewNode::Label(bound) => bound.source,
            ViewNode::Button(bound) => bound.source,
            ViewNode::Tile(bound) => bound.source,
        }
    }

    pub fn key(&self) -> NodeKey {
        let hash = match self {
            ViewNode::Label(bound) => hash_one(&bound.value),
            ViewNode::Button(bound) => hash_one(&bound.value),
            ViewNode::Tile(bound) => hash_one(&bound.value),
        };
        NodeKey {
            kind: self.kind(),
            hash,
        }
    }
}

impl PartialEq for ViewNode {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ViewNode::Label(a), ViewNode::Label(b)) => a.value == b.value,
            (ViewNode::Button(a), ViewNode::Button(b)) => a.value == b.value,
            (ViewNode::Tile(a), ViewNode::Tile(b)) => a.value == b.value,
            _ => false,
        }
    }
}

impl Eq for ViewNode {}

impl Hash for ViewNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}
