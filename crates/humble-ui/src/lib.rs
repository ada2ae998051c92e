//! Headless views and an in-memory hosting surface.
//!
//! [`StackHost`] stands in for a platform stack view: it keeps its children
//! in order and can describe itself as text. [`DefaultViewFactory`] builds
//! one [`HostedView`] per [`ViewKind`](humble_core::ViewKind).

mod debug;
mod factory;
mod stack;
mod views;

pub use debug::{format_stack, log_stack};
pub use factory::DefaultViewFactory;
pub use stack::{Axis, StackHost};
pub use views::{ButtonView, HostedView, LabelView, TileView, ViewId};
