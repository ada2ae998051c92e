//! Headless replays of the two demo screens.
//!
//! Each scenario mounts a component into a [`StackHost`](humble_ui::StackHost),
//! performs a fixed list of user actions and records what the stack looked
//! like after each one.

pub mod blocks;
pub mod screen;
mod transcript;

pub use transcript::{Step, Transcript};
