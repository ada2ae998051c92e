//! proptest strategies for key sequences.
//!
//! Alphabets are kept small so generated sequences are full of duplicates
//! and shared runs, which is where diffing goes wrong.

use humble_core::{LabelState, StateCell, ViewNode};
use proptest::collection::vec;
use proptest::prelude::*;

/// Sequences over `0..alphabet` of length `0..=max_len`.
pub fn keys(alphabet: u8, max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    vec(0..alphabet, 0..=max_len)
}

/// Two independent key sequences.
pub fn key_pairs(alphabet: u8, max_len: usize) -> impl Strategy<Value = (Vec<u8>, Vec<u8>)> {
    (keys(alphabet, max_len), keys(alphabet, max_len))
}

/// A sequence and a copy of it with local edits applied.
pub fn edited_pairs(max_len: usize) -> impl Strategy<Value = (Vec<u8>, Vec<u8>)> {
    keys(8, max_len).prop_flat_map(|old| {
        let len = old.len();
        let edits = vec((0..=len, 0u8..8, 0u8..3), 0..4);
        (Just(old), edits).prop_map(|(old, edits)| {
            let mut new = old.clone();
            for (at, key, kind) in edits {
                let at = at.min(new.len());
                match kind {
                    0 => new.insert(at, key),
                    1 if at < new.len() => {
                        new.remove(at);
                    }
                    _ if at < new.len() => new[at] = key,
                    _ => new.push(key),
                }
            }
            (old, new)
        })
    })
}

/// Label texts drawn from a small set, optionally hidden.
pub fn label_states(max_len: usize) -> impl Strategy<Value = Vec<LabelState>> {
    vec(
        (0u8..4, any::<bool>())
            .prop_map(|(text, hidden)| LabelState::new(format!("Label {text}")).hidden(hidden)),
        0..=max_len,
    )
}

/// Renders each state through a detached cell.
pub fn label_nodes(states: &[LabelState]) -> Vec<ViewNode> {
    states
        .iter()
        .map(|state| ViewNode::label(&StateCell::detached(state.clone())))
        .collect()
}
