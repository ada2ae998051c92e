//! Edit scripts between two ordered key sequences.
//!
//! [`LcsDiff`] aligns the sequences with a longest common subsequence and
//! reports the unmatched elements as [`Change`]s. Every offset is expressed
//! against the container as it evolves while the script is applied front to
//! back, so a consumer can replay the script one change at a time without
//! re-sorting it. Insert and replace offsets coincide with the element's index
//! in the new sequence.
//!
//! The alignment uses a suffix LCS table over the window left after trimming
//! the common prefix. The suffix is not trimmed: matching from the back would
//! pair the last occurrences of duplicated keys instead of the first ones.
//! Worst case is `O(n * m)` time and memory, which stays far below a frame
//! for a few hundred elements.

use std::hash::Hash;

/// One entry of an edit script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change<T> {
    Insert { offset: usize, element: T },
    Remove { offset: usize, element: T },
    Replace { offset: usize, old: T, new: T },
}

impl<T> Change<T> {
    pub fn offset(&self) -> usize {
        match self {
            Change::Insert { offset, .. }
            | Change::Remove { offset, .. }
            | Change::Replace { offset, .. } => *offset,
        }
    }

    pub fn is_replace(&self) -> bool {
        matches!(self, Change::Replace { .. })
    }
}

/// Computes the edit script turning `old` into `new`.
///
/// Implementations must be pure: identical inputs always yield identical
/// scripts.
pub trait DiffingProvider {
    fn difference<T>(&self, old: &[T], new: &[T]) -> Vec<Change<T>>
    where
        T: Clone + Eq + Hash;
}

/// Longest-common-subsequence diff with remove+insert coalescing.
#[derive(Debug, Default, Clone, Copy)]
pub struct LcsDiff;

impl DiffingProvider for LcsDiff {
    fn difference<T>(&self, old: &[T], new: &[T]) -> Vec<Change<T>>
    where
        T: Clone + Eq + Hash,
    {
        coalesce(raw_difference(old, new))
    }
}

/// Convenience wrapper around [`LcsDiff`].
pub fn difference<T>(old: &[T], new: &[T]) -> Vec<Change<T>>
where
    T: Clone + Eq + Hash,
{
    LcsDiff.difference(old, new)
}

/// Alignment step produced by the forward walk.
enum Step {
    Match,
    Skip(usize),
    Take(usize),
}

/// Edit script before coalescing: only inserts and removes.
pub fn raw_difference<T>(old: &[T], new: &[T]) -> Vec<Change<T>>
where
    T: Clone + Eq,
{
    let prefix = old
        .iter()
        .zip(new.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let old_window = &old[prefix..];
    let new_window = &new[prefix..];

    let mut script = Vec::with_capacity(old_window.len() + new_window.len());
    let mut gap = Gap::default();
    let mut position = prefix;

    for step in align(old_window, new_window) {
        match step {
            Step::Match => {
                position = gap.flush(old_window, new_window, position, &mut script);
                position += 1;
            }
            Step::Skip(i) => gap.removed.push(i),
            Step::Take(j) => gap.inserted.push(j),
        }
    }
    gap.flush(old_window, new_window, position, &mut script);
    script
}

/// Unmatched indices between two matched elements.
#[derive(Default)]
struct Gap {
    removed: Vec<usize>,
    inserted: Vec<usize>,
}

impl Gap {
    /// Emits the gap as alternating remove/insert pairs so that a slot whose
    /// content changed is reported as a remove immediately followed by an
    /// insert at the same offset. Returns the position after the gap.
    fn flush<T: Clone>(
        &mut self,
        old: &[T],
        new: &[T],
        mut position: usize,
        script: &mut Vec<Change<T>>,
    ) -> usize {
        let paired = self.removed.len().min(self.inserted.len());
        for k in 0..paired {
            script.push(Change::Remove {
                offset: position,
                element: old[self.removed[k]].clone(),
            });
            script.push(Change::Insert {
                offset: position,
                element: new[self.inserted[k]].clone(),
            });
            position += 1;
        }
        for &i in &self.removed[paired..] {
            script.push(Change::Remove {
                offset: position,
                element: old[i].clone(),
            });
        }
        for &j in &self.inserted[paired..] {
            script.push(Change::Insert {
                offset: position,
                element: new[j].clone(),
            });
            position += 1;
        }
        self.removed.clear();
        self.inserted.clear();
        position
    }
}

/// Walks the suffix LCS table from the front. Equal heads always match,
/// which pairs the earliest unmatched occurrences; otherwise the side whose
/// skip keeps the longer common subsequence is skipped, removals first.
fn align<T: Eq>(old: &[T], new: &[T]) -> Vec<Step> {
    let n = old.len();
    let m = new.len();
    let width = m + 1;
    let mut table = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i * width + j] = if old[i] == new[j] {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    let mut steps = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            steps.push(Step::Match);
            i += 1;
            j += 1;
        } else if table[(i + 1) * width + j] >= table[i * width + j + 1] {
            steps.push(Step::Skip(i));
            i += 1;
        } else {
            steps.push(Step::Take(j));
            j += 1;
        }
    }
    steps.extend((i..n).map(Step::Skip));
    steps.extend((j..m).map(Step::Take));
    steps
}

/// Merges every `Remove` at P that is immediately followed by an `Insert`
/// at P into a single `Replace`.
pub fn coalesce<T>(raw: Vec<Change<T>>) -> Vec<Change<T>> {
    let mut out = Vec::with_capacity(raw.len());
    let mut iter = raw.into_iter().peekable();
    while let Some(change) = iter.next() {
        if let Change::Remove { offset, element } = change {
            let pairs = matches!(
                iter.peek(),
                Some(Change::Insert { offset: next, .. }) if *next == offset
            );
            if pairs {
                if let Some(Change::Insert { element: new, .. }) = iter.next() {
                    out.push(Change::Replace {
                        offset,
                        old: element,
                        new,
                    });
                    continue;
                }
            }
            out.push(Change::Remove { offset, element });
        } else {
            out.push(change);
        }
    }
    out
}

/// Applies a script to a plain vector, front to back.
///
/// Returns `None` when a change addresses an offset outside the vector.
pub fn apply<T: Clone>(script: &[Change<T>], base: &[T]) -> Option<Vec<T>> {
    let mut items = base.to_vec();
    for change in script {
        match change {
            Change::Insert { offset, element } => {
                if *offset > items.len() {
                    return None;
                }
                items.insert(*offset, element.clone());
            }
            Change::Remove { offset, .. } => {
                if *offset >= items.len() {
                    return None;
                }
                items.remove(*offset);
            }
            Change::Replace { offset, new, .. } => {
                *items.get_mut(*offset)? = new.clone();
            }
        }
    }
    Some(items)
}

#[cfg(test)]
#[path = "tests/diff_tests.rs"]
mod tests;
