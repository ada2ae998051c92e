use thiserror::Error;

use crate::node::ViewKind;

/// Edit operation named in a [`ReconcileError::DiffInvariantViolation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    Insert,
    Remove,
    Replace,
}

impl std::fmt::Display for EditOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EditOp::Insert => "insert",
            EditOp::Remove => "remove",
            EditOp::Replace => "replace",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// A view was asked to take a state of another kind.
    #[error("view of kind {expected} cannot take {found} state")]
    TypeMismatch { expected: ViewKind, found: ViewKind },

    /// An edit script addressed a slot the hosting surface does not have.
    /// The stored snapshot and the surface have diverged.
    #[error("{op} at offset {offset} is outside a surface of {len} children")]
    DiffInvariantViolation {
        op: EditOp,
        offset: usize,
        len: usize,
    },
}

impl ReconcileError {
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, ReconcileError::TypeMismatch { .. })
    }
}
