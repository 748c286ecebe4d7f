//! Error types for structural tree operations
//!
//! Distinguishes recoverable structural rejections (an unsupported child, an
//! unknown type name) from contract violations that a correct caller never
//! triggers. Both are reported as values; none of them panic.

use thiserror::Error;

/// Errors returned by the structural operations on a [`crate::tree::Tree`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The node id no longer refers to a live node in this tree
    #[error("node id refers to a node that is no longer in the tree")]
    StaleNode,

    /// The parent's acceptance policy rejected the child's type
    #[error("'{child}' is not a supported child of '{parent}'")]
    UnsupportedChild { parent: String, child: String },

    /// The node to attach already has a parent
    #[error("node already has a parent")]
    AlreadyAttached,

    /// The reference node is not a child of the given parent
    #[error("node is not a child of this parent")]
    NotAChild,

    /// `move_children_from` was called with the node itself as source
    #[error("cannot move children from a node into itself")]
    MoveIntoSelf,

    /// Source and target types differ and type change was not allowed
    #[error("node types differ and type change is not allowed")]
    TypeMismatch,

    /// A reference object cannot take ownership of children
    #[error("a reference object only aliases children it does not own")]
    ReferenceObject,
}
