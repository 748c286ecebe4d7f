//! Visitor contracts for tree traversal
//!
//! A visitor is the unit of a pass: an entry callback and an optional exit
//! callback, consulted for every node the engine reaches. Read-only passes
//! implement [`Visitor`]; passes that restructure the tree implement
//! [`VisitorMut`] and are driven through [`crate::traverse::Traversal::run_mut`].

use crate::traverse::{ScoreContext, VisitResult};
use crate::tree::{NodeId, Tree};

/// Read-only pass over the tree
pub trait Visitor {
    /// Entry callback, invoked before the node's children
    fn visit(&mut self, tree: &Tree, node: NodeId, ctx: &ScoreContext) -> VisitResult;

    /// Exit callback, invoked after the node's children
    ///
    /// Only dispatched when [`Visitor::implements_end`] reports `true`, so
    /// entry-only passes skip the second dispatch entirely.
    fn visit_end(&mut self, tree: &Tree, node: NodeId, ctx: &ScoreContext) -> VisitResult {
        let _ = (tree, node, ctx);
        VisitResult::Continue
    }

    fn implements_end(&self) -> bool {
        false
    }
}

/// Mutating pass over the tree
///
/// The engine snapshots each node's child sequence before descending, so a
/// visitor may insert, reparent or delete nodes mid-walk; ids that go stale
/// are skipped.
pub trait VisitorMut {
    fn visit(&mut self, tree: &mut Tree, node: NodeId, ctx: &ScoreContext) -> VisitResult;

    fn visit_end(&mut self, tree: &mut Tree, node: NodeId, ctx: &ScoreContext) -> VisitResult {
        let _ = (tree, node, ctx);
        VisitResult::Continue
    }

    fn implements_end(&self) -> bool {
        false
    }
}
