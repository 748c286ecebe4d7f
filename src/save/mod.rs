//! Write-sink contract for serialization passes
//!
//! The engine does not know any output format. A serializer implements
//! [`WriteSink`]; [`save`] drives it over the subtree, entering and leaving
//! every node in document order. Returning `false` from either callback is
//! the sink's only way to abort an in-progress save; the engine converts it
//! into a stop and reports the aborted outcome.

use crate::traverse::{ScoreContext, Traversal, VisitResult, Visitor};
use crate::tree::{NodeId, Tree, UNLIMITED_DEPTH};

/// Output sink consumed by the save traversal
pub trait WriteSink {
    /// Write the opening of a node; `false` aborts the save
    fn write_node(&mut self, tree: &Tree, node: NodeId) -> bool;

    /// Write the closing of a node; `false` aborts the save
    fn write_node_end(&mut self, tree: &Tree, node: NodeId) -> bool;
}

struct SaveVisitor<'a> {
    sink: &'a mut dyn WriteSink,
}

impl Visitor for SaveVisitor<'_> {
    fn visit(&mut self, tree: &Tree, node: NodeId, _ctx: &ScoreContext) -> VisitResult {
        if self.sink.write_node(tree, node) {
            VisitResult::Continue
        } else {
            VisitResult::Stop
        }
    }

    fn visit_end(&mut self, tree: &Tree, node: NodeId, _ctx: &ScoreContext) -> VisitResult {
        if self.sink.write_node_end(tree, node) {
            VisitResult::Continue
        } else {
            VisitResult::Stop
        }
    }

    fn implements_end(&self) -> bool {
        true
    }
}

/// Serialize the subtree at `root` into the sink
///
/// Hidden nodes are saved too; visibility is a rendering concern, not a
/// persistence one. Returns whether the walk ran to completion.
pub fn save(tree: &Tree, root: NodeId, sink: &mut dyn WriteSink) -> bool {
    let mut visitor = SaveVisitor { sink };
    let mut traversal = Traversal::new().visible_only(false);
    traversal.run(tree, root, &mut visitor, UNLIMITED_DEPTH);
    traversal.result() != VisitResult::Stop
}
