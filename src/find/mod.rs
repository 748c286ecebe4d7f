//! Deep searches over a subtree
//!
//! Each search is a small read-only visitor driven by the traversal engine.
//! Searches exclude the start node itself and honor visible-only pruning,
//! so hidden content is not found unless the caller walks it explicitly.

use crate::compare::Comparison;
use crate::traverse::{Direction, ScoreContext, Traversal, VisitResult, Visitor};
use crate::tree::{NodeId, Tree};

struct FindById<'a> {
    id: &'a str,
    found: Option<NodeId>,
}

impl Visitor for FindById<'_> {
    fn visit(&mut self, tree: &Tree, node: NodeId, _ctx: &ScoreContext) -> VisitResult {
        if tree.get(node).map(|n| n.id()) == Some(self.id) {
            self.found = Some(node);
            return VisitResult::Stop;
        }
        VisitResult::Continue
    }
}

struct FindByComparison<'a> {
    comparison: &'a dyn Comparison,
    found: Option<NodeId>,
}

impl Visitor for FindByComparison<'_> {
    fn visit(&mut self, tree: &Tree, node: NodeId, _ctx: &ScoreContext) -> VisitResult {
        if self.comparison.matches(tree, node) {
            self.found = Some(node);
            return VisitResult::Stop;
        }
        VisitResult::Continue
    }
}

struct FindAllByComparison<'a> {
    comparison: &'a dyn Comparison,
    stop_at_first_match_per_branch: bool,
    found: Vec<NodeId>,
}

impl Visitor for FindAllByComparison<'_> {
    fn visit(&mut self, tree: &Tree, node: NodeId, _ctx: &ScoreContext) -> VisitResult {
        if self.comparison.matches(tree, node) {
            self.found.push(node);
            if self.stop_at_first_match_per_branch {
                // matches inside an already-matched subtree are not reported
                return VisitResult::SkipChildren;
            }
        }
        VisitResult::Continue
    }
}

struct FindNextChild<'a> {
    comparison: &'a dyn Comparison,
    start: NodeId,
    seen_start: bool,
    found: Option<NodeId>,
}

impl Visitor for FindNextChild<'_> {
    fn visit(&mut self, tree: &Tree, node: NodeId, _ctx: &ScoreContext) -> VisitResult {
        if node == self.start {
            self.seen_start = true;
        } else if self.seen_start && self.comparison.matches(tree, node) {
            self.found = Some(node);
            return VisitResult::Stop;
        }
        VisitResult::Continue
    }
}

struct FindPreviousChild<'a> {
    comparison: &'a dyn Comparison,
    start: NodeId,
    found: Option<NodeId>,
}

impl Visitor for FindPreviousChild<'_> {
    fn visit(&mut self, tree: &Tree, node: NodeId, _ctx: &ScoreContext) -> VisitResult {
        if node == self.start {
            return VisitResult::Stop;
        }
        if self.comparison.matches(tree, node) {
            self.found = Some(node);
        }
        VisitResult::Continue
    }
}

impl Tree {
    /// Find the descendant carrying the given generated identifier
    pub fn find_descendant_by_id(
        &self,
        root: NodeId,
        id: &str,
        depth: i32,
        direction: Direction,
    ) -> Option<NodeId> {
        let mut finder = FindById { id, found: None };
        Traversal::new()
            .direction(direction)
            .run_from(self, root, &mut finder, depth);
        finder.found
    }

    /// First descendant matching the comparison, in the given direction
    pub fn find_descendant(
        &self,
        root: NodeId,
        comparison: &dyn Comparison,
        depth: i32,
        direction: Direction,
    ) -> Option<NodeId> {
        let mut finder = FindByComparison {
            comparison,
            found: None,
        };
        Traversal::new()
            .direction(direction)
            .run_from(self, root, &mut finder, depth);
        finder.found
    }

    /// All descendants matching the comparison, in document order
    ///
    /// With `stop_at_first_match_per_branch` the search does not descend
    /// inside an already-matched subtree; useful for collecting outermost
    /// matches only.
    pub fn find_all_descendants(
        &self,
        root: NodeId,
        comparison: &dyn Comparison,
        depth: i32,
        stop_at_first_match_per_branch: bool,
    ) -> Vec<NodeId> {
        let mut finder = FindAllByComparison {
            comparison,
            stop_at_first_match_per_branch,
            found: Vec::new(),
        };
        Traversal::new().run_from(self, root, &mut finder, depth);
        finder.found
    }

    /// First matching node in document order strictly after `start`
    pub fn find_next_child(
        &self,
        root: NodeId,
        comparison: &dyn Comparison,
        start: NodeId,
    ) -> Option<NodeId> {
        let mut finder = FindNextChild {
            comparison,
            start,
            seen_start: false,
            found: None,
        };
        Traversal::new().run_from(self, root, &mut finder, crate::tree::UNLIMITED_DEPTH);
        finder.found
    }

    /// Last matching node in document order strictly before `start`
    pub fn find_previous_child(
        &self,
        root: NodeId,
        comparison: &dyn Comparison,
        start: NodeId,
    ) -> Option<NodeId> {
        let mut finder = FindPreviousChild {
            comparison,
            start,
            found: None,
        };
        Traversal::new().run_from(self, root, &mut finder, crate::tree::UNLIMITED_DEPTH);
        finder.found
    }
}
