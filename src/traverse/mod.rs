//! The generic traversal engine
//!
//! Every analysis, layout and serialization pass runs as a [`Traversal`]
//! over a subtree with a visitor. The engine owns the control-flow protocol:
//! - [`VisitResult::Continue`] descends into children,
//! - [`VisitResult::SkipChildren`] prunes the current node's subtree but
//!   keeps visiting its siblings,
//! - [`VisitResult::Stop`] aborts the entire walk, sticky across all frames.
//!
//! A depth budget bounds descent (`UNLIMITED_DEPTH` for none; `0` visits the
//! start node only); transparent wrapper nodes do not count against it.
//! An optional [`Filters`] set prunes children by type before they are
//! visited, and visible-only mode skips the content of hidden
//! optional-visibility nodes.

mod visitor;

pub use visitor::{Visitor, VisitorMut};

use crate::compare::Filters;
use crate::tree::{NodeId, Tree};

/// Child iteration order of a traversal
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// Control code returned by visitor callbacks
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VisitResult {
    /// Continue traversal into children
    #[default]
    Continue,
    /// Skip this node's children; siblings are still visited
    SkipChildren,
    /// Abort the entire traversal
    Stop,
}

/// Which score the walk is currently inside
///
/// Updated by the engine as it crosses score roots (forward) or end markers
/// paired with a score root (backward), and handed to every visitor
/// callback. This replaces mutating an ambient "current score" on the
/// document itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScoreContext {
    current_score: Option<NodeId>,
}

impl ScoreContext {
    pub fn current_score(&self) -> Option<NodeId> {
        self.current_score
    }
}

/// One traversal invocation: direction, filters, visibility mode and the
/// running control code
pub struct Traversal<'f> {
    direction: Direction,
    filters: Option<&'f Filters>,
    visible_only: bool,
    code: VisitResult,
    context: ScoreContext,
}

impl Default for Traversal<'_> {
    fn default() -> Self {
        Traversal::new()
    }
}

impl<'f> Traversal<'f> {
    pub fn new() -> Self {
        Traversal {
            direction: Direction::Forward,
            filters: None,
            visible_only: true,
            code: VisitResult::Continue,
            context: ScoreContext::default(),
        }
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn filters(mut self, filters: &'f Filters) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Visit the content of hidden optional-visibility nodes as well
    pub fn visible_only(mut self, visible_only: bool) -> Self {
        self.visible_only = visible_only;
        self
    }

    /// Control code after the last run; `Stop` means the walk was aborted
    pub fn result(&self) -> VisitResult {
        self.code
    }

    pub fn context(&self) -> &ScoreContext {
        &self.context
    }

    /// Run a read-only pass over the subtree at `root`
    pub fn run(&mut self, tree: &Tree, root: NodeId, visitor: &mut dyn Visitor, depth: i32) {
        self.code = VisitResult::Continue;
        self.walk(tree, root, visitor, depth, false);
    }

    /// Run a read-only pass without visiting `root` itself
    pub fn run_from(&mut self, tree: &Tree, root: NodeId, visitor: &mut dyn Visitor, depth: i32) {
        self.code = VisitResult::Continue;
        self.walk(tree, root, visitor, depth, true);
    }

    /// Run a mutating pass over the subtree at `root`
    pub fn run_mut(
        &mut self,
        tree: &mut Tree,
        root: NodeId,
        visitor: &mut dyn VisitorMut,
        depth: i32,
    ) {
        self.code = VisitResult::Continue;
        self.walk_mut(tree, root, visitor, depth, false);
    }

    fn walk(
        &mut self,
        tree: &Tree,
        node: NodeId,
        visitor: &mut dyn Visitor,
        depth: i32,
        skip_first: bool,
    ) {
        // Stop is sticky across the whole call tree
        if self.code == VisitResult::Stop {
            return;
        }
        let Some(current) = tree.get(node) else { return };

        self.update_score_context(tree, node);

        if !skip_first {
            self.code = visitor.visit(tree, node, &self.context);
        }

        match self.code {
            VisitResult::Stop => return,
            VisitResult::SkipChildren => {
                // consumed here: siblings are still visited
                self.code = VisitResult::Continue;
                return;
            }
            VisitResult::Continue => {}
        }

        // a negative depth means unlimited and bypasses the budget entirely
        let mut depth = depth;
        if depth >= 0 {
            if current.is_transparent() {
                // wrappers do not count against the depth budget
                depth += 1;
            }
            if depth == 0 {
                return;
            }
            depth -= 1;
        }

        if !self.prune_children(current) {
            let children = current.children();
            let indices: Box<dyn Iterator<Item = usize>> = match self.direction {
                Direction::Forward => Box::new(0..children.len()),
                Direction::Backward => Box::new((0..children.len()).rev()),
            };
            for i in indices {
                let child = children[i];
                if self.accepts(tree, child) {
                    self.walk(tree, child, visitor, depth, false);
                }
                if self.code == VisitResult::Stop {
                    return;
                }
            }
        }

        if visitor.implements_end() && !skip_first {
            self.code = visitor.visit_end(tree, node, &self.context);
        }
    }

    fn walk_mut(
        &mut self,
        tree: &mut Tree,
        node: NodeId,
        visitor: &mut dyn VisitorMut,
        depth: i32,
        skip_first: bool,
    ) {
        if self.code == VisitResult::Stop {
            return;
        }
        if !tree.contains(node) {
            return;
        }

        self.update_score_context(tree, node);

        if !skip_first {
            self.code = visitor.visit(tree, node, &self.context);
        }

        match self.code {
            VisitResult::Stop => return,
            VisitResult::SkipChildren => {
                self.code = VisitResult::Continue;
                return;
            }
            VisitResult::Continue => {}
        }

        let Some(current) = tree.get(node) else { return };
        let mut depth = depth;
        if depth >= 0 {
            if current.is_transparent() {
                depth += 1;
            }
            if depth == 0 {
                return;
            }
            depth -= 1;
        }

        if !self.prune_children(current) {
            // snapshot: the visitor may restructure the sequence mid-walk
            let mut children = current.children().to_vec();
            if self.direction == Direction::Backward {
                children.reverse();
            }
            for child in children {
                if !tree.contains(child) {
                    continue;
                }
                if self.accepts(tree, child) {
                    self.walk_mut(tree, child, visitor, depth, false);
                }
                if self.code == VisitResult::Stop {
                    return;
                }
            }
        }

        if visitor.implements_end() && !skip_first && tree.contains(node) {
            self.code = visitor.visit_end(tree, node, &self.context);
        }
    }

    fn accepts(&self, tree: &Tree, child: NodeId) -> bool {
        match self.filters {
            Some(filters) => filters.apply(tree, child),
            None => true,
        }
    }

    fn prune_children(&self, node: &crate::model::Node) -> bool {
        self.visible_only
            && node.has_optional_visibility()
            && node.visibility() == crate::model::Visibility::Hidden
    }

    fn update_score_context(&mut self, tree: &Tree, node: NodeId) {
        let Some(current) = tree.get(node) else { return };
        match self.direction {
            Direction::Forward if current.is_score_root() => {
                self.context.current_score = Some(node);
            }
            Direction::Backward if current.is_milestone_end() => {
                if let Some(start) = current.paired_start() {
                    if tree.get(start).map(|n| n.is_score_root()) == Some(true) {
                        self.context.current_score = Some(start);
                    }
                }
            }
            _ => {}
        }
    }
}
