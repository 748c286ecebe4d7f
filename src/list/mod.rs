//! Cached, flattened list view of a subtree
//!
//! A [`NodeList`] memoizes the document-order flattening of a subtree,
//! filtered by a view-specific predicate (a text-run view keeps only text
//! and line-break nodes, for instance). The cache is invalidated through the
//! dirty flag: any mutation below the root marks it modified, and the next
//! access rebuilds. Sequential queries answer "next leaf of type T in
//! reading order" regardless of how deeply the entries nest.

use crate::model::ClassId;
use crate::traverse::{ScoreContext, Traversal, VisitResult, Visitor};
use crate::tree::{NodeId, Tree, UNLIMITED_DEPTH};

/// Keep / drop decision applied to every flattened entry
pub type ListFilter = Box<dyn Fn(&Tree, NodeId) -> bool>;

struct Collect {
    flat: Vec<NodeId>,
}

impl Visitor for Collect {
    fn visit(&mut self, _tree: &Tree, node: NodeId, _ctx: &ScoreContext) -> VisitResult {
        self.flat.push(node);
        VisitResult::Continue
    }
}

/// Memoized flattened projection of one subtree
pub struct NodeList {
    list: Vec<NodeId>,
    filter: Option<ListFilter>,
    rebuilds: usize,
}

impl Default for NodeList {
    fn default() -> Self {
        NodeList::new()
    }
}

impl NodeList {
    /// View keeping every descendant
    pub fn new() -> Self {
        NodeList {
            list: Vec::new(),
            filter: None,
            rebuilds: 0,
        }
    }

    /// View keeping only entries the predicate accepts
    pub fn with_filter(filter: ListFilter) -> Self {
        NodeList {
            list: Vec::new(),
            filter: Some(filter),
            rebuilds: 0,
        }
    }

    /// How many times the cache has been rebuilt (rebuild-free reads reuse
    /// the previous sequence verbatim)
    pub fn rebuild_count(&self) -> usize {
        self.rebuilds
    }

    /// The flattened, filtered sequence for the subtree at `root`
    ///
    /// Rebuilds only when `root` is marked modified; the flag is cleared on
    /// rebuild.
    pub fn get(&mut self, tree: &mut Tree, root: NodeId) -> &[NodeId] {
        self.refresh(tree, root);
        &self.list
    }

    fn refresh(&mut self, tree: &mut Tree, root: NodeId) {
        let Some(node) = tree.get(root) else {
            self.list.clear();
            return;
        };
        // nothing to do, the list is up to date
        if !node.is_modified() {
            return;
        }
        tree.set_unmodified(root);

        let mut collect = Collect { flat: Vec::new() };
        // hidden content is part of the flattening; the filter decides
        Traversal::new()
            .visible_only(false)
            .run(tree, root, &mut collect, UNLIMITED_DEPTH);
        self.list = match &self.filter {
            Some(filter) => collect
                .flat
                .into_iter()
                .filter(|&n| filter(tree, n))
                .collect(),
            None => collect.flat,
        };
        self.rebuilds += 1;
    }

    pub fn len(&mut self, tree: &mut Tree, root: NodeId) -> usize {
        self.refresh(tree, root);
        self.list.len()
    }

    pub fn is_empty(&mut self, tree: &mut Tree, root: NodeId) -> bool {
        self.len(tree, root) == 0
    }

    pub fn front(&mut self, tree: &mut Tree, root: NodeId) -> Option<NodeId> {
        self.refresh(tree, root);
        self.list.first().copied()
    }

    pub fn back(&mut self, tree: &mut Tree, root: NodeId) -> Option<NodeId> {
        self.refresh(tree, root);
        self.list.last().copied()
    }

    /// Position of an entry in the cached sequence
    pub fn index_of(&mut self, tree: &mut Tree, root: NodeId, entry: NodeId) -> Option<usize> {
        self.refresh(tree, root);
        self.list.iter().position(|&n| n == entry)
    }

    /// Entry immediately after `entry` in reading order
    pub fn next(&mut self, tree: &mut Tree, root: NodeId, entry: NodeId) -> Option<NodeId> {
        self.refresh(tree, root);
        let idx = self.list.iter().position(|&n| n == entry)?;
        self.list.get(idx + 1).copied()
    }

    /// Entry immediately before `entry` in reading order
    pub fn previous(&mut self, tree: &mut Tree, root: NodeId, entry: NodeId) -> Option<NodeId> {
        self.refresh(tree, root);
        let idx = self.list.iter().position(|&n| n == entry)?;
        idx.checked_sub(1).and_then(|i| self.list.get(i)).copied()
    }

    /// First entry of the given class at or after `start`
    pub fn first_of_class(
        &mut self,
        tree: &mut Tree,
        root: NodeId,
        start: NodeId,
        class_id: ClassId,
    ) -> Option<NodeId> {
        self.refresh(tree, root);
        let idx = self.list.iter().position(|&n| n == start)?;
        self.list[idx..]
            .iter()
            .copied()
            .find(|&n| tree.get(n).map(|node| node.class_id()) == Some(class_id))
    }

    /// First entry of the given class at or before `start`, scanning backward
    pub fn first_of_class_backward(
        &mut self,
        tree: &mut Tree,
        root: NodeId,
        start: NodeId,
        class_id: ClassId,
    ) -> Option<NodeId> {
        self.refresh(tree, root);
        let idx = self.list.iter().position(|&n| n == start)?;
        self.list[..=idx]
            .iter()
            .rev()
            .copied()
            .find(|&n| tree.get(n).map(|node| node.class_id()) == Some(class_id))
    }
}
