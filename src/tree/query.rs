//! Read-only positional and relational queries
//!
//! Child/ancestor lookups, document-order comparison and the caller-owned
//! child iterator. Deep searches that need a full walk live in
//! [`crate::find`].

use crate::model::ClassId;
use crate::tree::{NodeId, Tree};

impl Tree {
    /// Position of `child` in `parent`'s sequence, if it is listed there
    pub fn child_index(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.get(parent)?.children.iter().position(|&c| c == child)
    }

    /// Child at `idx`, or `None` when out of range
    pub fn child_at(&self, parent: NodeId, idx: usize) -> Option<NodeId> {
        self.get(parent)?.children.get(idx).copied()
    }

    pub fn child_count(&self, parent: NodeId) -> usize {
        self.get(parent).map(|n| n.children.len()).unwrap_or(0)
    }

    /// Number of direct children of the given class
    pub fn child_count_of_class(&self, parent: NodeId, class_id: ClassId) -> usize {
        self.children_of_class(parent, class_id).count()
    }

    /// Lazy, restartable iterator over direct children of one class
    ///
    /// Each call site owns its own cursor; iteration state never lives on
    /// the node.
    pub fn children_of_class(&self, parent: NodeId, class_id: ClassId) -> ChildrenOfClass<'_> {
        let children = self.get(parent).map(|n| n.children.as_slice()).unwrap_or(&[]);
        ChildrenOfClass {
            tree: self,
            children: children.iter(),
            class_id,
        }
    }

    pub fn first_child_of_class(&self, parent: NodeId, class_id: ClassId) -> Option<NodeId> {
        self.children_of_class(parent, class_id).next()
    }

    pub fn last_child_of_class(&self, parent: NodeId, class_id: ClassId) -> Option<NodeId> {
        let node = self.get(parent)?;
        node.children
            .iter()
            .rev()
            .copied()
            .find(|&c| self.get(c).map(|n| n.class_id) == Some(class_id))
    }

    /// Next sibling of `child` (in `parent`'s sequence) of the given class
    pub fn next_sibling_of_class(
        &self,
        parent: NodeId,
        child: NodeId,
        class_id: ClassId,
    ) -> Option<NodeId> {
        let idx = self.child_index(parent, child)?;
        self.get(parent)?.children[idx + 1..]
            .iter()
            .copied()
            .find(|&c| self.get(c).map(|n| n.class_id) == Some(class_id))
    }

    /// Previous sibling of `child` of the given class
    pub fn previous_sibling_of_class(
        &self,
        parent: NodeId,
        child: NodeId,
        class_id: ClassId,
    ) -> Option<NodeId> {
        let idx = self.child_index(parent, child)?;
        self.get(parent)?.children[..idx]
            .iter()
            .rev()
            .copied()
            .find(|&c| self.get(c).map(|n| n.class_id) == Some(class_id))
    }

    /// First child that is not of the given class
    pub fn first_child_not(&self, parent: NodeId, class_id: ClassId) -> Option<NodeId> {
        self.get(parent)?
            .children
            .iter()
            .copied()
            .find(|&c| self.get(c).map(|n| n.class_id) != Some(class_id))
    }

    /// Ancestors from the parent up to the root
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.get(node).and_then(|n| n.parent);
        while let Some(ancestor) = current {
            out.push(ancestor);
            current = self.get(ancestor).and_then(|n| n.parent);
        }
        out
    }

    /// Closest ancestor of the given class, scanning at most `max_depth`
    /// levels up (`UNLIMITED_DEPTH` for no limit)
    pub fn first_ancestor_of_class(
        &self,
        node: NodeId,
        class_id: ClassId,
        max_depth: i32,
    ) -> Option<NodeId> {
        let mut depth = max_depth;
        let mut current = self.get(node)?.parent;
        while let Some(ancestor) = current {
            if depth == 0 {
                return None;
            }
            let ancestor_node = self.get(ancestor)?;
            if ancestor_node.class_id == class_id {
                return Some(ancestor);
            }
            depth -= 1;
            current = ancestor_node.parent;
        }
        None
    }

    /// Highest node on the ancestor path (including `node`) whose parent is
    /// *not* of the given class
    pub fn last_ancestor_not(
        &self,
        node: NodeId,
        class_id: ClassId,
        max_depth: i32,
    ) -> Option<NodeId> {
        let mut depth = max_depth;
        let mut current = node;
        loop {
            if depth == 0 {
                return None;
            }
            let parent = self.get(current)?.parent?;
            if self.get(parent)?.class_id == class_id {
                return Some(current);
            }
            depth -= 1;
            current = parent;
        }
    }

    /// Is `descendant` somewhere below `node`, within `depth` levels?
    pub fn has_descendant(&self, node: NodeId, descendant: NodeId, depth: i32) -> bool {
        let Some(n) = self.get(node) else { return false };
        for &child in &n.children {
            if child == descendant {
                return true;
            }
            if depth == 0 {
                return false;
            }
            if self.has_descendant(child, descendant, depth - 1) {
                return true;
            }
        }
        false
    }

    /// Root of the tree `node` belongs to
    pub fn root_of(&self, node: NodeId) -> Option<NodeId> {
        let mut current = node;
        loop {
            match self.get(current)?.parent {
                Some(parent) => current = parent,
                None => return Some(current),
            }
        }
    }

    /// Does `left` precede `right` in document order?
    ///
    /// Compares the two ancestor chains (self included) from the root end to
    /// the lowest common ancestor, then the diverging children's index under
    /// it. An ancestor precedes its descendants.
    pub fn is_pre_ordered(&self, left: NodeId, right: NodeId) -> bool {
        let mut chain_left = self.ancestors(left);
        chain_left.insert(0, left);
        // right being an ancestor of left means right comes first
        if chain_left.contains(&right) {
            return false;
        }
        let mut chain_right = self.ancestors(right);
        chain_right.insert(0, right);
        if chain_right.contains(&left) {
            return true;
        }

        // scan from the root end for the first divergence
        let mut iter_left = chain_left.iter().rev();
        let mut iter_right = chain_right.iter().rev();
        loop {
            match (iter_left.next(), iter_right.next()) {
                (Some(&a), Some(&b)) if a == b => continue,
                (Some(&a), Some(&b)) => {
                    let common = self.get(a).and_then(|n| n.parent);
                    if let Some(common) = common {
                        return self.child_index(common, a) < self.child_index(common, b);
                    }
                    // distinct roots have no defined order; fall back to true
                    return true;
                }
                _ => return true,
            }
        }
    }
}

/// Iterator over a node's direct children of a single class
pub struct ChildrenOfClass<'a> {
    tree: &'a Tree,
    children: std::slice::Iter<'a, NodeId>,
    class_id: ClassId,
}

impl Iterator for ChildrenOfClass<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        for &child in self.children.by_ref() {
            if self.tree.get(child).map(|n| n.class_id) == Some(self.class_id) {
                return Some(child);
            }
        }
        None
    }
}
