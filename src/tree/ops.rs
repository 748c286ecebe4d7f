//! Ownership and mutation operations on the tree
//!
//! Every operation that changes tree shape funnels through here. Contract
//! violations (attaching an already-parented node, referencing a non-child)
//! are checked defensively and reported as [`TreeError`] values, with
//! `debug_assert!` retained for the cases a correct caller never hits.
//! All successful mutations set the dirty flag on the affected parent and
//! its ancestors.

use std::cmp::Ordering;

use crate::compare::Comparison;
use crate::error::TreeError;
use crate::model::Node;
use crate::tree::{NodeId, Tree};

impl Tree {
    /// Append `child` to `parent`'s child sequence
    ///
    /// Consults the parent's acceptance policy first; a rejected child type
    /// is logged and the tree is left unchanged. Reference objects never take
    /// ownership; alias entries go through [`Tree::add_alias`].
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let parent_node = self.get(parent).ok_or(TreeError::StaleNode)?;
        let child_node = self.get(child).ok_or(TreeError::StaleNode)?;

        if parent_node.is_reference_object {
            return Err(TreeError::ReferenceObject);
        }
        if let Some(accepts) = parent_node.accepts {
            if !accepts(child_node.class_id) {
                log::error!(
                    "adding '{}' to a '{}' is not supported",
                    child_node.class_name,
                    parent_node.class_name
                );
                return Err(TreeError::UnsupportedChild {
                    parent: parent_node.class_name.clone(),
                    child: child_node.class_name.clone(),
                });
            }
        }
        if child_node.parent.is_some() {
            return Err(TreeError::AlreadyAttached);
        }

        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
        self.mark_modified(parent);
        Ok(())
    }

    /// Append an id to a reference object's sequence without taking ownership
    ///
    /// The entry keeps its real parent; the reference object merely iterates
    /// it. Only valid on nodes marked with
    /// [`Tree::set_as_reference_object`].
    pub fn add_alias(&mut self, reference: NodeId, node: NodeId) -> Result<(), TreeError> {
        let reference_node = self.get(reference).ok_or(TreeError::StaleNode)?;
        if !reference_node.is_reference_object {
            return Err(TreeError::ReferenceObject);
        }
        if !self.contains(node) {
            return Err(TreeError::StaleNode);
        }
        if let Some(r) = self.get_mut(reference) {
            r.children.push(node);
        }
        self.mark_modified(reference);
        Ok(())
    }

    /// Insert `new` immediately before `reference` in `parent`'s sequence
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        reference: NodeId,
        new: NodeId,
    ) -> Result<(), TreeError> {
        self.insert_relative(parent, reference, new, 0)
    }

    /// Insert `new` immediately after `reference` in `parent`'s sequence
    pub fn insert_after(
        &mut self,
        parent: NodeId,
        reference: NodeId,
        new: NodeId,
    ) -> Result<(), TreeError> {
        self.insert_relative(parent, reference, new, 1)
    }

    fn insert_relative(
        &mut self,
        parent: NodeId,
        reference: NodeId,
        new: NodeId,
        offset: usize,
    ) -> Result<(), TreeError> {
        if !self.contains(parent) || !self.contains(new) {
            return Err(TreeError::StaleNode);
        }
        let idx = self.child_index(parent, reference).ok_or(TreeError::NotAChild)?;
        let new_node = self.get(new).ok_or(TreeError::StaleNode)?;
        if new_node.parent.is_some() {
            return Err(TreeError::AlreadyAttached);
        }

        if let Some(node) = self.get_mut(new) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.get_mut(parent) {
            let at = (idx + offset).min(node.children.len());
            node.children.insert(at, new);
        }
        self.mark_modified(parent);
        Ok(())
    }

    /// Remove the child at `idx` permanently; the caller owns it afterwards
    ///
    /// Out-of-range indices answer `None` rather than failing.
    pub fn detach(&mut self, parent: NodeId, idx: usize) -> Option<NodeId> {
        let node = self.get(parent)?;
        if idx >= node.children.len() {
            return None;
        }
        let child = node.children[idx];
        if let Some(node) = self.get_mut(parent) {
            node.children.remove(idx);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = None;
        }
        self.mark_modified(parent);
        Some(child)
    }

    /// Give up ownership of the child at `idx` but leave it in the sequence
    ///
    /// Used when a subtree temporarily moves elsewhere during restructuring;
    /// follow a bulk relinquish with [`Tree::clear_relinquished_children`] to
    /// make the sequence consistent again.
    pub fn relinquish(&mut self, parent: NodeId, idx: usize) -> Option<NodeId> {
        let node = self.get(parent)?;
        if idx >= node.children.len() {
            return None;
        }
        let child = node.children[idx];
        if let Some(node) = self.get_mut(child) {
            node.parent = None;
        }
        Some(child)
    }

    /// Drop (without freeing) entries whose parent no longer points back here
    pub fn clear_relinquished_children(&mut self, parent: NodeId) {
        let Some(node) = self.get(parent) else { return };
        let retained: Vec<NodeId> = node
            .children
            .iter()
            .copied()
            .filter(|&child| self.get(child).map(|n| n.parent) == Some(Some(parent)))
            .collect();
        if let Some(node) = self.get_mut(parent) {
            node.children = retained;
        }
    }

    /// Swap `current` out of the sequence for a parentless `replacement`
    ///
    /// `current` is not freed; the caller owns it afterwards.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        current: NodeId,
        replacement: NodeId,
    ) -> Result<(), TreeError> {
        let idx = self.child_index(parent, current).ok_or(TreeError::NotAChild)?;
        let replacement_node = self.get(replacement).ok_or(TreeError::StaleNode)?;
        if replacement_node.parent.is_some() {
            return Err(TreeError::AlreadyAttached);
        }

        if let Some(node) = self.get_mut(current) {
            node.parent = None;
        }
        if let Some(node) = self.get_mut(replacement) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.get_mut(parent) {
            node.children[idx] = replacement;
        }
        self.mark_modified(parent);
        Ok(())
    }

    /// Remove `child` from the sequence and free its subtree
    ///
    /// On a reference object the entry is only unlisted, never freed.
    /// Returns whether the child was found.
    pub fn delete_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(idx) = self.child_index(parent, child) else {
            debug_assert!(false, "delete_child called with a non-child");
            return false;
        };
        let reference = self
            .get(parent)
            .map(|n| n.is_reference_object)
            .unwrap_or(false);
        if let Some(node) = self.get_mut(parent) {
            node.children.remove(idx);
        }
        if !reference {
            self.free_subtree(child);
        }
        self.mark_modified(parent);
        true
    }

    /// Remove and free every direct child matching the comparison
    ///
    /// Returns the number of children removed.
    pub fn delete_children_by(&mut self, parent: NodeId, comparison: &dyn Comparison) -> usize {
        let Some(node) = self.get(parent) else { return 0 };
        let reference = node.is_reference_object;
        let children = node.children.clone();
        let mut retained = Vec::with_capacity(children.len());
        let mut count = 0;
        for child in children {
            if comparison.matches(self, child) {
                if !reference {
                    self.free_subtree(child);
                }
                count += 1;
            } else {
                retained.push(child);
            }
        }
        if let Some(node) = self.get_mut(parent) {
            node.children = retained;
        }
        if count > 0 {
            self.mark_modified(parent);
        }
        count
    }

    /// Move the entire child sequence of `source` into this node
    ///
    /// Children are inserted starting at `at`, or appended when `at` is
    /// `None`. Unless `allow_type_change` is set, source and target must be
    /// of the same type.
    pub fn move_children_from(
        &mut self,
        target: NodeId,
        source: NodeId,
        at: Option<usize>,
        allow_type_change: bool,
    ) -> Result<(), TreeError> {
        if target == source {
            return Err(TreeError::MoveIntoSelf);
        }
        let target_node = self.get(target).ok_or(TreeError::StaleNode)?;
        let source_node = self.get(source).ok_or(TreeError::StaleNode)?;
        if source_node.is_reference_object {
            return Err(TreeError::ReferenceObject);
        }
        if !allow_type_change && target_node.class_id != source_node.class_id {
            return Err(TreeError::TypeMismatch);
        }

        let moved = source_node.children.clone();
        if let Some(node) = self.get_mut(source) {
            node.children.clear();
        }
        let mut insert_at = at;
        for child in moved {
            if let Some(node) = self.get_mut(child) {
                node.parent = Some(target);
            }
            if let Some(node) = self.get_mut(target) {
                match insert_at {
                    Some(idx) if idx < node.children.len() => {
                        node.children.insert(idx, child);
                        insert_at = Some(idx + 1);
                    }
                    _ => node.children.push(child),
                }
            }
        }
        self.mark_modified(target);
        self.mark_modified(source);
        Ok(())
    }

    /// Relinquish a node from its current parent and add it to another
    ///
    /// The old parent keeps a relinquished entry until its
    /// `clear_relinquished_children` runs, matching the bulk-restructuring
    /// protocol.
    pub fn move_node_to(&mut self, node: NodeId, target: NodeId) -> Result<(), TreeError> {
        let node_ref = self.get(node).ok_or(TreeError::StaleNode)?;
        let parent = node_ref.parent.ok_or(TreeError::NotAChild)?;
        // relinquish + re-add to the same parent would duplicate the entry
        debug_assert!(parent != target);
        let Some(idx) = self.child_index(parent, node) else {
            return Err(TreeError::NotAChild);
        };
        self.relinquish(parent, idx);
        self.add_child(target, node)
    }

    /// Stable-sort the child sequence with a tree-aware comparator
    pub fn sort_children_by<F>(&mut self, parent: NodeId, mut cmp: F)
    where
        F: FnMut(&Tree, NodeId, NodeId) -> Ordering,
    {
        let Some(node) = self.get(parent) else { return };
        let mut children = node.children.clone();
        children.sort_by(|&a, &b| cmp(self, a, b));
        if let Some(node) = self.get_mut(parent) {
            node.children = children;
        }
        self.mark_modified(parent);
    }

    /// Deep-copy a subtree
    ///
    /// Every clone gets a fresh identifier, is marked modified, and carries a
    /// back link to the identifier of the node it was copied from. Reference
    /// objects are copied without their aliased entries.
    pub fn clone_subtree(&mut self, source: NodeId) -> Option<NodeId> {
        if !self.contains(source) {
            return None;
        }
        self.clone_recursive(source)
    }

    fn clone_recursive(&mut self, source: NodeId) -> Option<NodeId> {
        let src = self.get(source)?;
        let mut node = Node::new(src.class_id, src.class_name.clone());
        node.interfaces = src.interfaces;
        node.behavior = src.behavior;
        node.visibility = src.visibility;
        node.accepts = src.accepts;
        node.is_attribute = src.is_attribute;
        node.is_reference_object = src.is_reference_object;
        // the clone points back at its source, not at any sibling clone
        node.back_link = Some(src.id.clone());
        node.is_modified = true;

        let children = if src.is_reference_object {
            Vec::new()
        } else {
            src.children.clone()
        };
        let clone = self.alloc(node);
        for child in children {
            // skip entries relinquished to another parent
            if self.get(child).map(|n| n.parent) != Some(Some(source)) {
                continue;
            }
            if let Some(child_clone) = self.clone_recursive(child) {
                if let Some(c) = self.get_mut(child_clone) {
                    c.parent = Some(clone);
                }
                if let Some(p) = self.get_mut(clone) {
                    p.children.push(child_clone);
                }
            }
        }
        Some(clone)
    }
}
