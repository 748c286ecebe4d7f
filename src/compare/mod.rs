//! Comparison predicates and traversal filters
//!
//! A [`Comparison`] tests one node against a criterion: its class, a
//! capability interface, or an arbitrary test. Comparisons drive both the
//! deep searches in [`crate::find`] and the per-child [`Filters`] consulted
//! by the traversal engine.

use crate::model::{ClassId, InterfaceId};
use crate::tree::{NodeId, Tree};

/// A pure test of one node against a criterion
pub trait Comparison {
    /// Does the node satisfy the criterion?
    fn matches(&self, tree: &Tree, node: NodeId) -> bool;

    /// Does this comparison claim nodes of the given class at all?
    ///
    /// [`Filters`] only consults a comparison for children whose class it
    /// claims; unclaimed classes pass through untouched.
    fn claims_class(&self, class_id: ClassId) -> bool {
        let _ = class_id;
        true
    }
}

/// Matches nodes of exactly one class
pub struct ClassIdComparison {
    pub class_id: ClassId,
}

impl ClassIdComparison {
    pub fn new(class_id: ClassId) -> Self {
        ClassIdComparison { class_id }
    }
}

impl Comparison for ClassIdComparison {
    fn matches(&self, tree: &Tree, node: NodeId) -> bool {
        tree.get(node).map(|n| n.class_id()) == Some(self.class_id)
    }
}

/// Matches nodes whose class is any of the listed ones
pub struct ClassIdsComparison {
    pub class_ids: Vec<ClassId>,
}

impl ClassIdsComparison {
    pub fn new(class_ids: Vec<ClassId>) -> Self {
        ClassIdsComparison { class_ids }
    }
}

impl Comparison for ClassIdsComparison {
    fn matches(&self, tree: &Tree, node: NodeId) -> bool {
        tree.get(node)
            .map(|n| self.class_ids.contains(&n.class_id()))
            .unwrap_or(false)
    }
}

/// Matches nodes implementing a capability interface
pub struct InterfaceComparison {
    pub interface: InterfaceId,
}

impl InterfaceComparison {
    pub fn new(interface: InterfaceId) -> Self {
        InterfaceComparison { interface }
    }
}

impl Comparison for InterfaceComparison {
    fn matches(&self, tree: &Tree, node: NodeId) -> bool {
        tree.get(node)
            .map(|n| n.has_interface(self.interface))
            .unwrap_or(false)
    }
}

/// Matches via an arbitrary closure, optionally scoped to one class
pub struct PredicateComparison<F>
where
    F: Fn(&Tree, NodeId) -> bool,
{
    predicate: F,
    claimed: Option<ClassId>,
}

impl<F> PredicateComparison<F>
where
    F: Fn(&Tree, NodeId) -> bool,
{
    pub fn new(predicate: F) -> Self {
        PredicateComparison {
            predicate,
            claimed: None,
        }
    }

    /// Restrict the comparison to nodes of one class; as a filter, other
    /// classes pass through untouched
    pub fn claiming(predicate: F, class_id: ClassId) -> Self {
        PredicateComparison {
            predicate,
            claimed: Some(class_id),
        }
    }
}

impl<F> Comparison for PredicateComparison<F>
where
    F: Fn(&Tree, NodeId) -> bool,
{
    fn matches(&self, tree: &Tree, node: NodeId) -> bool {
        (self.predicate)(tree, node)
    }

    fn claims_class(&self, class_id: ClassId) -> bool {
        match self.claimed {
            Some(claimed) => claimed == class_id,
            None => true,
        }
    }
}

/// Set of comparisons consulted by the traversal engine per child
///
/// The first comparison claiming the child's class decides; a child whose
/// class no comparison claims passes. A rejected child is neither visited
/// nor descended into.
#[derive(Default)]
pub struct Filters {
    comparisons: Vec<Box<dyn Comparison>>,
}

impl Filters {
    pub fn new() -> Self {
        Filters::default()
    }

    pub fn add(&mut self, comparison: Box<dyn Comparison>) {
        self.comparisons.push(comparison);
    }

    pub fn with(mut self, comparison: Box<dyn Comparison>) -> Self {
        self.add(comparison);
        self
    }

    pub fn apply(&self, tree: &Tree, node: NodeId) -> bool {
        let Some(class_id) = tree.get(node).map(|n| n.class_id()) else {
            return false;
        };
        for comparison in &self.comparisons {
            if comparison.claims_class(class_id) {
                return comparison.matches(tree, node);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTE: ClassId = ClassId(7);
    const REST: ClassId = ClassId(8);

    #[test]
    fn test_class_comparison() {
        let mut tree = Tree::with_seed(1);
        let note = tree.new_node(NOTE, "Note");
        let rest = tree.new_node(REST, "Rest");

        let comparison = ClassIdComparison::new(NOTE);
        assert!(comparison.matches(&tree, note));
        assert!(!comparison.matches(&tree, rest));
    }

    #[test]
    fn test_filters_unclaimed_class_passes() {
        let mut tree = Tree::with_seed(1);
        let note = tree.new_node(NOTE, "Note");
        let rest = tree.new_node(REST, "Rest");

        let filters = Filters::new().with(Box::new(PredicateComparison::claiming(
            |_: &Tree, _: NodeId| false,
            NOTE,
        )));
        assert!(!filters.apply(&tree, note));
        assert!(filters.apply(&tree, rest));
    }
}
