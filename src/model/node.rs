//! The node data stored in each arena slot
//!
//! A `Node` owns its position in the hierarchy (children by id, parent back
//! link) and the identity data every pass relies on: class id, class name,
//! generated identifier, capability interfaces, behavior flags and the
//! "modified" dirty flag.

use crate::model::class::{behavior, ClassId, InterfaceId, InterfaceSet, Visibility};
use crate::tree::NodeId;

/// Acceptance policy: does the node's kind accept a child of the given class?
///
/// `None` means the kind imposes no policy and accepts anything.
pub type AcceptFn = fn(ClassId) -> bool;

/// One element of the document tree
#[derive(Debug, Clone)]
pub struct Node {
    /// Stable type identifier
    pub(crate) class_id: ClassId,
    /// Human-readable type name (e.g. "Note", "Measure")
    pub(crate) class_name: String,
    /// Generated identifier: first char of the class name + base-36 token
    pub(crate) id: String,
    /// Back link into the parent; `None` for roots and relinquished nodes
    pub(crate) parent: Option<NodeId>,
    /// Ordered child sequence
    pub(crate) children: Vec<NodeId>,
    /// Capability interfaces, copied from the class spec at creation
    pub(crate) interfaces: InterfaceSet,
    /// Behavior bit flags, copied from the class spec at creation
    pub(crate) behavior: u8,
    /// Visibility; only meaningful with `behavior::OPTIONAL_VISIBILITY`
    pub(crate) visibility: Visibility,
    /// Acceptance policy for `add_child`
    pub(crate) accepts: Option<AcceptFn>,
    /// Dirty flag; set on the node and all its ancestors on mutation
    pub(crate) is_modified: bool,
    /// Children are borrowed for iteration, never owned or freed
    pub(crate) is_reference_object: bool,
    /// The node stands in for an attribute rather than an element
    pub(crate) is_attribute: bool,
    /// For MILESTONE_END kinds, the paired start element
    pub(crate) paired_start: Option<NodeId>,
    /// Identifier of the node this one was cloned from
    pub(crate) back_link: Option<String>,
}

impl Node {
    pub(crate) fn new(class_id: ClassId, class_name: impl Into<String>) -> Self {
        Node {
            class_id,
            class_name: class_name.into(),
            id: String::new(),
            parent: None,
            children: Vec::new(),
            interfaces: InterfaceSet::EMPTY,
            behavior: 0,
            visibility: Visibility::Visible,
            accepts: None,
            is_modified: true,
            is_reference_object: false,
            is_attribute: false,
            paired_start: None,
            back_link: None,
        }
    }

    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The generated identifier (unique within a live tree)
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Does this node's kind implement the given capability interface?
    pub fn has_interface(&self, interface: InterfaceId) -> bool {
        self.interfaces.contains(interface)
    }

    pub fn interfaces(&self) -> InterfaceSet {
        self.interfaces
    }

    pub fn is(&self, class_id: ClassId) -> bool {
        self.class_id == class_id
    }

    /// Transparent wrappers do not count against the traversal depth budget
    pub fn is_transparent(&self) -> bool {
        self.behavior & behavior::TRANSPARENT != 0
    }

    pub fn is_score_root(&self) -> bool {
        self.behavior & behavior::SCORE_ROOT != 0
    }

    pub fn is_milestone_end(&self) -> bool {
        self.behavior & behavior::MILESTONE_END != 0
    }

    pub fn has_optional_visibility(&self) -> bool {
        self.behavior & behavior::OPTIONAL_VISIBILITY != 0
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    pub fn is_reference_object(&self) -> bool {
        self.is_reference_object
    }

    pub fn is_attribute(&self) -> bool {
        self.is_attribute
    }

    pub fn set_attribute(&mut self, is_attribute: bool) {
        self.is_attribute = is_attribute;
    }

    /// The paired start element of an end-marker node
    pub fn paired_start(&self) -> Option<NodeId> {
        self.paired_start
    }

    pub fn set_paired_start(&mut self, start: Option<NodeId>) {
        self.paired_start = start;
    }

    /// Identifier of the source node, if this node is a clone
    pub fn back_link(&self) -> Option<&str> {
        self.back_link.as_deref()
    }
}
