//! Type registry: element names to constructors and class ids
//!
//! Parsers see textual element names; the registry is how a name becomes a
//! live, correctly-typed node. It is an explicit object handed to the
//! construction entry points, populated once at startup and read-only
//! afterwards. There is no process-wide instance.

use std::collections::HashMap;

use crate::model::{AcceptFn, ClassId, InterfaceSet, Node};
use crate::tree::{NodeId, Tree};

/// Everything the core needs to know about one node kind
///
/// Built once per kind by the collaborator that defines it and handed to
/// [`NodeRegistry::register`].
pub struct ClassSpec {
    pub name: String,
    pub class_id: ClassId,
    pub interfaces: InterfaceSet,
    pub behavior: u8,
    /// Child-acceptance policy; `None` accepts anything
    pub accepts: Option<AcceptFn>,
    /// Extra initialization applied to every freshly constructed node
    pub init: Option<fn(&mut Node)>,
}

impl ClassSpec {
    pub fn new(name: impl Into<String>, class_id: ClassId) -> Self {
        ClassSpec {
            name: name.into(),
            class_id,
            interfaces: InterfaceSet::EMPTY,
            behavior: 0,
            accepts: None,
            init: None,
        }
    }

    pub fn interfaces(mut self, interfaces: InterfaceSet) -> Self {
        self.interfaces = interfaces;
        self
    }

    pub fn behavior(mut self, behavior: u8) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn accepts(mut self, accepts: AcceptFn) -> Self {
        self.accepts = Some(accepts);
        self
    }

    pub fn init(mut self, init: fn(&mut Node)) -> Self {
        self.init = Some(init);
        self
    }
}

/// Name-to-constructor and name-to-class-id mapping
#[derive(Default)]
pub struct NodeRegistry {
    specs: HashMap<String, ClassSpec>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        NodeRegistry::default()
    }

    /// Record a factory for one node kind
    ///
    /// Registering the same name twice replaces the earlier spec (logged).
    pub fn register(&mut self, spec: ClassSpec) {
        if self.specs.contains_key(&spec.name) {
            log::warn!("class '{}' registered twice, replacing", spec.name);
        }
        self.specs.insert(spec.name.clone(), spec);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    pub fn spec(&self, name: &str) -> Option<&ClassSpec> {
        self.specs.get(name)
    }

    /// Instantiate a node of the named kind into the tree
    ///
    /// An unknown name is logged and answers `None`; it never panics, so a
    /// parser can skip unrecognized elements and keep going.
    pub fn create(&self, name: &str, tree: &mut Tree) -> Option<NodeId> {
        let Some(spec) = self.specs.get(name) else {
            log::error!("constructor for '{name}' not found");
            return None;
        };
        let mut node = Node::new(spec.class_id, spec.name.clone());
        node.interfaces = spec.interfaces;
        node.behavior = spec.behavior;
        node.accepts = spec.accepts;
        if let Some(init) = spec.init {
            init(&mut node);
        }
        Some(tree.alloc(node))
    }

    /// Resolve a name to its stable class id
    ///
    /// Unknown names answer [`ClassId::UNKNOWN`] with a logged warning.
    pub fn class_id_for(&self, name: &str) -> ClassId {
        match self.specs.get(name) {
            Some(spec) => spec.class_id,
            None => {
                log::warn!("class id for '{name}' not found");
                ClassId::UNKNOWN
            }
        }
    }

    /// Resolve several names at once, skipping any that are not registered
    pub fn class_ids_for(&self, names: &[&str]) -> Vec<ClassId> {
        names
            .iter()
            .filter_map(|name| match self.specs.get(*name) {
                Some(spec) => Some(spec.class_id),
                None => {
                    log::debug!("class name '{name}' could not be matched");
                    None
                }
            })
            .collect()
    }
}
