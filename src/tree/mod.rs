//! Arena storage for document trees
//!
//! All nodes of a document live in one [`Tree`]; relations between them are
//! expressed as [`NodeId`] indices rather than references. This keeps parent
//! back links trivial (a plain `Option<NodeId>`) and lets mutating passes
//! hold ids across arbitrary tree surgery.
//!
//! Slots are generational: deleting a node bumps its slot generation, so a
//! stale id held by a pass is detected instead of silently aliasing a
//! recycled slot.

mod ops;
mod query;

pub use query::ChildrenOfClass;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::model::{ClassId, Node};

/// Depth budget sentinel: descend without limit
pub const UNLIMITED_DEPTH: i32 = -1;

/// Handle to a node in a [`Tree`]
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Per-tree identifier generator
///
/// Each tree owns its own pseudorandom sequence, so independent documents
/// built concurrently never contend or collide by construction order.
#[derive(Debug)]
struct IdFactory {
    rng: SmallRng,
}

impl IdFactory {
    fn from_entropy() -> Self {
        let mut buf = [0u8; 8];
        if let Err(err) = getrandom::getrandom(&mut buf) {
            log::warn!("system entropy unavailable ({err}), falling back to a fixed seed");
        }
        IdFactory {
            rng: SmallRng::seed_from_u64(u64::from_le_bytes(buf)),
        }
    }

    fn with_seed(seed: u64) -> Self {
        IdFactory {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// First character from the class name, remainder a random base-36 token
    fn generate(&mut self, class_name: &str) -> String {
        let prefix = class_name.chars().next().unwrap_or('n');
        let mut id = String::new();
        id.push(prefix);
        id.push_str(&base36(self.rng.gen::<u32>()));
        id
    }
}

fn base36(mut value: u32) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut out = [0u8; 7];
    let mut pos = out.len();
    loop {
        pos -= 1;
        out[pos] = DIGITS[(value % 36) as usize];
        value /= 36;
        if value == 0 {
            break;
        }
    }
    // always at least one digit, so the token is never empty
    String::from_utf8_lossy(&out[pos..]).into_owned()
}

/// The arena owning every node of one document
#[derive(Debug)]
pub struct Tree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    ids: IdFactory,
}

impl Tree {
    /// Create a tree with an entropy-seeded identifier sequence
    pub fn new() -> Self {
        Tree {
            slots: Vec::new(),
            free: Vec::new(),
            ids: IdFactory::from_entropy(),
        }
    }

    /// Create a tree with a deterministic identifier sequence
    ///
    /// Two trees created with the same seed generate identical ids in the
    /// same construction order; intended for tests and reproducible output.
    pub fn with_seed(seed: u64) -> Self {
        Tree {
            slots: Vec::new(),
            free: Vec::new(),
            ids: IdFactory::with_seed(seed),
        }
    }

    /// Construct an untyped node directly, outside the registry
    ///
    /// Ad hoc nodes impose no child-acceptance policy. Nodes meant to enforce
    /// one are created through [`crate::registry::NodeRegistry::create`].
    pub fn new_node(&mut self, class_id: ClassId, class_name: impl Into<String>) -> NodeId {
        self.alloc(Node::new(class_id, class_name))
    }

    pub(crate) fn alloc(&mut self, mut node: Node) -> NodeId {
        node.id = self.ids.generate(&node.class_name);
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                debug_assert!(slot.node.is_none());
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Is the id live in this tree?
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Set the dirty flag on the node and on every strict ancestor
    ///
    /// Ancestor-level caches (see [`crate::list::NodeList`]) rely on this to
    /// detect "something below me changed" without per-descendant tracking.
    pub fn mark_modified(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            match self.get_mut(node_id) {
                Some(node) => {
                    node.is_modified = true;
                    current = node.parent;
                }
                None => break,
            }
        }
    }

    /// Clear the dirty flag on this node only
    pub fn set_unmodified(&mut self, id: NodeId) {
        if let Some(node) = self.get_mut(id) {
            node.is_modified = false;
        }
    }

    /// Discard a node's identifier and generate a fresh one
    pub fn regenerate_id(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else { return };
        let class_name = node.class_name.clone();
        let fresh = self.ids.generate(&class_name);
        if let Some(node) = self.get_mut(id) {
            node.id = fresh;
        }
    }

    /// Exchange the identifiers of two nodes
    pub fn swap_ids(&mut self, a: NodeId, b: NodeId) {
        if a == b || !self.contains(a) || !self.contains(b) {
            return;
        }
        let id_a = self.get(a).map(|n| n.id.clone());
        let id_b = self.get(b).map(|n| n.id.clone());
        if let (Some(id_a), Some(id_b)) = (id_a, id_b) {
            if let Some(node) = self.get_mut(a) {
                node.id = id_b;
            }
            if let Some(node) = self.get_mut(b) {
                node.id = id_a;
            }
        }
    }

    /// Mark a childless node as aliasing children it does not own
    ///
    /// Reference objects collect nodes of other subtrees purely for
    /// iteration; freeing the reference object never frees its entries.
    pub fn set_as_reference_object(&mut self, id: NodeId) {
        if let Some(node) = self.get_mut(id) {
            debug_assert!(node.children.is_empty());
            node.is_reference_object = true;
        }
    }

    pub(crate) fn generate_id_for(&mut self, class_name: &str) -> String {
        self.ids.generate(class_name)
    }

    /// Drop a node and, unless it is a reference object, its owned subtree
    ///
    /// Children that were relinquished and reparented elsewhere are left
    /// alone.
    pub(crate) fn free_subtree(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else { return };
        let reference = node.is_reference_object;
        let children = node.children.clone();
        if !reference {
            for child in children {
                // ownership might have been given up with relinquish
                if self.get(child).map(|n| n.parent) == Some(Some(id)) {
                    self.free_subtree(child);
                }
            }
        }
        let slot = &mut self.slots[id.index as usize];
        slot.node = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
    }
}

impl Default for Tree {
    fn default() -> Self {
        Tree::new()
    }
}
