//! Class identity, capability interfaces and behavior flags
//!
//! Concrete node kinds (measures, notes, pedal marks...) live outside this
//! crate. What the core needs from a kind is captured here:
//! - a stable [`ClassId`] discriminating the kind,
//! - the set of capability interfaces the kind implements,
//! - a handful of behavior flags the traversal engine consults.

use serde::{Deserialize, Serialize};

/// Stable identifier for a node kind
///
/// Ids are assigned by the collaborator that registers the kind (see
/// [`crate::registry::NodeRegistry`]). `ClassId::UNKNOWN` is the fallback for
/// unresolved type names.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u16);

impl ClassId {
    /// Generic identifier for unresolved or untyped nodes
    pub const UNKNOWN: ClassId = ClassId(0);
}

/// Identifier for a capability interface, a bit position in an [`InterfaceSet`]
///
/// Cross-cutting passes query interfaces instead of concrete kinds: "has a
/// time-span", "has a linking relation", "has a coordinate anchor" and so on.
/// The meaning of each bit is defined by the collaborator that assigns it.
/// At most 32 interfaces exist; ids of 32 or above never land in a set.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InterfaceId(pub u8);

/// Bit set of capability interfaces attached to a node kind
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InterfaceSet(u32);

impl InterfaceSet {
    pub const EMPTY: InterfaceSet = InterfaceSet(0);

    pub fn with(mut self, interface: InterfaceId) -> Self {
        self.insert(interface);
        self
    }

    /// Out-of-range ids are ignored rather than aliased onto another bit
    pub fn insert(&mut self, interface: InterfaceId) {
        if interface.0 < 32 {
            self.0 |= 1 << interface.0;
        }
    }

    pub fn contains(&self, interface: InterfaceId) -> bool {
        interface.0 < 32 && self.0 & (1 << interface.0) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Behavior flags copied from the class spec onto every node of the kind
///
/// Stored as bit flags (same scheme as the editor's cell flags) so the
/// traversal engine can test them without a registry lookup.
pub mod behavior {
    /// Transparent wrapper (editorial marker): does not count against the
    /// traversal depth budget.
    pub const TRANSPARENT: u8 = 0x01;
    /// Root of a score; updates the score context when traversed forward.
    pub const SCORE_ROOT: u8 = 0x02;
    /// End marker paired with a start element; updates the score context
    /// when traversed backward and the paired start is a score root.
    pub const MILESTONE_END: u8 = 0x04;
    /// The node carries a visibility setting that visible-only traversal
    /// honors when deciding whether to descend.
    pub const OPTIONAL_VISIBILITY: u8 = 0x08;
}

/// Visibility of a node with [`behavior::OPTIONAL_VISIBILITY`]
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}
