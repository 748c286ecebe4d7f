//! Document-object substrate for music-notation engraving
//!
//! This crate is the core a notation engine builds on: an in-memory
//! hierarchical score representation plus the generic traversal engine every
//! analysis, layout and serialization pass runs over. Concrete node kinds,
//! the MusicXML/MEI parsers that populate the tree, and the output formats
//! are external collaborators consuming the contracts defined here.

pub mod compare;
pub mod error;
pub mod list;
pub mod model;
pub mod registry;
pub mod save;
pub mod traverse;
pub mod tree;

mod find;

// Re-export commonly used types
pub use compare::{
    ClassIdComparison, ClassIdsComparison, Comparison, Filters, InterfaceComparison,
    PredicateComparison,
};
pub use error::TreeError;
pub use list::{ListFilter, NodeList};
pub use model::{behavior, ClassId, InterfaceId, InterfaceSet, Node, Visibility};
pub use registry::{ClassSpec, NodeRegistry};
pub use save::{save, WriteSink};
pub use traverse::{Direction, ScoreContext, Traversal, VisitResult, Visitor, VisitorMut};
pub use tree::{ChildrenOfClass, NodeId, Tree, UNLIMITED_DEPTH};
