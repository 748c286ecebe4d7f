//! Data model for the document tree
//!
//! This module defines node identity and classification: class ids, the
//! capability-interface bit set, behavior flags and the node payload itself.
//! The arena that owns the nodes lives in [`crate::tree`].

pub mod class;
pub mod node;

pub use class::{behavior, ClassId, InterfaceId, InterfaceSet, Visibility};
pub use node::{AcceptFn, Node};
