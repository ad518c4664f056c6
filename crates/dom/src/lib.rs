//! Document node model.
//!
//! The tree is plain owned data: every node owns its children, the
//! document node is the single root.  There are no parent pointers — the
//! parser supplies an explicit ancestor chain wherever ancestry matters.

pub mod node;

pub use node::{ComputedStyle, ElementData, Node, NodeData, StyleEntry};
