//! Flex layout solver.
//!
//! Runs post-order over the document tree: the parser calls [`layout`] on
//! each element the moment its end tag closes it, so children always carry
//! final geometry before their container is solved.

pub mod flex;

pub use flex::layout;
