//! Markup parsing: tokenizer, tree builder, and the parse entry point.
//!
//! [`parse_document`] runs the whole pipeline — tokenize, build the tree,
//! resolve styles as elements are created, lay out flex containers as
//! their end tags close them — and returns the document root.

pub mod token;
pub mod tokenizer;
pub mod tree_builder;

pub use token::Token;
pub use tokenizer::Tokenizer;
pub use tree_builder::{ParseError, Parser, TreeBuilder, parse_document};
