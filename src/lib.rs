//! A minimal document rendering core: markup parsing, style cascade, and
//! single-axis flex layout.
//!
//! Text goes in one end; a styled, measured node tree comes out the other,
//! ready for a painter to consume:
//!
//! ```
//! let doc = vellum::parse_document(
//!     "<style>div { display: flex; width: 90px }</style>\
//!      <div><span></span></div>",
//! )
//! .unwrap();
//!
//! let div = doc.children[1].as_element().unwrap();
//! assert_eq!(div.layout_box.unwrap().width, Some(90.0));
//! ```
//!
//! The pipeline is synchronous and single-pass: each element is styled the
//! moment its start tag is seen and laid out the moment its end tag closes
//! it.  A mismatched end tag aborts the parse with
//! [`ParseError::TagMismatch`]; a malformed sheet is logged and skipped.

pub use common::{Dim, Edge, LayoutBox};
pub use css::{SheetParseError, Specificity, StyleRule};
pub use dom::{ComputedStyle, ElementData, Node, NodeData, StyleEntry};
pub use html::{ParseError, Parser, Token, Tokenizer, TreeBuilder, parse_document};
pub use layout::layout;
pub use style::StyleResolver;
