//! Lexical tokens produced by the markup tokenizer.

use indexmap::IndexMap;

/// A single token emitted by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A start tag like `<div class="x">`.
    StartTag {
        name: String,
        /// Attribute name → value; a repeated name silently overwrites.
        attributes: IndexMap<String, String>,
        self_closing: bool,
    },
    /// An end tag like `</div>`.
    EndTag { name: String },
    /// A single character of text content.
    Text(char),
    /// End of input.
    EndOfInput,
}
