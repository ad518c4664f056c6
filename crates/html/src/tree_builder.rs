//! Tree construction — builds a [`Node`] tree from the token stream.
//!
//! The open-element stack is an index path into the owned tree: nodes are
//! appended to their parent the moment their start tag arrives, so an
//! unterminated element is still present in the output (it just never
//! receives a layout pass).  Style runs at element creation, layout at
//! element close — ancestors are always styled before a descendant's
//! layout reads them, and children are always final before their
//! container is solved.

use css::SheetParseError;
use dom::{ElementData, Node, NodeData};
use indexmap::IndexMap;
use log::{trace, warn};
use style::StyleResolver;
use thiserror::Error;

use crate::token::Token;
use crate::tokenizer::Tokenizer;

/// The element whose text content is registered as a style sheet when it
/// closes.
const STYLE_SHEET_ELEMENT: &str = "style";

/// Fatal parse failure.  The tree is abandoned — after a mismatch it is
/// partially closed and not safe to hand out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("end tag </{found}> does not match open element <{expected}>")]
    TagMismatch { expected: String, found: String },
}

// ---------------------------------------------------------------------------
// Tree builder
// ---------------------------------------------------------------------------

/// Builds a document tree from tokens.
pub struct TreeBuilder {
    root: Node,
    /// Child-index path from the root to the current insertion point.
    open_path: Vec<usize>,
    resolver: StyleResolver,
}

impl TreeBuilder {
    /// A builder with an empty rule list.
    pub fn new() -> Self {
        Self::with_resolver(StyleResolver::new())
    }

    /// A builder whose resolver already carries pre-registered sheets.
    pub fn with_resolver(resolver: StyleResolver) -> Self {
        Self {
            root: Node::document(),
            open_path: Vec::new(),
            resolver,
        }
    }

    /// Consume the builder, returning the document root.  Unclosed
    /// elements stay in the tree, open and without layout.
    pub fn finish(self) -> Node {
        self.root
    }

    // =======================================================================
    // Helpers
    // =======================================================================

    /// The node tokens currently insert into.
    fn current_mut(&mut self) -> &mut Node {
        let mut node = &mut self.root;
        for &index in &self.open_path {
            node = &mut node.children[index];
        }
        node
    }

    /// The open elements, innermost first — the ancestor chain for style
    /// matching.
    fn open_elements(&self) -> Vec<&ElementData> {
        let mut chain = Vec::with_capacity(self.open_path.len());
        let mut node = &self.root;
        for &index in &self.open_path {
            node = &node.children[index];
            if let Some(el) = node.as_element() {
                chain.push(el);
            }
        }
        chain.reverse();
        chain
    }

    // =======================================================================
    // Token processing
    // =======================================================================

    /// Process a single token.
    pub fn process_token(&mut self, token: Token) -> Result<(), ParseError> {
        trace!("token: {token:?}");
        match token {
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                self.insert_element(name, attributes, self_closing);
                Ok(())
            }
            Token::EndTag { name } => self.close_element(&name),
            Token::Text(c) => {
                self.insert_character(c);
                Ok(())
            }
            Token::EndOfInput => Ok(()),
        }
    }

    /// Style the new element against the rules registered so far, append
    /// it, and open it unless self-closing.
    fn insert_element(
        &mut self,
        name: String,
        attributes: IndexMap<String, String>,
        self_closing: bool,
    ) {
        let mut element = ElementData::new(name, attributes);
        {
            let ancestors = self.open_elements();
            self.resolver.compute_style(&mut element, &ancestors);
        }

        let parent = self.current_mut();
        let index = parent.children.len();
        parent.children.push(Node::element(element));
        if !self_closing {
            self.open_path.push(index);
        }
    }

    /// Append a character, coalescing with a trailing text sibling.
    fn insert_character(&mut self, c: char) {
        let parent = self.current_mut();
        if let Some(Node {
            data: NodeData::Text { content },
            ..
        }) = parent.children.last_mut()
        {
            content.push(c);
            return;
        }
        parent.children.push(Node::text(c.to_string()));
    }

    /// Close the innermost open element: register its sheet if it is a
    /// style element, lay it out (its children are final now), and pop it.
    fn close_element(&mut self, name: &str) -> Result<(), ParseError> {
        let sheet = {
            let node = self.current_mut();
            match node.as_element() {
                Some(el) if el.tag_name == name => {}
                other => {
                    let expected = other
                        .map(|el| el.tag_name.clone())
                        .unwrap_or_else(|| "#document".to_string());
                    return Err(ParseError::TagMismatch {
                        expected,
                        found: name.to_string(),
                    });
                }
            }
            if name == STYLE_SHEET_ELEMENT {
                node.children.first().and_then(|child| match &child.data {
                    NodeData::Text { content } => Some(content.clone()),
                    _ => None,
                })
            } else {
                None
            }
        };

        // Registration happens before any later element is styled; rules
        // never restyle elements created earlier.
        if let Some(sheet) = sheet {
            if let Err(err) = self.resolver.register_sheet(&sheet) {
                warn!("skipping malformed style sheet: {err}");
            }
        }

        layout::layout(self.current_mut());
        self.open_path.pop();
        Ok(())
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Parse entry points
// ---------------------------------------------------------------------------

/// A parse driver owning the per-parse rule list.
///
/// Sheets can be registered up front (defaults the caller wants active
/// from the first element); `<style>` elements found in the document feed
/// the same resolver mid-parse.
#[derive(Default)]
pub struct Parser {
    resolver: StyleResolver,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sheet before parsing starts.
    pub fn register_sheet(&mut self, text: &str) -> Result<(), SheetParseError> {
        self.resolver.register_sheet(text)
    }

    /// Tokenize and build `input` into a document tree.
    pub fn parse(self, input: &str) -> Result<Node, ParseError> {
        let mut tokenizer = Tokenizer::new(input);
        let mut builder = TreeBuilder::with_resolver(self.resolver);
        loop {
            let token = tokenizer.next_token();
            let end = token == Token::EndOfInput;
            builder.process_token(token)?;
            if end {
                break;
            }
        }
        Ok(builder.finish())
    }
}

/// Parse a document with no pre-registered sheets.
pub fn parse_document(input: &str) -> Result<Node, ParseError> {
    Parser::new().parse(input)
}

// ===========================================================================
// Tests
// ===========================================================================
