//! Node and element data types.

use common::LayoutBox;
use css::Specificity;
use indexmap::IndexMap;

// ─────────────────────────────────────────────────────────────────────────────
// Computed style
// ─────────────────────────────────────────────────────────────────────────────

/// A resolved property value plus the specificity of the rule that set it.
/// The specificity is kept so a later-matching rule can only replace the
/// value when it is strictly more specific.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleEntry {
    pub value: String,
    pub specificity: Specificity,
}

/// Property name → winning entry, in first-set order.
pub type ComputedStyle = IndexMap<String, StyleEntry>;

// ─────────────────────────────────────────────────────────────────────────────
// Element data
// ─────────────────────────────────────────────────────────────────────────────

/// Data specific to element nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    pub tag_name: String,
    /// Attributes in source order; a repeated name keeps its first position
    /// with the last value.
    pub attributes: IndexMap<String, String>,
    pub computed_style: ComputedStyle,
    /// Geometry assigned by the flex solver.  `None` for elements that
    /// never participated in flex layout.
    pub layout_box: Option<LayoutBox>,
}

impl ElementData {
    /// A fresh, unstyled element.
    pub fn new(tag_name: String, attributes: IndexMap<String, String>) -> Self {
        Self {
            tag_name,
            attributes,
            computed_style: ComputedStyle::new(),
            layout_box: None,
        }
    }

    /// Look up an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Look up a computed style value.
    pub fn style_value(&self, property: &str) -> Option<&str> {
        self.computed_style
            .get(property)
            .map(|entry| entry.value.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Node
// ─────────────────────────────────────────────────────────────────────────────

/// The payload that distinguishes different kinds of nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Document,
    Element(ElementData),
    Text { content: String },
}

/// A single node in the document tree.  Text nodes never have children.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub data: NodeData,
    pub children: Vec<Node>,
}

impl Node {
    /// The root node of a new, empty tree.
    pub fn document() -> Self {
        Self {
            data: NodeData::Document,
            children: Vec::new(),
        }
    }

    pub fn element(data: ElementData) -> Self {
        Self {
            data: NodeData::Element(data),
            children: Vec::new(),
        }
    }

    pub fn text(content: String) -> Self {
        Self {
            data: NodeData::Text { content },
            children: Vec::new(),
        }
    }

    /// Returns `true` if this node is an element.
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Returns `true` if this node is a text node.
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text { .. })
    }

    /// If this is an element, return a reference to its [`ElementData`].
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// If this is an element, return a mutable reference to its [`ElementData`].
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Concatenated text content of this subtree, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let NodeData::Text { content } = &self.data {
            out.push_str(content);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elem(tag: &str) -> Node {
        Node::element(ElementData::new(tag.to_string(), IndexMap::new()))
    }

    #[test]
    fn attr_lookup() {
        let mut attrs = IndexMap::new();
        attrs.insert("id".to_string(), "main".to_string());
        let el = ElementData::new("div".to_string(), attrs);
        assert_eq!(el.attr("id"), Some("main"));
        assert_eq!(el.attr("class"), None);
    }

    #[test]
    fn text_content_is_document_order() {
        let mut root = Node::document();
        let mut a = elem("a");
        a.children.push(Node::text("one".into()));
        let mut b = elem("b");
        b.children.push(Node::text("two".into()));
        a.children.push(b);
        a.children.push(Node::text("three".into()));
        root.children.push(a);
        assert_eq!(root.text_content(), "onetwothree");
    }

    #[test]
    fn style_value_reads_computed_entry() {
        let mut el = ElementData::new("div".to_string(), IndexMap::new());
        el.computed_style.insert(
            "color".to_string(),
            StyleEntry {
                value: "red".to_string(),
                specificity: css::Specificity::default(),
            },
        );
        assert_eq!(el.style_value("color"), Some("red"));
        assert_eq!(el.style_value("width"), None);
    }
}
