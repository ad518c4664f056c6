//! Simple selectors and specificity.

use smallvec::SmallVec;

/// A single simple selector: `#id`, `.class`, or a bare type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorPart {
    /// ID selector `#foo`.
    Id(String),
    /// Class selector `.bar`.
    Class(String),
    /// Type selector, e.g. `div`.
    Type(String),
}

/// The parts of one selector, innermost (subject) first.
///
/// `div span #foo` is stored as `[#foo, span, div]`; adjacent parts are
/// related by the descendant combinator.
pub type SelectorParts = SmallVec<[SelectorPart; 4]>;

/// Cascade precedence of a rule: `[inline, id, class, type]` counts,
/// compared lexicographically.  The inline slot is reserved — nothing in
/// this engine produces inline declarations — but keeps the canonical
/// four-part shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity {
    pub inline: u32,
    pub ids: u32,
    pub classes: u32,
    pub types: u32,
}

impl Specificity {
    /// Score a selector by counting its part kinds.
    pub fn of(parts: &[SelectorPart]) -> Self {
        let mut spec = Specificity::default();
        for part in parts {
            match part {
                SelectorPart::Id(_) => spec.ids += 1,
                SelectorPart::Class(_) => spec.classes += 1,
                SelectorPart::Type(_) => spec.types += 1,
            }
        }
        spec
    }
}

/// Split a selector string into [`SelectorParts`], innermost first.
///
/// Parts are whitespace-separated; each is classified by its leading
/// character.  Returns an empty list for a blank selector.
pub fn parse_selector(text: &str) -> SelectorParts {
    let mut parts: SelectorParts = text
        .split_whitespace()
        .map(|token| {
            if let Some(id) = token.strip_prefix('#') {
                SelectorPart::Id(id.to_string())
            } else if let Some(class) = token.strip_prefix('.') {
                SelectorPart::Class(class.to_string())
            } else {
                SelectorPart::Type(token.to_string())
            }
        })
        .collect();
    parts.reverse();
    parts
}
