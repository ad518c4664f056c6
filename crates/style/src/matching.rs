//! Selector matching against an element and its ancestor chain.
//!
//! Matching is inside-out: the innermost selector part must match the
//! element itself, then the remaining parts are consumed by scanning the
//! ancestor chain outward with a single cursor.  Ancestors may be skipped
//! freely, which gives descendant-combinator semantics (not child).

use css::SelectorPart;
use dom::ElementData;

/// Test one simple selector part against one element.
///
/// Class matching compares the whole `class` attribute value — a
/// space-separated class list is a single token here.
pub fn matches_part(element: &ElementData, part: &SelectorPart) -> bool {
    match part {
        SelectorPart::Id(id) => element.attr("id") == Some(id.as_str()),
        SelectorPart::Class(class) => element.attr("class") == Some(class.as_str()),
        SelectorPart::Type(tag) => element.tag_name == *tag,
    }
}

/// Test a full selector (parts innermost first) against an element and its
/// ancestors (innermost first).
pub fn matches_selector(
    element: &ElementData,
    ancestors: &[&ElementData],
    parts: &[SelectorPart],
) -> bool {
    let Some(subject) = parts.first() else {
        return false;
    };
    if !matches_part(element, subject) {
        return false;
    }

    let mut cursor = 1;
    for ancestor in ancestors {
        if cursor >= parts.len() {
            break;
        }
        if matches_part(ancestor, &parts[cursor]) {
            cursor += 1;
        }
    }
    cursor >= parts.len()
}
