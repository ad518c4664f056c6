//! Sheet text → [`StyleRule`] list.
//!
//! The grammar is deliberately small: `/* … */` comments, then
//! `selector { prop: value; … }` rules.  A malformed sheet fails as a
//! whole — the caller decides whether that is fatal (it is not during
//! document parsing, where a bad sheet is logged and skipped).

use indexmap::IndexMap;
use thiserror::Error;

use crate::selector::{SelectorParts, Specificity, parse_selector};

/// One parsed rule: selector parts (innermost first), their precomputed
/// specificity, and the raw declarations in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub selector: SelectorParts,
    pub specificity: Specificity,
    pub declarations: IndexMap<String, String>,
}

/// Why a sheet could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetParseError {
    #[error("unterminated comment")]
    UnterminatedComment,
    #[error("selector `{0}` has no declaration block")]
    MissingBlock(String),
    #[error("rule has an empty selector")]
    EmptySelector,
    #[error("unterminated declaration block")]
    UnterminatedBlock,
    #[error("declaration `{0}` has no `:` separator")]
    MissingColon(String),
}

/// Parse a whole sheet into rules, in source order.
pub fn parse_sheet(text: &str) -> Result<Vec<StyleRule>, SheetParseError> {
    let src = strip_comments(text)?;
    let mut rest = src.as_str();
    let mut rules = Vec::new();

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        let open = match rest.find('{') {
            Some(i) => i,
            None => return Err(SheetParseError::MissingBlock(rest.trim().to_string())),
        };
        let selector_text = &rest[..open];
        let body_onwards = &rest[open + 1..];
        let close = match body_onwards.find('}') {
            Some(i) => i,
            None => return Err(SheetParseError::UnterminatedBlock),
        };
        let body = &body_onwards[..close];
        rest = &body_onwards[close + 1..];

        // A comma-separated selector list contributes only its first
        // selector; the rest of the list is not supported.
        let first = selector_text.split(',').next().unwrap_or_default();
        let selector = parse_selector(first);
        if selector.is_empty() {
            return Err(SheetParseError::EmptySelector);
        }

        let specificity = Specificity::of(&selector);
        let declarations = parse_declarations(body)?;
        rules.push(StyleRule {
            selector,
            specificity,
            declarations,
        });
    }

    Ok(rules)
}

/// Parse the inside of a `{ … }` block.  A later declaration for the same
/// property overwrites the earlier one, keeping its original position.
fn parse_declarations(body: &str) -> Result<IndexMap<String, String>, SheetParseError> {
    let mut declarations = IndexMap::new();
    for piece in body.split(';') {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        let (name, value) = piece
            .split_once(':')
            .ok_or_else(|| SheetParseError::MissingColon(piece.to_string()))?;
        declarations.insert(name.trim().to_string(), value.trim().to_string());
    }
    Ok(declarations)
}

fn strip_comments(text: &str) -> Result<String, SheetParseError> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return Err(SheetParseError::UnterminatedComment),
        }
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::SelectorPart;

    #[test]
    fn single_rule() {
        let rules = parse_sheet("div { color: red; width: 100px }").unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(
            rules[0].selector.as_slice(),
            &[SelectorPart::Type("div".into())]
        );
        assert_eq!(rules[0].declarations["color"], "red");
        assert_eq!(rules[0].declarations["width"], "100px");
    }

    #[test]
    fn rules_keep_source_order() {
        let rules = parse_sheet("a { x: 1 } b { x: 2 } c { x: 3 }").unwrap();
        let names: Vec<_> = rules
            .iter()
            .map(|r| match &r.selector[0] {
                SelectorPart::Type(t) => t.clone(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn comments_stripped() {
        let rules = parse_sheet("/* header */ div { /* inline */ color: red }").unwrap();
        assert_eq!(rules[0].declarations["color"], "red");
    }

    #[test]
    fn selector_list_takes_first() {
        let rules = parse_sheet("div, span, p { color: red }").unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(
            rules[0].selector.as_slice(),
            &[SelectorPart::Type("div".into())]
        );
    }

    #[test]
    fn duplicate_property_overwrites() {
        let rules = parse_sheet("div { width: 10px; width: 20px }").unwrap();
        assert_eq!(rules[0].declarations["width"], "20px");
        assert_eq!(rules[0].declarations.len(), 1);
    }

    #[test]
    fn specificity_precomputed() {
        let rules = parse_sheet("body div #main { color: red }").unwrap();
        assert_eq!(
            rules[0].specificity,
            Specificity { inline: 0, ids: 1, classes: 0, types: 2 }
        );
    }

    #[test]
    fn missing_colon_rejected() {
        let err = parse_sheet("div { color red }").unwrap_err();
        assert_eq!(err, SheetParseError::MissingColon("color red".into()));
    }

    #[test]
    fn missing_block_rejected() {
        let err = parse_sheet("div { color: red } span").unwrap_err();
        assert_eq!(err, SheetParseError::MissingBlock("span".into()));
    }

    #[test]
    fn unterminated_block_rejected() {
        let err = parse_sheet("div { color: red").unwrap_err();
        assert_eq!(err, SheetParseError::UnterminatedBlock);
    }

    #[test]
    fn empty_selector_rejected() {
        let err = parse_sheet("{ color: red }").unwrap_err();
        assert_eq!(err, SheetParseError::EmptySelector);
    }

    #[test]
    fn unterminated_comment_rejected() {
        let err = parse_sheet("/* oops div { }").unwrap_err();
        assert_eq!(err, SheetParseError::UnterminatedComment);
    }

    #[test]
    fn empty_sheet_is_fine() {
        assert!(parse_sheet("  \n ").unwrap().is_empty());
    }
}
