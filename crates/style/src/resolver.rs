//! The per-parse rule registry and cascade.

use css::{SheetParseError, StyleRule, parse_sheet};
use dom::{ElementData, StyleEntry};
use log::debug;

use crate::matching::matches_selector;

/// Ordered rule list for one parse.
///
/// Each parse owns its resolver — rules registered for one document never
/// leak into another.
#[derive(Debug, Default)]
pub struct StyleResolver {
    rules: Vec<StyleRule>,
}

impl StyleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `text` and append its rules, in document order.  On error no
    /// rules from this sheet are kept; previously registered rules stay
    /// active.
    pub fn register_sheet(&mut self, text: &str) -> Result<(), SheetParseError> {
        let rules = parse_sheet(text)?;
        debug!("registered sheet with {} rules", rules.len());
        self.rules.extend(rules);
        Ok(())
    }

    /// Number of rules registered so far.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Resolve the winning declarations for `element`.
    ///
    /// Rules are scanned in registration order; a matching rule's
    /// declaration replaces the stored entry only when its specificity is
    /// strictly greater, so of two equally specific rules the earlier one
    /// wins.
    pub fn compute_style(&self, element: &mut ElementData, ancestors: &[&ElementData]) {
        for rule in &self.rules {
            if !matches_selector(element, ancestors, &rule.selector) {
                continue;
            }
            debug!("selector {:?} matched <{}>", rule.selector, element.tag_name);

            for (property, value) in &rule.declarations {
                match element.computed_style.get_mut(property) {
                    None => {
                        element.computed_style.insert(
                            property.clone(),
                            StyleEntry {
                                value: value.clone(),
                                specificity: rule.specificity,
                            },
                        );
                    }
                    Some(entry) if rule.specificity > entry.specificity => {
                        entry.value = value.clone();
                        entry.specificity = rule.specificity;
                    }
                    Some(_) => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn elem(tag: &str, attrs: &[(&str, &str)]) -> ElementData {
        let mut map = IndexMap::new();
        for (name, value) in attrs {
            map.insert(name.to_string(), value.to_string());
        }
        ElementData::new(tag.to_string(), map)
    }

    #[test]
    fn higher_specificity_wins() {
        let mut resolver = StyleResolver::new();
        resolver
            .register_sheet("div { color: red } #id { color: blue }")
            .unwrap();

        let mut el = elem("div", &[("id", "id")]);
        resolver.compute_style(&mut el, &[]);
        assert_eq!(el.style_value("color"), Some("blue"));
    }

    #[test]
    fn higher_specificity_wins_regardless_of_order() {
        let mut resolver = StyleResolver::new();
        resolver
            .register_sheet("#id { color: blue } div { color: red }")
            .unwrap();

        let mut el = elem("div", &[("id", "id")]);
        resolver.compute_style(&mut el, &[]);
        assert_eq!(el.style_value("color"), Some("blue"));
    }

    #[test]
    fn equal_specificity_keeps_earlier_rule() {
        let mut resolver = StyleResolver::new();
        resolver
            .register_sheet("div { color: red } div { color: green }")
            .unwrap();

        let mut el = elem("div", &[]);
        resolver.compute_style(&mut el, &[]);
        // Counter to "last wins": replacement requires strictly greater
        // specificity, so the first registered rule's value is retained.
        assert_eq!(el.style_value("color"), Some("red"));
    }

    #[test]
    fn tie_break_holds_across_sheets() {
        let mut resolver = StyleResolver::new();
        resolver.register_sheet("div { color: red }").unwrap();
        resolver.register_sheet("div { color: green }").unwrap();

        let mut el = elem("div", &[]);
        resolver.compute_style(&mut el, &[]);
        assert_eq!(el.style_value("color"), Some("red"));
    }

    #[test]
    fn compute_style_is_idempotent() {
        let mut resolver = StyleResolver::new();
        resolver
            .register_sheet("div { color: red; width: 100px } .wide { width: 200px }")
            .unwrap();

        let mut el = elem("div", &[("class", "wide")]);
        resolver.compute_style(&mut el, &[]);
        let first = el.computed_style.clone();
        resolver.compute_style(&mut el, &[]);
        assert_eq!(el.computed_style, first);
    }

    #[test]
    fn descendant_rule_needs_matching_ancestor() {
        let mut resolver = StyleResolver::new();
        resolver.register_sheet("body div { color: red }").unwrap();

        let body = elem("body", &[]);
        let section = elem("section", &[]);

        let mut inside = elem("div", &[]);
        resolver.compute_style(&mut inside, &[&section, &body]);
        assert_eq!(inside.style_value("color"), Some("red"));

        let mut outside = elem("div", &[]);
        resolver.compute_style(&mut outside, &[&section]);
        assert_eq!(outside.style_value("color"), None);
    }

    #[test]
    fn properties_merge_across_rules() {
        let mut resolver = StyleResolver::new();
        resolver
            .register_sheet("div { color: red } .big { width: 300px }")
            .unwrap();

        let mut el = elem("div", &[("class", "big")]);
        resolver.compute_style(&mut el, &[]);
        assert_eq!(el.style_value("color"), Some("red"));
        assert_eq!(el.style_value("width"), Some("300px"));
    }

    #[test]
    fn bad_sheet_keeps_prior_rules() {
        let mut resolver = StyleResolver::new();
        resolver.register_sheet("div { color: red }").unwrap();
        assert!(resolver.register_sheet("div { color red }").is_err());
        assert_eq!(resolver.rule_count(), 1);

        let mut el = elem("div", &[]);
        resolver.compute_style(&mut el, &[]);
        assert_eq!(el.style_value("color"), Some("red"));
    }
}
