//! Font retargeting for `<text>` elements.
//!
//! Word processors substitute missing or mismatched fonts when they rasterize
//! an embedded SVG, so diagram text is moved onto the document's font.

use crate::Element;

/// Replace one `font-family` value with another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontRule {
    /// Matched case-insensitively against the whole attribute value.
    pub from: String,
    pub to: String,
}

impl FontRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    fn matches(&self, family: &str) -> bool {
        family.eq_ignore_ascii_case(&self.from) && family != self.to
    }
}

/// Retarget every descendant `<text>` of `elem`. Returns how many changed.
pub fn retarget_fonts(elem: &mut Element, rule: &FontRule) -> usize {
    let mut changed = 0;
    elem.for_each_descendant_mut(|e| {
        if e.is("text") && e.get_attr("font-family").is_some_and(|f| rule.matches(f)) {
            log::debug!("font-family {:?} -> {:?}", e.get_attr("font-family"), rule.to);
            e.set_attr("font-family", rule.to.as_str());
            changed += 1;
        }
    });
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(family: &str) -> Element {
        Element::new("text").with_attr("font-family", family)
    }

    #[test]
    fn test_retargets_case_insensitively() {
        let rule = FontRule::new("Arial", "Cambria");
        let mut g = Element::new("g")
            .with_child(text("Arial"))
            .with_child(text("ARIAL"))
            .with_child(text("Calibri"));

        assert_eq!(retarget_fonts(&mut g, &rule), 2);
        let families: Vec<_> = g
            .child_elements()
            .map(|e| e.get_attr("font-family").unwrap())
            .collect();
        assert_eq!(families, ["Cambria", "Cambria", "Calibri"]);
    }

    #[test]
    fn test_retargets_nested_text() {
        let rule = FontRule::new("Arial", "Georgia");
        let mut g = Element::new("g").with_child(Element::new("g").with_child(text("arial")));
        assert_eq!(retarget_fonts(&mut g, &rule), 1);
        assert_eq!(retarget_fonts(&mut g, &rule), 0);
    }

    #[test]
    fn test_ignores_non_text_and_fallback_lists() {
        let rule = FontRule::new("Arial", "Cambria");
        let mut g = Element::new("g")
            .with_child(Element::new("tspan").with_attr("font-family", "Arial"))
            .with_child(text("Arial, sans-serif"));
        assert_eq!(retarget_fonts(&mut g, &rule), 0);
    }

    #[test]
    fn test_target_equal_to_source_is_stable() {
        let rule = FontRule::new("Arial", "arial");
        let mut g = Element::new("g").with_child(text("Arial"));
        assert_eq!(retarget_fonts(&mut g, &rule), 1);
        assert_eq!(retarget_fonts(&mut g, &rule), 0);
    }
}
