//! SVG document tree

/// A complete SVG document.
#[derive(Debug, Clone)]
pub struct Document {
    /// XML declaration (e.g., `<?xml version="1.0" encoding="UTF-8"?>`)
    pub xml_declaration: Option<XmlDeclaration>,
    /// DOCTYPE declaration
    pub doctype: Option<String>,
    /// Comments and processing instructions before the root element
    pub prolog: Vec<Node>,
    /// The root SVG element
    pub root: Element,
}

/// XML declaration attributes.
#[derive(Debug, Clone)]
pub struct XmlDeclaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<bool>,
}

/// An SVG/XML element.
#[derive(Debug, Clone)]
pub struct Element {
    /// Element name with optional prefix (e.g., "svg", "svg:rect")
    pub name: QName,
    /// Attributes on this element, in source order
    pub attributes: Vec<Attribute>,
    /// Child nodes, in paint order
    pub children: Vec<Node>,
}

/// A qualified name (possibly with namespace prefix).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace prefix (e.g., "svg", "xlink")
    pub prefix: Option<String>,
    /// Local name (e.g., "rect", "href")
    pub local: String,
}

impl QName {
    pub fn new(local: impl Into<String>) -> Self {
        Self {
            prefix: None,
            local: local.into(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            local: local.into(),
        }
    }

    /// Parse a qualified name from a string like "prefix:local" or just "local".
    pub fn parse(s: &str) -> Self {
        if let Some((prefix, local)) = s.split_once(':') {
            Self::with_prefix(prefix, local)
        } else {
            Self::new(s)
        }
    }

    /// Get the full name as a string.
    pub fn full_name(&self) -> String {
        match &self.prefix {
            Some(p) => format!("{}:{}", p, self.local),
            None => self.local.clone(),
        }
    }
}

/// An attribute on an element.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: QName::new(name),
            value: value.into(),
        }
    }
}

/// A node in the SVG tree.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    CData(String),
    /// A processing instruction (e.g., `<?xml-stylesheet ... ?>`)
    ProcessingInstruction { target: String, content: Option<String> },
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: QName::new(name),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder-style child appender.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Get an attribute value by local name.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.local == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute value, keeping its position if it already exists.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if let Some(attr) = self.attributes.iter_mut().find(|a| a.name.local == name) {
            attr.value = value.into();
        } else {
            self.attributes.push(Attribute::new(name, value));
        }
    }

    /// Remove an attribute by local name. Returns whether anything was removed.
    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|a| a.name.local != name);
        self.attributes.len() != before
    }

    /// Check if this element has a specific local name.
    pub fn is(&self, name: &str) -> bool {
        self.name.local == name
    }

    /// Iterate over child elements only (skip text, comments, etc.).
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Iterate over child elements mutably.
    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// First child element with the given local name.
    pub fn first_child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|e| e.is(name))
    }

    pub fn has_child_elements(&self) -> bool {
        self.child_elements().next().is_some()
    }

    /// Concatenated text of all descendant text and CDATA nodes.
    pub fn text_content(&self) -> String {
        fn collect(elem: &Element, out: &mut String) {
            for child in &elem.children {
                match child {
                    Node::Text(t) | Node::CData(t) => out.push_str(t),
                    Node::Element(e) => collect(e, out),
                    _ => {}
                }
            }
        }
        let mut out = String::new();
        collect(self, &mut out);
        out
    }

    /// Visit every descendant element (not `self`) mutably, in document order.
    pub fn for_each_descendant_mut(&mut self, mut f: impl FnMut(&mut Element)) {
        fn visit(elem: &mut Element, f: &mut impl FnMut(&mut Element)) {
            for child in elem.child_elements_mut() {
                f(child);
                visit(child, f);
            }
        }
        visit(self, &mut f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_attr_reports_removal() {
        let mut rect = Element::new("rect").with_attr("x", "1");
        assert!(rect.remove_attr("x"));
        assert!(!rect.remove_attr("x"));
        assert!(rect.attributes.is_empty());
    }

    #[test]
    fn test_set_attr_keeps_position() {
        let mut rect = Element::new("rect")
            .with_attr("x", "1")
            .with_attr("y", "2");
        rect.set_attr("x", "5");
        assert_eq!(rect.attributes[0].name.local, "x");
        assert_eq!(rect.get_attr("x"), Some("5"));
    }

    #[test]
    fn test_text_content_is_recursive() {
        let mut text = Element::new("text");
        text.children.push(Node::Text("Hello ".into()));
        let mut tspan = Element::new("tspan");
        tspan.children.push(Node::Text("world".into()));
        text.children.push(Node::Element(tspan));
        assert_eq!(text.text_content(), "Hello world");
    }

    #[test]
    fn test_for_each_descendant_skips_self() {
        let mut g = Element::new("g").with_child(Element::new("g").with_child(Element::new("text")));
        let mut names = Vec::new();
        g.for_each_descendant_mut(|e| names.push(e.name.local.clone()));
        assert_eq!(names, ["g", "text"]);
    }
}
