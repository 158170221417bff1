//! SVG serialization to indented XML.

use crate::Options;
use crate::ast::*;

/// Serialize a Document to an indented SVG string with an XML declaration.
pub fn serialize(doc: &Document, options: &Options) -> String {
    let mut out = String::new();

    // The file is always written as UTF-8, whatever the source declared.
    let (version, standalone) = match &doc.xml_declaration {
        Some(decl) => (decl.version.as_str(), decl.standalone),
        None => ("1.0", None),
    };
    out.push_str("<?xml version=\"");
    out.push_str(version);
    out.push_str("\" encoding=\"utf-8\"");
    if let Some(standalone) = standalone {
        out.push_str(" standalone=\"");
        out.push_str(if standalone { "yes" } else { "no" });
        out.push('"');
    }
    out.push_str("?>");

    if let Some(ref dt) = doc.doctype {
        out.push_str("\n<!DOCTYPE ");
        out.push_str(dt);
        out.push('>');
    }

    for node in &doc.prolog {
        out.push('\n');
        serialize_node(&mut out, node, 0, false, options);
    }

    out.push('\n');
    serialize_element(&mut out, &doc.root, 0, true, options);

    out
}

fn serialize_element(out: &mut String, elem: &Element, depth: usize, pretty: bool, options: &Options) {
    out.push('<');
    out.push_str(&elem.name.full_name());

    for attr in &elem.attributes {
        out.push(' ');
        out.push_str(&attr.name.full_name());
        out.push_str("=\"");
        push_escaped_attr(out, &attr.value);
        out.push('"');
    }

    let significant = elem.children.iter().any(|n| !is_blank_text(n));
    if !significant {
        out.push_str("/>");
        return;
    }
    out.push('>');

    if pretty && !has_mixed_content(elem) {
        for child in elem.children.iter().filter(|n| !is_blank_text(n)) {
            out.push('\n');
            push_indent(out, depth + 1, options);
            serialize_node(out, child, depth + 1, true, options);
        }
        out.push('\n');
        push_indent(out, depth, options);
    } else {
        // Mixed content: whitespace is significant, write everything as-is.
        for child in &elem.children {
            serialize_node(out, child, depth, false, options);
        }
    }

    out.push_str("</");
    out.push_str(&elem.name.full_name());
    out.push('>');
}

fn serialize_node(out: &mut String, node: &Node, depth: usize, pretty: bool, options: &Options) {
    match node {
        Node::Element(elem) => serialize_element(out, elem, depth, pretty, options),
        Node::Text(text) => push_escaped_text(out, text),
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        Node::CData(data) => {
            out.push_str("<![CDATA[");
            out.push_str(data);
            out.push_str("]]>");
        }
        Node::ProcessingInstruction { target, content } => {
            out.push_str("<?");
            out.push_str(target);
            if let Some(c) = content {
                out.push(' ');
                out.push_str(c);
            }
            out.push_str("?>");
        }
    }
}

fn is_blank_text(node: &Node) -> bool {
    matches!(node, Node::Text(t) if t.trim().is_empty())
}

fn has_mixed_content(elem: &Element) -> bool {
    elem.children.iter().any(|n| match n {
        Node::Text(t) => !t.trim().is_empty(),
        Node::CData(_) => true,
        _ => false,
    })
}

fn push_indent(out: &mut String, depth: usize, options: &Options) {
    for _ in 0..depth {
        out.push_str(&options.indent);
    }
}

fn push_escaped_attr(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn push_escaped_text(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_svg;

    #[test]
    fn test_serialize_indents_element_content() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><g><rect/></g></svg>"#;
        let doc = parse_svg(svg).unwrap();
        let out = serialize(&doc, &Options::default());
        assert_eq!(
            out,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
             <svg xmlns=\"http://www.w3.org/2000/svg\">\n  <g>\n    <rect/>\n  </g>\n</svg>"
        );
    }

    #[test]
    fn test_serialize_rewrites_encoding_keeps_standalone() {
        let svg = r#"<?xml version="1.0" encoding="windows-1252" standalone="no"?><svg/>"#;
        let doc = parse_svg(svg).unwrap();
        let out = serialize(&doc, &Options::default());
        assert!(out.starts_with(r#"<?xml version="1.0" encoding="utf-8" standalone="no"?>"#));
    }

    #[test]
    fn test_serialize_preserves_mixed_content() {
        let svg = r#"<svg><text x="1">Order <tspan>Line</tspan> item</text></svg>"#;
        let doc = parse_svg(svg).unwrap();
        let out = serialize(&doc, &Options::default());
        assert!(out.contains(r#"<text x="1">Order <tspan>Line</tspan> item</text>"#));
    }

    #[test]
    fn test_serialize_escapes() {
        let svg = r#"<svg><text title="a &quot;b&quot;">1 &lt; 2 &amp; 3</text></svg>"#;
        let doc = parse_svg(svg).unwrap();
        let out = serialize(&doc, &Options::default());
        assert!(out.contains(r#"title="a &quot;b&quot;""#));
        assert!(out.contains("1 &lt; 2 &amp; 3"));
    }

    #[test]
    fn test_serialize_reparses_to_same_structure() {
        let svg = r#"<!-- exported --><svg width="10"><g id="a"><!-- c --><path d="M 0 0"/></g></svg>"#;
        let doc = parse_svg(svg).unwrap();
        let out = serialize(&doc, &Options::default());
        let again = parse_svg(&out).unwrap();
        assert_eq!(again.prolog.len(), 1);
        let g = again.root.first_child("g").unwrap();
        assert_eq!(g.get_attr("id"), Some("a"));
        assert_eq!(g.first_child("path").unwrap().get_attr("d"), Some("M 0 0"));
    }
}
