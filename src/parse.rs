//! SVG parsing from XML.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::ast::*;
use crate::error::SvgError;

/// Decode raw file contents using the encoding named in the XML declaration.
///
/// Without a declaration, or when it names UTF-8, the bytes must be valid UTF-8.
pub fn decode_svg(bytes: &[u8]) -> Result<Cow<'_, str>, SvgError> {
    match declared_encoding(bytes) {
        Some(encoding) if encoding != UTF_8 => {
            let (text, _, had_errors) = encoding.decode(bytes);
            if had_errors {
                return Err(SvgError::InvalidSvg(format!(
                    "Malformed {} data",
                    encoding.name()
                )));
            }
            Ok(text)
        }
        _ => Ok(Cow::Borrowed(std::str::from_utf8(bytes)?)),
    }
}

fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    match reader.read_event_into(&mut buf) {
        Ok(Event::Decl(decl)) => {
            let label = decl.encoding()?.ok()?;
            Encoding::for_label(&label)
        }
        _ => None,
    }
}

/// Parse an SVG string into a Document.
///
/// Text nodes are kept verbatim (whitespace included) so mixed content inside
/// `<text>` survives a round trip; the serializer decides what to re-indent.
pub fn parse_svg(svg: &str) -> Result<Document, SvgError> {
    let svg = svg.strip_prefix('\u{feff}').unwrap_or(svg);
    let mut reader = Reader::from_str(svg);

    let mut xml_declaration = None;
    let mut doctype = None;
    let mut prolog = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event()? {
            Event::Decl(decl) => {
                xml_declaration = Some(XmlDeclaration {
                    version: String::from_utf8_lossy(decl.version()?.as_ref()).into_owned(),
                    encoding: decl
                        .encoding()
                        .transpose()
                        .ok()
                        .flatten()
                        .map(|e| String::from_utf8_lossy(e.as_ref()).into_owned()),
                    standalone: decl.standalone().transpose().ok().flatten().map(|s| {
                        let s = String::from_utf8_lossy(s.as_ref());
                        s == "yes"
                    }),
                });
            }
            Event::DocType(dt) => {
                doctype = Some(String::from_utf8_lossy(&dt).trim().to_string());
            }
            Event::Start(start) => {
                root = Some(parse_element(&mut reader, &start)?);
                break;
            }
            Event::Empty(start) => {
                root = Some(parse_element_start(&start)?);
                break;
            }
            Event::Comment(comment) => {
                prolog.push(Node::Comment(String::from_utf8_lossy(&comment).into_owned()));
            }
            Event::PI(pi) => {
                prolog.push(parse_pi(&pi));
            }
            Event::Eof => break,
            _ => {
                // Whitespace before the root element
            }
        }
    }

    let root = root.ok_or_else(|| SvgError::InvalidSvg("No root element found".into()))?;

    Ok(Document {
        xml_declaration,
        doctype,
        prolog,
        root,
    })
}

fn parse_element(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<Element, SvgError> {
    let mut element = parse_element_start(start)?;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                element
                    .children
                    .push(Node::Element(parse_element(reader, &start)?));
            }
            Event::Empty(start) => {
                element
                    .children
                    .push(Node::Element(parse_element_start(&start)?));
            }
            Event::End(_) => {
                break;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                if !text.is_empty() {
                    element.children.push(Node::Text(text.into_owned()));
                }
            }
            Event::Comment(comment) => {
                element
                    .children
                    .push(Node::Comment(String::from_utf8_lossy(&comment).into_owned()));
            }
            Event::CData(cdata) => {
                element
                    .children
                    .push(Node::CData(String::from_utf8_lossy(&cdata).into_owned()));
            }
            Event::PI(pi) => {
                element.children.push(parse_pi(&pi));
            }
            Event::Eof => {
                return Err(SvgError::InvalidSvg("Unexpected end of file".into()));
            }
            _ => {}
        }
    }

    Ok(element)
}

fn parse_pi(raw: &[u8]) -> Node {
    let content = String::from_utf8_lossy(raw).into_owned();
    let (target, content) = content
        .split_once(char::is_whitespace)
        .map(|(t, r)| (t.to_string(), Some(r.to_string())))
        .unwrap_or_else(|| (content, None));
    Node::ProcessingInstruction { target, content }
}

fn parse_element_start(start: &BytesStart) -> Result<Element, SvgError> {
    let name_bytes = start.name();
    let name = std::str::from_utf8(name_bytes.as_ref())?;

    let mut element = Element {
        name: QName::parse(name),
        attributes: Vec::new(),
        children: Vec::new(),
    };

    for attr in start.attributes() {
        let attr = attr.map_err(|e| SvgError::InvalidSvg(format!("Invalid attribute: {}", e)))?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attr.unescape_value()?;
        element.attributes.push(Attribute {
            name: QName::parse(key),
            value: value.into_owned(),
        });
    }

    Ok(element)
}
