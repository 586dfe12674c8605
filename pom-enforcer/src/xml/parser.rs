//! XML parser that builds document trees.
//!
//! This parser uses quick-xml's streaming API and adds the checks and
//! normalizations a validating-free SAX parser performs: line-end and
//! attribute-value normalization, entity resolution, namespace resolution
//! and well-formedness of the element structure.
//!
//! General entities declared in the DOCTYPE internal subset are expanded as
//! character data. External entities are not fetched.

use std::borrow::Cow;
use std::io::BufRead;
use std::path::Path;

use quick_xml::encoding::Decoder;
use quick_xml::escape::{resolve_predefined_entity, unescape, unescape_with, EscapeError};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use rustc_hash::FxHashMap;

use crate::constants::MAX_NESTING_DEPTH;
use crate::error::{Error, Result};
use crate::node::{
    is_xml_whitespace, Attribute, Document, Namespace, NamespaceContext, NodeId, QName,
    XmlComment, XmlContent, XmlElement, XmlProcessingInstruction, XmlText,
};

/// General entities declared in the internal subset, name to replacement text.
type Entities = FxHashMap<String, String>;

/// XML parser that builds [`Document`] trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlParser {
    keep_blank_lines: bool,
}

impl XmlParser {
    /// Creates a new parser.
    ///
    /// When `keep_blank_lines` is false, whitespace-only text nodes are
    /// dropped so they never take part in comparisons.
    pub fn new(keep_blank_lines: bool) -> Self {
        XmlParser { keep_blank_lines }
    }

    /// Parses XML from a string.
    pub fn parse_str(&self, xml: &str) -> Result<Document> {
        self.parse_bytes(xml.as_bytes())
    }

    /// Parses XML from raw bytes; the encoding is detected from the byte
    /// order mark or the XML declaration.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Document> {
        let mut reader = Reader::from_reader(bytes);
        // Don't trim text - whitespace handling depends on keep_blank_lines
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;
        self.parse_reader(&mut reader)
    }

    /// Parses XML from a file.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Document> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| Error::Processing {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_bytes(&bytes).map_err(|e| e.with_path(path))
    }

    /// Parses XML from a quick-xml Reader.
    fn parse_reader<R: BufRead>(&self, reader: &mut Reader<R>) -> Result<Document> {
        let mut doc = Document::new();
        let mut stack: Vec<NodeId> = Vec::new();
        let mut namespaces = NamespaceContext::new();
        let mut entities = Entities::default();
        let mut pending_text: Option<String> = None;
        let mut buf = Vec::new();

        loop {
            let event = match reader.read_event_into(&mut buf) {
                Ok(event) => event,
                Err(e) => {
                    return Err(Error::malformed(format!(
                        "{} (at byte {})",
                        e,
                        reader.buffer_position()
                    )))
                }
            };
            let decoder = reader.decoder();

            match event {
                Event::Start(e) => {
                    self.flush_text(&mut doc, &stack, &mut pending_text)?;
                    check_depth(&stack)?;
                    let element = parse_element(&e, decoder, &mut namespaces, &entities)?;
                    let id = doc.create_node(XmlContent::Element(element));
                    attach_element(&mut doc, &stack, id)?;
                    stack.push(id);
                }
                Event::Empty(e) => {
                    self.flush_text(&mut doc, &stack, &mut pending_text)?;
                    check_depth(&stack)?;
                    let element = parse_element(&e, decoder, &mut namespaces, &entities)?;
                    namespaces.pop_scope();
                    let id = doc.create_node(XmlContent::Element(element));
                    attach_element(&mut doc, &stack, id)?;
                }
                Event::End(_) => {
                    self.flush_text(&mut doc, &stack, &mut pending_text)?;
                    if stack.pop().is_none() {
                        return Err(Error::malformed("end tag without matching start tag"));
                    }
                    namespaces.pop_scope();
                }
                Event::Text(e) => {
                    let raw = decode(decoder, &e)?;
                    let text = unescape(&normalize_line_endings(&raw))
                        .map_err(|e| Error::malformed(e.to_string()))?
                        .into_owned();
                    pending_text.get_or_insert_with(String::new).push_str(&text);
                }
                Event::GeneralRef(e) => {
                    let name = decode(decoder, &e)?;
                    let resolved = resolve_reference(&name, &entities)?;
                    pending_text.get_or_insert_with(String::new).push_str(&resolved);
                }
                Event::CData(e) => {
                    self.flush_text(&mut doc, &stack, &mut pending_text)?;
                    let text = normalize_line_endings(&decode(decoder, &e)?).into_owned();
                    let Some(&parent) = stack.last() else {
                        return Err(Error::malformed("CDATA section outside the root element"));
                    };
                    let id = doc.create_node(XmlContent::Text(XmlText::cdata(text)));
                    doc.append_child(parent, id);
                }
                Event::Comment(e) => {
                    self.flush_text(&mut doc, &stack, &mut pending_text)?;
                    let text = normalize_line_endings(&decode(decoder, &e)?).into_owned();
                    let id = doc.create_node(XmlContent::Comment(XmlComment::new(text)));
                    attach_other(&mut doc, &stack, id);
                }
                Event::PI(e) => {
                    self.flush_text(&mut doc, &stack, &mut pending_text)?;
                    let raw = normalize_line_endings(&decode(decoder, &e)?).into_owned();
                    let (target, data) = match raw.split_once(char::is_whitespace) {
                        Some((target, data)) => (target.to_string(), data.trim_start()),
                        None => (raw.clone(), ""),
                    };
                    let pi = XmlProcessingInstruction::new(target, data);
                    let id = doc.create_node(XmlContent::ProcessingInstruction(pi));
                    attach_other(&mut doc, &stack, id);
                }
                Event::Decl(e) => {
                    let encoding = match e.encoding() {
                        Some(Ok(label)) => Some(decode(decoder, &label)?.into_owned()),
                        Some(Err(err)) => return Err(Error::malformed(err.to_string())),
                        None => None,
                    };
                    doc.set_declared_encoding(encoding);
                }
                Event::DocType(e) => {
                    let body = decode(decoder, &e)?;
                    entities = internal_entities(&body)?;
                    doc.set_doctype(Some(body.trim().to_string()));
                }
                Event::Eof => {
                    self.flush_text(&mut doc, &stack, &mut pending_text)?;
                    break;
                }
            }
            buf.clear();
        }

        if let Some(&open) = stack.last() {
            let name = doc.element(open).map(XmlElement::qname).unwrap_or_default();
            return Err(Error::malformed(format!(
                "unexpected end of document, <{}> is not closed",
                name
            )));
        }
        if doc.root().is_none() {
            return Err(Error::malformed("document has no root element"));
        }

        Ok(doc)
    }

    /// Adds accumulated text to the current element.
    fn flush_text(
        &self,
        doc: &mut Document,
        stack: &[NodeId],
        pending: &mut Option<String>,
    ) -> Result<()> {
        let Some(text) = pending.take() else {
            return Ok(());
        };
        let node = XmlText::new(text);
        match stack.last() {
            Some(&parent) => {
                if self.keep_blank_lines || !node.is_blank() {
                    let id = doc.create_node(XmlContent::Text(node));
                    doc.append_child(parent, id);
                }
                Ok(())
            }
            None if node.is_blank() => Ok(()),
            None => Err(Error::malformed("text content outside the root element")),
        }
    }
}

/// Parses an element's name, namespace declarations and attributes, and
/// opens a namespace scope for it.
fn parse_element(
    e: &BytesStart<'_>,
    decoder: Decoder,
    namespaces: &mut NamespaceContext,
    entities: &Entities,
) -> Result<XmlElement> {
    namespaces.push_scope();
    let raw_name = decode(decoder, e.name().as_ref())?.into_owned();

    let mut decls = Vec::new();
    let mut attributes = Vec::new();
    for attr_result in e.attributes() {
        let attr =
            attr_result.map_err(|e| Error::malformed(format!("attribute error: {}", e)))?;
        let key = decode(decoder, attr.key.as_ref())?.into_owned();
        let raw_value = decode(decoder, &attr.value)?;
        let value = expand(&normalize_attribute_value(&raw_value), entities)
            .map_err(|e| Error::malformed(format!("attribute {}: {}", key, e)))?
            .into_owned();

        if key == "xmlns" {
            decls.push(Namespace::new("", value));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            decls.push(Namespace::new(prefix, value));
        } else {
            attributes.push(Attribute::new(key, value));
        }
    }

    for decl in &decls {
        namespaces.bind(decl.prefix(), decl.uri());
    }

    let name = QName::parse(&raw_name);
    let namespace_uri = match name.prefix() {
        Some(prefix) => namespaces
            .resolve(prefix)
            .ok_or_else(|| Error::malformed(format!("unbound namespace prefix in <{}>", raw_name)))?
            .to_string(),
        None => namespaces.resolve("").unwrap_or_default().to_string(),
    };

    for attribute in &attributes {
        if let Some((prefix, _)) = attribute.name().split_once(':') {
            if namespaces.resolve(prefix).is_none() {
                return Err(Error::malformed(format!(
                    "unbound namespace prefix in attribute {}",
                    attribute.name()
                )));
            }
        }
    }

    Ok(XmlElement::new_with_namespace(
        name,
        namespace_uri,
        decls,
        attributes,
    ))
}

/// Rejects an element that would nest deeper than [`MAX_NESTING_DEPTH`].
fn check_depth(stack: &[NodeId]) -> Result<()> {
    if stack.len() >= MAX_NESTING_DEPTH {
        return Err(Error::malformed(format!(
            "elements nested deeper than {} levels",
            MAX_NESTING_DEPTH
        )));
    }
    Ok(())
}

/// Attaches an element to the open element, or makes it the root.
fn attach_element(doc: &mut Document, stack: &[NodeId], id: NodeId) -> Result<()> {
    match stack.last() {
        Some(&parent) => doc.append_child(parent, id),
        None if doc.root().is_some() => {
            return Err(Error::malformed("document has more than one root element"))
        }
        None => doc.set_root(id),
    }
    Ok(())
}

/// Attaches a comment or processing instruction.
fn attach_other(doc: &mut Document, stack: &[NodeId], id: NodeId) {
    match stack.last() {
        Some(&parent) => doc.append_child(parent, id),
        None => doc.push_top_level(id),
    }
}

fn decode<'b>(decoder: Decoder, bytes: &'b [u8]) -> Result<Cow<'b, str>> {
    decoder
        .decode(bytes)
        .map_err(|e| Error::malformed(format!("encoding error: {}", e)))
}

/// Resolves a character reference, a predefined entity or a declared one.
fn resolve_reference(name: &str, entities: &Entities) -> Result<String> {
    if let Some(reference) = name.strip_prefix('#') {
        let code = match reference.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => reference.parse::<u32>(),
        };
        return code
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .ok_or_else(|| Error::malformed(format!("invalid character reference &{};", name)));
    }
    entities
        .get(name)
        .map(String::as_str)
        .or_else(|| resolve_predefined_entity(name))
        .map(str::to_string)
        .ok_or_else(|| Error::malformed(format!("undefined entity &{};", name)))
}

/// Expands references in `raw` against the predefined and declared entities.
fn expand<'a>(
    raw: &'a str,
    entities: &Entities,
) -> std::result::Result<Cow<'a, str>, EscapeError> {
    unescape_with(raw, |name| {
        entities
            .get(name)
            .map(String::as_str)
            .or_else(|| resolve_predefined_entity(name))
    })
}

/// Collects the general entities declared in a DOCTYPE internal subset.
///
/// Parameter entities and external (`SYSTEM`/`PUBLIC`) entities are skipped.
/// The first declaration of a name is binding.
fn internal_entities(doctype: &str) -> Result<Entities> {
    const DECL: &str = "<!ENTITY";

    let mut entities = Entities::default();
    let mut rest = doctype;
    while let Some(start) = rest.find(DECL) {
        rest = rest[start + DECL.len()..].trim_start_matches(is_xml_whitespace);
        if rest.starts_with('%') {
            continue;
        }

        let name_end = rest.find(is_xml_whitespace).unwrap_or(rest.len());
        let (name, after) = rest.split_at(name_end);
        rest = after.trim_start_matches(is_xml_whitespace);

        let quote = match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => quote,
            _ => continue,
        };
        let Some(len) = rest[1..].find(quote) else {
            return Err(Error::malformed(format!("unterminated value of entity {}", name)));
        };
        let raw = normalize_line_endings(&rest[1..1 + len]).into_owned();
        rest = &rest[len + 2..];

        let value = expand(&raw, &entities)
            .map_err(|e| Error::malformed(format!("entity {}: {}", name, e)))?
            .into_owned();
        entities.entry(name.to_string()).or_insert(value);
    }
    Ok(entities)
}

/// Normalizes `\r\n` and lone `\r` to `\n`.
fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Replaces literal tabs and line breaks in an attribute value with spaces.
fn normalize_attribute_value(raw: &str) -> String {
    normalize_line_endings(raw)
        .chars()
        .map(|c| if matches!(c, '\t' | '\n') { ' ' } else { c })
        .collect()
}

/// Parses XML from a file with default settings.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    XmlParser::default().parse_file(path)
}

/// Parses XML from a string with default settings.
pub fn parse_str(xml: &str) -> Result<Document> {
    XmlParser::default().parse_str(xml)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POM_NS: &str = "http://maven.apache.org/POM/4.0.0";

    #[test]
    fn test_parse_simple_xml() {
        let doc = parse_str("<project><modelVersion>4.0.0</modelVersion></project>").unwrap();
        let root = doc.root().unwrap();
        assert_eq!(doc.local_name(root), Some("project"));

        let children = doc.element_children(root);
        assert_eq!(children.len(), 1);
        assert_eq!(doc.local_name(children[0]), Some("modelVersion"));
        assert_eq!(doc.text(children[0]), "4.0.0");
    }

    #[test]
    fn test_parse_with_attributes_in_order() {
        let doc = parse_str(r#"<plugin b="2" a="1" c="&amp;3"/>"#).unwrap();
        let element = doc.element(doc.root().unwrap()).unwrap();
        let attrs: Vec<(&str, &str)> = element
            .attributes()
            .iter()
            .map(|a| (a.name(), a.value()))
            .collect();
        assert_eq!(attrs, vec![("b", "2"), ("a", "1"), ("c", "&3")]);
    }

    #[test]
    fn test_namespaces_are_resolved() {
        let xml = format!(
            r#"<project xmlns="{}" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="x"><parent/></project>"#,
            POM_NS
        );
        let doc = parse_str(&xml).unwrap();
        let root = doc.root().unwrap();
        let element = doc.element(root).unwrap();
        assert_eq!(element.namespace_uri(), POM_NS);
        assert_eq!(element.namespace_decls().len(), 2);
        assert_eq!(element.attributes().len(), 1);
        assert_eq!(element.attribute("xsi:schemaLocation"), Some("x"));

        let parent = doc.child_element(root, "parent", POM_NS);
        assert!(parent.is_some());
    }

    #[test]
    fn test_whitespace_only_text_is_dropped() {
        let doc = parse_str("<project>\n    <a> </a>\n</project>").unwrap();
        let root = doc.root().unwrap();
        assert_eq!(doc.children(root).len(), 1);
        let a = doc.children(root)[0];
        assert!(doc.children(a).is_empty());
    }

    #[test]
    fn test_whitespace_only_text_is_kept_with_blank_lines() {
        let doc = XmlParser::new(true)
            .parse_str("<project>\n\n    <a/>\n</project>")
            .unwrap();
        let root = doc.root().unwrap();
        assert_eq!(doc.children(root).len(), 3);
        assert_eq!(doc.text(root), "\n\n    \n");
    }

    #[test]
    fn test_text_is_kept_verbatim() {
        let doc = parse_str("<description>  a &lt; b\r\n  c </description>").unwrap();
        assert_eq!(doc.text(doc.root().unwrap()), "  a < b\n  c ");
    }

    #[test]
    fn test_character_references() {
        let doc = parse_str("<name>&#x41;&#66;</name>").unwrap();
        assert_eq!(doc.text(doc.root().unwrap()), "AB");
    }

    #[test]
    fn test_cdata_and_comments() {
        let doc = parse_str("<!-- head --><a><!--c--><![CDATA[<x>]]></a>").unwrap();
        assert_eq!(doc.top_level().len(), 2);
        let root = doc.root().unwrap();
        let children = doc.children(root);
        assert!(doc.content(children[0]).is_comment());
        let cdata = doc.content(children[1]).as_text().unwrap();
        assert!(cdata.is_cdata());
        assert_eq!(cdata.text(), "<x>");
    }

    #[test]
    fn test_declaration_encoding_is_recorded() {
        let doc = parse_str(r#"<?xml version="1.0" encoding="UTF-8"?><project/>"#).unwrap();
        assert_eq!(doc.declared_encoding(), Some("UTF-8"));
    }

    #[test]
    fn test_attribute_whitespace_is_normalized() {
        let doc = parse_str("<a v=\"x\r\n\ty\"/>").unwrap();
        let element = doc.element(doc.root().unwrap()).unwrap();
        assert_eq!(element.attribute("v"), Some("x  y"));
    }

    #[test]
    fn test_malformed_documents() {
        for xml in [
            "<project><a></project>",
            "<project>",
            "<project/><project/>",
            "text<project/>",
            "",
            "<project>&nbsp;</project>",
            "<p:project/>",
            r#"<a x="1" x="2"/>"#,
        ] {
            let result = parse_str(xml);
            assert!(
                matches!(result, Err(Error::MalformedDocument { .. })),
                "expected failure for {:?}",
                xml
            );
        }
    }

    fn nested(depth: usize) -> String {
        format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth))
    }

    #[test]
    fn test_nesting_depth_is_limited() {
        assert!(parse_str(&nested(MAX_NESTING_DEPTH)).is_ok());

        let err = parse_str(&nested(MAX_NESTING_DEPTH + 1)).unwrap_err();
        assert!(matches!(err, Error::MalformedDocument { .. }));
        assert!(err.to_string().contains("nested deeper than"));

        let empty_leaf = format!(
            "{}<b/>{}",
            "<a>".repeat(MAX_NESTING_DEPTH),
            "</a>".repeat(MAX_NESTING_DEPTH)
        );
        assert!(parse_str(&empty_leaf).is_err());
    }

    #[test]
    fn test_internal_subset_entities_are_expanded() {
        let xml = r#"<!DOCTYPE project [
            <!ENTITY jdk "17">
            <!ENTITY owner 'team &amp; co'>
            <!ENTITY % local "ignored">
            <!ENTITY logo SYSTEM "logo.txt">
            <!ENTITY jdk "21">
        ]>
        <project><java a="&jdk;">&jdk;/&owner;</java></project>"#;
        let doc = parse_str(xml).unwrap();
        let root = doc.root().unwrap();
        let java = doc.element_children(root)[0];
        assert_eq!(doc.text(java), "17/team & co");
        assert_eq!(doc.element(java).unwrap().attribute("a"), Some("17"));
        assert!(doc.doctype().unwrap().starts_with("project ["));
    }

    #[test]
    fn test_undeclared_and_external_entities_are_rejected() {
        let xml = r#"<!DOCTYPE project [<!ENTITY logo SYSTEM "logo.txt">]><project>&logo;</project>"#;
        assert!(matches!(parse_str(xml), Err(Error::MalformedDocument { .. })));

        let xml = r#"<!DOCTYPE project [<!ENTITY a "&b;">]><project/>"#;
        assert!(matches!(parse_str(xml), Err(Error::MalformedDocument { .. })));
    }

    #[test]
    fn test_parse_file_attaches_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pom.xml");
        std::fs::write(&path, "<project>").unwrap();

        let err = parse_file(&path).unwrap_err();
        assert_eq!(err.path(), Some(path.as_path()));
    }

    #[test]
    fn test_missing_file_is_processing_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_file(dir.path().join("missing.xml")).unwrap_err();
        assert!(matches!(err, Error::Processing { .. }));
    }
}
