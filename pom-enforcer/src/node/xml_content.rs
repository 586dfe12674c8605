//! XML content types for tree nodes.
//!
//! This module provides `XmlContent`, which represents the content of an XML
//! node: an element (tag with namespaces and attributes), text, a comment or
//! a processing instruction.

use super::namespace::Namespace;

/// Represents the content of an XML node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlContent {
    /// An XML element with a qualified name and attributes.
    Element(XmlElement),
    /// XML text content (character data or a CDATA section).
    Text(XmlText),
    /// XML comment.
    Comment(XmlComment),
    /// XML processing instruction.
    ProcessingInstruction(XmlProcessingInstruction),
}

impl XmlContent {
    /// Returns true if this is an element node.
    pub fn is_element(&self) -> bool {
        matches!(self, XmlContent::Element(_))
    }

    /// Returns true if this is a text node.
    pub fn is_text(&self) -> bool {
        matches!(self, XmlContent::Text(_))
    }

    /// Returns true if this is a comment node.
    pub fn is_comment(&self) -> bool {
        matches!(self, XmlContent::Comment(_))
    }

    /// Returns a reference to the element, if this is an element node.
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlContent::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns a mutable reference to the element, if this is an element node.
    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            XmlContent::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns a reference to the text, if this is a text node.
    pub fn as_text(&self) -> Option<&XmlText> {
        match self {
            XmlContent::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Returns true for text that contains nothing but XML whitespace.
    ///
    /// CDATA sections are never considered blank.
    pub fn is_blank_text(&self) -> bool {
        match self {
            XmlContent::Text(t) => t.is_blank(),
            _ => false,
        }
    }
}

/// A qualified element or attribute name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    prefix: Option<String>,
    local_name: String,
}

impl QName {
    /// Splits a raw `prefix:local` name.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((prefix, local)) => QName {
                prefix: Some(prefix.to_string()),
                local_name: local.to_string(),
            },
            None => QName::local(raw),
        }
    }

    /// Creates an unprefixed name.
    pub fn local(local_name: impl Into<String>) -> Self {
        QName {
            prefix: None,
            local_name: local_name.into(),
        }
    }

    /// Returns the prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Returns the local part of the name.
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Returns the name as written in the document (`prefix:local`).
    pub fn qualified(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.local_name),
            None => self.local_name.clone(),
        }
    }
}

/// An attribute on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    value: String,
    specified: bool,
}

impl Attribute {
    /// Creates an attribute that was explicitly present in the source.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
            specified: true,
        }
    }

    /// Creates an attribute that was not written in the source, such as a
    /// schema-implied default.
    pub fn defaulted(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            specified: false,
            ..Attribute::new(name, value)
        }
    }

    /// Returns the qualified attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the attribute value (unescaped).
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns true if the attribute was present in the source.
    pub fn is_specified(&self) -> bool {
        self.specified
    }
}

/// An XML element: qualified name, namespace, declarations and attributes.
///
/// Children live in the owning [`Document`](super::Document).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// The qualified name of the element (e.g. "project", "xsi:foo").
    name: QName,
    /// Resolved namespace URI, empty for no namespace.
    namespace_uri: String,
    /// Namespace declarations written on this element, in source order.
    namespace_decls: Vec<Namespace>,
    /// Attributes in insertion order. Namespace declarations are not included.
    attributes: Vec<Attribute>,
}

impl XmlElement {
    /// Creates a new element in no namespace.
    pub fn new(name: impl Into<String>) -> Self {
        Self::new_with_namespace(QName::parse(&name.into()), "", Vec::new(), Vec::new())
    }

    /// Creates a new element with namespace information.
    pub fn new_with_namespace(
        name: QName,
        namespace_uri: impl Into<String>,
        namespace_decls: Vec<Namespace>,
        attributes: Vec<Attribute>,
    ) -> Self {
        XmlElement {
            name,
            namespace_uri: namespace_uri.into(),
            namespace_decls,
            attributes,
        }
    }

    /// Returns the qualified name as written.
    pub fn qname(&self) -> String {
        self.name.qualified()
    }

    /// Returns the structured name.
    pub fn name(&self) -> &QName {
        &self.name
    }

    /// Returns the local name (without prefix).
    pub fn local_name(&self) -> &str {
        self.name.local_name()
    }

    /// Returns the namespace this element belongs to.
    pub fn namespace(&self) -> Namespace {
        Namespace::new(self.name.prefix().unwrap_or(""), &self.namespace_uri)
    }

    /// Returns the namespace URI, empty for no namespace.
    pub fn namespace_uri(&self) -> &str {
        &self.namespace_uri
    }

    /// Returns the namespace declarations introduced on this element.
    pub fn namespace_decls(&self) -> &[Namespace] {
        &self.namespace_decls
    }

    /// Adds a namespace declaration.
    pub fn declare_namespace(&mut self, namespace: Namespace) {
        self.namespace_decls.push(namespace);
    }

    /// Returns the attributes in insertion order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Returns the value of the named attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name() == name)
            .map(Attribute::value)
    }

    /// Sets an attribute, replacing an existing value in place.
    pub fn set_attribute(&mut self, attribute: Attribute) {
        match self
            .attributes
            .iter_mut()
            .find(|a| a.name() == attribute.name())
        {
            Some(existing) => *existing = attribute,
            None => self.attributes.push(attribute),
        }
    }
}

/// XML character data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlText {
    text: String,
    cdata: bool,
}

impl XmlText {
    /// Creates a text node.
    pub fn new(text: impl Into<String>) -> Self {
        XmlText {
            text: text.into(),
            cdata: false,
        }
    }

    /// Creates a CDATA section.
    pub fn cdata(text: impl Into<String>) -> Self {
        XmlText {
            text: text.into(),
            cdata: true,
        }
    }

    /// Returns the text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns true if this text came from a CDATA section.
    pub fn is_cdata(&self) -> bool {
        self.cdata
    }

    /// Returns true if the text is empty or XML whitespace only.
    pub fn is_blank(&self) -> bool {
        !self.cdata && self.text.chars().all(is_xml_whitespace)
    }
}

/// XML comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlComment {
    text: String,
}

impl XmlComment {
    /// Creates a new comment with the text between `<!--` and `-->`.
    pub fn new(text: impl Into<String>) -> Self {
        XmlComment { text: text.into() }
    }

    /// Returns the comment text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// XML processing instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlProcessingInstruction {
    target: String,
    data: String,
}

impl XmlProcessingInstruction {
    /// Creates a processing instruction.
    pub fn new(target: impl Into<String>, data: impl Into<String>) -> Self {
        XmlProcessingInstruction {
            target: target.into(),
            data: data.into(),
        }
    }

    /// Returns the PI target.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the PI data.
    pub fn data(&self) -> &str {
        &self.data
    }
}

/// XML whitespace: space, tab, carriage return and line feed.
pub fn is_xml_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Trims XML whitespace at both ends.
pub fn trim_xml(s: &str) -> &str {
    s.trim_matches(is_xml_whitespace)
}
