//! XML printer that writes document trees in canonical form.
//!
//! The output is a pure function of the tree and the [`FormattingConfig`]:
//! printing a document, parsing the result and printing again yields the
//! same bytes.

use std::io::Write;

use super::config::{FormattingConfig, OutputEncoding};
use crate::constants::{PROJECT_ELEMENT, ROOT_ATTRIBUTE_INDENT};
use crate::node::{
    is_xml_whitespace, trim_xml, Attribute, Document, Namespace, NamespaceContext, NodeId,
    XmlContent, XmlText,
};

/// How the children of an element are laid out.
enum Layout<'d> {
    /// No significant children: `<name/>`.
    Empty,
    /// Only text: written on the same line as the tags.
    Inline(Vec<&'d XmlText>),
    /// One child per line, indented one level deeper.
    Block(Vec<BlockItem>),
}

struct BlockItem {
    id: NodeId,
    blank_line_before: bool,
}

/// XML printer that outputs document trees.
pub struct XmlPrinter<'c, W: Write> {
    writer: W,
    config: &'c FormattingConfig,
    /// Bindings in effect at the element being printed.
    namespaces: NamespaceContext,
}

impl<'c, W: Write> XmlPrinter<'c, W> {
    /// Creates a new XML printer.
    pub fn new(writer: W, config: &'c FormattingConfig) -> Self {
        XmlPrinter {
            writer,
            config,
            namespaces: NamespaceContext::new(),
        }
    }

    /// Prints the whole document: declaration, DOCTYPE and top-level nodes.
    pub fn print(&mut self, doc: &Document) -> std::io::Result<()> {
        self.write(&format!(
            "<?xml version=\"1.0\" encoding=\"{}\"?>",
            self.config.encoding()
        ))?;
        self.newline()?;

        if let Some(doctype) = doc.doctype() {
            self.write(&format!("<!DOCTYPE {}>", doctype))?;
            self.newline()?;
        }

        for &id in doc.top_level() {
            self.print_node(doc, id, 0)?;
            self.newline()?;
        }

        self.writer.flush()
    }

    fn print_node(&mut self, doc: &Document, id: NodeId, depth: usize) -> std::io::Result<()> {
        match doc.content(id) {
            XmlContent::Element(_) => self.print_element(doc, id, depth),
            XmlContent::Text(text) if text.is_cdata() => self.print_cdata(text.text()),
            XmlContent::Text(text) => {
                let escaped = escape_text(trim_xml(text.text()), self.encoding());
                self.write(&escaped)
            }
            XmlContent::Comment(comment) => self.write(&format!("<!--{}-->", comment.text())),
            XmlContent::ProcessingInstruction(pi) => {
                if pi.data().is_empty() {
                    self.write(&format!("<?{}?>", pi.target()))
                } else {
                    self.write(&format!("<?{} {}?>", pi.target(), pi.data()))
                }
            }
        }
    }

    fn print_element(&mut self, doc: &Document, id: NodeId, depth: usize) -> std::io::Result<()> {
        let Some(element) = doc.element(id) else {
            return Ok(());
        };

        self.namespaces.push_scope();
        let own = element.namespace();
        let added = self
            .namespaces
            .introduce(std::iter::once(&own).chain(element.namespace_decls()));

        let qname = element.qname();
        let attributes: Vec<&Attribute> = element
            .attributes()
            .iter()
            .filter(|a| !self.config.format_schema_location() || a.is_specified())
            .collect();

        self.write("<")?;
        self.write(&qname)?;
        if self.is_aligned_root(doc, id) {
            self.print_aligned_declarations(&added, &attributes)?;
        } else {
            for namespace in &added {
                self.print_namespace(namespace)?;
            }
            for attribute in &attributes {
                self.print_attribute(attribute)?;
            }
        }

        match self.layout(doc, id) {
            Layout::Empty => self.write("/>")?,
            Layout::Inline(texts) => {
                self.write(">")?;
                let last = texts.len().saturating_sub(1);
                for (i, text) in texts.iter().enumerate() {
                    if text.is_cdata() {
                        self.print_cdata(text.text())?;
                        continue;
                    }
                    let mut s = text.text();
                    if i == 0 {
                        s = s.trim_start_matches(is_xml_whitespace);
                    }
                    if i == last {
                        s = s.trim_end_matches(is_xml_whitespace);
                    }
                    let escaped = escape_text(s, self.encoding());
                    self.write(&escaped)?;
                }
                self.write(&format!("</{}>", qname))?;
            }
            Layout::Block(items) => {
                self.write(">")?;
                for item in items {
                    if item.blank_line_before {
                        self.newline()?;
                    }
                    self.newline()?;
                    self.write(&self.config.indent(depth + 1))?;
                    self.print_node(doc, item.id, depth + 1)?;
                }
                self.newline()?;
                self.write(&self.config.indent(depth))?;
                self.write(&format!("</{}>", qname))?;
            }
        }

        self.namespaces.pop_scope();
        Ok(())
    }

    /// Root alignment applies to the document's `project` root element.
    fn is_aligned_root(&self, doc: &Document, id: NodeId) -> bool {
        self.config.indent_schema_location()
            && doc.root() == Some(id)
            && doc.local_name(id) == Some(PROJECT_ELEMENT)
    }

    /// Keeps the first namespace declaration inline and puts every other
    /// declaration and attribute on its own aligned line.
    fn print_aligned_declarations(
        &mut self,
        namespaces: &[Namespace],
        attributes: &[&Attribute],
    ) -> std::io::Result<()> {
        let padding = " ".repeat(ROOT_ATTRIBUTE_INDENT);
        for (i, namespace) in namespaces.iter().enumerate() {
            if i > 0 {
                self.newline()?;
                self.write(&padding)?;
            }
            self.print_namespace(namespace)?;
        }
        for attribute in attributes {
            self.newline()?;
            self.write(&padding)?;
            self.print_attribute(attribute)?;
        }
        Ok(())
    }

    fn print_namespace(&mut self, namespace: &Namespace) -> std::io::Result<()> {
        self.print_pair(&namespace.declaration_name(), namespace.uri())
    }

    fn print_attribute(&mut self, attribute: &Attribute) -> std::io::Result<()> {
        self.print_pair(attribute.name(), attribute.value())
    }

    fn print_pair(&mut self, name: &str, value: &str) -> std::io::Result<()> {
        let escaped = escape_attribute(value, self.encoding());
        self.write(&format!(" {}=\"{}\"", name, escaped))
    }

    fn print_cdata(&mut self, text: &str) -> std::io::Result<()> {
        self.write(&format!("<![CDATA[{}]]>", text))
    }

    /// Classifies the children of `id`.
    fn layout<'d>(&self, doc: &'d Document, id: NodeId) -> Layout<'d> {
        let children = doc.children(id);
        let significant = children
            .iter()
            .filter(|&&child| !doc.content(child).is_blank_text())
            .count();
        if significant == 0 {
            return Layout::Empty;
        }

        if children.iter().all(|&child| doc.content(child).is_text()) {
            let texts = children
                .iter()
                .filter_map(|&child| doc.content(child).as_text())
                .collect();
            return Layout::Inline(texts);
        }

        let mut items = Vec::with_capacity(significant);
        let mut blank_line = false;
        for &child in children {
            let content = doc.content(child);
            if content.is_blank_text() {
                let breaks = content
                    .as_text()
                    .map_or(0, |t| t.text().matches('\n').count());
                if self.config.keep_blank_lines() && breaks >= 2 && !items.is_empty() {
                    blank_line = true;
                }
                continue;
            }
            items.push(BlockItem {
                id: child,
                blank_line_before: blank_line,
            });
            blank_line = false;
        }
        Layout::Block(items)
    }

    fn encoding(&self) -> OutputEncoding {
        self.config.output_encoding()
    }

    fn newline(&mut self) -> std::io::Result<()> {
        let separator = self.config.line_separator();
        self.writer.write_all(separator.as_bytes())
    }

    fn write(&mut self, s: &str) -> std::io::Result<()> {
        match self.encoding() {
            OutputEncoding::Utf8 => self.writer.write_all(s.as_bytes()),
            encoding => {
                let mut bytes = Vec::with_capacity(s.len());
                encoding.encode_into(s, &mut bytes);
                self.writer.write_all(&bytes)
            }
        }
    }
}

/// Escapes character data.
fn escape_text(s: &str, encoding: OutputEncoding) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '\r' => result.push_str("&#xD;"),
            c if !encoding.can_encode(c) => push_char_ref(&mut result, c),
            _ => result.push(c),
        }
    }
    result
}

/// Escapes an attribute value for use between double quotes.
fn escape_attribute(s: &str, encoding: OutputEncoding) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\t' => result.push_str("&#x9;"),
            '\n' => result.push_str("&#xA;"),
            '\r' => result.push_str("&#xD;"),
            c if !encoding.can_encode(c) => push_char_ref(&mut result, c),
            _ => result.push(c),
        }
    }
    result
}

fn push_char_ref(out: &mut String, c: char) {
    out.push_str(&format!("&#x{:X};", u32::from(c)));
}

/// Prints a document to bytes.
pub fn print_to_vec(doc: &Document, config: &FormattingConfig) -> std::io::Result<Vec<u8>> {
    let mut output = Vec::new();
    XmlPrinter::new(&mut output, config).print(doc)?;
    Ok(output)
}

/// Prints a document to a string (lossy for non-UTF-8 encodings).
pub fn print_to_string(doc: &Document, config: &FormattingConfig) -> std::io::Result<String> {
    let output = print_to_vec(doc, config)?;
    Ok(String::from_utf8_lossy(&output).into_owned())
}
