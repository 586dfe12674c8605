//! Node structures for XML tree representation.
//!
//! A [`Document`] owns every node in a flat arena and hands out [`NodeId`]
//! indices. Parent links are indices as well, so a document is cheap to
//! clone and holds no reference cycles.

mod namespace;
mod xml_content;

pub use namespace::{is_xmlns_attr, Namespace, NamespaceContext, XML_NAMESPACE_URI};
pub use xml_content::{
    is_xml_whitespace, trim_xml, Attribute, QName, XmlComment, XmlContent, XmlElement,
    XmlProcessingInstruction, XmlText,
};

use rustc_hash::FxHashMap;

/// Index of a node inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node in the arena.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// XML content of this node.
    content: XmlContent,
    /// Parent node, `None` for top-level nodes.
    parent: Option<NodeId>,
    /// Child nodes in document order.
    children: Vec<NodeId>,
}

impl NodeData {
    /// Returns the content of this node.
    pub fn content(&self) -> &XmlContent {
        &self.content
    }

    /// Returns the parent, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the children in document order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// An XML document.
///
/// Besides the root element, a document keeps the top-level comments and
/// processing instructions around it, the encoding its declaration named and
/// its DOCTYPE, if any.
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<NodeData>,
    top_level: Vec<NodeId>,
    root: Option<NodeId>,
    declared_encoding: Option<String>,
    doctype: Option<String>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a document whose root is the given element.
    pub fn with_root(element: XmlElement) -> Self {
        let mut doc = Document::new();
        let root = doc.create_node(XmlContent::Element(element));
        doc.set_root(root);
        doc
    }

    /// Allocates a detached node.
    pub fn create_node(&mut self, content: XmlContent) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            content,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Allocates an element and appends it to `parent`.
    pub fn append_element(&mut self, parent: NodeId, element: XmlElement) -> NodeId {
        let id = self.create_node(XmlContent::Element(element));
        self.append_child(parent, id);
        id
    }

    /// Allocates a text node and appends it to `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let id = self.create_node(XmlContent::Text(XmlText::new(text)));
        self.append_child(parent, id);
        id
    }

    /// Appends `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Appends a node after the existing top-level nodes.
    pub fn push_top_level(&mut self, id: NodeId) {
        self.nodes[id.0].parent = None;
        self.top_level.push(id);
    }

    /// Makes `id` the root element and appends it to the top level.
    pub fn set_root(&mut self, id: NodeId) {
        self.push_top_level(id);
        self.root = Some(id);
    }

    /// Returns the root element.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns the top-level nodes (root element plus surrounding comments
    /// and processing instructions) in document order.
    pub fn top_level(&self) -> &[NodeId] {
        &self.top_level
    }

    /// Returns the encoding named by the source XML declaration.
    pub fn declared_encoding(&self) -> Option<&str> {
        self.declared_encoding.as_deref()
    }

    /// Records the encoding named by the source XML declaration.
    pub fn set_declared_encoding(&mut self, encoding: Option<String>) {
        self.declared_encoding = encoding;
    }

    /// Returns the DOCTYPE body (text between `<!DOCTYPE ` and `>`).
    pub fn doctype(&self) -> Option<&str> {
        self.doctype.as_deref()
    }

    /// Sets the DOCTYPE body.
    pub fn set_doctype(&mut self, doctype: Option<String>) {
        self.doctype = doctype;
    }

    /// Returns the node data for `id`.
    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    /// Returns the content of `id`.
    pub fn content(&self, id: NodeId) -> &XmlContent {
        &self.nodes[id.0].content
    }

    /// Returns a mutable reference to the content of `id`.
    pub fn content_mut(&mut self, id: NodeId) -> &mut XmlContent {
        &mut self.nodes[id.0].content
    }

    /// Returns the element stored at `id`, if it is one.
    pub fn element(&self, id: NodeId) -> Option<&XmlElement> {
        self.content(id).as_element()
    }

    /// Returns the local name of the element at `id`.
    pub fn local_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(XmlElement::local_name)
    }

    /// Returns the parent of `id`.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Returns the children of `id`.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Returns the element children of `id`, in order.
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.content(child).is_element())
            .collect()
    }

    /// Finds the first child element with the given local name and
    /// namespace URI.
    pub fn child_element(
        &self,
        parent: NodeId,
        local_name: &str,
        namespace_uri: &str,
    ) -> Option<NodeId> {
        self.children(parent).iter().copied().find(|&child| {
            self.element(child).is_some_and(|e| {
                e.local_name() == local_name && e.namespace_uri() == namespace_uri
            })
        })
    }

    /// Concatenates the direct text children of `id`.
    pub fn text(&self, id: NodeId) -> String {
        let mut text = String::new();
        for &child in self.children(id) {
            if let Some(t) = self.content(child).as_text() {
                text.push_str(t.text());
            }
        }
        text
    }

    /// Returns the direct text of `id` without surrounding whitespace.
    pub fn text_trim(&self, id: NodeId) -> String {
        trim_xml(&self.text(id)).to_string()
    }

    /// Returns the trimmed text of a child element, or an empty string when
    /// the child does not exist.
    pub fn child_text_trim(
        &self,
        parent: NodeId,
        local_name: &str,
        namespace_uri: &str,
    ) -> String {
        self.child_element(parent, local_name, namespace_uri)
            .map(|child| self.text_trim(child))
            .unwrap_or_default()
    }

    /// Returns the slash-separated local names from the root down to `id`.
    pub fn path(&self, id: NodeId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            if let Some(name) = self.local_name(node) {
                names.push(name);
            }
            current = self.parent(node);
        }
        names.reverse();
        names.join("/")
    }

    /// Reorders the element children of `parent` to follow `order`.
    ///
    /// Non-element children (comments, text, processing instructions) move
    /// together with the element that follows them; those after the last
    /// element stay at the end. Elements missing from `order` keep their
    /// relative order after the listed ones.
    pub fn reorder_elements(&mut self, parent: NodeId, order: &[NodeId]) {
        let mut groups: FxHashMap<NodeId, Vec<NodeId>> = FxHashMap::default();
        let mut original = Vec::new();
        let mut pending = Vec::new();
        for &child in self.children(parent) {
            pending.push(child);
            if self.content(child).is_element() {
                original.push(child);
                groups.insert(child, std::mem::take(&mut pending));
            }
        }

        let mut reordered = Vec::with_capacity(self.children(parent).len());
        for id in order.iter().chain(original.iter()) {
            if let Some(group) = groups.remove(id) {
                reordered.extend(group);
            }
        }
        reordered.extend(pending);
        self.nodes[parent.0].children = reordered;
    }

    /// Structural equality of the subtree at `a` with the subtree at `b` in
    /// `other`: same qualified names, namespaces and attributes (in order),
    /// and recursively equal children in the same order.
    pub fn deep_eq(&self, a: NodeId, other: &Document, b: NodeId) -> bool {
        let (left, right) = (self.node(a), other.node(b));
        let same_content = match (&left.content, &right.content) {
            (XmlContent::Element(x), XmlContent::Element(y)) => {
                x.name() == y.name()
                    && x.namespace_uri() == y.namespace_uri()
                    && x.attributes() == y.attributes()
            }
            (x, y) => x == y,
        };
        same_content
            && left.children.len() == right.children.len()
            && left
                .children
                .iter()
                .zip(&right.children)
                .all(|(&ca, &cb)| self.deep_eq(ca, other, cb))
    }
}
