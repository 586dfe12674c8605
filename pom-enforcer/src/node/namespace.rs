//! Namespace handling for XML elements.

use rustc_hash::FxHashMap;

/// URI permanently bound to the `xml` prefix.
pub const XML_NAMESPACE_URI: &str = "http://www.w3.org/XML/1998/namespace";

/// A namespace binding: prefix (empty for the default namespace) and URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    prefix: String,
    uri: String,
}

impl Namespace {
    /// Creates a namespace binding.
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        Namespace {
            prefix: prefix.into(),
            uri: uri.into(),
        }
    }

    /// Returns the prefix, empty for the default namespace.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the namespace URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns the declaration attribute name (`xmlns` or `xmlns:prefix`).
    pub fn declaration_name(&self) -> String {
        if self.prefix.is_empty() {
            "xmlns".to_string()
        } else {
            format!("xmlns:{}", self.prefix)
        }
    }
}

/// Tracks namespace bindings while walking a document.
///
/// The parser uses it to resolve prefixes; the printer uses it as a
/// namespace stack so a binding is declared only where it is introduced.
pub struct NamespaceContext {
    /// Stack of scopes, each containing prefix -> URI bindings.
    scopes: Vec<FxHashMap<String, String>>,
}

impl Default for NamespaceContext {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceContext {
    /// Creates a new namespace context with the XML namespace pre-bound.
    pub fn new() -> Self {
        let mut ctx = NamespaceContext {
            scopes: vec![FxHashMap::default()],
        };
        ctx.bind("xml", XML_NAMESPACE_URI);
        ctx
    }

    /// Pushes a new scope for entering an element.
    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    /// Pops the current scope when leaving an element.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Binds a prefix to a URI in the current scope.
    pub fn bind(&mut self, prefix: &str, uri: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(prefix.to_string(), uri.to_string());
        }
    }

    /// Resolves a prefix to its URI, searching from innermost scope.
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(prefix))
            .map(String::as_str)
    }

    /// Returns true if `namespace` is already in effect.
    ///
    /// An unbound default namespace is the same as "no namespace".
    pub fn is_bound(&self, namespace: &Namespace) -> bool {
        match self.resolve(namespace.prefix()) {
            Some(uri) => uri == namespace.uri(),
            None => namespace.prefix().is_empty() && namespace.uri().is_empty(),
        }
    }

    /// Binds every candidate not already in effect and returns those, in
    /// order. Call after [`push_scope`](Self::push_scope).
    pub fn introduce<'a, I>(&mut self, candidates: I) -> Vec<Namespace>
    where
        I: IntoIterator<Item = &'a Namespace>,
    {
        let mut added = Vec::new();
        for namespace in candidates {
            if namespace.prefix() == "xml" || self.is_bound(namespace) {
                continue;
            }
            self.bind(namespace.prefix(), namespace.uri());
            added.push(namespace.clone());
        }
        added
    }
}

/// Checks if an attribute name is a namespace declaration.
pub fn is_xmlns_attr(name: &str) -> bool {
    name == "xmlns" || name.starts_with("xmlns:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_context() {
        let mut ctx = NamespaceContext::new();
        ctx.push_scope();
        ctx.bind("xsi", "http://www.w3.org/2001/XMLSchema-instance");

        assert_eq!(
            ctx.resolve("xsi"),
            Some("http://www.w3.org/2001/XMLSchema-instance")
        );

        ctx.pop_scope();
        assert!(ctx.resolve("xsi").is_none());
    }

    #[test]
    fn test_is_xmlns() {
        assert!(is_xmlns_attr("xmlns"));
        assert!(is_xmlns_attr("xmlns:xsi"));
        assert!(!is_xmlns_attr("xml:space"));
        assert!(!is_xmlns_attr("combine.children"));
    }

    #[test]
    fn test_xml_prefix_always_bound() {
        let ctx = NamespaceContext::new();
        assert_eq!(ctx.resolve("xml"), Some(XML_NAMESPACE_URI));
    }

    #[test]
    fn test_introduce_skips_inherited_bindings() {
        let pom = Namespace::new("", "http://maven.apache.org/POM/4.0.0");
        let xsi = Namespace::new("xsi", "http://www.w3.org/2001/XMLSchema-instance");

        let mut ctx = NamespaceContext::new();
        ctx.push_scope();
        let added = ctx.introduce([&pom, &xsi, &pom]);
        assert_eq!(added, vec![pom.clone(), xsi.clone()]);

        ctx.push_scope();
        assert!(ctx.introduce([&pom]).is_empty());

        let reset = Namespace::new("", "");
        assert_eq!(ctx.introduce([&reset]), vec![reset.clone()]);
    }

    #[test]
    fn test_no_namespace_needs_no_declaration() {
        let mut ctx = NamespaceContext::new();
        ctx.push_scope();
        assert!(ctx.introduce([&Namespace::new("", "")]).is_empty());
    }

    #[test]
    fn test_declaration_name() {
        assert_eq!(Namespace::new("", "u").declaration_name(), "xmlns");
        assert_eq!(Namespace::new("xsi", "u").declaration_name(), "xmlns:xsi");
    }
}
