//! Namespace-bound optional traversal over a parsed XML tree.

use roxmltree::Node;

/// An element that may or may not exist, bound to the document's namespace.
///
/// Every lookup on an absent scope yields another absent scope, so a long
/// path such as `Fa/Platnosc/RachunekBankowy/NrRB` resolves to `None` as
/// soon as any ancestor is missing.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a, 'input> {
    ns: &'static str,
    node: Option<Node<'a, 'input>>,
}

impl<'a, 'input> Scope<'a, 'input> {
    /// Wrap an existing element.
    pub fn new(ns: &'static str, node: Node<'a, 'input>) -> Self {
        Self { ns, node: Some(node) }
    }

    fn absent(ns: &'static str) -> Self {
        Self { ns, node: None }
    }

    /// Whether the element exists.
    pub fn is_present(&self) -> bool {
        self.node.is_some()
    }

    /// First child element with the given local name.
    pub fn child(self, name: &str) -> Self {
        let ns = self.ns;
        self.node
            .and_then(|node| {
                node.children()
                    .find(|n| n.is_element() && n.has_tag_name((ns, name)))
            })
            .map_or_else(|| Self::absent(ns), |node| Self::new(ns, node))
    }

    /// Descend through a sequence of child names.
    pub fn path(self, names: &[&str]) -> Self {
        names.iter().fold(self, |scope, name| scope.child(name))
    }

    /// All child elements with the given local name, in document order.
    pub fn children(self, name: &'a str) -> impl Iterator<Item = Scope<'a, 'input>> + 'a
    where
        'input: 'a,
    {
        let ns = self.ns;
        self.node
            .into_iter()
            .flat_map(|node| node.children())
            .filter(move |n| n.is_element() && n.has_tag_name((ns, name)))
            .map(move |n| Scope::new(ns, n))
    }

    /// Trimmed text of this element; empty text counts as absent.
    pub fn own_text(&self) -> Option<String> {
        self.node
            .and_then(|node| node.text())
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    }

    /// Trimmed text of the first child with the given name.
    pub fn text(self, name: &str) -> Option<String> {
        self.child(name).own_text()
    }

    /// Trimmed, non-empty attribute value of this element.
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.node
            .and_then(|node| node.attribute(name))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }
}
