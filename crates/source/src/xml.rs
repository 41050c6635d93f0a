//! Read-only structured data store.
//!
//! XML is parsed once with roxmltree and copied into an owned arena so the
//! tree can be shared between artifacts without borrowing the source text.
//! Node ids are assigned in document order, which makes sorting a node set
//! into document order a plain sort on ids.

use crate::DataError;
use std::path::Path;

/// The type of a node in the data tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Element,
    Text,
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    /// Element name, empty for root and text nodes.
    name: String,
    /// Text content for text nodes.
    text: String,
    attributes: Vec<(String, String)>,
    children: Vec<usize>,
    parent: Option<usize>,
}

/// An immutable, attributed tree queried by the data binding resolver.
#[derive(Debug, Clone)]
pub struct DataTree {
    nodes: Vec<NodeData>,
}

impl DataTree {
    /// Parses an XML document.
    pub fn parse(xml: &str) -> Result<Self, DataError> {
        let doc = roxmltree::Document::parse(xml)?;
        let mut tree = DataTree { nodes: Vec::new() };
        tree.copy_node(doc.root(), None);
        Ok(tree)
    }

    /// Loads and parses an XML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let path = path.as_ref();
        let xml = crate::text::read_text_file(path).map_err(|e| DataError::Unreadable {
            locator: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&xml)
    }

    fn copy_node(&mut self, node: roxmltree::Node<'_, '_>, parent: Option<usize>) -> Option<usize> {
        let (kind, name, text) = if node.is_root() {
            (NodeKind::Root, String::new(), String::new())
        } else if node.is_element() {
            (NodeKind::Element, node.tag_name().name().to_string(), String::new())
        } else if node.is_text() {
            (NodeKind::Text, String::new(), node.text().unwrap_or_default().to_string())
        } else {
            // comments and processing instructions carry no data
            return None;
        };

        let id = self.nodes.len();
        self.nodes.push(NodeData {
            kind,
            name,
            text,
            attributes: node
                .attributes()
                .map(|a| (a.name().to_string(), a.value().to_string()))
                .collect(),
            children: Vec::new(),
            parent,
        });

        let children: Vec<usize> = node
            .children()
            .filter_map(|child| self.copy_node(child, Some(id)))
            .collect();
        self.nodes[id].children = children;
        Some(id)
    }

    /// The document node (parent of the document element).
    pub fn root(&self) -> DataNode<'_> {
        DataNode { id: 0, tree: self }
    }

    /// The outermost element, if the document has one.
    pub fn document_element(&self) -> Option<DataNode<'_>> {
        self.root().element_children().next()
    }

    /// Every node in document order.
    pub fn descendants(&self) -> impl Iterator<Item = DataNode<'_>> {
        (0..self.nodes.len()).map(move |id| DataNode { id, tree: self })
    }

    /// Elements named `name` whose parent element is named `context`
    /// (any parent when `context` is `None`), in document order.
    pub fn elements_at(&self, context: Option<&str>, name: &str) -> Vec<DataNode<'_>> {
        self.descendants()
            .filter(|n| n.is_element() && n.name() == Some(name))
            .filter(|n| match context {
                None => true,
                Some(ctx) => n.parent().is_some_and(|p| p.is_element() && p.name() == Some(ctx)),
            })
            .collect()
    }

    /// Element children of every `<context>/<name>` element, in document order.
    pub fn rows_at(&self, context: Option<&str>, name: &str) -> Vec<DataNode<'_>> {
        let mut rows: Vec<DataNode<'_>> = self
            .elements_at(context, name)
            .into_iter()
            .flat_map(|e| e.element_children())
            .collect();
        rows.sort_by_key(|n| n.id);
        rows.dedup_by_key(|n| n.id);
        rows
    }

    /// String value of the first text child of any `<context>/<name>`
    /// element in document order, or `None` when there is none.
    pub fn text_at(&self, context: Option<&str>, name: &str) -> Option<String> {
        self.elements_at(context, name)
            .into_iter()
            .flat_map(|e| e.children().filter(|c| c.is_text()).collect::<Vec<_>>())
            .min_by_key(|n| n.id)
            .map(|n| n.text_content())
    }
}

/// A lightweight handle on one node of a [`DataTree`].
#[derive(Debug, Clone, Copy)]
pub struct DataNode<'a> {
    id: usize,
    tree: &'a DataTree,
}

impl PartialEq for DataNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.tree, other.tree)
    }
}

impl Eq for DataNode<'_> {}

impl<'a> DataNode<'a> {
    fn data(&self) -> &'a NodeData {
        &self.tree.nodes[self.id]
    }

    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    pub fn is_element(&self) -> bool {
        self.kind() == NodeKind::Element
    }

    pub fn is_text(&self) -> bool {
        self.kind() == NodeKind::Text
    }

    /// Element name; `None` for root and text nodes.
    pub fn name(&self) -> Option<&'a str> {
        match self.kind() {
            NodeKind::Element => Some(self.data().name.as_str()),
            _ => None,
        }
    }

    pub fn parent(&self) -> Option<DataNode<'a>> {
        let tree = self.tree;
        self.data().parent.map(|id| DataNode { id, tree })
    }

    pub fn children(&self) -> impl Iterator<Item = DataNode<'a>> + use<'a> {
        let tree = self.tree;
        self.data().children.iter().map(move |&id| DataNode { id, tree })
    }

    pub fn element_children(&self) -> impl Iterator<Item = DataNode<'a>> + use<'a> {
        self.children().filter(|c| c.is_element())
    }

    /// First child element with the given name.
    pub fn child_element(&self, name: &str) -> Option<DataNode<'a>> {
        self.element_children().find(|c| c.name() == Some(name))
    }

    pub fn first_child(&self) -> Option<DataNode<'a>> {
        self.children().next()
    }

    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.data()
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Concatenated text of this node and all its descendants.
    pub fn text_content(&self) -> String {
        match self.kind() {
            NodeKind::Text => self.data().text.clone(),
            _ => {
                let mut out = String::new();
                self.collect_text(&mut out);
                out
            }
        }
    }

    fn collect_text(&self, out: &mut String) {
        for child in self.children() {
            match child.kind() {
                NodeKind::Text => out.push_str(&child.data().text),
                _ => child.collect_text(out),
            }
        }
    }
}
