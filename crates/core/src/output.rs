//! Output tree and context stack.
//!
//! Generated fragments are kept as nodes of a tree instead of being spliced
//! into one growing string. A fragment whose template had a `${content}`
//! slot is split into a head and a tail; children render between the two.
//! Nodes are addressed by index, so insertion never searches the output.

/// Placeholder marking where nested content goes inside a template.
pub const CONTENT_SLOT: &str = "${content}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIndex(usize);

/// Expanded template text, split around its content slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    head: String,
    tail: Option<String>,
}

impl Fragment {
    /// A fragment without a slot; nothing can nest inside it.
    pub fn leaf(text: impl Into<String>) -> Self {
        Self {
            head: text.into(),
            tail: None,
        }
    }

    /// A fragment whose slot sits between `head` and `tail`.
    pub fn with_slot(head: impl Into<String>, tail: impl Into<String>) -> Self {
        Self {
            head: head.into(),
            tail: Some(tail.into()),
        }
    }

    /// Splits `text` at its first `${content}`.
    pub fn from_template(text: &str) -> Self {
        match text.split_once(CONTENT_SLOT) {
            Some((head, tail)) => Self::with_slot(head, tail),
            None => Self::leaf(text),
        }
    }

    pub fn head(&self) -> &str {
        &self.head
    }

    pub fn tail(&self) -> Option<&str> {
        self.tail.as_deref()
    }

    pub fn has_slot(&self) -> bool {
        self.tail.is_some()
    }

    /// Appends to the end of the fragment, after the slot if there is one.
    pub fn push_str(&mut self, text: &str) {
        match &mut self.tail {
            Some(tail) => tail.push_str(text),
            None => self.head.push_str(text),
        }
    }

    /// Appends right before the slot.
    pub fn push_before_slot(&mut self, text: &str) {
        self.head.push_str(text);
    }

    /// Applies `f` to both halves.
    pub fn map_text(self, mut f: impl FnMut(&str) -> String) -> Self {
        Self {
            head: f(&self.head),
            tail: self.tail.as_deref().map(f),
        }
    }

    /// The fragment rendered on its own, with an empty slot.
    pub fn text(&self) -> String {
        let mut out = self.head.clone();
        if let Some(tail) = &self.tail {
            out.push_str(tail);
        }
        out
    }
}

#[derive(Debug, Clone)]
struct OutputNode {
    fragment: Fragment,
    parent: Option<NodeIndex>,
    children: Vec<NodeIndex>,
}

/// The document of one artifact.
#[derive(Debug, Clone)]
pub struct OutputTree {
    nodes: Vec<OutputNode>,
}

impl OutputTree {
    pub fn new(root: Fragment) -> Self {
        Self {
            nodes: vec![OutputNode {
                fragment: root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeIndex {
        NodeIndex(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn has_slot(&self, index: NodeIndex) -> bool {
        self.nodes[index.0].fragment.has_slot()
    }

    pub fn parent(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.nodes[index.0].parent
    }

    pub fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        &self.nodes[index.0].children
    }

    /// The node itself if it has a slot, else its nearest ancestor that does.
    fn container_of(&self, index: NodeIndex) -> NodeIndex {
        let mut current = index;
        while !self.has_slot(current) {
            match self.parent(current) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        current
    }

    /// Adds `fragment` as the last child of `parent`.
    ///
    /// When `parent` has no slot the child goes to the nearest ancestor that
    /// has one, which keeps document order.
    pub fn append(&mut self, parent: NodeIndex, fragment: Fragment) -> NodeIndex {
        let container = self.container_of(parent);
        if container != parent {
            log::debug!("Node {:?} has no content slot, appending to {:?}", parent, container);
        }
        let index = NodeIndex(self.nodes.len());
        self.nodes.push(OutputNode {
            fragment,
            parent: Some(container),
            children: Vec::new(),
        });
        self.nodes[container.0].children.push(index);
        index
    }

    /// Renders the whole document.
    ///
    /// Whitespace immediately before a slot is dropped, so an unused slot
    /// leaves no blank line behind.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_node(self.root(), &mut out);
        out
    }

    fn render_node(&self, index: NodeIndex, out: &mut String) {
        let node = &self.nodes[index.0];
        out.push_str(&node.fragment.head);
        for &child in &node.children {
            self.render_node(child, out);
        }
        if let Some(tail) = &node.fragment.tail {
            out.truncate(out.trim_end().len());
            out.push_str(tail);
        }
    }
}

/// The insertion points that are open while an artifact is built.
///
/// The bottom entry is the artifact's root and is never popped.
#[derive(Debug, Clone)]
pub struct ContextStack {
    stack: Vec<NodeIndex>,
}

impl ContextStack {
    pub fn new(root: NodeIndex) -> Self {
        Self { stack: vec![root] }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn current(&self) -> NodeIndex {
        // the root is never popped
        self.stack[self.stack.len() - 1]
    }

    /// Pops until the stack holds `level + 1` entries.
    pub fn enter_level(&mut self, level: usize) {
        self.stack.truncate((level + 1).max(1));
    }

    pub fn push(&mut self, index: NodeIndex) {
        self.stack.push(index);
    }
}
