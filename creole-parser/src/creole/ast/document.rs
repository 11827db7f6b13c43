//! The document arena and its read-only navigation handle

use std::collections::BTreeSet;
use std::fmt::Write as _;

use super::kind::NodeKind;
use super::node::{DocNode, NodeId};

/// An n-ary document tree stored in an arena.
///
///     Nodes are only ever appended; the single removal operation is [`Document::detach`],
///     used to prune insignificant line breaks. A detached node stays in the arena but is
///     no longer reachable from the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<DocNode>,
    root: NodeId,
    used_macros: BTreeSet<String>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![DocNode::new(NodeKind::Document)],
            root: NodeId(0),
            used_macros: BTreeSet::new(),
        }
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn root(&self) -> NodeRef<'_> {
        self.node(self.root)
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { doc: self, id }
    }

    pub fn get(&self, id: NodeId) -> &DocNode {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut DocNode {
        &mut self.nodes[id.0]
    }

    /// Append `node` as the last child of `parent` and return its id.
    pub fn append(&mut self, parent: NodeId, mut node: DocNode) -> NodeId {
        debug_assert!(parent.0 < self.nodes.len(), "append to a foreign node id");
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].children.last().copied()
    }

    /// Remove `id` from its parent's children. Returns false when it was not attached.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.nodes[id.0].parent.take() else {
            return false;
        };
        let siblings = &mut self.nodes[parent.0].children;
        match siblings.iter().rposition(|child| *child == id) {
            Some(position) => {
                siblings.remove(position);
                true
            }
            None => false,
        }
    }

    pub fn register_macro(&mut self, name: impl Into<String>) {
        self.used_macros.insert(name.into());
    }

    /// Names of every macro referenced anywhere in the tree.
    pub fn used_macros(&self) -> &BTreeSet<String> {
        &self.used_macros
    }

    pub fn uses_macro(&self, name: &str) -> bool {
        self.used_macros.contains(name)
    }

    /// Number of nodes reachable from the root, the root included.
    pub fn reachable_count(&self) -> usize {
        self.root().descendants().count() + 1
    }

    /// Indented outline of the tree, one node per line.
    pub fn debug_tree(&self) -> String {
        let mut out = String::new();
        self.write_outline(&mut out, self.root, 0);
        out
    }

    fn write_outline(&self, out: &mut String, id: NodeId, depth: usize) {
        let node = self.get(id);
        let _ = write!(out, "{}{}", "  ".repeat(depth), node.kind);
        if let Some(tag) = &node.tag {
            let _ = write!(out, " <{}>", tag);
        }
        if let Some(level) = node.level {
            let _ = write!(out, " level={}", level);
        }
        if let Some(name) = &node.macro_name {
            let _ = write!(out, " macro={}", name);
            if let Some(args) = node.macro_args.as_deref().filter(|a| !a.is_empty()) {
                let _ = write!(out, " args={:?}", args);
            }
        }
        if let Some(kind) = &node.pre_kind {
            let _ = write!(out, " kind={}", kind);
        }
        if let Some(content) = &node.content {
            let _ = write!(out, " {:?}", content);
        }
        out.push('\n');
        for child in &node.children {
            self.write_outline(out, *child, depth + 1);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// A copyable view of one node together with its document.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    pub fn node(&self) -> &'a DocNode {
        self.doc.get(self.id)
    }

    pub fn kind(&self) -> NodeKind {
        self.node().kind
    }

    pub fn content(&self) -> Option<&'a str> {
        self.node().content.as_deref()
    }

    /// Content or the empty string.
    pub fn text(&self) -> &'a str {
        self.content().unwrap_or("")
    }

    pub fn level(&self) -> Option<usize> {
        self.node().level
    }

    pub fn macro_name(&self) -> Option<&'a str> {
        self.node().macro_name.as_deref()
    }

    pub fn macro_args(&self) -> Option<&'a str> {
        self.node().macro_args.as_deref()
    }

    pub fn pre_kind(&self) -> Option<&'a str> {
        self.node().pre_kind.as_deref()
    }

    pub fn tag(&self) -> Option<&'a str> {
        self.node().tag.as_deref()
    }

    pub fn attrs(&self) -> &'a [(String, String)] {
        &self.node().attrs
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.attrs()
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node().parent.map(|id| self.doc.node(id))
    }

    pub fn is_root(&self) -> bool {
        self.id == self.doc.root
    }

    pub fn child_count(&self) -> usize {
        self.node().children.len()
    }

    pub fn has_children(&self) -> bool {
        !self.node().children.is_empty()
    }

    pub fn child(&self, index: usize) -> Option<NodeRef<'a>> {
        self.node()
            .children
            .get(index)
            .map(|id| self.doc.node(*id))
    }

    pub fn children(&self) -> impl DoubleEndedIterator<Item = NodeRef<'a>> + ExactSizeIterator + 'a {
        let doc = self.doc;
        doc.get(self.id).children.iter().map(move |id| doc.node(*id))
    }

    /// Parent, grandparent, and so on up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        std::iter::successors(self.parent(), |node| node.parent())
    }

    pub fn has_ancestor(&self, kind: NodeKind) -> bool {
        self.ancestors().any(|node| node.kind() == kind)
    }

    /// Depth-first pre-order walk of everything below this node.
    pub fn descendants(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let doc = self.doc;
        let mut stack: Vec<NodeId> = doc.get(self.id).children.iter().rev().copied().collect();
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(doc.get(id).children.iter().rev().copied());
            Some(doc.node(id))
        })
    }

    /// Concatenated content of all text descendants.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        if self.kind() == NodeKind::Text {
            out.push_str(self.text());
        }
        for node in self.descendants() {
            if node.kind() == NodeKind::Text {
                out.push_str(node.text());
            }
        }
        out
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("content", &self.content())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_links_parent_and_children() {
        let mut doc = Document::new();
        let para = doc.append(doc.root_id(), DocNode::new(NodeKind::Paragraph));
        let text = doc.append(para, DocNode::text("hello"));

        let para_ref = doc.node(para);
        assert_eq!(para_ref.child_count(), 1);
        assert_eq!(doc.node(text).parent().map(|p| p.id()), Some(para));
        assert_eq!(para_ref.plain_text(), "hello");
        assert_eq!(doc.reachable_count(), 3);
    }

    #[test]
    fn detach_makes_node_unreachable() {
        let mut doc = Document::new();
        let para = doc.append(doc.root_id(), DocNode::new(NodeKind::Paragraph));
        doc.append(para, DocNode::text("a"));
        let brk = doc.append(para, DocNode::new(NodeKind::Break));

        assert!(doc.detach(brk));
        assert!(!doc.detach(brk));
        assert_eq!(doc.node(para).child_count(), 1);
        assert!(doc.node(brk).parent().is_none());
        assert!(doc.root().descendants().all(|n| n.id() != brk));
    }

    #[test]
    fn debug_tree_outlines_nodes() {
        let mut doc = Document::new();
        let header = doc.append(
            doc.root_id(),
            DocNode::new(NodeKind::Header).with_content("Title").with_level(1),
        );
        assert_eq!(doc.node(header).level(), Some(1));
        assert_eq!(doc.debug_tree(), "document\n  header level=1 \"Title\"\n");
    }

    #[test]
    fn documents_can_cross_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Document>();
    }
}
