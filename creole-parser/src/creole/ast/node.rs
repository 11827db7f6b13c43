//! Arena nodes

use super::kind::NodeKind;

/// Index of a node inside its [`Document`](super::Document) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single node of the document tree.
///
///     Payload fields are public; `children` and `parent` are managed by the owning
///     document so that the tree stays acyclic and every node has exactly one parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocNode {
    pub kind: NodeKind,
    pub content: Option<String>,
    /// List nesting depth or header level.
    pub level: Option<usize>,
    pub macro_name: Option<String>,
    pub macro_args: Option<String>,
    /// `#!kind` tag of a preformatted block.
    pub pre_kind: Option<String>,
    /// Element name of an `Unknown` node.
    pub tag: Option<String>,
    pub attrs: Vec<(String, String)>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl DocNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            content: None,
            level: None,
            macro_name: None,
            macro_args: None,
            pre_kind: None,
            tag: None,
            attrs: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(NodeKind::Text).with_content(content)
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_level(mut self, level: usize) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_macro(mut self, name: impl Into<String>, args: impl Into<String>) -> Self {
        self.macro_name = Some(name.into());
        self.macro_args = Some(args.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>, attrs: Vec<(String, String)>) -> Self {
        self.tag = Some(tag.into());
        self.attrs = attrs;
        self
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}
