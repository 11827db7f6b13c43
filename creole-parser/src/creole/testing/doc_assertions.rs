//! Fluent assertion API for document nodes

use crate::creole::ast::{Document, NodeKind, NodeRef};

/// Create an assertion builder rooted at the document node.
pub fn assert_doc(doc: &Document) -> NodeAssertion<'_> {
    NodeAssertion {
        node: doc.root(),
        context: "document".to_string(),
    }
}

pub struct NodeAssertion<'a> {
    node: NodeRef<'a>,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    pub fn node(&self) -> NodeRef<'a> {
        self.node
    }

    pub fn kind(&self, expected: NodeKind) -> &Self {
        assert_eq!(
            self.node.kind(),
            expected,
            "{}: Expected {}, found {}",
            self.context,
            expected,
            self.node.kind()
        );
        self
    }

    pub fn content(&self, expected: &str) -> &Self {
        assert_eq!(
            self.node.content(),
            Some(expected),
            "{}: content mismatch",
            self.context
        );
        self
    }

    pub fn no_content(&self) -> &Self {
        assert!(
            self.node.content().is_none(),
            "{}: expected no content, found {:?}",
            self.context,
            self.node.content()
        );
        self
    }

    /// Concatenated text of every text node below this one.
    pub fn text(&self, expected: &str) -> &Self {
        assert_eq!(
            self.node.plain_text(),
            expected,
            "{}: text mismatch",
            self.context
        );
        self
    }

    pub fn level(&self, expected: usize) -> &Self {
        assert_eq!(
            self.node.level(),
            Some(expected),
            "{}: level mismatch",
            self.context
        );
        self
    }

    pub fn macro_name(&self, expected: &str) -> &Self {
        assert_eq!(
            self.node.macro_name(),
            Some(expected),
            "{}: macro name mismatch",
            self.context
        );
        self
    }

    pub fn macro_args(&self, expected: &str) -> &Self {
        assert_eq!(
            self.node.macro_args(),
            Some(expected),
            "{}: macro args mismatch",
            self.context
        );
        self
    }

    pub fn pre_kind(&self, expected: &str) -> &Self {
        assert_eq!(
            self.node.pre_kind(),
            Some(expected),
            "{}: pre kind mismatch",
            self.context
        );
        self
    }

    pub fn child_count(&self, expected: usize) -> &Self {
        let kinds: Vec<_> = self.node.children().map(|c| c.kind().name()).collect();
        assert_eq!(
            kinds.len(),
            expected,
            "{}: Expected {} children, found {} ({:?})",
            self.context,
            expected,
            kinds.len(),
            kinds
        );
        self
    }

    pub fn child_kinds(&self, expected: &[NodeKind]) -> &Self {
        let kinds: Vec<_> = self.node.children().map(|c| c.kind()).collect();
        assert_eq!(kinds, expected, "{}: child kinds mismatch", self.context);
        self
    }

    pub fn child<F>(&self, index: usize, check: F) -> &Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let child = self.node.child(index).unwrap_or_else(|| {
            panic!(
                "{}: child {} out of bounds ({} children)",
                self.context,
                index,
                self.node.child_count()
            )
        });
        check(NodeAssertion {
            node: child,
            context: format!("{} > {}[{}]", self.context, child.kind(), index),
        });
        self
    }

    /// Run `check` on the only child, asserting there is exactly one.
    pub fn only_child<F>(&self, check: F) -> &Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        self.child_count(1).child(0, check)
    }
}
