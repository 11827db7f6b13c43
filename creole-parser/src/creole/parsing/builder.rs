//! Cursor-based tree construction
//!
//!     Scanner handlers never hold references into the tree. They drive a [`TreeBuilder`],
//!     which owns the document under construction plus the explicit parser state:
//!
//!         - cursor: the node currently receiving children
//!         - pending_text: the text node still accepting literal characters
//!         - last_break: the automatic line break added after the previous text line
//!
//!     All state lives in the builder value, so parsing is reentrant per call.

use log::trace;

use crate::creole::ast::{DocNode, Document, NodeId, NodeKind};

use super::ParserOptions;

pub struct TreeBuilder {
    doc: Document,
    cursor: NodeId,
    pending_text: Option<NodeId>,
    last_break: Option<NodeId>,
    options: ParserOptions,
}

impl TreeBuilder {
    pub fn new(options: ParserOptions) -> Self {
        let doc = Document::new();
        let cursor = doc.root_id();
        Self {
            doc,
            cursor,
            pending_text: None,
            last_break: None,
            options,
        }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn cursor(&self) -> NodeId {
        self.cursor
    }

    pub fn cursor_kind(&self) -> NodeKind {
        self.doc.get(self.cursor).kind
    }

    fn kind_of(&self, id: NodeId) -> NodeKind {
        self.doc.get(id).kind
    }

    fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.doc.get(id).parent()
    }

    /// Move the cursor. Ends the current text run.
    pub fn move_to(&mut self, id: NodeId) {
        self.pending_text = None;
        self.cursor = id;
    }

    /// Append a container at the cursor and descend into it.
    pub fn open(&mut self, node: DocNode) -> NodeId {
        let id = self.add(node);
        self.cursor = id;
        id
    }

    /// Append a node at the cursor without moving.
    pub fn add(&mut self, node: DocNode) -> NodeId {
        self.pending_text = None;
        self.doc.append(self.cursor, node)
    }

    /// Append literal characters, extending the current text node when it is still the
    /// cursor's last child.
    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(id) = self.pending_text {
            if self.doc.last_child(self.cursor) == Some(id) {
                self.doc
                    .get_mut(id)
                    .content
                    .get_or_insert_with(String::new)
                    .push_str(text);
                return;
            }
        }
        let id = self.doc.append(self.cursor, DocNode::text(text));
        self.pending_text = Some(id);
    }

    /// Walk from the cursor towards the root until `stop` accepts a kind.
    pub fn ascend_to(&mut self, stop: impl Fn(NodeKind) -> bool) {
        let mut node = self.cursor;
        while !stop(self.kind_of(node)) {
            match self.parent_of(node) {
                Some(parent) => node = parent,
                None => break,
            }
        }
        self.move_to(node);
    }

    /// Close every open construct before a new top-level block.
    pub fn ascend_to_block(&mut self) {
        self.prune_trailing_break();
        self.ascend_to(|kind| kind == NodeKind::Document);
    }

    /// Drop a break left as the last child of the constructs being closed: the automatic
    /// break of the previous text line, and any break ending the cursor or one of its
    /// inline ancestors up to the enclosing block.
    pub fn prune_trailing_break(&mut self) {
        if let Some(id) = self.last_break.take() {
            if let Some(parent) = self.parent_of(id) {
                if self.doc.last_child(parent) == Some(id) {
                    trace!("pruning line break under {}", self.kind_of(parent));
                    self.doc.detach(id);
                }
            }
        }

        let mut node = self.cursor;
        loop {
            if let Some(last) = self.doc.last_child(node) {
                if self.kind_of(last) == NodeKind::Break {
                    trace!("pruning forced break under {}", self.kind_of(node));
                    self.doc.detach(last);
                }
            }
            if self.kind_of(node).is_block() {
                break;
            }
            match self.parent_of(node) {
                Some(parent) => node = parent,
                None => break,
            }
        }
    }

    /// The break added after the previous text line, if it is still pending.
    pub fn last_break(&self) -> Option<NodeId> {
        self.last_break
    }

    pub fn add_line_break(&mut self) {
        let id = self.add(DocNode::new(NodeKind::Break));
        self.last_break = Some(id);
    }

    pub fn clear_line_break(&mut self) {
        self.last_break = None;
    }

    /// Close the innermost open span of `kind` when only typeface spans lie between it and
    /// the cursor, otherwise open a new span.
    pub fn toggle_typeface(&mut self, kind: NodeKind, delimiter: &str) {
        debug_assert!(kind.is_typeface());
        let mut node = self.cursor;
        let mut depth = 0;
        loop {
            let current = self.kind_of(node);
            if current == kind {
                let parent = self.parent_of(node).unwrap_or(self.doc.root_id());
                self.move_to(parent);
                return;
            }
            if !current.is_typeface() {
                break;
            }
            depth += 1;
            match self.parent_of(node) {
                Some(parent) => node = parent,
                None => break,
            }
        }
        if depth >= self.options.max_nesting {
            self.push_text(delimiter);
        } else {
            self.open(DocNode::new(kind));
        }
    }

    pub fn register_macro(&mut self, name: &str) {
        self.doc.register_macro(name);
    }

    pub fn finish(mut self) -> Document {
        self.prune_trailing_break();
        self.doc
    }
}
