//! Document tree for wiki markup
//!
//!     Parsing produces a single [`Document`]: an arena of [`DocNode`]s rooted at a node of
//!     kind [`NodeKind::Document`]. Every node has an ordered list of children it owns and a
//!     back reference to its parent, used only for upward navigation while the tree is being
//!     built and by emitters that need context (a break inside a list item renders
//!     differently from one inside a table cell).
//!
//!     The root additionally records the names of every macro the parser saw anywhere in
//!     the tree. Emitters use that set to switch on stateful behavior up front, such as
//!     collecting headers for a table of contents.
//!
//! Navigation
//!
//!     [`NodeRef`] pairs a node id with its document and is `Copy`, so it can be handed
//!     around freely by renderers and assertions without fighting the borrow checker.

pub mod document;
pub mod kind;
pub mod node;

pub use document::{Document, NodeRef};
pub use kind::NodeKind;
pub use node::{DocNode, NodeId};
