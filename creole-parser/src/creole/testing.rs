//! Testing utilities for document trees
//!
//!     Parser tests assert on tree shape through a fluent API instead of comparing debug
//!     strings, so a failure names the exact path that diverged:
//!
//!     ```rust,ignore
//!     use creole_parser::creole::testing::assert_doc;
//!
//!     let doc = parse("* a\n** b", &ParserOptions::default());
//!     assert_doc(&doc)
//!         .child_count(1)
//!         .child(0, |list| {
//!             list.kind(NodeKind::BulletList)
//!                 .level(0)
//!                 .child(0, |item| {
//!                     item.kind(NodeKind::ListItem).level(1);
//!                 });
//!         });
//!     ```
//!
//!     Every assertion panics with the path from the root (`document > bullet_list[0] >
//!     list_item[0]`) so failures are easy to locate.

pub mod doc_assertions;

pub use doc_assertions::{assert_doc, NodeAssertion};
