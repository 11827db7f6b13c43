//! # creole-parser
//!
//! A parser for Creole wiki markup.
//!
//! Raw text goes through a block scanner, then an inline scanner for every block that holds
//! running text, and both drive a cursor over an arena tree. The result is a
//! [`Document`](creole::ast::Document) that every output backend in `creole-babel` walks.
//!
//! File Layout
//!
//! src/creole
//!   ├── ast        Document arena, node kinds, navigation
//!   ├── parsing    Grammar rules, block/inline scanners, tree builder
//!   └── testing    Fluent assertions for tests
//!
//! For testing guidelines, see the [testing module](creole::testing).

pub mod creole;

pub use creole::ast::{DocNode, Document, NodeId, NodeKind, NodeRef};
pub use creole::parsing::{parse, ParserOptions};
