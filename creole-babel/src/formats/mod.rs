//! Format implementations
//!
//! This module contains all format implementations that convert between
//! the document tree and various text representations.

pub mod creole;
pub mod html;
pub mod markdown;
pub mod rest;
pub mod textile;
pub mod tree;

pub use creole::CreoleFormat;
pub use html::HtmlFormat;
pub use markdown::MarkdownFormat;
pub use rest::RestFormat;
pub use textile::TextileFormat;
pub use tree::TreeFormat;
