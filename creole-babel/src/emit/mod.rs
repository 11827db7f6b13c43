//! Emission framework
//!
//! A backend is a [`Renderer`]: one method per node kind, each falling back to the
//! backend's [`UnknownStrategy`]. Backend-specific state (the HTML table of contents, reST
//! substitutions, list markers) lives in the renderer value for one render pass.

pub mod markers;
pub mod renderer;
pub mod unknown;

pub use markers::MarkerStack;
pub use renderer::{is_bare_url, join_blocks, previous_sibling, renders_as_block, Renderer};
pub use unknown::{close_tag, open_tag, UnknownStrategy};
