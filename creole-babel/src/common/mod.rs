//! Helpers shared by several backends

pub mod table;

pub use table::{pad, Cell, TextTable};
