//! Main module for wiki markup parsing

pub mod ast;
pub mod parsing;
pub mod testing;
