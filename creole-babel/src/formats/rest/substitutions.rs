//! Pending reST definitions for one render pass
//!
//! reST links and images are references: the inline text names a target that is defined in
//! a separate explicit markup block. Definitions are collected here while a container renders
//! and written out when it closes ([`Substitutions::flush`]). Names stay registered for the
//! whole pass, so a second reference with the same name reuses the first definition, and a
//! reference that would redefine a name with a different target is an error.

use std::collections::HashMap;

use crate::error::{EmitError, EmitResult};

#[derive(Debug, Default)]
pub struct Substitutions {
    /// Hyperlink target name → URL.
    targets: HashMap<String, String>,
    /// Substitution name → definition body (`image:: src`, `replace:: text`).
    substitutions: HashMap<String, String>,
    pending: Vec<String>,
}

/// reST reference names are case-insensitive and whitespace-normalized.
fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn register(
    seen: &mut HashMap<String, String>,
    name: &str,
    value: &str,
) -> EmitResult<bool> {
    let key = normalize(name);
    match seen.get(&key) {
        Some(first) if first == value => Ok(false),
        Some(first) => Err(EmitError::AmbiguousSubstitution {
            text: name.to_string(),
            first: first.clone(),
            second: value.to_string(),
        }),
        None => {
            seen.insert(key, value.to_string());
            Ok(true)
        }
    }
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    /// `.. _name: url`
    pub fn target(&mut self, name: &str, url: &str) -> EmitResult<()> {
        if register(&mut self.targets, name, url)? {
            self.pending.push(format!(".. _{}: {}", escape_name(name), url));
        }
        Ok(())
    }

    /// `.. |name| image:: src`
    pub fn image(&mut self, name: &str, src: &str) -> EmitResult<()> {
        self.substitution(name, format!("image:: {}", src))
    }

    /// `.. |name| replace:: name`, the text half of a link inside a table cell.
    pub fn replace(&mut self, name: &str) -> EmitResult<()> {
        self.substitution(name, format!("replace:: {}", name))
    }

    fn substitution(&mut self, name: &str, body: String) -> EmitResult<()> {
        if register(&mut self.substitutions, name, &body)? {
            self.pending.push(format!(".. |{}| {}", name, body));
        }
        Ok(())
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Definitions collected since the last flush, as a block preceded by a blank line.
    pub fn flush(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        let mut out = String::from("\n");
        for definition in self.pending.drain(..) {
            out.push_str(&definition);
            out.push('\n');
        }
        out
    }
}

/// Target names containing a colon must be quoted with backquotes.
fn escape_name(name: &str) -> String {
    if name.contains(':') {
        format!("`{}`", name)
    } else {
        name.to_string()
    }
}
