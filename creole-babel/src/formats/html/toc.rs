//! Table of contents for HTML output
//!
//! The first `toc` macro claims a placeholder in the output. Headers register as they are
//! rendered, and once the whole document is rendered the collected headers are turned into a
//! nested list and spliced in at the placeholder. The placeholder is an HTML comment, which
//! escaped text can never produce.

use std::collections::HashMap;

pub const TOC_PLACEHOLDER: &str = "<!-- creole:toc -->";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub level: usize,
    pub text: String,
    pub anchor: String,
}

#[derive(Debug, Default)]
pub struct TocAggregator {
    entries: Vec<TocEntry>,
    claimed: bool,
    max_depth: Option<usize>,
    anchors: HashMap<String, usize>,
}

impl TocAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the placeholder. Only the first claim succeeds.
    pub fn claim(&mut self, max_depth: Option<usize>) -> bool {
        if self.claimed {
            return false;
        }
        self.claimed = true;
        self.max_depth = max_depth;
        true
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed
    }

    /// Record a header and return the anchor id to put on it.
    pub fn add_header(&mut self, level: usize, text: &str) -> String {
        let anchor = self.unique_anchor(text);
        self.entries.push(TocEntry {
            level,
            text: text.to_string(),
            anchor: anchor.clone(),
        });
        anchor
    }

    fn unique_anchor(&mut self, text: &str) -> String {
        let base = slug(text);
        let seen = self.anchors.entry(base.clone()).or_insert(0);
        *seen += 1;
        if *seen == 1 {
            base
        } else {
            format!("{}-{}", base, seen)
        }
    }

    /// Nested `<ul>` lists following the level deltas between consecutive headers.
    pub fn render(&self) -> String {
        let entries: Vec<&TocEntry> = self
            .entries
            .iter()
            .filter(|e| self.max_depth.map_or(true, |max| e.level <= max))
            .collect();
        let Some(base) = entries.iter().map(|e| e.level).min() else {
            return String::new();
        };

        let mut out = String::new();
        let mut depth = 0;
        for entry in entries {
            let target = entry.level - base + 1;
            while depth < target {
                out.push_str(&"\t".repeat(depth));
                out.push_str("<ul>\n");
                depth += 1;
            }
            while depth > target {
                depth -= 1;
                out.push_str(&"\t".repeat(depth));
                out.push_str("</ul>\n");
            }
            out.push_str(&"\t".repeat(depth));
            out.push_str(&format!(
                "<li><a href=\"#{}\">{}</a></li>\n",
                entry.anchor,
                html_escape::encode_text(&entry.text)
            ));
        }
        while depth > 0 {
            depth -= 1;
            out.push_str(&"\t".repeat(depth));
            out.push_str("</ul>\n");
        }
        out
    }

    /// Replace the placeholder in `html` with the rendered list, once.
    pub fn splice(&self, html: &str) -> String {
        if !self.claimed {
            return html.to_string();
        }
        let list = self.render();
        let list = list.strip_suffix('\n').unwrap_or(&list);
        html.replacen(TOC_PLACEHOLDER, list, 1)
    }
}

/// Lowercased alphanumeric words joined by single dashes.
fn slug(text: &str) -> String {
    let mut out = String::new();
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        if !out.is_empty() {
            out.push('-');
        }
        out.extend(word.chars().flat_map(char::to_lowercase));
    }
    if out.is_empty() {
        "section".to_string()
    } else {
        out
    }
}
