//! Markdown serialization (document tree → CommonMark with GFM tables)
//!
//! Written directly from the tree. Kinds CommonMark has no syntax for (underline, small,
//! superscript, subscript) use inline HTML, which every CommonMark renderer passes through.

use creole_parser::{Document, NodeKind, NodeRef};
use html_escape::encode_text;

use crate::common::{pad, Cell, TextTable};
use crate::emit::{is_bare_url, join_blocks, MarkerStack, Renderer, UnknownStrategy};
use crate::error::EmitResult;
use crate::macros::expand_or_marker;
use crate::ConversionOptions;

/// Render a document as Markdown.
pub fn serialize_to_markdown(doc: &Document, options: &ConversionOptions) -> EmitResult {
    MarkdownRenderer::new(options).emit(doc.root())
}

pub struct MarkdownRenderer<'o> {
    options: &'o ConversionOptions,
    markers: MarkerStack,
}

/// Backslash-escape characters that would start inline markup.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']' | '<' | '~' | '^') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn longest_run(text: &str, c: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for ch in text.chars() {
        if ch == c {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// A code span whose delimiter is longer than any backtick run inside it.
fn code_span(code: &str) -> String {
    let fence = "`".repeat(longest_run(code, '`') + 1);
    if code.starts_with('`') || code.ends_with('`') {
        format!("{fence} {code} {fence}")
    } else {
        format!("{fence}{code}{fence}")
    }
}

fn link_destination(target: &str) -> String {
    if target.contains(|c: char| c.is_whitespace() || c == '(' || c == ')') {
        format!("<{}>", target)
    } else {
        target.to_string()
    }
}

impl<'o> MarkdownRenderer<'o> {
    pub fn new(options: &'o ConversionOptions) -> Self {
        Self {
            options,
            markers: MarkerStack::new(),
        }
    }

    fn typeface(&mut self, node: NodeRef<'_>, delimiter: &str) -> EmitResult {
        Ok(format!("{delimiter}{}{delimiter}", self.emit_children(node)?))
    }

    fn html_typeface(&mut self, node: NodeRef<'_>, tag: &str) -> EmitResult {
        Ok(format!("<{tag}>{}</{tag}>", self.emit_children(node)?))
    }

    fn list(&mut self, node: NodeRef<'_>, marker: &str) -> EmitResult {
        self.markers.push(marker);
        let items = self.emit_children(node);
        self.markers.pop();
        items
    }

    /// Column where the innermost list item's text starts.
    fn item_content_indent(&self) -> String {
        let width = self.markers.indent().len() + self.markers.current().chars().count() + 1;
        " ".repeat(width)
    }

    fn cell(&mut self, node: NodeRef<'_>) -> EmitResult<Cell> {
        let text = self.emit_children(node)?;
        Ok(Cell::new(
            text.trim().replace('|', "\\|"),
            node.kind() == NodeKind::TableHead,
        ))
    }
}

impl Renderer for MarkdownRenderer<'_> {
    fn unknown_strategy(&self) -> UnknownStrategy {
        self.options.unknown_nodes
    }

    fn escape_literal(&self, text: &str) -> String {
        encode_text(text).into_owned()
    }

    fn emit_container(&mut self, node: NodeRef<'_>) -> EmitResult {
        join_blocks(self, node)
    }

    fn document(&mut self, node: NodeRef<'_>) -> EmitResult {
        let out = join_blocks(self, node)?;
        let out = out.trim_matches('\n');
        if out.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("{}\n", out))
    }

    fn paragraph(&mut self, node: NodeRef<'_>) -> EmitResult {
        if node.child_count() == 1 {
            if let Some(only) = node.child(0).filter(|c| c.kind() == NodeKind::MacroInline) {
                return self.macro_block(only);
            }
        }
        Ok(format!("{}\n", self.emit_children(node)?))
    }

    fn header(&mut self, node: NodeRef<'_>) -> EmitResult {
        let level = node.level().unwrap_or(1).clamp(1, 6);
        Ok(format!("{} {}\n", "#".repeat(level), escape_text(node.text())))
    }

    fn bullet_list(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.list(node, "-")
    }

    fn number_list(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.list(node, "1.")
    }

    fn list_item(&mut self, node: NodeRef<'_>) -> EmitResult {
        let mut inline = String::new();
        let mut nested = String::new();
        for child in node.children() {
            if child.kind().is_list() {
                nested.push_str(&self.emit(child)?);
            } else {
                inline.push_str(&self.emit(child)?);
            }
        }
        Ok(format!(
            "{}{} {}\n{}",
            self.markers.indent(),
            self.markers.current(),
            inline.trim(),
            nested
        ))
    }

    fn table(&mut self, node: NodeRef<'_>) -> EmitResult {
        let mut table = TextTable::new();
        for row in node.children() {
            let mut cells = Vec::new();
            for cell in row.children() {
                cells.push(self.cell(cell)?);
            }
            table.push_row(cells);
        }
        let columns = table.column_count();
        if columns == 0 {
            return Ok(String::new());
        }

        let widths = table.widths(3);
        let line = |cells: &[Cell]| {
            let mut out = String::from("|");
            for (col, width) in widths.iter().enumerate() {
                let text = cells.get(col).map(|c| c.text.as_str()).unwrap_or("");
                out.push(' ');
                out.push_str(&pad(text, *width));
                out.push_str(" |");
            }
            out.push('\n');
            out
        };

        let mut rows = table.rows();
        let mut out = String::new();
        if table.has_header() {
            out.push_str(&line(&rows[0]));
            rows = &rows[1..];
        } else {
            // GFM tables need a header row
            out.push_str(&line(&[]));
        }
        out.push('|');
        for width in &widths {
            out.push(' ');
            out.push_str(&"-".repeat(*width));
            out.push_str(" |");
        }
        out.push('\n');
        for row in rows {
            out.push_str(&line(row));
        }
        Ok(out)
    }

    fn link(&mut self, node: NodeRef<'_>) -> EmitResult {
        let target = node.text();
        let label = self.emit_children(node)?;
        if (label.is_empty() || node.plain_text() == target) && is_bare_url(target) {
            return Ok(format!("<{}>", target));
        }
        let label = if label.is_empty() {
            escape_text(target)
        } else {
            label
        };
        Ok(format!("[{}]({})", label, link_destination(target)))
    }

    fn image(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(format!(
            "![{}]({})",
            escape_text(&node.plain_text()),
            link_destination(node.text())
        ))
    }

    fn macro_block(&mut self, node: NodeRef<'_>) -> EmitResult {
        let out = expand_or_marker(&self.options.macros, node, self.options.verbose);
        if out.is_empty() {
            return Ok(out);
        }
        Ok(format!("{}\n", out.trim_end_matches('\n')))
    }

    fn macro_inline(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(expand_or_marker(
            &self.options.macros,
            node,
            self.options.verbose,
        ))
    }

    fn pre_block(&mut self, node: NodeRef<'_>) -> EmitResult {
        let body = node.text();
        let fence = "`".repeat((longest_run(body, '`') + 1).max(3));
        let kind = node.pre_kind().unwrap_or("");
        if body.is_empty() {
            return Ok(format!("{fence}{kind}\n{fence}\n"));
        }
        Ok(format!("{fence}{kind}\n{body}\n{fence}\n"))
    }

    fn pre_inline(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(code_span(node.text()))
    }

    fn text(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(escape_text(node.text()))
    }

    fn line_break(&mut self, node: NodeRef<'_>) -> EmitResult {
        if node.has_ancestor(NodeKind::TableCell) || node.has_ancestor(NodeKind::TableHead) {
            return Ok("<br />".to_string());
        }
        if node.has_ancestor(NodeKind::ListItem) {
            return Ok(format!("  \n{}", self.item_content_indent()));
        }
        Ok("  \n".to_string())
    }

    fn line(&mut self, _node: NodeRef<'_>) -> EmitResult {
        Ok("\n".to_string())
    }

    fn separator(&mut self, _node: NodeRef<'_>) -> EmitResult {
        Ok("----\n".to_string())
    }

    fn emphasis(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.typeface(node, "*")
    }

    fn strong(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.typeface(node, "**")
    }

    fn monospace(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(code_span(&node.plain_text()))
    }

    fn underline(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.html_typeface(node, "u")
    }

    fn delete(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.typeface(node, "~~")
    }

    fn small(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.html_typeface(node, "small")
    }

    fn superscript(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.html_typeface(node, "sup")
    }

    fn subscript(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.html_typeface(node, "sub")
    }
}
