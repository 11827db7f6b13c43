//! reStructuredText serialization (document tree → reST)

use std::collections::BTreeSet;

use creole_parser::{Document, NodeKind, NodeRef};
use log::debug;

use super::substitutions::Substitutions;
use crate::common::{pad, Cell, TextTable};
use crate::emit::{is_bare_url, join_blocks, MarkerStack, Renderer, UnknownStrategy};
use crate::error::{EmitError, EmitResult};
use crate::macros::MacroArgs;
use crate::ConversionOptions;

/// Section adornment per header level: (character, with overline).
const ADORNMENTS: [(char, bool); 6] = [
    ('=', true),
    ('-', true),
    ('=', false),
    ('-', false),
    ('~', false),
    ('^', false),
];

const LITERAL_INDENT: &str = "    ";
const DIRECTIVE_INDENT: &str = "   ";

/// Render a document as reStructuredText.
///
/// Fails with [`EmitError::AmbiguousSubstitution`] when two references share a name but not
/// a target, and with [`EmitError::UnsupportedHeaderLevel`] for headers deeper than six.
pub fn serialize_to_rest(doc: &Document, options: &ConversionOptions) -> EmitResult {
    RestRenderer::new(options).emit(doc.root())
}

pub struct RestRenderer<'o> {
    options: &'o ConversionOptions,
    markers: MarkerStack,
    substitutions: Substitutions,
    /// Custom interpreted-text roles used so far, declared at the top of the output.
    roles: BTreeSet<&'static str>,
}

impl<'o> RestRenderer<'o> {
    pub fn new(options: &'o ConversionOptions) -> Self {
        Self {
            options,
            markers: MarkerStack::new(),
            substitutions: Substitutions::new(),
            roles: BTreeSet::new(),
        }
    }

    fn typeface(&mut self, node: NodeRef<'_>, delimiter: &str) -> EmitResult {
        Ok(format!("{delimiter}{}{delimiter}", self.emit_children(node)?))
    }

    fn role(&mut self, node: NodeRef<'_>, role: &'static str) -> EmitResult {
        if role == "del" {
            self.roles.insert(role);
        }
        Ok(format!(":{}:`{}`", role, self.emit_children(node)?))
    }

    fn raw_html(&mut self, html: &str) -> String {
        self.roles.insert("raw-html");
        format!(":raw-html:`{}`", html.replace('`', "\\`"))
    }

    fn list(&mut self, node: NodeRef<'_>, marker: &str) -> EmitResult {
        self.markers.push(marker);
        let items = self.emit_children(node);
        self.markers.pop();
        let items = items?;
        if !self.markers.is_empty() {
            return Ok(items);
        }
        Ok(format!(
            "{}\n{}",
            items.trim_end_matches('\n'),
            self.substitutions.flush()
        ))
    }

    fn in_cell(node: NodeRef<'_>) -> bool {
        node.has_ancestor(NodeKind::TableCell) || node.has_ancestor(NodeKind::TableHead)
    }

    fn block_macro(&mut self, node: NodeRef<'_>) -> EmitResult {
        if node.macro_name() == Some("toc") {
            return Ok(contents_directive(node));
        }
        match self.options.macros.render(node, self.options.verbose) {
            Ok(html) if html.trim().is_empty() => Ok(String::new()),
            Ok(html) => Ok(format!(
                ".. raw:: html\n\n{}\n",
                indent_lines(html.trim_end_matches('\n'), DIRECTIVE_INDENT)
            )),
            Err(failure) => Ok(format!("{}\n", escape_text(&failure.to_string()))),
        }
    }
}

/// `.. contents::`, with `:depth:` when the toc call asks for one.
fn contents_directive(node: NodeRef<'_>) -> String {
    let depth = MacroArgs::parse(node.macro_args().unwrap_or(""))
        .and_then(|args| args.get("depth").and_then(|d| d.parse::<usize>().ok()));
    match depth {
        Some(depth) => format!(".. contents::\n{}:depth: {}\n", DIRECTIVE_INDENT, depth),
        None => ".. contents::\n".to_string(),
    }
}

fn indent_lines(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Backslash-escape characters that start inline markup.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '`' | '|') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn role_declaration(role: &str) -> String {
    match role {
        "raw-html" => format!(".. role:: raw-html(raw)\n{}:format: html\n", DIRECTIVE_INDENT),
        other => format!(".. role:: {}\n", other),
    }
}

impl Renderer for RestRenderer<'_> {
    fn unknown_strategy(&self) -> UnknownStrategy {
        self.options.unknown_nodes
    }

    fn escape_literal(&self, text: &str) -> String {
        escape_text(text)
    }

    fn rewrap(&mut self, open: &str, inner: &str, close: &str) -> EmitResult {
        let open = self.raw_html(open);
        let close = self.raw_html(close);
        Ok(format!("{open}\\ {inner}\\ {close}"))
    }

    fn emit_container(&mut self, node: NodeRef<'_>) -> EmitResult {
        join_blocks(self, node)
    }

    fn document(&mut self, node: NodeRef<'_>) -> EmitResult {
        let body = join_blocks(self, node)?;
        let body = body.trim_matches('\n');
        let mut out = String::new();
        for role in &self.roles {
            out.push_str(&role_declaration(role));
        }
        if !self.roles.is_empty() && !body.is_empty() {
            out.push('\n');
        }
        if !body.is_empty() {
            out.push_str(body);
            out.push('\n');
        }
        out.push_str(&self.substitutions.flush());
        Ok(out)
    }

    fn paragraph(&mut self, node: NodeRef<'_>) -> EmitResult {
        if node.child_count() == 1 {
            if let Some(only) = node.child(0).filter(|c| c.kind() == NodeKind::MacroInline) {
                return self.block_macro(only);
            }
        }
        let text = self.emit_children(node)?;
        let text = text.trim_end_matches('\n');
        // Visible breaks need a line block
        let body = if node.children().any(|c| c.kind() == NodeKind::Break) {
            text.lines()
                .map(|line| format!("| {}", line))
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            text.to_string()
        };
        Ok(format!("{}\n{}", body, self.substitutions.flush()))
    }

    fn header(&mut self, node: NodeRef<'_>) -> EmitResult {
        let level = node.level().unwrap_or(1).max(1);
        let Some(&(mark, overline)) = ADORNMENTS.get(level - 1) else {
            return Err(EmitError::UnsupportedHeaderLevel(level));
        };
        let title = node.text();
        if title.is_empty() {
            debug!("dropping empty level {} header", level);
            return Ok(String::new());
        }
        let rule: String = std::iter::repeat(mark).take(title.chars().count()).collect();
        let mut out = String::new();
        if overline {
            out.push_str(&rule);
            out.push('\n');
        }
        out.push_str(title);
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&self.substitutions.flush());
        Ok(out)
    }

    fn bullet_list(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.list(node, "*")
    }

    fn number_list(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.list(node, "#.")
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
        let mut out = format!(
            "{}{} {}\n",
            self.markers.indent(),
            self.markers.current(),
            inline.trim()
        );
        if !nested.is_empty() {
            out.push('\n');
            out.push_str(nested.trim_end_matches('\n'));
            out.push_str("\n\n");
        }
        Ok(out)
    }

    fn table(&mut self, node: NodeRef<'_>) -> EmitResult {
        let mut table = TextTable::new();
        for row in node.children() {
            let mut cells = Vec::new();
            for cell in row.children() {
                let text = self.emit_children(cell)?;
                cells.push(Cell::new(
                    text.trim(),
                    cell.kind() == NodeKind::TableHead,
                ));
            }
            table.push_row(cells);
        }
        if table.column_count() == 0 {
            return Ok(String::new());
        }

        let widths = table.widths(1);
        let border = |fill: char| {
            let mut line = String::from("+");
            for width in &widths {
                line.extend(std::iter::repeat(fill).take(width + 2));
                line.push('+');
            }
            line.push('\n');
            line
        };
        let empty = Cell::new("", false);

        let mut out = border('-');
        for (i, row) in table.rows().iter().enumerate() {
            let lines: Vec<Vec<&str>> = (0..widths.len())
                .map(|col| row.get(col).unwrap_or(&empty).lines())
                .collect();
            let height = lines.iter().map(Vec::len).max().unwrap_or(1);
            for line in 0..height {
                out.push('|');
                for (col, width) in widths.iter().enumerate() {
                    let text = lines[col].get(line).copied().unwrap_or("");
                    out.push(' ');
                    out.push_str(&pad(text, *width));
                    out.push_str(" |");
                }
                out.push('\n');
            }
            let fill = if i == 0 && table.has_header() { '=' } else { '-' };
            out.push_str(&border(fill));
        }
        out.push_str(&self.substitutions.flush());
        Ok(out)
    }

    fn link(&mut self, node: NodeRef<'_>) -> EmitResult {
        let target = node.text();
        let label = node.plain_text();
        if (label.is_empty() || label == target) && is_bare_url(target) {
            return Ok(target.to_string());
        }
        let name = if label.is_empty() { target } else { label.as_str() };
        if Self::in_cell(node) {
            self.substitutions.replace(name)?;
            self.substitutions.target(name, target)?;
            return Ok(format!("|{}|_", name));
        }
        self.substitutions.target(name, target)?;
        Ok(format!("`{}`_", name))
    }

    fn image(&mut self, node: NodeRef<'_>) -> EmitResult {
        let src = node.text();
        let alt = node.plain_text();
        let name = if alt.is_empty() { src } else { alt.as_str() };
        self.substitutions.image(name, src)?;
        Ok(format!("|{}|", name))
    }

    fn macro_block(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.block_macro(node)
    }

    fn macro_inline(&mut self, node: NodeRef<'_>) -> EmitResult {
        if node.macro_name() == Some("toc") {
            debug!("inline toc has no reST form, dropped");
            return Ok(String::new());
        }
        match self.options.macros.render(node, self.options.verbose) {
            Ok(html) if html.is_empty() => Ok(html),
            Ok(html) => Ok(self.raw_html(&html)),
            Err(failure) => Ok(escape_text(&failure.to_string())),
        }
    }

    fn pre_block(&mut self, node: NodeRef<'_>) -> EmitResult {
        let body = node.text();
        if body.trim().is_empty() {
            return Ok(String::new());
        }
        let head = match node.pre_kind().filter(|k| !k.is_empty()) {
            Some(kind) => format!(".. code-block:: {}", kind),
            None => "::".to_string(),
        };
        Ok(format!("{}\n\n{}\n", head, indent_lines(body, LITERAL_INDENT)))
    }

    fn pre_inline(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(format!("``{}``", node.text()))
    }

    fn text(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(escape_text(node.text()))
    }

    fn line_break(&mut self, node: NodeRef<'_>) -> EmitResult {
        let text = if node.has_ancestor(NodeKind::ListItem) && !Self::in_cell(node) {
            " "
        } else {
            "\n"
        };
        Ok(text.to_string())
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
        Ok(format!("``{}``", node.plain_text()))
    }

    fn underline(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.emit_children(node)
    }

    fn delete(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.role(node, "del")
    }

    fn small(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.emit_children(node)
    }

    fn superscript(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.role(node, "sup")
    }

    fn subscript(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.role(node, "sub")
    }
}
