//! Creole serialization (document tree → Creole markup)
//!
//! Mostly the inverse of the parser: every construct is written back in the form the parser
//! recognises, so that `parse(serialize(doc))` rebuilds the same tree for everything but the
//! documented lossy cases (`<tt>` coming back from HTML, unknown elements).

use creole_parser::{Document, NodeKind, NodeRef};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::common::{pad, Cell, TextTable};
use crate::emit::{
    is_bare_url, join_blocks, previous_sibling, MarkerStack, Renderer, UnknownStrategy,
};
use crate::error::EmitResult;
use crate::macros::macro_markup;
use crate::ConversionOptions;

/// A `}}}` line inside a pre block would close it early.
static PRE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(?P<indent>[ \t]*)(?P<rest>\}\}\}[ \t]*)$").expect("valid fence regex")
});

/// Render a document as Creole markup.
pub fn serialize_to_creole(doc: &Document, options: &ConversionOptions) -> EmitResult {
    CreoleRenderer::new(options).emit(doc.root())
}

pub struct CreoleRenderer<'o> {
    options: &'o ConversionOptions,
    markers: MarkerStack,
}

impl<'o> CreoleRenderer<'o> {
    pub fn new(options: &'o ConversionOptions) -> Self {
        Self {
            options,
            markers: MarkerStack::new(),
        }
    }

    fn typeface(&mut self, node: NodeRef<'_>, delimiter: &str) -> EmitResult {
        Ok(format!("{delimiter}{}{delimiter}", self.emit_children(node)?))
    }

    fn list(&mut self, node: NodeRef<'_>, marker: &str) -> EmitResult {
        self.markers.push(marker);
        let items = self.emit_children(node);
        self.markers.pop();
        items
    }

    /// Inline content of a cell, item or link label: forced breaks only, on one line.
    fn in_one_line(node: NodeRef<'_>) -> bool {
        node.ancestors().any(|a| {
            matches!(
                a.kind(),
                NodeKind::ListItem | NodeKind::TableCell | NodeKind::TableHead | NodeKind::Link
            )
        })
    }

    /// A plain newline would let the next line open a block construct.
    fn next_line_opens_block(node: NodeRef<'_>) -> bool {
        let Some(parent) = node.parent() else {
            return false;
        };
        let mut after = parent.children().skip_while(|c| c.id() != node.id()).skip(1);
        match after.next() {
            Some(next) if next.kind() == NodeKind::Text => {
                let line = next.text().trim_start();
                line.starts_with(['*', '#', '=', '|', '{', '<'])
                    || line.starts_with("----")
                    || line.is_empty()
            }
            Some(_) => false,
            None => true,
        }
    }

    fn cell_token(&mut self, cell: NodeRef<'_>) -> EmitResult<Cell> {
        let text = self.emit_children(cell)?;
        let text = text.trim();
        Ok(match cell.kind() {
            NodeKind::TableHead => Cell::new(format!("= {}", text), true),
            _ => Cell::new(format!(" {}", text), false),
        })
    }
}

impl Renderer for CreoleRenderer<'_> {
    fn unknown_strategy(&self) -> UnknownStrategy {
        self.options.unknown_nodes
    }

    fn rewrap(&mut self, open: &str, inner: &str, close: &str) -> EmitResult {
        Ok(format!("<<html>>{open}{inner}{close}<</html>>"))
    }

    fn emit_container(&mut self, node: NodeRef<'_>) -> EmitResult {
        join_blocks(self, node)
    }

    fn document(&mut self, node: NodeRef<'_>) -> EmitResult {
        let out = join_blocks(self, node)?;
        Ok(out.trim_start_matches('\n').trim_end().to_string())
    }

    fn paragraph(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(format!("{}\n", self.emit_children(node)?))
    }

    fn header(&mut self, node: NodeRef<'_>) -> EmitResult {
        let marks = "=".repeat(node.level().unwrap_or(1).max(1));
        Ok(format!("{} {}\n", marks, node.text()))
    }

    fn bullet_list(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.list(node, "*")
    }

    fn number_list(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.list(node, "#")
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
        Ok(format!("{} {}\n{}", self.markers.joined(), inline.trim(), nested))
    }

    fn table(&mut self, node: NodeRef<'_>) -> EmitResult {
        let mut table = TextTable::new();
        for row in node.children() {
            let mut cells = Vec::new();
            for cell in row.children() {
                cells.push(self.cell_token(cell)?);
            }
            table.push_row(cells);
        }

        let widths = table.widths(0);
        let mut out = String::new();
        for row in table.rows() {
            for (cell, width) in row.iter().zip(&widths) {
                out.push('|');
                out.push_str(&pad(&cell.text, *width));
                out.push(' ');
            }
            out.push_str("|\n");
        }
        Ok(out)
    }

    fn table_row(&mut self, node: NodeRef<'_>) -> EmitResult {
        // Reached only for rows outside a table.
        let mut out = String::new();
        for cell in node.children() {
            let token = self.cell_token(cell)?;
            out.push_str(&format!("|{} ", token.text));
        }
        out.push_str("|\n");
        Ok(out)
    }

    fn table_cell(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.emit_children(node)
    }

    fn table_head(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.emit_children(node)
    }

    fn link(&mut self, node: NodeRef<'_>) -> EmitResult {
        let target = node.text();
        let label = self.emit_children(node)?;
        if label.is_empty() || label == target {
            let after_space = match previous_sibling(node) {
                None => true,
                Some(prev) => {
                    prev.kind() == NodeKind::Text && prev.text().ends_with(char::is_whitespace)
                }
            };
            if is_bare_url(target) && after_space {
                return Ok(target.to_string());
            }
            return Ok(format!("[[{}]]", target));
        }
        Ok(format!("[[{}|{}]]", target, label))
    }

    fn image(&mut self, node: NodeRef<'_>) -> EmitResult {
        let alt = node.plain_text();
        if alt.is_empty() {
            Ok(format!("{{{{{}}}}}", node.text()))
        } else {
            Ok(format!("{{{{{}|{}}}}}", node.text(), alt))
        }
    }

    fn macro_block(&mut self, node: NodeRef<'_>) -> EmitResult {
        let name = node.macro_name().unwrap_or("");
        let open = match node.macro_args().filter(|a| !a.is_empty()) {
            Some(args) => format!("<<{} {}>>", name, args),
            None => format!("<<{}>>", name),
        };
        Ok(format!("{}\n{}\n<</{}>>\n", open, node.text(), name))
    }

    fn macro_inline(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(macro_markup(node))
    }

    fn pre_block(&mut self, node: NodeRef<'_>) -> EmitResult {
        let mut out = String::from("{{{\n");
        if let Some(kind) = node.pre_kind().filter(|k| !k.is_empty()) {
            out.push_str(&format!("#!{}\n", kind));
        }
        let body = node.text();
        if !body.is_empty() {
            out.push_str(&PRE_FENCE.replace_all(body, "${indent}~${rest}"));
            out.push('\n');
        }
        out.push_str("}}}\n");
        Ok(out)
    }

    fn pre_inline(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(format!("{{{{{{{}}}}}}}", node.text()))
    }

    fn text(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(node.text().to_string())
    }

    fn line_break(&mut self, node: NodeRef<'_>) -> EmitResult {
        let plain_newline = self.options.parser.blog_line_breaks
            && !Self::in_one_line(node)
            && !Self::next_line_opens_block(node);
        Ok(if plain_newline { "\n" } else { "\\\\" }.to_string())
    }

    fn line(&mut self, _node: NodeRef<'_>) -> EmitResult {
        Ok("\n".to_string())
    }

    fn separator(&mut self, _node: NodeRef<'_>) -> EmitResult {
        Ok("----\n".to_string())
    }

    fn emphasis(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.typeface(node, "//")
    }

    fn strong(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.typeface(node, "**")
    }

    fn monospace(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.typeface(node, "##")
    }

    fn underline(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.typeface(node, "__")
    }

    fn delete(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.typeface(node, "~~")
    }

    fn small(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.typeface(node, "--")
    }

    fn superscript(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.typeface(node, "^^")
    }

    fn subscript(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.typeface(node, ",,")
    }
}
