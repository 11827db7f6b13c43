//! Textile serialization (document tree → Textile markup)

use creole_parser::{Document, NodeKind, NodeRef};

use crate::emit::{join_blocks, MarkerStack, Renderer, UnknownStrategy};
use crate::error::EmitResult;
use crate::macros::expand_or_marker;
use crate::ConversionOptions;

/// Render a document as Textile markup.
pub fn serialize_to_textile(doc: &Document, options: &ConversionOptions) -> EmitResult {
    TextileRenderer::new(options).emit(doc.root())
}

pub struct TextileRenderer<'o> {
    options: &'o ConversionOptions,
    markers: MarkerStack,
}

impl<'o> TextileRenderer<'o> {
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

    fn cell(&mut self, node: NodeRef<'_>, head: bool) -> EmitResult {
        let text = self.emit_children(node)?;
        let prefix = if head { "_. " } else { "" };
        Ok(format!("|{}{}", prefix, text.trim()))
    }
}

impl Renderer for TextileRenderer<'_> {
    fn unknown_strategy(&self) -> UnknownStrategy {
        self.options.unknown_nodes
    }

    fn escape_literal(&self, text: &str) -> String {
        format!("=={}==", text)
    }

    fn rewrap(&mut self, open: &str, inner: &str, close: &str) -> EmitResult {
        Ok(format!("<notextile>{open}{inner}{close}</notextile>"))
    }

    fn emit_container(&mut self, node: NodeRef<'_>) -> EmitResult {
        join_blocks(self, node)
    }

    fn document(&mut self, node: NodeRef<'_>) -> EmitResult {
        let out = join_blocks(self, node)?;
        Ok(format!("{}\n", out.trim_matches('\n')))
    }

    fn paragraph(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(format!("{}\n", self.emit_children(node)?))
    }

    fn header(&mut self, node: NodeRef<'_>) -> EmitResult {
        let level = node.level().unwrap_or(1).clamp(1, 6);
        Ok(format!("h{}. {}\n", level, node.text()))
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
        self.emit_children(node)
    }

    fn table_row(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(format!("{}|\n", self.emit_children(node)?))
    }

    fn table_cell(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.cell(node, false)
    }

    fn table_head(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.cell(node, true)
    }

    fn link(&mut self, node: NodeRef<'_>) -> EmitResult {
        let target = node.text();
        let label = self.emit_children(node)?;
        let label = if label.is_empty() { target } else { &label };
        Ok(format!("\"{}\":{}", label, target))
    }

    fn image(&mut self, node: NodeRef<'_>) -> EmitResult {
        let alt = node.plain_text();
        if alt.is_empty() {
            Ok(format!("!{}!", node.text()))
        } else {
            Ok(format!("!{}({})!", node.text(), alt))
        }
    }

    fn macro_block(&mut self, node: NodeRef<'_>) -> EmitResult {
        let out = expand_or_marker(&self.options.macros, node, self.options.verbose);
        if out.is_empty() {
            return Ok(out);
        }
        Ok(format!("{}\n", out))
    }

    fn macro_inline(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(expand_or_marker(
            &self.options.macros,
            node,
            self.options.verbose,
        ))
    }

    fn pre_block(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(format!("<pre>\n{}\n</pre>\n", node.text()))
    }

    fn pre_inline(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(format!("@{}@", node.text()))
    }

    fn text(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(node.text().to_string())
    }

    fn line_break(&mut self, node: NodeRef<'_>) -> EmitResult {
        let one_line = node.ancestors().any(|a| {
            matches!(
                a.kind(),
                NodeKind::ListItem | NodeKind::TableCell | NodeKind::TableHead
            )
        });
        Ok(if one_line { "<br />" } else { "\n" }.to_string())
    }

    fn line(&mut self, _node: NodeRef<'_>) -> EmitResult {
        Ok("\n".to_string())
    }

    fn separator(&mut self, _node: NodeRef<'_>) -> EmitResult {
        Ok("----\n".to_string())
    }

    fn emphasis(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.typeface(node, "_")
    }

    fn strong(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.typeface(node, "*")
    }

    fn monospace(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.typeface(node, "@")
    }

    fn underline(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.typeface(node, "+")
    }

    fn delete(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.typeface(node, "-")
    }

    fn small(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(format!("<small>{}</small>", self.emit_children(node)?))
    }

    fn superscript(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.typeface(node, "^")
    }

    fn subscript(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.typeface(node, "~")
    }
}
