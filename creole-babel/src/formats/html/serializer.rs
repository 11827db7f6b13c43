//! HTML serialization (document tree → HTML fragment)

use creole_parser::{Document, NodeKind, NodeRef};
use html_escape::{encode_double_quoted_attribute, encode_text};

use super::toc::{TocAggregator, TOC_PLACEHOLDER};
use crate::emit::{Renderer, UnknownStrategy};
use crate::error::EmitResult;
use crate::macros::{macro_markup, MacroArgs, MacroFailure};
use crate::ConversionOptions;

/// Render a document as an HTML fragment.
pub fn serialize_to_html(doc: &Document, options: &ConversionOptions) -> EmitResult {
    HtmlRenderer::new(doc, options).emit(doc.root())
}

pub struct HtmlRenderer<'o> {
    options: &'o ConversionOptions,
    /// Present only when the document calls `toc` somewhere.
    toc: Option<TocAggregator>,
}

impl<'o> HtmlRenderer<'o> {
    pub fn new(doc: &Document, options: &'o ConversionOptions) -> Self {
        Self {
            options,
            toc: doc.uses_macro("toc").then(TocAggregator::new),
        }
    }

    fn typeface(&mut self, node: NodeRef<'_>, tag: &str) -> EmitResult {
        Ok(format!("<{tag}>{}</{tag}>", self.emit_children(node)?))
    }

    fn list(&mut self, node: NodeRef<'_>, tag: &str) -> EmitResult {
        let indent = "\t".repeat(node.level().unwrap_or(0));
        Ok(format!(
            "{indent}<{tag}>\n{}{indent}</{tag}>\n",
            self.emit_children(node)?
        ))
    }

    fn call_macro(&mut self, node: NodeRef<'_>) -> String {
        if node.macro_name() == Some("toc") && self.toc.is_some() {
            return self.table_of_contents(node);
        }
        match self.options.macros.render(node, self.options.verbose) {
            Ok(html) => html,
            Err(failure) => encode_text(&failure.to_string()).into_owned(),
        }
    }

    fn table_of_contents(&mut self, node: NodeRef<'_>) -> String {
        let raw_args = node.macro_args().unwrap_or("");
        let Some(toc) = self.toc.as_mut() else {
            return String::new();
        };
        if toc.is_claimed() {
            return if self.options.escape_repeated_toc {
                encode_text(&macro_markup(node)).into_owned()
            } else {
                String::new()
            };
        }
        let depth = match MacroArgs::parse(raw_args) {
            Some(args) => match args.get("depth").map(str::parse::<usize>) {
                None => None,
                Some(Ok(depth)) => Some(depth),
                Some(Err(_)) => return wrong_toc_arguments(raw_args),
            },
            None => return wrong_toc_arguments(raw_args),
        };
        toc.claim(depth);
        TOC_PLACEHOLDER.to_string()
    }

    fn break_indent(node: NodeRef<'_>) -> String {
        node.ancestors()
            .find(|a| a.kind() == NodeKind::ListItem)
            .and_then(|item| item.level())
            .map(|level| "\t".repeat(level))
            .unwrap_or_default()
    }
}

fn wrong_toc_arguments(raw_args: &str) -> String {
    let failure = MacroFailure::WrongArguments {
        name: "toc".to_string(),
        args: raw_args.to_string(),
    };
    encode_text(&failure.to_string()).into_owned()
}

impl Renderer for HtmlRenderer<'_> {
    fn unknown_strategy(&self) -> UnknownStrategy {
        self.options.unknown_nodes
    }

    fn escape_literal(&self, text: &str) -> String {
        encode_text(text).into_owned()
    }

    fn document(&mut self, node: NodeRef<'_>) -> EmitResult {
        let html = self.emit_children(node)?;
        Ok(match &self.toc {
            Some(toc) => toc.splice(&html),
            None => html,
        })
    }

    fn paragraph(&mut self, node: NodeRef<'_>) -> EmitResult {
        // A paragraph holding a lone macro tag renders like a block macro
        if node.child_count() == 1 {
            if let Some(only) = node.child(0).filter(|c| c.kind() == NodeKind::MacroInline) {
                return Ok(format!("{}\n", self.call_macro(only)));
            }
        }
        Ok(format!("<p>{}</p>\n", self.emit_children(node)?))
    }

    fn header(&mut self, node: NodeRef<'_>) -> EmitResult {
        let level = node.level().unwrap_or(1).clamp(1, 6);
        let text = node.text();
        let id = match self.toc.as_mut() {
            Some(toc) => format!(
                " id=\"{}\"",
                toc.add_header(node.level().unwrap_or(1), text)
            ),
            None => String::new(),
        };
        Ok(format!(
            "<h{level}{id}>{}</h{level}>\n",
            encode_text(text)
        ))
    }

    fn bullet_list(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.list(node, "ul")
    }

    fn number_list(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.list(node, "ol")
    }

    fn list_item(&mut self, node: NodeRef<'_>) -> EmitResult {
        let indent = "\t".repeat(node.level().unwrap_or(1));
        let mut inline = String::new();
        let mut nested = String::new();
        for child in node.children() {
            if child.kind().is_list() {
                nested.push_str(&self.emit(child)?);
            } else {
                inline.push_str(&self.emit(child)?);
            }
        }
        if nested.is_empty() {
            Ok(format!("{indent}<li>{inline}</li>\n"))
        } else {
            Ok(format!("{indent}<li>{inline}\n{nested}{indent}</li>\n"))
        }
    }

    fn table(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(format!("<table>\n{}</table>\n", self.emit_children(node)?))
    }

    fn table_row(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(format!("<tr>\n{}</tr>\n", self.emit_children(node)?))
    }

    fn table_cell(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(format!("\t<td>{}</td>\n", self.emit_children(node)?))
    }

    fn table_head(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(format!("\t<th>{}</th>\n", self.emit_children(node)?))
    }

    fn link(&mut self, node: NodeRef<'_>) -> EmitResult {
        let target = node.text();
        let label = if node.has_children() {
            self.emit_children(node)?
        } else {
            encode_text(target).into_owned()
        };
        Ok(format!(
            "<a href=\"{}\">{}</a>",
            encode_double_quoted_attribute(target),
            label
        ))
    }

    fn image(&mut self, node: NodeRef<'_>) -> EmitResult {
        let title = node.plain_text();
        let title = encode_double_quoted_attribute(&title);
        Ok(format!(
            "<img src=\"{}\" title=\"{title}\" alt=\"{title}\" />",
            encode_double_quoted_attribute(node.text())
        ))
    }

    fn macro_block(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(format!("{}\n", self.call_macro(node)))
    }

    fn macro_inline(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(self.call_macro(node))
    }

    fn pre_block(&mut self, node: NodeRef<'_>) -> EmitResult {
        let body = encode_text(node.text());
        Ok(match node.pre_kind().filter(|k| !k.is_empty()) {
            Some(kind) => format!(
                "<pre><code class=\"language-{}\">{}</code></pre>\n",
                encode_double_quoted_attribute(kind),
                body
            ),
            None => format!("<pre>{}</pre>\n", body),
        })
    }

    fn pre_inline(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(format!("<tt>{}</tt>", encode_text(node.text())))
    }

    fn text(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(encode_text(node.text()).into_owned())
    }

    fn line_break(&mut self, node: NodeRef<'_>) -> EmitResult {
        Ok(format!("<br />\n{}", Self::break_indent(node)))
    }

    fn line(&mut self, _node: NodeRef<'_>) -> EmitResult {
        Ok("\n".to_string())
    }

    fn separator(&mut self, _node: NodeRef<'_>) -> EmitResult {
        Ok("<hr />\n".to_string())
    }

    fn emphasis(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.typeface(node, "i")
    }

    fn strong(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.typeface(node, "strong")
    }

    fn monospace(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.typeface(node, "tt")
    }

    fn underline(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.typeface(node, "u")
    }

    fn delete(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.typeface(node, "del")
    }

    fn small(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.typeface(node, "small")
    }

    fn superscript(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.typeface(node, "sup")
    }

    fn subscript(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.typeface(node, "sub")
    }
}
