//! Block handlers
//!
//! Consumes [`BlockToken`]s in order and drives the [`TreeBuilder`]. Each handler starts by
//! closing whatever the previous block left open, then builds its own nodes.

use std::borrow::Cow;

use log::{debug, trace};

use crate::creole::ast::{DocNode, Document, NodeKind};

use super::block::{BlockScanner, BlockToken};
use super::builder::TreeBuilder;
use super::inline::parse_inline;
use super::rules::{LIST_ITEM_REGEX, PRE_ESCAPE_REGEX, TABLE_CELL_REGEX};
use super::ParserOptions;

/// Parse wiki markup into a document tree. Never fails: malformed markup degrades to text.
pub fn parse(text: &str, options: &ParserOptions) -> Document {
    let text = normalize_newlines(text);
    let mut engine = Engine {
        builder: TreeBuilder::new(options.clone()),
        glued: false,
    };
    for block in BlockScanner::new(&text) {
        trace!("block {:?} at {:?}", block.rule, block.span);
        engine.handle(block.token);
    }
    let doc = engine.builder.finish();
    debug!(
        "parsed {} bytes into {} nodes",
        text.len(),
        doc.reachable_count()
    );
    doc
}

/// Convert `\r\n` and lone `\r` to `\n`.
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

struct Engine {
    builder: TreeBuilder,
    /// The previous text line ended in a backslash, so the next one joins without a space.
    glued: bool,
}

impl Engine {
    fn handle(&mut self, token: BlockToken<'_>) {
        match token {
            BlockToken::MacroBlock { name, args, body } => self.macro_block(name, args, body),
            BlockToken::Line => {
                self.close_block();
                self.builder.add(DocNode::new(NodeKind::Line));
            }
            BlockToken::Head { level, text } => {
                self.close_block();
                self.builder.add(
                    DocNode::new(NodeKind::Header)
                        .with_content(text.trim())
                        .with_level(level),
                );
            }
            BlockToken::Separator => {
                self.close_block();
                self.builder.add(DocNode::new(NodeKind::Separator));
            }
            BlockToken::PreBlock { text } => self.pre_block(text),
            BlockToken::List { text } => self.list(text),
            BlockToken::Table { row } => self.table_row(row),
            BlockToken::Text {
                line,
                followed_by_text,
            } => self.text_line(line, followed_by_text),
        }
    }

    fn close_block(&mut self) {
        self.glued = false;
        self.builder.ascend_to_block();
    }

    fn macro_block(&mut self, name: &str, args: &str, body: &str) {
        self.close_block();
        self.builder.register_macro(name);
        self.builder.add(
            DocNode::new(NodeKind::MacroBlock)
                .with_content(body.trim())
                .with_macro(name, args.trim()),
        );
    }

    fn pre_block(&mut self, text: &str) {
        self.close_block();
        let mut node = DocNode::new(NodeKind::PreBlock);
        let body = match text.strip_prefix("#!") {
            Some(tagged) => {
                let (first, rest) = tagged.split_once('\n').unwrap_or((tagged, ""));
                let kind: String = first
                    .chars()
                    .take_while(|c| c.is_alphanumeric() || *c == '_')
                    .collect();
                node.pre_kind = Some(kind);
                rest
            }
            None => text,
        };
        let body = PRE_ESCAPE_REGEX.replace_all(body, "${indent}${rest}");
        self.builder.add(node.with_content(body));
    }

    fn list(&mut self, text: &str) {
        self.glued = false;
        self.builder.prune_trailing_break();
        for caps in LIST_ITEM_REGEX.captures_iter(text) {
            let bullets = caps.name("bullets").map_or("", |m| m.as_str());
            let item = caps.name("text").map_or("", |m| m.as_str());
            self.list_item(bullets, item);
        }
    }

    /// Depth is the bullet run length, kind is the run's last character.
    fn list_item(&mut self, bullets: &str, text: &str) {
        let kind = if bullets.ends_with('#') {
            NodeKind::NumberList
        } else {
            NodeKind::BulletList
        };
        let depth = bullets.len().clamp(1, self.builder.options().max_nesting.max(1));
        let level = depth - 1;

        let existing = {
            let doc = self.builder.document();
            let cursor = doc.node(self.builder.cursor());
            std::iter::once(cursor)
                .chain(cursor.ancestors())
                .take_while(|node| node.kind() != NodeKind::Document)
                .find(|node| node.kind().is_list() && node.level() == Some(level))
                .map(|node| (node.id(), node.kind(), node.parent().map(|p| p.id())))
        };

        match existing {
            Some((list, found, _)) if found == kind => self.builder.move_to(list),
            Some((_, _, parent)) => {
                let parent = parent.unwrap_or(self.builder.document().root_id());
                self.builder.move_to(parent);
                self.builder.open(DocNode::new(kind).with_level(level));
            }
            None => {
                self.builder
                    .ascend_to(|k| k == NodeKind::ListItem || k == NodeKind::Document);
                self.builder.open(DocNode::new(kind).with_level(level));
            }
        }
        self.builder
            .open(DocNode::new(NodeKind::ListItem).with_level(depth));
        parse_inline(&mut self.builder, text);
    }

    fn table_row(&mut self, row: &str) {
        self.glued = false;
        self.builder.prune_trailing_break();
        self.builder
            .ascend_to(|k| k == NodeKind::Table || k == NodeKind::Document);
        if self.builder.cursor_kind() != NodeKind::Table {
            self.builder.open(DocNode::new(NodeKind::Table));
        }
        let table = self.builder.cursor();
        let row_id = self.builder.open(DocNode::new(NodeKind::TableRow));
        for caps in TABLE_CELL_REGEX.captures_iter(row.trim()) {
            if let Some(head) = caps.name("head") {
                self.builder.open(DocNode::new(NodeKind::TableHead));
                let text = head.as_str().trim_matches(|c: char| c == '=' || c == ' ');
                parse_inline(&mut self.builder, text);
            } else if let Some(cell) = caps.name("cell") {
                self.builder.open(DocNode::new(NodeKind::TableCell));
                parse_inline(&mut self.builder, cell.as_str().trim());
            }
            self.builder.prune_trailing_break();
            self.builder.move_to(row_id);
        }
        self.builder.move_to(table);
    }

    fn text_line(&mut self, line: &str, followed_by_text: bool) {
        if matches!(
            self.builder.cursor_kind(),
            NodeKind::Table | NodeKind::TableRow | NodeKind::BulletList | NodeKind::NumberList
        ) {
            self.close_block();
        }
        let fresh = self.builder.cursor_kind() == NodeKind::Document;
        if fresh {
            self.builder.open(DocNode::new(NodeKind::Paragraph));
        } else if !self.glued && self.builder.last_break().is_none() {
            self.builder.push_text(" ");
        }

        let ends_with_backslash = line.ends_with('\\');
        let text = match line.strip_suffix('\\') {
            Some(rest) if !rest.ends_with('\\') => rest,
            _ => line,
        };
        self.builder.clear_line_break();
        parse_inline(&mut self.builder, text);
        self.glued = ends_with_backslash;

        let in_running_text = self.builder.cursor_kind() == NodeKind::Paragraph
            || self.builder.cursor_kind().is_typeface();
        if self.builder.options().blog_line_breaks
            && followed_by_text
            && !ends_with_backslash
            && in_running_text
        {
            self.builder.add_line_break();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_all_newline_conventions() {
        assert_eq!(normalize_newlines("a\r\nb\rc\n"), "a\nb\nc\n");
        assert!(matches!(normalize_newlines("plain\n"), Cow::Borrowed(_)));
    }

    #[test]
    fn pre_kind_line_is_split_off() {
        let doc = parse("{{{\n#!python\nprint(1)\n}}}\n", &ParserOptions::default());
        let pre = doc.root().child(0).unwrap();
        assert_eq!(pre.kind(), NodeKind::PreBlock);
        assert_eq!(pre.pre_kind(), Some("python"));
        assert_eq!(pre.content(), Some("print(1)"));
    }

    #[test]
    fn escaped_fence_is_unescaped() {
        let doc = parse("{{{\na\n  ~}}}\n}}}", &ParserOptions::default());
        assert_eq!(doc.root().child(0).unwrap().content(), Some("a\n  }}}"));
    }

    #[test]
    fn macro_names_are_collected() {
        let doc = parse(
            "<<toc>>\n\n<<code>>\nx\n<</code>>\n[[a|<<nope>>]]",
            &ParserOptions::default(),
        );
        let names: Vec<_> = doc.used_macros().iter().cloned().collect();
        assert_eq!(names, vec!["code".to_string(), "toc".to_string()]);
    }
}
