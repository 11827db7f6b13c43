//! Block-level scanner
//!
//!     A single linear pass over newline-normalized input. Every scan position is a line
//!     start and every token consumes through the newline of its last line, so consecutive
//!     spans tile the whole input. The catch-all `text` rule guarantees the scan advances.
//!
//!     The scanner is pure: it yields [`BlockMatch`]es and never touches the tree. Two-phase
//!     rules (block macros) are resolved here; when the second phase fails the line falls
//!     back to plain text.

use std::ops::Range;

use super::rules::{BlockRule, BLOCK_RULES};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockToken<'t> {
    MacroBlock {
        name: &'t str,
        args: &'t str,
        body: &'t str,
    },
    Line,
    Head {
        level: usize,
        text: &'t str,
    },
    Separator,
    PreBlock {
        text: &'t str,
    },
    /// The first item line and every bullet line following it.
    List {
        text: &'t str,
    },
    Table {
        row: &'t str,
    },
    Text {
        line: &'t str,
        /// The next line exists and is not blank.
        followed_by_text: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMatch<'t> {
    pub rule: BlockRule,
    pub token: BlockToken<'t>,
    pub span: Range<usize>,
}

pub struct BlockScanner<'t> {
    text: &'t str,
    pos: usize,
}

impl<'t> BlockScanner<'t> {
    pub fn new(text: &'t str) -> Self {
        Self { text, pos: 0 }
    }

    fn scan_at(&self, pos: usize) -> BlockMatch<'t> {
        let text = self.text;
        let Some((rule, caps)) = BLOCK_RULES.match_at(text, pos) else {
            // Unreachable while `text` is the last rule; still never stall.
            return self.text_line(pos);
        };
        let end = caps.get(0).map_or(pos, |m| m.end());
        let group = |name: &str| caps.name(name).map_or("", |m| m.as_str());

        let token = match rule {
            BlockRule::MacroBlock => {
                return self
                    .macro_block(group("macro_block_name"), group("macro_block_args"), pos, end)
                    .unwrap_or_else(|| self.text_line(pos));
            }
            BlockRule::Line => BlockToken::Line,
            BlockRule::Head => BlockToken::Head {
                level: group("head_marks").len(),
                text: group("head_text"),
            },
            BlockRule::Separator => BlockToken::Separator,
            BlockRule::PreBlock => BlockToken::PreBlock {
                text: group("pre_block_text"),
            },
            BlockRule::List => BlockToken::List {
                text: strip_newline(&text[pos..end]),
            },
            BlockRule::Table => BlockToken::Table {
                row: strip_newline(&text[pos..end]),
            },
            BlockRule::Text => return self.text_line(pos),
        };
        BlockMatch {
            rule,
            token,
            span: pos..end,
        }
    }

    /// Second phase of a block macro: find `<</name>>` and require that nothing but
    /// whitespace follows it on its line. Blank lines after the macro are absorbed.
    fn macro_block(
        &self,
        name: &'t str,
        args: &'t str,
        start: usize,
        open_end: usize,
    ) -> Option<BlockMatch<'t>> {
        if args.ends_with('/') {
            return None;
        }
        let text = self.text;
        let close = format!("<</{}>>", name);
        let body_len = text[open_end..].find(&close)?;
        let body = &text[open_end..open_end + body_len];
        if body.is_empty() {
            return None;
        }
        let after_close = open_end + body_len + close.len();
        let mut end = line_end(text, after_close);
        if !text[after_close..end].trim().is_empty() {
            return None;
        }
        while end < text.len() {
            let next = line_end(text, end);
            if !text[end..next].trim().is_empty() {
                break;
            }
            end = next;
        }
        Some(BlockMatch {
            rule: BlockRule::MacroBlock,
            token: BlockToken::MacroBlock { name, args, body },
            span: start..end,
        })
    }

    fn text_line(&self, pos: usize) -> BlockMatch<'t> {
        let text = self.text;
        let end = line_end(text, pos);
        let line = strip_newline(&text[pos..end]);
        let followed_by_text = end > pos
            && text[..end].ends_with('\n')
            && !text[end..line_end(text, end)].trim().is_empty();
        BlockMatch {
            rule: BlockRule::Text,
            token: BlockToken::Text {
                line,
                followed_by_text,
            },
            span: pos..end,
        }
    }
}

impl<'t> Iterator for BlockScanner<'t> {
    type Item = BlockMatch<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.text.len() {
            return None;
        }
        let mut found = self.scan_at(self.pos);
        debug_assert_eq!(found.span.start, self.pos);
        debug_assert!(found.span.end > self.pos, "block rule {:?} did not advance", found.rule);
        if found.span.end <= self.pos {
            found = self.text_line(self.pos);
        }
        self.pos = found.span.end;
        Some(found)
    }
}

/// Offset just past the newline ending the line that contains `pos`, or the text end.
fn line_end(text: &str, pos: usize) -> usize {
    text[pos..]
        .find('\n')
        .map_or(text.len(), |offset| pos + offset + 1)
}

fn strip_newline(line: &str) -> &str {
    line.strip_suffix('\n').unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<BlockToken<'_>> {
        BlockScanner::new(text).map(|m| m.token).collect()
    }

    #[test]
    fn header_and_paragraph() {
        assert_eq!(
            tokens("= Title =\nsome text\n"),
            vec![
                BlockToken::Head {
                    level: 1,
                    text: "Title"
                },
                BlockToken::Text {
                    line: "some text",
                    followed_by_text: false
                },
            ]
        );
    }

    #[test]
    fn list_absorbs_following_bullet_lines() {
        assert_eq!(
            tokens("* a\n** b\n# c\nafter"),
            vec![
                BlockToken::List {
                    text: "* a\n** b\n# c"
                },
                BlockToken::Text {
                    line: "after",
                    followed_by_text: false
                },
            ]
        );
    }

    #[test]
    fn blank_line_runs_collapse() {
        assert_eq!(
            tokens("a\n\n\n\nb"),
            vec![
                BlockToken::Text {
                    line: "a",
                    followed_by_text: false
                },
                BlockToken::Line,
                BlockToken::Text {
                    line: "b",
                    followed_by_text: false
                },
            ]
        );
    }

    #[test]
    fn text_knows_about_next_line() {
        let found = tokens("one\ntwo\n");
        assert_eq!(
            found[0],
            BlockToken::Text {
                line: "one",
                followed_by_text: true
            }
        );
    }

    #[test]
    fn block_macro_needs_matching_close() {
        assert_eq!(
            tokens("<<code lang=rust>>\nfn main() {}\n<</code>>\n\nnext"),
            vec![
                BlockToken::MacroBlock {
                    name: "code",
                    args: "lang=rust",
                    body: "\nfn main() {}\n"
                },
                BlockToken::Text {
                    line: "next",
                    followed_by_text: false
                },
            ]
        );
    }

    #[test]
    fn block_macro_with_wrong_close_is_text() {
        let found = tokens("<<code>>\nx\n<</other>>\n");
        assert!(found
            .iter()
            .all(|token| matches!(token, BlockToken::Text { .. })));
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn block_macro_with_trailing_text_is_text() {
        let found = tokens("<<a>>x<</a>> tail\n");
        assert_eq!(
            found,
            vec![BlockToken::Text {
                line: "<<a>>x<</a>> tail",
                followed_by_text: false
            }]
        );
    }

    #[test]
    fn pre_block_keeps_body_verbatim() {
        assert_eq!(
            tokens("{{{\n**not bold**\n ~}}}\n}}}\n"),
            vec![BlockToken::PreBlock {
                text: "**not bold**\n ~}}}"
            }]
        );
    }

    #[test]
    fn spans_tile_the_input() {
        let text = "= h\n\n* a\n|x|y|\n{{{\nq\n}}}\n----\nend";
        let mut expected_start = 0;
        for found in BlockScanner::new(text) {
            assert_eq!(found.span.start, expected_start);
            expected_start = found.span.end;
        }
        assert_eq!(expected_start, text.len());
    }
}
