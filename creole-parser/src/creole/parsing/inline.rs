//! Inline scanner
//!
//!     Applied to the text of a block and re-applied to sub-texts: list item text, table
//!     cell text and link labels. Link labels use a restricted rule set (images, forced
//!     breaks and characters) so links never nest.
//!
//!     The scanner resolves context conditions the regex engine cannot express and turns a
//!     rejected match into exactly what the next rule would have consumed:
//!
//!         - `//` right after `:` is a literal `/`, so unknown `scheme://` stays text
//!         - a bare URL must start the text or follow whitespace
//!         - `<<name>>body<</name>>` needs a close tag naming the opener, otherwise the
//!           opener is a self-closing tag

use log::trace;

use crate::creole::ast::{DocNode, NodeKind};

use super::builder::TreeBuilder;
use super::rules::{InlineRule, RuleSet, INLINE_RULES, LINK_LABEL_RULES};

const URL_TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', '\'', '"'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineToken<'t> {
    /// Literal characters: plain chars, escapes, escaped URLs, rejected delimiters.
    Text(&'t str),
    Link {
        target: &'t str,
        label: &'t str,
    },
    Url(&'t str),
    Macro {
        name: &'t str,
        args: &'t str,
        body: Option<&'t str>,
    },
    PreInline(&'t str),
    Image {
        target: &'t str,
        text: Option<&'t str>,
    },
    Typeface {
        kind: NodeKind,
        delimiter: &'t str,
    },
    LineBreak,
}

pub struct InlineScanner<'t> {
    text: &'t str,
    pos: usize,
    rules: &'static RuleSet<InlineRule>,
}

impl<'t> InlineScanner<'t> {
    pub fn new(text: &'t str) -> Self {
        Self::with_rules(text, &INLINE_RULES)
    }

    pub fn link_label(text: &'t str) -> Self {
        Self::with_rules(text, &LINK_LABEL_RULES)
    }

    fn with_rules(text: &'t str, rules: &'static RuleSet<InlineRule>) -> Self {
        Self { text, pos: 0, rules }
    }

    fn previous_char(&self, pos: usize) -> Option<char> {
        self.text[..pos].chars().next_back()
    }

    /// One character, or an escape pair when the text starts with `~` and a non-space.
    fn literal_at(&self, pos: usize) -> (InlineToken<'t>, usize) {
        let rest = &self.text[pos..];
        let mut chars = rest.char_indices();
        let first_len = chars.next().map_or(0, |(_, c)| c.len_utf8());
        if rest.starts_with('~') {
            if let Some((offset, c)) = chars.next().filter(|(_, c)| !c.is_whitespace()) {
                let end = pos + offset + c.len_utf8();
                return (InlineToken::Text(&self.text[pos + offset..end]), end);
            }
        }
        let end = pos + first_len;
        (InlineToken::Text(&self.text[pos..end]), end)
    }

    fn scan_at(&self, pos: usize) -> (InlineToken<'t>, usize) {
        let text = self.text;
        let Some((rule, caps)) = self.rules.match_at(text, pos) else {
            return self.literal_at(pos);
        };
        let end = caps.get(0).map_or(pos, |m| m.end());
        let group = |name: &str| caps.name(name).map(|m| m.as_str());

        let token = match rule {
            InlineRule::Link => InlineToken::Link {
                target: group("link_target").unwrap_or(""),
                label: group("link_text").unwrap_or(""),
            },
            InlineRule::Url => {
                let at_boundary = self
                    .previous_char(pos)
                    .map_or(true, |c| c.is_whitespace());
                let target = group("url_target").unwrap_or("");
                let trimmed = target.trim_end_matches(URL_TRAILING_PUNCTUATION);
                if !at_boundary || trimmed.ends_with("://") {
                    return self.literal_at(pos);
                }
                let end = end - (target.len() - trimmed.len());
                let token = if group("url_escape").is_some() {
                    InlineToken::Text(trimmed)
                } else {
                    InlineToken::Url(trimmed)
                };
                return (token, end);
            }
            InlineRule::Macro => {
                let name = group("macro_name").unwrap_or("");
                let args = group("macro_args").unwrap_or("");
                let self_closing = group("macro_slash").is_some_and(|s| !s.is_empty());
                if !self_closing {
                    let close = format!("<</{}>>", name);
                    if let Some(offset) = text[end..].find(&close) {
                        let body = &text[end..end + offset];
                        return (
                            InlineToken::Macro {
                                name,
                                args,
                                body: Some(body),
                            },
                            end + offset + close.len(),
                        );
                    }
                }
                InlineToken::Macro {
                    name,
                    args,
                    body: None,
                }
            }
            InlineRule::PreInline => InlineToken::PreInline(group("pre_inline_text").unwrap_or("")),
            InlineRule::Image => InlineToken::Image {
                target: group("image_target").unwrap_or(""),
                text: group("image_text").filter(|t| !t.is_empty()),
            },
            InlineRule::Emphasis if self.previous_char(pos) == Some(':') => {
                return (InlineToken::Text(&text[pos..pos + 1]), pos + 1);
            }
            InlineRule::Strong
            | InlineRule::Emphasis
            | InlineRule::Monospace
            | InlineRule::Underline
            | InlineRule::Superscript
            | InlineRule::Subscript
            | InlineRule::Small
            | InlineRule::Delete => InlineToken::Typeface {
                kind: typeface_kind(rule),
                delimiter: &text[pos..end],
            },
            InlineRule::Escape => InlineToken::Text(group("escaped_char").unwrap_or("")),
            InlineRule::Linebreak => InlineToken::LineBreak,
            InlineRule::Char => InlineToken::Text(&text[pos..end]),
        };
        (token, end)
    }
}

impl<'t> Iterator for InlineScanner<'t> {
    type Item = InlineToken<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.text.len() {
            return None;
        }
        let (mut token, mut end) = self.scan_at(self.pos);
        if end <= self.pos {
            (token, end) = self.literal_at(self.pos);
        }
        self.pos = end;
        Some(token)
    }
}

fn typeface_kind(rule: InlineRule) -> NodeKind {
    match rule {
        InlineRule::Strong => NodeKind::Strong,
        InlineRule::Emphasis => NodeKind::Emphasis,
        InlineRule::Monospace => NodeKind::Monospace,
        InlineRule::Underline => NodeKind::Underline,
        InlineRule::Superscript => NodeKind::Superscript,
        InlineRule::Subscript => NodeKind::Subscript,
        InlineRule::Small => NodeKind::Small,
        _ => NodeKind::Delete,
    }
}

/// Scan `text` at the builder's cursor.
pub fn parse_inline(builder: &mut TreeBuilder, text: &str) {
    apply(builder, InlineScanner::new(text));
}

fn apply(builder: &mut TreeBuilder, tokens: InlineScanner<'_>) {
    for token in tokens {
        trace!("inline {:?}", token);
        match token {
            InlineToken::Text(text) => builder.push_text(text),
            InlineToken::Link { target, label } => {
                let parent = builder.cursor();
                builder.open(DocNode::new(NodeKind::Link).with_content(target.trim()));
                apply(builder, InlineScanner::link_label(label));
                builder.move_to(parent);
            }
            InlineToken::Url(target) => {
                let parent = builder.cursor();
                builder.open(DocNode::new(NodeKind::Link).with_content(target));
                builder.add(DocNode::text(target));
                builder.move_to(parent);
            }
            InlineToken::Macro { name, args, body } => {
                builder.register_macro(name);
                let mut node = DocNode::new(NodeKind::MacroInline).with_macro(name, args.trim());
                node.content = body.map(str::to_string);
                builder.add(node);
            }
            InlineToken::PreInline(text) => {
                builder.add(DocNode::new(NodeKind::PreInline).with_content(text));
            }
            InlineToken::Image { target, text } => {
                let parent = builder.cursor();
                builder.open(DocNode::new(NodeKind::Image).with_content(target.trim()));
                builder.add(DocNode::text(text.unwrap_or(target).trim()));
                builder.move_to(parent);
            }
            InlineToken::Typeface { kind, delimiter } => builder.toggle_typeface(kind, delimiter),
            InlineToken::LineBreak => {
                builder.add(DocNode::new(NodeKind::Break));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<InlineToken<'_>> {
        InlineScanner::new(text).collect()
    }

    fn joined_text(text: &str) -> String {
        tokens(text)
            .into_iter()
            .map(|token| match token {
                InlineToken::Text(t) => t.to_string(),
                other => format!("<{:?}>", other),
            })
            .collect()
    }

    #[test]
    fn link_with_label() {
        assert_eq!(
            tokens("[[Home|go home]]"),
            vec![InlineToken::Link {
                target: "Home",
                label: "go home"
            }]
        );
    }

    #[test]
    fn url_requires_whitespace_before() {
        assert_eq!(
            tokens("see http://a.org."),
            vec![
                InlineToken::Text("s"),
                InlineToken::Text("e"),
                InlineToken::Text("e"),
                InlineToken::Text(" "),
                InlineToken::Url("http://a.org"),
                InlineToken::Text("."),
            ]
        );
        assert_eq!(joined_text("xhttp://a"), "xhttp://a");
    }

    #[test]
    fn escaped_url_is_text() {
        assert_eq!(tokens("~http://a.org"), vec![InlineToken::Text("http://a.org")]);
    }

    #[test]
    fn emphasis_after_colon_is_literal() {
        assert_eq!(joined_text("foo://bar"), "foo://bar");
    }

    #[test]
    fn escape_neutralizes_next_char() {
        assert_eq!(joined_text("~**a"), "**a");
        assert_eq!(tokens("~["), vec![InlineToken::Text("[")]);
    }

    #[test]
    fn paired_macro_has_body() {
        assert_eq!(
            tokens("<<code x=1>>a<b<</code>>"),
            vec![InlineToken::Macro {
                name: "code",
                args: "x=1",
                body: Some("a<b")
            }]
        );
    }

    #[test]
    fn macro_without_close_is_a_tag() {
        assert_eq!(
            tokens("<<toc depth=2 />>"),
            vec![InlineToken::Macro {
                name: "toc",
                args: "depth=2",
                body: None
            }]
        );
        assert_eq!(
            tokens("<<toc>>"),
            vec![InlineToken::Macro {
                name: "toc",
                args: "",
                body: None
            }]
        );
    }

    #[test]
    fn image_caption_is_optional() {
        assert_eq!(
            tokens("{{a.png}}"),
            vec![InlineToken::Image {
                target: "a.png",
                text: None
            }]
        );
    }

    #[test]
    fn link_label_scanner_keeps_delimiters_literal() {
        let found: Vec<_> = InlineScanner::link_label("**x**").collect();
        assert!(found.iter().all(|t| matches!(t, InlineToken::Text(_))));
    }

    #[test]
    fn multibyte_characters_advance_whole() {
        assert_eq!(joined_text("héllo ~ü"), "héllo ü");
    }
}
