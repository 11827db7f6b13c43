//! Declarative grammar for wiki markup
//!
//! Every construct is a named regex. All block patterns are merged into one alternation and
//! all inline patterns into another, each wrapped in a named group so the scanner can tell
//! which rule fired. Declaration order is priority order: at a given offset the regex engine
//! takes the first alternative that matches (leftmost-first), so a block macro beats a header
//! at the same line start and a real list line beats a generic text line.
//!
//! Block parse order:
//! 1. macro_block (opening tag only, the closing tag is found afterwards by name)
//! 2. line (run of blank lines)
//! 3. head
//! 4. separator
//! 5. pre_block
//! 6. list (first item line plus every following bullet line)
//! 7. table (one row)
//! 8. text (catch-all, guarantees progress)
//!
//! The `regex` crate has neither look-around nor back-references. Conditions that need them
//! (italics not preceded by `:`, bare URLs only after whitespace, macro close tags naming the
//! opener) are checked by the scanners after a rule fired.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Schemes recognised for bare URL autolinking.
pub const URL_PROTOCOLS: &[&str] = &[
    "http", "https", "ftp", "nntp", "news", "mailto", "telnet", "file", "irc",
];

/// A rule that can be compiled into a [`RuleSet`].
pub trait Rule: Copy + 'static {
    /// Name of the capture group wrapping the rule's pattern.
    fn name(self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockRule {
    MacroBlock,
    Line,
    Head,
    Separator,
    PreBlock,
    List,
    Table,
    Text,
}

impl Rule for BlockRule {
    fn name(self) -> &'static str {
        match self {
            BlockRule::MacroBlock => "macro_block",
            BlockRule::Line => "line",
            BlockRule::Head => "head",
            BlockRule::Separator => "separator",
            BlockRule::PreBlock => "pre_block",
            BlockRule::List => "list",
            BlockRule::Table => "table",
            BlockRule::Text => "text",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineRule {
    Link,
    Url,
    Macro,
    PreInline,
    Image,
    Strong,
    Emphasis,
    Monospace,
    Underline,
    Superscript,
    Subscript,
    Small,
    Delete,
    Escape,
    Linebreak,
    Char,
}

impl Rule for InlineRule {
    fn name(self) -> &'static str {
        match self {
            InlineRule::Link => "link",
            InlineRule::Url => "url",
            InlineRule::Macro => "macro",
            InlineRule::PreInline => "pre_inline",
            InlineRule::Image => "image",
            InlineRule::Strong => "strong",
            InlineRule::Emphasis => "emphasis",
            InlineRule::Monospace => "monospace",
            InlineRule::Underline => "underline",
            InlineRule::Superscript => "superscript",
            InlineRule::Subscript => "subscript",
            InlineRule::Small => "small",
            InlineRule::Delete => "delete",
            InlineRule::Escape => "escape",
            InlineRule::Linebreak => "linebreak",
            InlineRule::Char => "char",
        }
    }
}

const LINK: &str =
    r"\[\[(?P<link_target>[^\n]+?)[ \t]*(?:\|[ \t]*(?P<link_text>[^\n]*?)[ \t]*)?\]\]";
const MACRO_OPEN: &str =
    r"<<[ \t]*(?P<macro_name>\w+)[ \t]*(?P<macro_args>[^\n]*?)[ \t]*(?P<macro_slash>/*)>>";
const PRE_INLINE: &str = r"\{\{\{(?P<pre_inline_text>[^\n]*?)\}\}\}";
const IMAGE: &str =
    r"\{\{(?P<image_target>[^\n]+?)[ \t]*(?:\|[ \t]*(?P<image_text>[^\n]*?)[ \t]*)?\}\}";

/// Block grammar, in priority order. Every pattern consumes through its line's newline.
pub const BLOCK_PATTERNS: &[(BlockRule, &str)] = &[
    // <<name args>> at a line start; the body and <</name>> are located by the scanner
    (
        BlockRule::MacroBlock,
        r"[ \t]*<<(?P<macro_block_name>\w+)[ \t]*(?P<macro_block_args>[^\n]*?)[ \t]*>>",
    ),
    (BlockRule::Line, r"(?:[ \t]*\n)+(?:[ \t]+\z)?|[ \t]+\z"),
    (
        BlockRule::Head,
        r"[ \t]*(?P<head_marks>=+)[ \t]*(?P<head_text>[^\n]*?)[ \t=]*(?:\n|\z)",
    ),
    (BlockRule::Separator, r"[ \t]*----[ \t]*(?:\n|\z)"),
    (
        BlockRule::PreBlock,
        r"\{\{\{[ \t]*\n(?:(?P<pre_block_text>(?s:.*?))\n)?\}\}\}[ \t]*(?:\n|\z)",
    ),
    (
        BlockRule::List,
        r"[ \t]*(?:\*[^*#\n]|#[^#*\n])[^\n]*(?:\n[ \t]*[*#]+[^\n]*)*(?:\n|\z)",
    ),
    (BlockRule::Table, r"[ \t]*\|[^\n]*(?:\n|\z)"),
    (BlockRule::Text, r"(?P<text_line>[^\n]+)(?:\n|\z)"),
];

/// Inline grammar, in priority order. `char` matches anything, so the scan always advances.
pub const INLINE_PATTERNS: &[(InlineRule, &str)] = &[
    (InlineRule::Link, LINK),
    (
        InlineRule::Url,
        r"(?P<url_escape>~)?(?P<url_target>(?:https?|ftp|nntp|news|mailto|telnet|file|irc)://\S+)",
    ),
    (InlineRule::Macro, MACRO_OPEN),
    (InlineRule::PreInline, PRE_INLINE),
    (InlineRule::Image, IMAGE),
    (InlineRule::Strong, r"\*\*"),
    (InlineRule::Emphasis, r"//"),
    (InlineRule::Monospace, r"\#\#"),
    (InlineRule::Underline, r"__"),
    (InlineRule::Superscript, r"\^\^"),
    (InlineRule::Subscript, r",,"),
    (InlineRule::Small, r"--"),
    (InlineRule::Delete, r"~~"),
    (InlineRule::Escape, r"~(?P<escaped_char>\S)"),
    (InlineRule::Linebreak, r"\\\\"),
    (InlineRule::Char, r"(?s:.)"),
];

/// Link labels only allow images, forced breaks and literal characters.
pub const LINK_LABEL_PATTERNS: &[(InlineRule, &str)] = &[
    (InlineRule::Image, IMAGE),
    (InlineRule::Linebreak, r"\\\\"),
    (InlineRule::Char, r"(?s:.)"),
];

/// An ordered set of named patterns compiled into one alternation.
#[derive(Debug)]
pub struct RuleSet<R: Rule> {
    regex: Regex,
    rules: &'static [(R, &'static str)],
}

impl<R: Rule> RuleSet<R> {
    pub fn new(rules: &'static [(R, &'static str)]) -> Self {
        let pattern = rules
            .iter()
            .map(|(rule, pattern)| format!("(?P<{}>{})", rule.name(), pattern))
            .collect::<Vec<_>>()
            .join("|");
        let regex = Regex::new(&pattern).expect("grammar patterns compile");
        Self { regex, rules }
    }

    /// Find the highest priority rule matching exactly at `pos`.
    pub fn match_at<'t>(&self, text: &'t str, pos: usize) -> Option<(R, Captures<'t>)> {
        let captures = self.regex.captures_at(text, pos)?;
        let whole = captures.get(0)?;
        if whole.start() != pos {
            return None;
        }
        let rule = self
            .rules
            .iter()
            .map(|(rule, _)| *rule)
            .find(|rule| captures.name(rule.name()).is_some())?;
        Some((rule, captures))
    }
}

pub static BLOCK_RULES: Lazy<RuleSet<BlockRule>> = Lazy::new(|| RuleSet::new(BLOCK_PATTERNS));

pub static INLINE_RULES: Lazy<RuleSet<InlineRule>> = Lazy::new(|| RuleSet::new(INLINE_PATTERNS));

pub static LINK_LABEL_RULES: Lazy<RuleSet<InlineRule>> =
    Lazy::new(|| RuleSet::new(LINK_LABEL_PATTERNS));

/// Splits a list block into its item lines.
pub static LIST_ITEM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?P<bullets>[*#]+)[ \t]*(?P<text>[^\n]*?)[ \t]*$")
        .expect("list item pattern compiles")
});

/// Splits a table row into cells. Links, macros, images and pre spans are atomic, so a `|`
/// inside them does not end the cell.
pub static TABLE_CELL_REGEX: Lazy<Regex> = Lazy::new(|| {
    let atomic = [
        r"\[\[[^\n]+?\]\]",
        r"<<[^\n]*?>>",
        r"\{\{\{[^\n]*?\}\}\}",
        r"\{\{[^\n]+?\}\}",
    ]
    .join("|");
    let pattern = format!(
        r"\|[ \t]*(?:(?P<head>=[^|]+)|(?P<cell>(?:{}|[^|])+))[ \t]*",
        atomic
    );
    Regex::new(&pattern).expect("table cell pattern compiles")
});

/// A pre block content line that escapes the closing fence: `~}}}`.
pub static PRE_ESCAPE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(?P<indent>[ \t]*)~(?P<rest>\}\}\}[ \t]*)$").expect("pre escape compiles")
});

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn block_rule(text: &str) -> BlockRule {
        BLOCK_RULES.match_at(text, 0).expect("some rule matches").0
    }

    fn inline_rule(text: &str) -> InlineRule {
        INLINE_RULES.match_at(text, 0).expect("some rule matches").0
    }

    #[rstest]
    #[case("<<code>>\nx\n<</code>>\n", BlockRule::MacroBlock)]
    #[case("\n", BlockRule::Line)]
    #[case("  \t\n\n", BlockRule::Line)]
    #[case("== Title ==\n", BlockRule::Head)]
    #[case("----\n", BlockRule::Separator)]
    #[case("-----\n", BlockRule::Text)]
    #[case("{{{\ncode\n}}}\n", BlockRule::PreBlock)]
    #[case("* item\n", BlockRule::List)]
    #[case("# item\n", BlockRule::List)]
    #[case("**bold** text\n", BlockRule::Text)]
    #[case("|a|b|\n", BlockRule::Table)]
    #[case("plain words\n", BlockRule::Text)]
    fn block_priority(#[case] text: &str, #[case] expected: BlockRule) {
        assert_eq!(block_rule(text), expected);
    }

    #[rstest]
    #[case("[[target|label]]", InlineRule::Link)]
    #[case("http://example.com", InlineRule::Url)]
    #[case("<<toc>>", InlineRule::Macro)]
    #[case("{{{x}}}", InlineRule::PreInline)]
    #[case("{{pic.png|alt}}", InlineRule::Image)]
    #[case("**", InlineRule::Strong)]
    #[case("//", InlineRule::Emphasis)]
    #[case("##", InlineRule::Monospace)]
    #[case("__", InlineRule::Underline)]
    #[case("^^", InlineRule::Superscript)]
    #[case(",,", InlineRule::Subscript)]
    #[case("--", InlineRule::Small)]
    #[case("~~", InlineRule::Delete)]
    #[case("~*", InlineRule::Escape)]
    #[case("\\\\", InlineRule::Linebreak)]
    #[case("x", InlineRule::Char)]
    fn inline_priority(#[case] text: &str, #[case] expected: InlineRule) {
        assert_eq!(inline_rule(text), expected);
    }

    #[test]
    fn header_text_excludes_trailing_equals() {
        let (_, caps) = BLOCK_RULES.match_at("= Section Title =\n", 0).unwrap();
        assert_eq!(&caps["head_marks"], "=");
        assert_eq!(&caps["head_text"], "Section Title");
    }

    #[test]
    fn match_is_anchored_at_position() {
        let text = "ab**";
        let (rule, caps) = INLINE_RULES.match_at(text, 1).unwrap();
        assert_eq!(rule, InlineRule::Char);
        assert_eq!(caps.get(0).unwrap().as_str(), "b");
    }

    #[test]
    fn cell_regex_keeps_links_atomic() {
        let row = "|[[a|b]]|=head|x";
        let cells: Vec<_> = TABLE_CELL_REGEX
            .captures_iter(row)
            .map(|c| c.get(0).unwrap().as_str().to_string())
            .collect();
        assert_eq!(cells, vec!["|[[a|b]]", "|=head", "|x"]);
    }

    #[test]
    fn link_label_rules_skip_typefaces() {
        let (rule, _) = LINK_LABEL_RULES.match_at("**x", 0).unwrap();
        assert_eq!(rule, InlineRule::Char);
    }

    #[test]
    fn protocol_list_matches_url_pattern() {
        for proto in URL_PROTOCOLS {
            let text = format!("{}://host", proto);
            assert_eq!(inline_rule(&text), InlineRule::Url, "{}", proto);
        }
    }
}
