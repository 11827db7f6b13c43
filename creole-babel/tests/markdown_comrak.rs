//! Markdown output read back through comrak

use creole_babel::formats::creole::serialize_to_creole;
use creole_babel::formats::markdown::{parse_from_markdown, serialize_to_markdown};
use creole_babel::{ConversionOptions, FormatRegistry};
use creole_parser::creole::testing::assert_doc;
use creole_parser::{parse, NodeKind, ParserOptions};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn to_markdown(creole: &str) -> String {
    let doc = parse(creole, &ParserOptions::default());
    serialize_to_markdown(&doc, &ConversionOptions::default()).unwrap()
}

#[rstest]
#[case::headers_and_lists("= One\n\n* a\n** b\n* c")]
#[case::numbered("# x\n## y\n# z")]
#[case::typefaces("**a** //b// ~~d~~")]
#[case::links("[[http://x.org|X]] and [[Page|a page]]")]
#[case::bare_url("see http://y.org now")]
#[case::image("{{logo.png|Logo}}")]
#[case::code_block("{{{\n#!rust\nfn main() {}\n}}}")]
#[case::separator("a\n\n----\n\nb")]
fn creole_survives_a_markdown_round_trip(#[case] creole: &str) {
    let markdown = to_markdown(creole);
    let doc = parse_from_markdown(&markdown);
    let back = serialize_to_creole(&doc, &ConversionOptions::default()).unwrap();
    assert_eq!(back, creole, "via markdown:\n{markdown}");
}

#[test]
fn pipe_table_reads_back_as_table() {
    let doc = parse_from_markdown(&to_markdown("|= h |= head |\n| a | b |"));
    assert_doc(&doc).only_child(|table| {
        table.kind(NodeKind::Table).child_count(2);
        table.child(0, |row| {
            row.child_kinds(&[NodeKind::TableHead, NodeKind::TableHead]);
            row.child(1, |cell| {
                cell.text("head");
            });
        });
        table.child(1, |row| {
            row.child_kinds(&[NodeKind::TableCell, NodeKind::TableCell]);
            row.child(0, |cell| {
                cell.text("a");
            });
        });
    });
}

#[test]
fn escaped_text_stays_text() {
    let markdown = to_markdown("a_b [c] *d*");
    let doc = parse_from_markdown(&markdown);
    assert_doc(&doc).only_child(|para| {
        para.kind(NodeKind::Paragraph)
            .child_kinds(&[NodeKind::Text])
            .text("a_b [c] *d*");
    });
}

#[test]
fn hard_breaks_read_back_as_breaks() {
    let doc = parse_from_markdown(&to_markdown("one\ntwo"));
    assert_doc(&doc).only_child(|para| {
        para.child_kinds(&[NodeKind::Text, NodeKind::Break, NodeKind::Text]);
    });
}

#[test]
fn markdown_converts_to_creole() {
    let registry = FormatRegistry::with_defaults();
    let out = registry
        .convert(
            "# Title\n\nSome *text* with `code`.\n\n1. one\n2. two\n",
            "markdown",
            "creole",
        )
        .unwrap();
    assert_eq!(out, "= Title\n\nSome //text// with {{{code}}}.\n\n# one\n# two");
}

#[test]
fn raw_html_becomes_html_macro() {
    let registry = FormatRegistry::with_defaults();
    let out = registry
        .convert("<div>x</div>\n\ntext <b>y</b>\n", "markdown", "creole")
        .unwrap();
    assert_eq!(
        out,
        "<<html>>\n<div>x</div>\n<</html>>\n\ntext <<html>><b><</html>>y<<html>></b><</html>>"
    );
}
