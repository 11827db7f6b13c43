use creole_parser::creole::testing::assert_doc;
use creole_parser::{parse, NodeKind, ParserOptions};
use rstest::rstest;

fn paragraph_kinds(text: &str) -> Vec<NodeKind> {
    let doc = parse(text, &ParserOptions::default());
    let para = doc.root().child(0).expect("a paragraph");
    assert_eq!(para.kind(), NodeKind::Paragraph);
    para.children().map(|c| c.kind()).collect()
}

#[test]
fn strong_wraps_text() {
    let doc = parse("**bold**", &ParserOptions::default());
    assert_doc(&doc).only_child(|para| {
        para.kind(NodeKind::Paragraph).only_child(|strong| {
            strong
                .kind(NodeKind::Strong)
                .only_child(|text| {
                    text.kind(NodeKind::Text).content("bold");
                });
        });
    });
}

#[test]
fn unmatched_strong_stays_open_until_block_end() {
    let doc = parse("a **b c\n\nnext", &ParserOptions::default());
    assert_doc(&doc)
        .child_kinds(&[NodeKind::Paragraph, NodeKind::Line, NodeKind::Paragraph])
        .child(0, |para| {
            para.child_kinds(&[NodeKind::Text, NodeKind::Strong])
                .child(1, |strong| {
                    strong.text("b c");
                });
        })
        .child(2, |para| {
            para.child_kinds(&[NodeKind::Text]);
        });
}

#[test]
fn different_typefaces_nest() {
    let doc = parse("//a **b** c//", &ParserOptions::default());
    assert_doc(&doc).only_child(|para| {
        para.only_child(|em| {
            em.kind(NodeKind::Emphasis)
                .child_kinds(&[NodeKind::Text, NodeKind::Strong, NodeKind::Text])
                .text("a b c");
        });
    });
}

#[test]
fn closing_outer_span_closes_inner_ones() {
    let doc = parse("//a **b// c", &ParserOptions::default());
    assert_doc(&doc).only_child(|para| {
        para.child_kinds(&[NodeKind::Emphasis, NodeKind::Text])
            .child(1, |text| {
                text.content(" c");
            });
    });
}

#[rstest]
#[case("##code##", NodeKind::Monospace)]
#[case("__under__", NodeKind::Underline)]
#[case("^^sup^^", NodeKind::Superscript)]
#[case(",,sub,,", NodeKind::Subscript)]
#[case("--small--", NodeKind::Small)]
#[case("~~gone~~", NodeKind::Delete)]
fn typeface_delimiters(#[case] text: &str, #[case] kind: NodeKind) {
    assert_eq!(paragraph_kinds(text), vec![kind]);
}

#[test]
fn link_label_is_rescanned_without_typefaces() {
    let doc = parse("[[Target|**label** {{i.png|pic}}]]", &ParserOptions::default());
    assert_doc(&doc).only_child(|para| {
        para.only_child(|link| {
            link.kind(NodeKind::Link)
                .content("Target")
                .child_kinds(&[NodeKind::Text, NodeKind::Image])
                .child(0, |text| {
                    text.content("**label** ");
                })
                .child(1, |image| {
                    image.content("i.png").text("pic");
                });
        });
    });
}

#[test]
fn link_without_label_has_no_children() {
    let doc = parse("[[Target]]", &ParserOptions::default());
    assert_doc(&doc).only_child(|para| {
        para.only_child(|link| {
            link.content("Target").child_count(0);
        });
    });
}

#[test]
fn image_text_defaults_to_target() {
    let doc = parse("{{photo.jpg}}", &ParserOptions::default());
    assert_doc(&doc).only_child(|para| {
        para.only_child(|image| {
            image.kind(NodeKind::Image).content("photo.jpg").text("photo.jpg");
        });
    });
}

#[test]
fn bare_url_becomes_link() {
    let doc = parse("see http://x.org.", &ParserOptions::default());
    assert_doc(&doc).only_child(|para| {
        para.child_kinds(&[NodeKind::Text, NodeKind::Link, NodeKind::Text])
            .child(1, |link| {
                link.content("http://x.org").text("http://x.org");
            })
            .child(2, |text| {
                text.content(".");
            });
    });
}

#[test]
fn escaped_url_and_unknown_scheme_stay_text() {
    assert_eq!(paragraph_kinds("~http://x.org"), vec![NodeKind::Text]);
    assert_eq!(paragraph_kinds("foo://bar//baz"), vec![NodeKind::Text, NodeKind::Emphasis]);
}

#[test]
fn escape_hides_list_marker() {
    let doc = parse("~* not a list", &ParserOptions::default());
    assert_doc(&doc).only_child(|para| {
        para.kind(NodeKind::Paragraph).text("* not a list");
    });
}

#[test]
fn inline_macros_in_both_forms() {
    let doc = parse(
        "a <<span class=x>>body<</span>> b <<toc />>",
        &ParserOptions::default(),
    );
    assert_doc(&doc).only_child(|para| {
        para.child_kinds(&[
            NodeKind::Text,
            NodeKind::MacroInline,
            NodeKind::Text,
            NodeKind::MacroInline,
        ])
        .child(1, |mac| {
            mac.macro_name("span").macro_args("class=x").content("body");
        })
        .child(3, |mac| {
            mac.macro_name("toc").no_content();
        });
    });
    assert!(doc.uses_macro("span"));
    assert!(doc.uses_macro("toc"));
}

#[test]
fn forced_line_break() {
    assert_eq!(
        paragraph_kinds("a\\\\b"),
        vec![NodeKind::Text, NodeKind::Break, NodeKind::Text]
    );
}

#[test]
fn pre_inline_is_verbatim() {
    let doc = parse("x {{{**y**}}}", &ParserOptions::default());
    assert_doc(&doc).only_child(|para| {
        para.child(1, |pre| {
            pre.kind(NodeKind::PreInline).content("**y**");
        });
    });
}
