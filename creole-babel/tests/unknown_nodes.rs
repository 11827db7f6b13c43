//! Unknown-node strategies applied to HTML elements with no wiki counterpart

use creole_babel::formats::creole::serialize_to_creole;
use creole_babel::formats::html::{parse_from_html, serialize_to_html};
use creole_babel::formats::markdown::serialize_to_markdown;
use creole_babel::formats::textile::serialize_to_textile;
use creole_babel::{ConversionOptions, EmitError, FormatError, FormatRegistry, UnknownStrategy};
use pretty_assertions::assert_eq;

const SPAN: &str = "<p>hi <span class=\"k\">there</span></p>";
const DIV: &str = "<div><p>one</p><p>two</p></div>";

fn with(strategy: UnknownStrategy) -> ConversionOptions {
    ConversionOptions {
        unknown_nodes: strategy,
        ..ConversionOptions::default()
    }
}

#[test]
fn transparent_keeps_children_only() {
    let doc = parse_from_html(SPAN);
    let options = with(UnknownStrategy::Transparent);
    assert_eq!(serialize_to_creole(&doc, &options).unwrap(), "hi there");

    let doc = parse_from_html(DIV);
    assert_eq!(serialize_to_creole(&doc, &options).unwrap(), "one\n\ntwo");
}

#[test]
fn escape_quotes_the_tags() {
    let doc = parse_from_html(SPAN);
    let options = with(UnknownStrategy::Escape);
    assert_eq!(
        serialize_to_creole(&doc, &options).unwrap(),
        "hi <span class=\"k\">there</span>"
    );
    assert_eq!(
        serialize_to_markdown(&doc, &options).unwrap(),
        "hi &lt;span class=\"k\"&gt;there&lt;/span&gt;\n"
    );
    assert_eq!(
        serialize_to_textile(&doc, &options).unwrap(),
        "hi ==<span class=\"k\">==there==</span>==\n"
    );
}

#[test]
fn rewrap_uses_each_format_pass_through() {
    let doc = parse_from_html(SPAN);
    let options = with(UnknownStrategy::Rewrap);
    assert_eq!(
        serialize_to_creole(&doc, &options).unwrap(),
        "hi <<html>><span class=\"k\">there</span><</html>>"
    );
    assert_eq!(
        serialize_to_textile(&doc, &options).unwrap(),
        "hi <notextile><span class=\"k\">there</span></notextile>\n"
    );
    assert_eq!(
        serialize_to_html(&doc, &options).unwrap(),
        "<p>hi <span class=\"k\">there</span></p>\n"
    );
}

#[test]
fn raise_names_the_element() {
    let doc = parse_from_html(DIV);
    let err = serialize_to_creole(&doc, &with(UnknownStrategy::Raise)).unwrap_err();
    assert_eq!(
        err,
        EmitError::UnknownNode {
            kind: "unknown".into(),
            tag: Some("div".into()),
        }
    );
}

#[test]
fn raise_surfaces_through_the_registry() {
    let registry = FormatRegistry::with_options(&with(UnknownStrategy::Raise));
    let err = registry.convert(DIV, "html", "creole").unwrap_err();
    assert!(matches!(err, FormatError::Emit(EmitError::UnknownNode { .. })));
    assert_eq!(err.to_string(), "Unknown node 'unknown' <div>");
}
