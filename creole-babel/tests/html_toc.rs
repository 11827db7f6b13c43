//! Table of contents in HTML output

use creole_babel::formats::html::serialize_to_html;
use creole_babel::ConversionOptions;
use creole_parser::{parse, ParserOptions};
use pretty_assertions::assert_eq;

fn html_with(markup: &str, options: &ConversionOptions) -> String {
    let doc = parse(markup, &options.parser);
    serialize_to_html(&doc, options).unwrap()
}

fn html(markup: &str) -> String {
    html_with(markup, &ConversionOptions::default())
}

#[test]
fn nested_list_follows_header_levels() {
    let out = html("<<toc>>\n\n= A\n\n== B\n\n= C");
    assert_eq!(
        out,
        "<ul>\n\
         \t<li><a href=\"#a\">A</a></li>\n\
         \t<ul>\n\
         \t\t<li><a href=\"#b\">B</a></li>\n\
         \t</ul>\n\
         \t<li><a href=\"#c\">C</a></li>\n\
         </ul>\n\
         \n\
         <h1 id=\"a\">A</h1>\n\
         \n\
         <h2 id=\"b\">B</h2>\n\
         \n\
         <h1 id=\"c\">C</h1>\n"
    );
}

#[test]
fn headers_before_the_toc_are_listed_too() {
    let out = html("= Intro\n\n<<toc>>");
    assert!(out.starts_with("<h1 id=\"intro\">Intro</h1>\n"));
    assert!(out.contains("<li><a href=\"#intro\">Intro</a></li>"));
}

#[test]
fn depth_limits_levels() {
    let out = html("<<toc depth=1>>\n\n= A\n\n== B");
    assert!(out.contains("<li><a href=\"#a\">A</a></li>"));
    assert!(!out.contains("href=\"#b\""));
    assert!(out.contains("<h2 id=\"b\">B</h2>"));
}

#[test]
fn bad_depth_renders_argument_marker() {
    let out = html("<<toc depth=deep>>\n\n= A");
    assert!(out.starts_with(
        "[Error: Wrong macro arguments: \"depth=deep\" for macro 'toc' (maybe wrong macro tag syntax?)]"
    ));
}

#[test]
fn only_first_toc_is_expanded() {
    let out = html("<<toc>>\n\n= A\n\n<<toc>>");
    assert_eq!(out.matches("<ul>").count(), 1);
    assert!(out.contains("&lt;&lt;toc&gt;&gt;"));
    assert!(!out.contains("<!-- creole:toc -->"));
}

#[test]
fn repeated_toc_can_be_dropped() {
    let options = ConversionOptions {
        escape_repeated_toc: false,
        ..ConversionOptions::default()
    };
    let out = html_with("<<toc>>\n\n= A\n\n<<toc>>", &options);
    assert!(!out.contains("toc"));
}

#[test]
fn duplicate_titles_get_unique_anchors() {
    let out = html("<<toc>>\n\n= Same\n\n= Same");
    assert!(out.contains("<h1 id=\"same\">Same</h1>"));
    assert!(out.contains("<h1 id=\"same-2\">Same</h1>"));
}

#[test]
fn no_ids_without_toc() {
    assert_eq!(html("= A"), "<h1>A</h1>\n");
}
