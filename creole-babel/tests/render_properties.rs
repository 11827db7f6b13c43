//! Property tests: every backend renders whatever the parsers produce

use creole_babel::formats::html::parse_from_html;
use creole_babel::formats::markdown::parse_from_markdown;
use creole_babel::FormatRegistry;
use creole_parser::{parse, ParserOptions};
use proptest::prelude::*;

const INFALLIBLE: [&str; 5] = ["creole", "html", "markdown", "textile", "tree"];

fn markup() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        Just("= ".to_string()),
        Just("* ".to_string()),
        Just("# ".to_string()),
        Just("|".to_string()),
        Just("|=".to_string()),
        Just("**".to_string()),
        Just("//".to_string()),
        Just("[[".to_string()),
        Just("]]".to_string()),
        Just("{{".to_string()),
        Just("}}".to_string()),
        Just("{{{".to_string()),
        Just("}}}".to_string()),
        Just("<<toc>>".to_string()),
        Just("<<html>>".to_string()),
        Just("<</html>>".to_string()),
        Just("http://x.org".to_string()),
        Just("\\\\".to_string()),
        Just(" ".to_string()),
        Just("\n".to_string()),
        "[a-z<>&`_]{1,4}",
    ];
    prop::collection::vec(fragment, 0..40).prop_map(|parts| parts.concat())
}

fn html() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        Just("<p>".to_string()),
        Just("</p>".to_string()),
        Just("<ul><li>".to_string()),
        Just("</li></ul>".to_string()),
        Just("<table><tr><td>".to_string()),
        Just("</td></tr></table>".to_string()),
        Just("<a href=\"http://x.org\">".to_string()),
        Just("</a>".to_string()),
        Just("<span>".to_string()),
        Just("<br>".to_string()),
        Just("<h2>".to_string()),
        Just("</h2>".to_string()),
        Just("<pre>".to_string()),
        Just("</pre>".to_string()),
        "[a-z &;]{1,5}",
    ];
    prop::collection::vec(fragment, 0..30).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn creole_documents_render_everywhere(text in markup()) {
        let registry = FormatRegistry::with_defaults();
        let doc = parse(&text, &ParserOptions::default());
        for format in INFALLIBLE {
            prop_assert!(registry.serialize(&doc, format).is_ok(), "{} failed", format);
        }
        // reST may refuse ambiguous references, but must not panic
        let _ = registry.serialize(&doc, "rest");
    }

    #[test]
    fn html_input_renders_everywhere(text in html()) {
        let registry = FormatRegistry::with_defaults();
        let doc = parse_from_html(&text);
        for format in INFALLIBLE {
            prop_assert!(registry.serialize(&doc, format).is_ok(), "{} failed", format);
        }
    }

    #[test]
    fn markdown_input_renders_as_creole(text in "[-*#>`| a-z\n\\[\\]()]{0,60}") {
        let registry = FormatRegistry::with_defaults();
        let doc = parse_from_markdown(&text);
        prop_assert!(registry.serialize(&doc, "creole").is_ok());
    }

    #[test]
    fn html_text_is_escaped(word in "[a-z&\"]{0,5}[<>][a-z&\"]{1,5}") {
        let registry = FormatRegistry::with_defaults();
        let out = registry.convert(&word, "creole", "html").unwrap();
        let inner = out.trim_start_matches("<p>").trim_end_matches("</p>\n");
        prop_assert!(!inner.contains('<') && !inner.contains('>'), "{}", out);
    }
}
