//! Macro dispatch seen through the renderers

use creole_babel::formats::html::serialize_to_html;
use creole_babel::formats::markdown::serialize_to_markdown;
use creole_babel::macros::{MacroCall, MacroError, MacroResult};
use creole_babel::ConversionOptions;
use creole_parser::{parse, ParserOptions};
use pretty_assertions::assert_eq;

fn options() -> ConversionOptions {
    let mut options = ConversionOptions::default();
    options.macros.register("shout", |call: &MacroCall<'_>| -> MacroResult {
        Ok(call.body.unwrap_or("").to_uppercase().into())
    });
    options.macros.register("boom", |_: &MacroCall<'_>| -> MacroResult {
        panic!("kaboom")
    });
    options.macros.register("refuse", |call: &MacroCall<'_>| -> MacroResult {
        Err(MacroError::InvalidArgument {
            name: "n".into(),
            value: call.args.get("n").unwrap_or("").into(),
        })
    });
    options
}

fn html(markup: &str) -> String {
    let doc = parse(markup, &ParserOptions::default());
    serialize_to_html(&doc, &options()).unwrap()
}

#[test]
fn registered_macro_runs_inline() {
    assert_eq!(html("say <<shout>>hi<</shout>>!"), "<p>say HI!</p>\n");
}

#[test]
fn registered_macro_runs_as_block() {
    assert_eq!(html("<<shout>>\nhi\n<</shout>>"), "HI\n");
}

#[test]
fn panicking_macro_is_contained() {
    assert_eq!(
        html("a <<boom>> b\n\n= after"),
        "<p>a [Error: Macro 'boom' error: kaboom] b</p>\n\n<h1>after</h1>\n"
    );
}

#[test]
fn failing_macro_message() {
    assert_eq!(
        html("<<refuse n=3>>"),
        "[Error: Macro 'refuse' error: invalid value '3' for argument 'n']\n"
    );
}

#[test]
fn unknown_macro_marker() {
    assert_eq!(
        html("x <<nothing>>"),
        "<p>x [Error: Macro 'nothing' doesn't exist]</p>\n"
    );
}

#[test]
fn malformed_arguments_marker() {
    assert_eq!(
        html("x <<shout a=\"unterminated>>"),
        "<p>x [Error: Wrong macro arguments: \"a=\"unterminated\" for macro 'shout' (maybe wrong macro tag syntax?)]</p>\n"
    );
}

#[test]
fn pre_builtin_escapes_body() {
    assert_eq!(
        html("<<pre>>\na < b\n<</pre>>"),
        "<pre>a &lt; b</pre>\n"
    );
}

#[test]
fn markdown_embeds_macro_output() {
    let doc = parse("say <<shout>>hi<</shout>>", &ParserOptions::default());
    assert_eq!(serialize_to_markdown(&doc, &options()).unwrap(), "say HI\n");
}
