//! Macros every registry built with [`MacroRegistry::with_builtins`] knows

use super::registry::{Macro, MacroCall, MacroRegistry, MacroResult};

pub fn register(registry: &mut MacroRegistry) {
    registry.register("html", Html);
    registry.register("pre", Pre);
}

/// Passes its body through as raw HTML.
pub struct Html;

impl Macro for Html {
    fn params(&self) -> Option<&[&'static str]> {
        Some(&[])
    }

    fn call(&self, call: &MacroCall<'_>) -> MacroResult {
        Ok(call.body.unwrap_or("").into())
    }
}

/// Escaped body in a `<pre>` block.
pub struct Pre;

impl Macro for Pre {
    fn params(&self) -> Option<&[&'static str]> {
        Some(&[])
    }

    fn call(&self, call: &MacroCall<'_>) -> MacroResult {
        let body = html_escape::encode_text(call.body.unwrap_or(""));
        Ok(format!("<pre>{}</pre>", body).into())
    }
}
