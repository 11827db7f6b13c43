//! Macro argument strings
//!
//! `<<name key="value" other='x' bare=1>>` carries the argument string
//! `key="value" other='x' bare=1`. Values may be double quoted, single quoted or bare.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

static ARGUMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"\s*(?P<key>\w+)\s*=\s*(?:"(?P<double>[^"]*)"|'(?P<single>[^']*)'|(?P<bare>[^\s"']+))\s*"#,
    )
    .expect("argument pattern is valid")
});

/// Parsed `key=value` pairs, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroArgs {
    values: BTreeMap<String, String>,
}

impl MacroArgs {
    /// Parse an argument string. `None` when any part of it is not a `key=value` pair.
    pub fn parse(text: &str) -> Option<Self> {
        let mut values = BTreeMap::new();
        let mut pos = 0;
        while pos < text.len() {
            if text[pos..].trim().is_empty() {
                break;
            }
            let caps = ARGUMENT.captures_at(text, pos)?;
            let whole = caps.get(0)?;
            if whole.start() != pos || whole.end() == pos {
                return None;
            }
            let value = caps
                .name("double")
                .or_else(|| caps.name("single"))
                .or_else(|| caps.name("bare"))
                .map_or("", |m| m.as_str());
            values.insert(caps["key"].to_string(), value.to_string());
            pos = whole.end();
        }
        Some(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", 0)]
    #[case("   ", 0)]
    #[case("a=1", 1)]
    #[case(r#"a="x y" b='z' c=3"#, 3)]
    #[case(r#"  depth = "2"  "#, 1)]
    fn accepts_key_value_pairs(#[case] text: &str, #[case] count: usize) {
        assert_eq!(MacroArgs::parse(text).map(|args| args.len()), Some(count));
    }

    #[rstest]
    #[case("foo")]
    #[case("a=1 stray")]
    #[case(r#"a="unterminated"#)]
    #[case("=1")]
    fn rejects_anything_else(#[case] text: &str) {
        assert_eq!(MacroArgs::parse(text), None);
    }

    #[test]
    fn quoted_values_keep_inner_text() {
        let args = MacroArgs::parse(r#"title="a 'b'" lang='rust' n=2"#).unwrap();
        assert_eq!(args.get("title"), Some("a 'b'"));
        assert_eq!(args.get("lang"), Some("rust"));
        assert_eq!(args.get("n"), Some("2"));
        assert_eq!(args.keys().collect::<Vec<_>>(), vec!["lang", "n", "title"]);
    }
}
