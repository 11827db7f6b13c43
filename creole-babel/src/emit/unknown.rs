//! What a backend does with nodes it cannot express

use std::fmt;
use std::str::FromStr;

use creole_parser::NodeRef;
use serde::{Deserialize, Serialize};

/// Strategy applied by [`Renderer::unknown`](super::Renderer::unknown).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownStrategy {
    /// Fail the render with [`EmitError::UnknownNode`](crate::EmitError::UnknownNode).
    Raise,
    /// Drop the element and keep its children.
    #[default]
    Transparent,
    /// Keep the element as literal text of the target format.
    Escape,
    /// Keep the element as raw markup, wrapped in the target format's pass-through syntax.
    Rewrap,
}

impl UnknownStrategy {
    pub const ALL: [UnknownStrategy; 4] = [
        UnknownStrategy::Raise,
        UnknownStrategy::Transparent,
        UnknownStrategy::Escape,
        UnknownStrategy::Rewrap,
    ];

    pub fn name(self) -> &'static str {
        match self {
            UnknownStrategy::Raise => "raise",
            UnknownStrategy::Transparent => "transparent",
            UnknownStrategy::Escape => "escape",
            UnknownStrategy::Rewrap => "rewrap",
        }
    }
}

impl fmt::Display for UnknownStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UnknownStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnknownStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| {
                format!(
                    "unknown strategy '{}', expected one of: raise, transparent, escape, rewrap",
                    s
                )
            })
    }
}

/// `<tag attr="value">` for an element node. Nodes without a tag use their kind name.
pub fn open_tag(node: NodeRef<'_>) -> String {
    let tag = node.tag().unwrap_or(node.kind().name());
    let mut out = format!("<{}", tag);
    for (name, value) in node.attrs() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(value));
        out.push('"');
    }
    out.push('>');
    out
}

pub fn close_tag(node: NodeRef<'_>) -> String {
    format!("</{}>", node.tag().unwrap_or(node.kind().name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use creole_parser::{DocNode, Document, NodeKind};

    #[test]
    fn strategy_names_round_trip() {
        for strategy in UnknownStrategy::ALL {
            assert_eq!(strategy.name().parse::<UnknownStrategy>(), Ok(strategy));
        }
        assert!("loud".parse::<UnknownStrategy>().is_err());
    }

    #[test]
    fn tags_keep_attributes_in_order() {
        let mut doc = Document::new();
        let id = doc.append(
            doc.root_id(),
            DocNode::new(NodeKind::Unknown).with_tag(
                "div",
                vec![
                    ("class".into(), "note".into()),
                    ("title".into(), "a \"b\"".into()),
                ],
            ),
        );
        let node = doc.node(id);
        assert_eq!(open_tag(node), "<div class=\"note\" title=\"a &quot;b&quot;\">");
        assert_eq!(close_tag(node), "</div>");
    }
}
