//! Error types for emission and format conversion

/// Errors raised while rendering a document tree.
///
/// Most problems are recovered locally (a failing macro renders as an inline marker), so
/// only the cases that would silently corrupt output reach the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmitError {
    /// The backend has no rendering for this node and its unknown-node strategy is `raise`.
    #[error("Unknown node '{kind}'{}", .tag.as_ref().map(|t| format!(" <{}>", t)).unwrap_or_default())]
    UnknownNode { kind: String, tag: Option<String> },

    /// Two reST substitutions share a name but point at different targets.
    #[error("Ambiguous substitution '{text}': '{first}' != '{second}'")]
    AmbiguousSubstitution {
        text: String,
        first: String,
        second: String,
    },

    /// reST has adornment characters for six section levels only.
    #[error("Unsupported header level: {0}")]
    UnsupportedHeaderLevel(usize),
}

pub type EmitResult<T = String> = Result<T, EmitError>;

/// Errors surfaced by [`Format`](crate::Format) implementations and the registry.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("Format '{0}' not found")]
    FormatNotFound(String),

    #[error("{0}")]
    NotSupported(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
