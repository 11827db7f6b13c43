//! Name → callable mapping and per-call error recovery

use std::any::Any;
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Once};

use creole_parser::{NodeKind, NodeRef};
use log::{debug, warn};

use super::args::MacroArgs;

/// What a macro hands back. Bytes are accepted only when they are valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacroOutput {
    Text(String),
    Bytes(Vec<u8>),
}

impl From<String> for MacroOutput {
    fn from(text: String) -> Self {
        MacroOutput::Text(text)
    }
}

impl From<&str> for MacroOutput {
    fn from(text: &str) -> Self {
        MacroOutput::Text(text.to_string())
    }
}

impl From<Vec<u8>> for MacroOutput {
    fn from(bytes: Vec<u8>) -> Self {
        MacroOutput::Bytes(bytes)
    }
}

/// Raised by a macro body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MacroError {
    #[error("{0}")]
    Failed(String),

    #[error("invalid value '{value}' for argument '{name}'")]
    InvalidArgument { name: String, value: String },
}

pub type MacroResult = Result<MacroOutput, MacroError>;

/// One invocation, as seen by the macro.
#[derive(Debug, Clone, Copy)]
pub struct MacroCall<'a> {
    pub name: &'a str,
    pub args: &'a MacroArgs,
    /// Verbatim body of the paired forms, `None` for a tag.
    pub body: Option<&'a str>,
    /// Invoked from a block macro rather than inside running text.
    pub block: bool,
}

pub trait Macro: Send + Sync {
    /// Argument names the macro accepts. `None` accepts anything.
    fn params(&self) -> Option<&[&'static str]> {
        None
    }

    fn call(&self, call: &MacroCall<'_>) -> MacroResult;
}

impl<F> Macro for F
where
    F: Fn(&MacroCall<'_>) -> MacroResult + Send + Sync,
{
    fn call(&self, call: &MacroCall<'_>) -> MacroResult {
        self(call)
    }
}

/// A macro call that could not produce output. Displays as the inline marker that replaces
/// the call in the rendered document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MacroFailure {
    #[error("[Error: Wrong macro arguments: \"{args}\" for macro '{name}' (maybe wrong macro tag syntax?)]")]
    WrongArguments { name: String, args: String },

    #[error("[Error: Macro '{name}' doesn't exist]")]
    Missing { name: String },

    #[error("[Error: Macro '{name}' error: {message}]")]
    Failed { name: String, message: String },

    #[error("[Error: Macro '{name}' doesn't return a unicode string!]")]
    NotUnicode { name: String },
}

#[derive(Clone, Default)]
pub struct MacroRegistry {
    macros: HashMap<String, Arc<dyn Macro>>,
}

impl MacroRegistry {
    /// An empty registry: every call renders the "doesn't exist" marker.
    pub fn new() -> Self {
        Self::default()
    }

    /// `html` and `pre`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        super::builtins::register(&mut registry);
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, mac: impl Macro + 'static) {
        self.macros.insert(name.into(), Arc::new(mac));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Macro> {
        self.macros.get(name).map(|m| m.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.macros.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run the macro behind a `macro_block` or `macro_inline` node.
    ///
    /// Every failure, a panic included, is caught here and reported as a [`MacroFailure`];
    /// the caller renders it as text and carries on with the rest of the document. The first
    /// call chains a process panic hook so a macro panic is logged rather than printed.
    pub fn render(&self, node: NodeRef<'_>, verbose: u8) -> Result<String, MacroFailure> {
        let name = node.macro_name().unwrap_or("");
        let raw_args = node.macro_args().unwrap_or("");
        let block = node.kind() == NodeKind::MacroBlock;
        let result = self.dispatch(name, raw_args, node.content(), block);
        if let Err(failure) = &result {
            debug!("macro {} with args {:?} failed: {}", name, raw_args, failure);
            if verbose > 1 {
                warn!("{}", failure);
            }
        }
        result
    }

    fn dispatch(
        &self,
        name: &str,
        raw_args: &str,
        body: Option<&str>,
        block: bool,
    ) -> Result<String, MacroFailure> {
        let wrong_arguments = || MacroFailure::WrongArguments {
            name: name.to_string(),
            args: raw_args.to_string(),
        };
        let args = MacroArgs::parse(raw_args).ok_or_else(wrong_arguments)?;
        let mac = self.get(name).ok_or_else(|| MacroFailure::Missing {
            name: name.to_string(),
        })?;
        if let Some(params) = mac.params() {
            if args.keys().any(|key| !params.iter().any(|p| *p == key)) {
                return Err(wrong_arguments());
            }
        }

        let call = MacroCall {
            name,
            args: &args,
            body,
            block,
        };
        let failed = |message: String| MacroFailure::Failed {
            name: name.to_string(),
            message,
        };
        match contain(|| mac.call(&call)) {
            Ok(Ok(MacroOutput::Text(text))) => Ok(text),
            Ok(Ok(MacroOutput::Bytes(bytes))) => {
                String::from_utf8(bytes).map_err(|_| MacroFailure::NotUnicode {
                    name: name.to_string(),
                })
            }
            Ok(Err(err)) => Err(failed(err.to_string())),
            Err(payload) => Err(failed(panic_message(payload.as_ref()))),
        }
    }
}

thread_local! {
    static IN_MACRO: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// Chain a panic hook that sends panics raised inside a macro call to `log` instead of
/// stderr. Panics anywhere else still reach the hook that was installed before.
fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if inside_macro_call() {
                debug!("macro {}", info);
            } else {
                previous(info);
            }
        }));
    });
}

fn inside_macro_call() -> bool {
    IN_MACRO.with(Cell::get)
}

/// Run a macro body, turning a panic into `Err(payload)`.
fn contain<T>(run: impl FnOnce() -> T) -> std::thread::Result<T> {
    install_quiet_hook();
    let outer = IN_MACRO.with(|flag| flag.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(run));
    IN_MACRO.with(|flag| flag.set(outer));
    result
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panicked".to_string()
    }
}

impl fmt::Debug for MacroRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MacroRegistry")
            .field("macros", &self.names())
            .finish()
    }
}
