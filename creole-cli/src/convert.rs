//! The `convert` and `formats` commands
//!
//! Settings are resolved in layers: built-in defaults, then `--config`, then the flags.
//! Formats are resolved the same way, with the input file's extension between the flag and
//! the configured default.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use creole_babel::{Format, FormatRegistry};
use creole_config::{CreoleConfig, Loader};
use log::{debug, info};

#[derive(Debug)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

/// Everything `creole convert` was asked to do.
#[derive(Debug)]
pub struct ConvertRequest {
    pub input: Input,
    pub from: Option<String>,
    pub to: Option<String>,
    pub config: Option<PathBuf>,
    pub wiki_breaks: bool,
    pub unknown: Option<String>,
    pub output: Option<PathBuf>,
}

pub fn load_config(request: &ConvertRequest) -> Result<CreoleConfig> {
    let mut loader = Loader::new();
    if let Some(path) = &request.config {
        loader = loader.with_file(path);
    }
    if request.wiki_breaks {
        loader = loader.set_override("parser.blog_line_breaks", false)?;
    }
    if let Some(strategy) = &request.unknown {
        loader = loader.set_override("emit.unknown_nodes", strategy.as_str())?;
    }
    loader.build().context("invalid configuration")
}

fn read_input(input: &Input) -> Result<String> {
    match input {
        Input::Stdin => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("failed to read standard input")?;
            Ok(source)
        }
        Input::File(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
    }
}

/// Input format: the flag, then a parsing format claiming the file extension, then the config.
fn input_format(
    request: &ConvertRequest,
    registry: &FormatRegistry,
    config: &CreoleConfig,
) -> String {
    if let Some(from) = &request.from {
        return from.clone();
    }
    if let Input::File(path) = &request.input {
        let by_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| registry.for_extension(ext))
            .filter(|format| format.supports_parsing());
        if let Some(format) = by_extension {
            debug!("{} read as {}", path.display(), format.name());
            return format.name().to_string();
        }
    }
    config.convert.default_from.clone()
}

fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            print!("{}", text);
            if !text.is_empty() && !text.ends_with('\n') {
                println!();
            }
            Ok(())
        }
    }
}

pub fn run(request: &ConvertRequest) -> Result<()> {
    let config = load_config(request)?;
    let registry = FormatRegistry::with_options(&config.conversion_options());

    let from = input_format(request, &registry, &config);
    let to = request
        .to
        .clone()
        .unwrap_or_else(|| config.convert.default_to.clone());
    for name in [&from, &to] {
        if !registry.has(name) {
            bail!(
                "unknown format '{}' (available: {})",
                name,
                registry.list_formats().join(", ")
            );
        }
    }

    let source = read_input(&request.input)?;
    info!("converting {} to {}", from, to);
    let converted = registry
        .convert(&source, &from, &to)
        .with_context(|| format!("conversion from {} to {} failed", from, to))?;
    write_output(request.output.as_deref(), &converted)
}

fn capabilities(format: &dyn Format) -> &'static str {
    match (format.supports_parsing(), format.supports_serialization()) {
        (true, true) => "read, write",
        (true, false) => "read",
        (false, true) => "write",
        (false, false) => "-",
    }
}

/// Table of registered formats for `creole formats`.
pub fn list_formats() -> String {
    let registry = FormatRegistry::with_defaults();
    let mut out = String::from("Available formats:\n\n");
    for name in registry.list_formats() {
        let Ok(format) = registry.get(&name) else {
            continue;
        };
        out.push_str(&format!(
            "  {:<10} {:<12} {} (.{})\n",
            name,
            capabilities(format),
            format.description(),
            format.file_extensions().join(", .")
        ));
    }
    out
}
