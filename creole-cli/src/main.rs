//! Command-line interface for creole
//! Converts wiki markup between the formats registered in creole-babel.
//!
//! Usage:
//!   creole convert `<path|->` [--from `<fmt>`] [--to `<fmt>`] [--config `<toml>`]
//!                  [--wiki-breaks] [--unknown `<strategy>`] [-o `<file>`] [-v...]
//!   creole formats                                 - List formats and what they support

mod convert;

use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};
use creole_babel::UnknownStrategy;

use crate::convert::{ConvertRequest, Input};

fn build_cli() -> Command {
    Command::new("creole")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert Creole wiki markup to and from other formats")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("More log output (repeat for more)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a document between formats")
                .arg(
                    Arg::new("path")
                        .help("Input file, or '-' for standard input")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .short('f')
                        .help("Input format (default: from the file extension, then the config)"),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .short('t')
                        .help("Output format (default: from the config)"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("TOML file layered over the built-in defaults"),
                )
                .arg(
                    Arg::new("wiki-breaks")
                        .long("wiki-breaks")
                        .help("Treat newlines inside paragraphs as spaces")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("unknown")
                        .long("unknown")
                        .help("What to do with elements the output format cannot express")
                        .value_parser(UnknownStrategy::ALL.map(UnknownStrategy::name)),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Write to a file instead of standard output"),
                ),
        )
        .subcommand(Command::new("formats").about("List available formats"))
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn convert_request(matches: &ArgMatches) -> ConvertRequest {
    let text = |name: &str| matches.get_one::<String>(name).cloned();
    let input = match matches.get_one::<String>("path").map(String::as_str) {
        Some("-") | None => Input::Stdin,
        Some(path) => Input::File(path.into()),
    };
    ConvertRequest {
        input,
        from: text("from"),
        to: text("to"),
        config: text("config").map(Into::into),
        wiki_breaks: matches.get_flag("wiki-breaks"),
        unknown: text("unknown"),
        output: text("output").map(Into::into),
    }
}

fn main() -> ExitCode {
    let matches = build_cli().get_matches();
    init_logging(matches.get_count("verbose"));

    let result = match matches.subcommand() {
        Some(("convert", sub)) => convert::run(&convert_request(sub)),
        Some(("formats", _)) => {
            print!("{}", convert::list_formats());
            Ok(())
        }
        Some((other, _)) => Err(anyhow::anyhow!("unknown command '{}'", other)),
        None => Err(anyhow::anyhow!("no command given")),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
