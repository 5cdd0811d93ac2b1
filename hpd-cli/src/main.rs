//! hpdtool: inspect and rewrite Uniden HPD scanner configuration files
//!
//! Usage:
//!   hpdtool summary <file.hpd>
//!   hpdtool dump <file.hpd>
//!   hpdtool check <file.hpd>
//!   hpdtool export <in.hpd> <out.hpd>
//!   hpdtool xref <file.hpd> [catalog.csv]
//!   hpdtool config [--save]
//!
//! `check` exits with status 1 when exporting the parsed file does not
//! reproduce the input byte for byte.
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`, falling back to
//! `log_filter` from the settings file.

mod commands;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use commands::Outcome;
use settings::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "\
Usage:
  hpdtool summary <file.hpd>
  hpdtool dump <file.hpd>
  hpdtool check <file.hpd>
  hpdtool export <in.hpd> <out.hpd>
  hpdtool xref <file.hpd> [catalog.csv]
  hpdtool config [--save]";

#[derive(Debug, PartialEq)]
enum Command {
    Summary(PathBuf),
    Dump(PathBuf),
    Check(PathBuf),
    Export { input: PathBuf, output: PathBuf },
    Xref { file: PathBuf, catalog: Option<PathBuf> },
    Config { save: bool },
    Help,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command, String> {
    let mut args = args.into_iter();
    let Some(name) = args.next() else {
        return Ok(Command::Help);
    };
    let rest: Vec<String> = args.collect();
    let paths = |min: usize, max: usize| -> Result<Vec<PathBuf>, String> {
        if rest.len() < min || rest.len() > max {
            return Err(format!("wrong number of arguments for '{}'", name));
        }
        Ok(rest.iter().map(PathBuf::from).collect())
    };

    match name.as_str() {
        "summary" => Ok(Command::Summary(paths(1, 1)?.remove(0))),
        "dump" => Ok(Command::Dump(paths(1, 1)?.remove(0))),
        "check" => Ok(Command::Check(paths(1, 1)?.remove(0))),
        "export" => {
            let mut p = paths(2, 2)?.into_iter();
            match (p.next(), p.next()) {
                (Some(input), Some(output)) => Ok(Command::Export { input, output }),
                _ => Err("export needs <in> <out>".to_string()),
            }
        }
        "xref" => {
            let mut p = paths(1, 2)?.into_iter();
            match p.next() {
                Some(file) => Ok(Command::Xref {
                    file,
                    catalog: p.next(),
                }),
                None => Err("xref needs <file>".to_string()),
            }
        }
        "config" => match rest.as_slice() {
            [] => Ok(Command::Config { save: false }),
            [flag] if flag == "--save" => Ok(Command::Config { save: true }),
            _ => Err("config accepts only --save".to_string()),
        },
        "help" | "--help" | "-h" => Ok(Command::Help),
        other => Err(format!("unknown command '{}'", other)),
    }
}

fn main() -> ExitCode {
    let settings = Settings::load();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log_filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = match parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("error: {}\n\n{}", e, USAGE);
            return ExitCode::from(2);
        }
    };

    let result = match command {
        Command::Summary(path) => commands::summary(&path),
        Command::Dump(path) => commands::dump(&path),
        Command::Check(path) => commands::check(&path),
        Command::Export { input, output } => commands::export(&input, &output, &settings),
        Command::Xref { file, catalog } => commands::xref(&file, catalog, &settings),
        Command::Config { save } => commands::config(&settings, save),
        Command::Help => {
            println!("{}", USAGE);
            Ok(Outcome::Success)
        }
    };

    match result {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::Failure) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
