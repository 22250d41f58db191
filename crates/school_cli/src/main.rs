//! CLI entry point for inspecting a registry data directory.
//!
//! # Responsibility
//! - Load config from the environment and open the registry read paths.
//! - Print record counts (`summary`, default) or the plain records of one
//!   kind (`list <kind>`) as JSON.

use clap::{Parser, Subcommand};
use school_core::{core_version, init_from_config, EntityKind, RegistryConfig, School};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "school_cli")]
#[command(about = "Inspect a school registry data directory")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Print the core version, data directory and record count per kind.
    Summary,
    /// Print every record of one kind as a JSON array.
    List {
        /// teachers, classes, parents or students (singular also accepted)
        #[arg(value_parser = parse_kind)]
        kind: EntityKind,
    },
}

fn parse_kind(value: &str) -> Result<EntityKind, String> {
    EntityKind::parse(value).ok_or_else(|| {
        format!("unknown entity kind `{value}`; expected teachers|classes|parents|students")
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command.unwrap_or(Command::Summary)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), String> {
    let config = RegistryConfig::from_env().map_err(|err| err.to_string())?;
    init_from_config(&config)?;
    let school = School::from_config(&config).map_err(|err| err.to_string())?;
    log::info!("event=cli_run module=cli status=start command={command:?}");

    match command {
        Command::Summary => {
            println!("school_core version={}", core_version());
            println!("data_dir={}", school.data_dir().display());
            for (kind, count) in school.counts() {
                println!("{}={count}", kind.as_str());
            }
        }
        Command::List { kind } => {
            let records = school.plain_records(kind);
            let output = serde_json::to_string_pretty(&records).map_err(|err| err.to_string())?;
            println!("{output}");
        }
    }
    Ok(())
}
