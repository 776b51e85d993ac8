// Copyright 2024 RisingLight Project Authors. Licensed under Apache-2.0.

//! Command line of the `iox` binary.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::shell::Backend;

/// CLI application for querying IOx, with arguments or interactively.
///
/// Without a subcommand an interactive shell is started.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Execute the given SQL query
    Sql {
        /// The SQL query to execute
        #[clap(value_name = "QUERY", trailing_var_arg = true, allow_hyphen_values = true)]
        query: Vec<String>,
    },
    /// Write line protocol to InfluxDB
    Write {
        /// The data to write
        #[clap(
            value_name = "LINE PROTOCOL",
            trailing_var_arg = true,
            allow_hyphen_values = true
        )]
        line_protocol: Vec<String>,
    },
}

impl Command {
    /// The remaining words joined by single spaces.
    pub fn payload(&self) -> String {
        match self {
            Command::Sql { query } => query.join(" "),
            Command::Write { line_protocol } => line_protocol.join(" "),
        }
    }
}

/// Run `command` once against `backend`.
///
/// Query errors are printed by the backend; write errors are returned.
pub async fn run_once<B: Backend + ?Sized>(backend: &B, command: &Command) -> Result<()> {
    let payload = command.payload();
    match command {
        Command::Sql { .. } => backend.query(&payload).await,
        Command::Write { .. } => backend.write(&payload).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Option<Command> {
        Args::try_parse_from(args.iter().copied()).unwrap().command
    }

    #[test]
    fn no_subcommand() {
        assert_eq!(parse(&["iox"]), None);
    }

    #[test]
    fn sql_words_are_joined() {
        let command = parse(&["iox", "sql", "select", "*", "from", "cpu"]).unwrap();
        assert_eq!(command.payload(), "select * from cpu");
    }

    #[test]
    fn write_keeps_hyphens() {
        let command = parse(&["iox", "write", "m,t=1", "f=-2", "0"]).unwrap();
        assert_eq!(
            command,
            Command::Write {
                line_protocol: vec!["m,t=1".into(), "f=-2".into(), "0".into()]
            }
        );
        assert_eq!(command.payload(), "m,t=1 f=-2 0");

        let command = parse(&["iox", "sql", "select", "-1"]).unwrap();
        assert_eq!(command.payload(), "select -1");
    }

    #[test]
    fn empty_payload() {
        assert_eq!(parse(&["iox", "sql"]).unwrap().payload(), "");
    }

    #[test]
    fn unknown_subcommand() {
        assert!(Args::try_parse_from(["iox", "drop"]).is_err());
    }
}
