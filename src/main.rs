// Copyright 2024 RisingLight Project Authors. Licensed under Apache-2.0.

//! Command line entry of the IOx shell.

use anyhow::Result;
use clap::Parser;
use iox_shell::cli::{run_once, Args};
use iox_shell::shell::{Shell, ShellEditor};
use iox_shell::{Config, Context};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr);
    let filter_layer =
        filter::EnvFilter::from_default_env().add_directive(LevelFilter::WARN.into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let config = Config::load_default()?;
    let context = Context::new(config)?;

    match args.command {
        Some(command) => run_once(&context, &command).await?,
        None => Shell::new(ShellEditor::new()?, &context).run().await?,
    }

    Ok(())
}
