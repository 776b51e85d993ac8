// Copyright 2024 RisingLight Project Authors. Licensed under Apache-2.0.

//! An interactive shell for IOx.
//!
//! SQL goes to the query service over Flight SQL and line protocol goes
//! to the InfluxDB v2 write API. All the work happens on the servers; this
//! crate only dispatches commands and prints results.

#![deny(unused_must_use)]

pub mod cli;
pub mod config;
mod context;
pub mod query;
pub mod shell;
pub mod write;

pub use self::config::Config;
pub use self::context::{Context, Error};
