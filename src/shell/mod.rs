// Copyright 2024 RisingLight Project Authors. Licensed under Apache-2.0.

//! The interactive shell.
//!
//! The shell is a small state machine. [`transition`] decides, for the
//! current [`Mode`] and one [`Input`], which mode comes next and which
//! [`Effect`] to perform. [`Shell`] drives it, reading lines from a
//! [`LineReader`] and sending payloads to a [`Backend`].

mod editor;
mod highlight;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

pub use self::editor::ShellEditor;
pub use self::highlight::{highlight_sql, SqlHelper};

pub const BANNER: &str = "Welcome to my IOx CLI.";
pub const FAREWELL: &str = "Exiting ...";
pub const INTERRUPTED: &str = "Interrupted";
pub const LEAVE_SQL: &str = "Interrupted, exiting SQL mode...";
pub const LEAVE_WRITE: &str = "Interrupted, exiting write mode...";

pub const HELP: &str = "\
Commands:
  sql            enter SQL mode, one query per line
  sql <query>    run a single query
  write          enter write mode, one line protocol payload per line
  write <lines>  write a single payload
  exit           leave the current mode, or the shell
  help           show this message";

/// Which prompt the shell is at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    TopLevel,
    Sql,
    Write,
    Terminated,
}

impl Mode {
    pub fn prompt(self) -> &'static str {
        match self {
            Mode::TopLevel | Mode::Terminated => "(>) ",
            Mode::Sql => "(sql >) ",
            Mode::Write => "(write >) ",
        }
    }
}

/// The outcome of one prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Line(String),
    /// The user pressed Ctrl-C.
    Interrupted,
    /// The user pressed Ctrl-D.
    Eof,
}

/// Work to do after a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    Query(String),
    Write(String),
    Notice(&'static str),
    UnknownCommand(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub next: Mode,
    pub effect: Effect,
}

impl Transition {
    fn new(next: Mode, effect: Effect) -> Self {
        Self { next, effect }
    }

    fn stay(mode: Mode, effect: Effect) -> Self {
        Self::new(mode, effect)
    }
}

/// Compute the next mode and the effect of `input` in `mode`.
///
/// End of input inside a submode leaves the submode, the same as an
/// interrupt, instead of ending the process. Only end of input at the top
/// level terminates the shell.
pub fn transition(mode: Mode, input: Input) -> Transition {
    match (mode, input) {
        (Mode::Terminated, _) => Transition::stay(Mode::Terminated, Effect::None),

        (Mode::TopLevel, Input::Line(line)) => top_level(&line),
        (Mode::TopLevel, Input::Eof) => Transition::new(Mode::Terminated, Effect::Notice(FAREWELL)),
        (Mode::TopLevel, Input::Interrupted) => {
            Transition::stay(Mode::TopLevel, Effect::Notice(INTERRUPTED))
        }

        (Mode::Sql, Input::Line(line)) if is_exit(&line) => {
            Transition::new(Mode::TopLevel, Effect::None)
        }
        (Mode::Sql, Input::Line(line)) => Transition::stay(Mode::Sql, Effect::Query(line)),
        (Mode::Sql, Input::Interrupted | Input::Eof) => {
            Transition::new(Mode::TopLevel, Effect::Notice(LEAVE_SQL))
        }

        (Mode::Write, Input::Line(line)) if is_exit(&line) => {
            Transition::new(Mode::TopLevel, Effect::None)
        }
        (Mode::Write, Input::Line(line)) => Transition::stay(Mode::Write, Effect::Write(line)),
        (Mode::Write, Input::Interrupted | Input::Eof) => {
            Transition::new(Mode::TopLevel, Effect::Notice(LEAVE_WRITE))
        }
    }
}

/// Dispatch a top-level command line.
fn top_level(line: &str) -> Transition {
    let line = line.trim();
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };
    match command {
        "" => Transition::stay(Mode::TopLevel, Effect::None),
        "sql" if arg.is_empty() => Transition::new(Mode::Sql, Effect::None),
        "write" if arg.is_empty() => Transition::new(Mode::Write, Effect::None),
        "sql" => Transition::stay(Mode::TopLevel, Effect::Query(arg.to_string())),
        "write" => Transition::stay(Mode::TopLevel, Effect::Write(arg.to_string())),
        "exit" => Transition::new(Mode::Terminated, Effect::Notice(FAREWELL)),
        "help" | "?" => Transition::stay(Mode::TopLevel, Effect::Notice(HELP)),
        _ => Transition::stay(Mode::TopLevel, Effect::UnknownCommand(line.to_string())),
    }
}

fn is_exit(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("exit")
}

/// Source of input lines.
pub trait LineReader {
    /// Prompt for one line in `mode`.
    fn read_line(&mut self, mode: Mode) -> Result<Input>;
}

/// Destination of queries and writes.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Run a query and print its result, or its error. Never fails.
    async fn query(&self, sql: &str);

    /// Write a line protocol payload.
    async fn write(&self, line_protocol: &str) -> Result<()>;
}

/// Drives [`transition`] with a reader and a backend.
pub struct Shell<'a, R, B: ?Sized> {
    reader: R,
    backend: &'a B,
    mode: Mode,
}

impl<'a, R: LineReader, B: Backend + ?Sized> Shell<'a, R, B> {
    pub fn new(reader: R, backend: &'a B) -> Self {
        Self {
            reader,
            backend,
            mode: Mode::TopLevel,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Run until the shell terminates.
    ///
    /// A failed write ends the loop with its error, whatever the mode.
    pub async fn run(&mut self) -> Result<()> {
        println!("{BANNER}");
        while self.mode != Mode::Terminated {
            self.step().await?;
        }
        Ok(())
    }

    /// Read one input and apply it.
    pub async fn step(&mut self) -> Result<()> {
        let input = self.reader.read_line(self.mode)?;
        let Transition { next, effect } = transition(self.mode, input);
        if next != self.mode {
            debug!(from = ?self.mode, to = ?next, "switching mode");
        }
        match effect {
            Effect::None => {}
            Effect::Query(sql) => self.backend.query(&sql).await,
            Effect::Write(line_protocol) => self.backend.write(&line_protocol).await?,
            Effect::Notice(notice) => println!("{notice}"),
            Effect::UnknownCommand(line) => println!("*** Unknown syntax: {line}"),
        }
        self.mode = next;
        Ok(())
    }
}
