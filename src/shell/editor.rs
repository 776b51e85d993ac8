// Copyright 2024 RisingLight Project Authors. Licensed under Apache-2.0.

use std::fs::File;
use std::path::PathBuf;

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use super::{Input, LineReader, Mode, SqlHelper};

/// Terminal line reader with history, highlighting SQL in SQL mode.
pub struct ShellEditor {
    editor: Editor<SqlHelper, DefaultHistory>,
    history_path: Option<PathBuf>,
}

impl ShellEditor {
    pub fn new() -> Result<Self> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(SqlHelper::default()));

        let history_path = dirs::cache_dir().map(|p| {
            let cache_dir = p.join("iox-shell");
            std::fs::create_dir_all(cache_dir.as_path()).ok();
            let history_path = cache_dir.join("history.txt");
            if !history_path.as_path().exists() {
                File::create(history_path.as_path()).ok();
            }
            history_path
        });
        if let Some(ref history_path) = history_path {
            if let Err(err) = editor.load_history(history_path) {
                println!("No previous history. {err}");
            }
        }
        Ok(Self {
            editor,
            history_path,
        })
    }
}

impl LineReader for ShellEditor {
    fn read_line(&mut self, mode: Mode) -> Result<Input> {
        if let Some(helper) = self.editor.helper_mut() {
            helper.set_enabled(mode == Mode::Sql);
        }
        match self.editor.readline(mode.prompt()) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str())?;
                }
                Ok(Input::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => Ok(Input::Eof),
            Err(err) => Err(err.into()),
        }
    }
}

impl Drop for ShellEditor {
    fn drop(&mut self) {
        if let Some(ref history_path) = self.history_path {
            if let Err(err) = self.editor.save_history(history_path) {
                println!("Save history failed, {err}");
            }
        }
    }
}
