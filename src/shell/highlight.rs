// Copyright 2024 RisingLight Project Authors. Licensed under Apache-2.0.

use std::borrow::Cow;

use rustyline::highlight::Highlighter;
use rustyline::{Completer, Helper, Hinter, Validator};
use sqlparser::dialect::GenericDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, TokenWithLocation, Tokenizer, Whitespace};

const KEYWORD: &str = "\x1b[1;34m";
const STRING: &str = "\x1b[32m";
const NUMBER: &str = "\x1b[33m";
const COMMENT: &str = "\x1b[90m";
const RESET: &str = "\x1b[0m";

/// Line editor helper that colors SQL while it is typed.
///
/// Disabled helpers leave the line untouched, so one editor can serve
/// both the SQL prompt and the plain ones.
#[derive(Default, Completer, Helper, Hinter, Validator)]
pub struct SqlHelper {
    enabled: bool,
}

impl SqlHelper {
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

impl Highlighter for SqlHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if self.enabled {
            Cow::Owned(highlight_sql(line))
        } else {
            Cow::Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        self.enabled
    }
}

/// Wrap keywords, literals and comments of `sql` in ANSI colors.
///
/// Every token is copied from `sql` as typed, so only escape codes are
/// inserted. Input the tokenizer rejects, such as an unterminated string,
/// is returned unchanged.
pub fn highlight_sql(sql: &str) -> String {
    let dialect = GenericDialect {};
    let Ok(tokens) = Tokenizer::new(&dialect, sql).tokenize_with_location() else {
        return sql.to_string();
    };
    let offsets = token_offsets(sql, &tokens);

    let mut out = String::with_capacity(sql.len() * 2);
    for (i, token) in tokens.iter().enumerate() {
        let end = offsets.get(i + 1).copied().unwrap_or(sql.len());
        let text = &sql[offsets[i]..end];
        match color(&token.token) {
            Some(color) => {
                out.push_str(color);
                out.push_str(text);
                out.push_str(RESET);
            }
            None => out.push_str(text),
        }
    }
    out
}

fn color(token: &Token) -> Option<&'static str> {
    match token {
        Token::Word(word) if word.keyword != Keyword::NoKeyword => Some(KEYWORD),
        Token::SingleQuotedString(_) => Some(STRING),
        Token::Number(..) => Some(NUMBER),
        Token::Whitespace(Whitespace::SingleLineComment { .. }) => Some(COMMENT),
        _ => None,
    }
}

/// Byte offset in `sql` where each token starts.
///
/// Token locations are 1-based lines and columns counted in characters.
fn token_offsets(sql: &str, tokens: &[TokenWithLocation]) -> Vec<usize> {
    let mut chars = sql.char_indices().peekable();
    let (mut line, mut column) = (1, 1);
    let mut offsets = Vec::with_capacity(tokens.len());
    for token in tokens {
        let start = (token.location.line, token.location.column);
        while (line, column) < start {
            match chars.next() {
                Some((_, '\n')) => {
                    line += 1;
                    column = 1;
                }
                Some(_) => column += 1,
                None => break,
            }
        }
        offsets.push(chars.peek().map_or(sql.len(), |(i, _)| *i));
    }
    if let Some(first) = offsets.first_mut() {
        *first = 0;
    }
    offsets
}
