// Copyright 2024 RisingLight Project Authors. Licensed under Apache-2.0.

use anyhow::Result;
use async_trait::async_trait;

use crate::config::Config;
use crate::query::{QueryClient, QueryError};
use crate::shell::Backend;
use crate::write::{WriteClient, WriteError};

/// Connection state shared by the shell and the one-shot commands.
///
/// Built once from the [`Config`] and passed around by reference.
pub struct Context {
    config: Config,
    query: QueryClient,
    write: WriteClient,
}

impl Context {
    /// Create both clients. Must be called within a tokio runtime.
    pub fn new(config: Config) -> Result<Self, Error> {
        let query = QueryClient::new(&config)?;
        let write = WriteClient::new(&config)?;
        Ok(Self {
            config,
            query,
            write,
        })
    }

    /// Run a query and render what the shell prints for it: the result
    /// table, or the text of the error.
    pub async fn render_query(&self, sql: &str) -> String {
        let table = match self.query.execute(sql).await {
            Ok(result) => result.to_markdown().map_err(QueryError::from),
            Err(err) => Err(err),
        };
        table.unwrap_or_else(|err| err.to_string())
    }
}

#[async_trait]
impl Backend for Context {
    async fn query(&self, sql: &str) {
        println!("{}", self.render_query(sql).await);
    }

    async fn write(&self, line_protocol: &str) -> Result<()> {
        println!("{} {}", line_protocol, self.config.namespace);
        self.write.write(line_protocol).await?;
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("query error: {0}")]
    Query(#[from] QueryError),
    #[error("write error: {0}")]
    Write(#[from] WriteError),
}
