// Copyright 2024 RisingLight Project Authors. Licensed under Apache-2.0.

//! Write delegate: posts line protocol to the InfluxDB v2 write API.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{StatusCode, Url};
use tracing::debug;

use crate::config::Config;

#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    #[error("invalid write url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("write rejected ({status}): {body}")]
    Rejected { status: StatusCode, body: String },
}

/// Writes line protocol into one bucket.
///
/// Every call is sent as its own request; nothing is buffered.
#[derive(Clone)]
pub struct WriteClient {
    http: reqwest::Client,
    endpoint: Url,
    token: String,
}

impl WriteClient {
    pub fn new(config: &Config) -> Result<Self, WriteError> {
        let endpoint = write_url(&config.url, &config.org, &config.namespace)?;
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            endpoint,
            token: config.token.clone(),
        })
    }

    /// Send `line_protocol` to the bucket.
    pub async fn write(&self, line_protocol: &str) -> Result<(), WriteError> {
        debug!(bytes = line_protocol.len(), "writing line protocol");
        let response = self
            .http
            .post(self.endpoint.clone())
            .header(AUTHORIZATION, format!("Token {}", self.token))
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(line_protocol.to_owned())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WriteError::Rejected { status, body });
        }
        Ok(())
    }
}

/// URL of the write API for `bucket` in `org`, with nanosecond precision.
pub fn write_url(base: &str, org: &str, bucket: &str) -> Result<Url, WriteError> {
    let url = format!("{}/api/v2/write", base.trim_end_matches('/'));
    Url::parse_with_params(
        &url,
        &[("org", org), ("bucket", bucket), ("precision", "ns")],
    )
    .map_err(|e| WriteError::InvalidUrl {
        url,
        reason: e.to_string(),
    })
}
