// Copyright 2024 RisingLight Project Authors. Licensed under Apache-2.0.

//! Query delegate: submits SQL over Flight SQL and collects the result.

mod result;

use arrow::error::ArrowError;
use arrow_flight::error::FlightError;
use arrow_flight::sql::client::FlightSqlServiceClient;
use arrow_flight::{FlightInfo, Ticket};
use futures::TryStreamExt;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tracing::{debug, info};

pub use self::result::QueryResult;
use crate::config::Config;

/// Metadata headers carrying the namespace to query.
const NAMESPACE_HEADERS: &[&str] = &["bucket-name", "database"];

#[derive(thiserror::Error, Debug)]
pub enum QueryError {
    #[error("invalid Flight SQL endpoint {endpoint}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: tonic::transport::Error,
    },
    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),
    #[error("{0}")]
    Arrow(#[from] ArrowError),
    #[error("{0}")]
    Flight(#[from] FlightError),
    #[error("query returned no endpoint")]
    NoEndpoint,
    #[error("query endpoint has no ticket")]
    NoTicket,
}

/// A Flight SQL client bound to one host, token and namespace.
#[derive(Clone)]
pub struct QueryClient {
    client: FlightSqlServiceClient<Channel>,
}

impl QueryClient {
    /// Create a client for the configured host.
    ///
    /// The channel connects lazily, so an unreachable host is only reported
    /// by the first query.
    pub fn new(config: &Config) -> Result<Self, QueryError> {
        let endpoint = flight_endpoint(&config.host)?;
        info!("using Flight SQL endpoint {}", endpoint.uri());
        let mut client = FlightSqlServiceClient::new(endpoint.connect_lazy());
        client.set_token(config.token.clone());
        for header in NAMESPACE_HEADERS {
            client.set_header(*header, config.namespace.as_str());
        }
        Ok(Self { client })
    }

    /// Execute `sql` and read the whole result of its first endpoint.
    pub async fn execute(&self, sql: &str) -> Result<QueryResult, QueryError> {
        // The generated client needs `&mut self`; clones share the channel.
        let mut client = self.client.clone();
        debug!(sql, "submitting query");
        let info = client.execute(sql.to_string(), None).await?;
        let ticket = first_ticket(&info)?;

        let mut stream = client.do_get(ticket).await?;
        let mut batches = vec![];
        while let Some(batch) = stream.try_next().await? {
            batches.push(batch);
        }
        let result = QueryResult::new(stream.schema().cloned(), batches);
        debug!(
            batches = result.batches().len(),
            rows = result.num_rows(),
            "query finished"
        );
        Ok(result)
    }
}

/// Build the gRPC endpoint for `host`.
///
/// A bare host name means TLS on port 443. A host with an explicit
/// `http://` or `https://` scheme is used as given.
fn flight_endpoint(host: &str) -> Result<Endpoint, QueryError> {
    let uri = if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}:443")
    };
    let endpoint =
        Endpoint::from_shared(uri.clone()).map_err(|source| QueryError::InvalidEndpoint {
            endpoint: uri.clone(),
            source,
        })?;
    if uri.starts_with("https://") {
        Ok(endpoint.tls_config(ClientTlsConfig::new())?)
    } else {
        Ok(endpoint)
    }
}

/// Ticket of the first endpoint in `info`.
fn first_ticket(info: &FlightInfo) -> Result<Ticket, QueryError> {
    let endpoint = info.endpoint.first().ok_or(QueryError::NoEndpoint)?;
    endpoint.ticket.clone().ok_or(QueryError::NoTicket)
}

#[cfg(test)]
mod tests {
    use arrow_flight::FlightEndpoint;

    use super::*;

    #[test]
    fn bare_host_uses_tls_port() {
        let endpoint = flight_endpoint("iox.example.com").unwrap();
        let uri = endpoint.uri();
        assert_eq!(uri.scheme_str(), Some("https"));
        assert_eq!(uri.host(), Some("iox.example.com"));
        assert_eq!(uri.port_u16(), Some(443));
    }

    #[test]
    fn explicit_scheme_is_kept() {
        let endpoint = flight_endpoint("http://localhost:8082").unwrap();
        let uri = endpoint.uri();
        assert_eq!(uri.scheme_str(), Some("http"));
        assert_eq!(uri.port_u16(), Some(8082));
    }

    #[test]
    fn invalid_host() {
        let err = flight_endpoint("not a host").unwrap_err();
        assert!(matches!(err, QueryError::InvalidEndpoint { .. }));
    }

    #[test]
    fn ticket_of_first_endpoint() {
        let info = FlightInfo {
            endpoint: vec![
                FlightEndpoint {
                    ticket: Some(Ticket::new("first")),
                    ..Default::default()
                },
                FlightEndpoint {
                    ticket: Some(Ticket::new("second")),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(first_ticket(&info).unwrap(), Ticket::new("first"));
    }

    #[test]
    fn missing_endpoint_or_ticket() {
        let info = FlightInfo::default();
        assert!(matches!(first_ticket(&info), Err(QueryError::NoEndpoint)));

        let info = FlightInfo {
            endpoint: vec![FlightEndpoint::default()],
            ..Default::default()
        };
        assert!(matches!(first_ticket(&info), Err(QueryError::NoTicket)));
    }
}
