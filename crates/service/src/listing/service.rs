use std::net::IpAddr;
use std::sync::Arc;

use tracing::{info, instrument};

use super::domain::{CashboxRecord, Credentials};
use super::errors::ListingError;
use super::parser::ListingParser;
use crate::console::ConsoleGateway;

/// Orchestrates login, download and parsing for one console per call.
///
/// Holds only read-only collaborators; everything tied to a request (target
/// host, session) lives on that call's stack.
pub struct ListingService {
    console: Arc<dyn ConsoleGateway>,
    parser: ListingParser,
    servers: Vec<String>,
}

impl ListingService {
    pub fn new(console: Arc<dyn ConsoleGateway>, servers: Vec<String>) -> Self {
        Self { console, parser: ListingParser::default(), servers }
    }

    pub fn with_parser(mut self, parser: ListingParser) -> Self {
        self.parser = parser;
        self
    }

    /// Current cashboxes of the console at `host`.
    ///
    /// # Examples
    /// ```
    /// use service::console::mock::MockConsole;
    /// use service::listing::{domain::Credentials, errors::ListingError, service::ListingService};
    /// use std::sync::Arc;
    /// let svc = ListingService::new(Arc::new(MockConsole::default()), vec![]);
    /// let creds = Credentials::new("admin", "secret");
    /// let err = tokio_test::block_on(svc.get_listing("not-an-ip", &creds)).unwrap_err();
    /// assert!(matches!(err, ListingError::InvalidInput(_)));
    /// ```
    #[instrument(skip(self, creds), fields(%host))]
    pub async fn get_listing(&self, host: &str, creds: &Credentials) -> Result<Vec<CashboxRecord>, ListingError> {
        let ip = parse_host(host)?;
        let session = self.console.authenticate(ip, creds).await?;
        let doc = self.console.fetch(&session).await?;
        let records = self.parser.parse(&doc)?;
        info!(count = records.len(), "listing resolved");
        Ok(records)
    }

    /// Console addresses known to this deployment.
    pub fn servers(&self) -> &[String] {
        &self.servers
    }
}

/// Target host must be a literal IPv4 or IPv6 address.
pub fn parse_host(host: &str) -> Result<IpAddr, ListingError> {
    if host.is_empty() {
        return Err(ListingError::InvalidInput("missing ip".into()));
    }
    host.parse::<IpAddr>()
        .map_err(|_| ListingError::InvalidInput(format!("`{host}` is not an IP address")))
}
