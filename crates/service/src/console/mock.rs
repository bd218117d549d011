//! In-memory console for tests and doc examples.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;

use async_trait::async_trait;

use super::ConsoleGateway;
use crate::listing::domain::{Credentials, RawDocument, Session, SessionCookie};
use crate::listing::errors::ListingError;

#[derive(Debug, Clone)]
enum MockHost {
    Page { creds: Credentials, html: String },
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Authenticate(IpAddr),
    Fetch(IpAddr),
}

/// Serves canned listing pages per host. Unknown hosts are unreachable.
#[derive(Default)]
pub struct MockConsole {
    hosts: Mutex<HashMap<IpAddr, MockHost>>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockConsole {
    /// Console at `host` accepting `creds` and serving `html`.
    pub fn with_page(self, host: IpAddr, creds: Credentials, html: impl Into<String>) -> Self {
        self.hosts
            .lock()
            .unwrap()
            .insert(host, MockHost::Page { creds, html: html.into() });
        self
    }

    /// Console at `host` failing at the transport level.
    pub fn with_down_host(self, host: IpAddr) -> Self {
        self.hosts.lock().unwrap().insert(host, MockHost::Down);
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    fn session_token(host: IpAddr) -> String {
        format!("mock-session-{host}")
    }
}

#[async_trait]
impl ConsoleGateway for MockConsole {
    async fn authenticate(&self, host: IpAddr, creds: &Credentials) -> Result<Session, ListingError> {
        self.calls.lock().unwrap().push(MockCall::Authenticate(host));
        match self.hosts.lock().unwrap().get(&host) {
            Some(MockHost::Page { creds: expected, .. }) if expected == creds => Ok(Session::new(
                host,
                SessionCookie::new("PHPSESSID", Self::session_token(host)),
            )),
            Some(MockHost::Page { .. }) => Err(ListingError::InvalidCredentials),
            Some(MockHost::Down) | None => Err(ListingError::Unreachable(format!("{host}: connection refused"))),
        }
    }

    async fn fetch(&self, session: &Session) -> Result<RawDocument, ListingError> {
        let host = session.host();
        self.calls.lock().unwrap().push(MockCall::Fetch(host));
        match self.hosts.lock().unwrap().get(&host) {
            Some(MockHost::Page { html, .. }) if session.token() == Self::session_token(host) => {
                Ok(RawDocument::new(html.clone()))
            }
            Some(MockHost::Page { .. }) => Err(ListingError::Unreachable(format!("{host}: session rejected"))),
            Some(MockHost::Down) | None => Err(ListingError::Unreachable(format!("{host}: connection refused"))),
        }
    }
}
