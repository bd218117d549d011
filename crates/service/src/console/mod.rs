//! Client side of the point-of-sale console: login and listing download.

pub mod authenticator;
pub mod fetcher;
pub mod http;
pub mod mock;

use std::net::IpAddr;

use async_trait::async_trait;
use configs::ConsoleConfig;

pub use authenticator::SessionAuthenticator;
pub use fetcher::ListingFetcher;
pub use http::ConsoleHttp;

use crate::listing::domain::{Credentials, RawDocument, Session};
use crate::listing::errors::ListingError;

/// Network seam of the listing pipeline.
#[async_trait]
pub trait ConsoleGateway: Send + Sync {
    async fn authenticate(&self, host: IpAddr, creds: &Credentials) -> Result<Session, ListingError>;
    async fn fetch(&self, session: &Session) -> Result<RawDocument, ListingError>;
}

/// Gateway talking to real consoles over HTTP.
#[derive(Debug, Clone)]
pub struct HttpConsole {
    authenticator: SessionAuthenticator,
    fetcher: ListingFetcher,
}

impl HttpConsole {
    pub fn new(http: ConsoleHttp) -> Self {
        Self {
            authenticator: SessionAuthenticator::new(http.clone()),
            fetcher: ListingFetcher::new(http),
        }
    }

    pub fn from_config(cfg: &ConsoleConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(ConsoleHttp::from_config(cfg)?))
    }
}

#[async_trait]
impl ConsoleGateway for HttpConsole {
    async fn authenticate(&self, host: IpAddr, creds: &Credentials) -> Result<Session, ListingError> {
        self.authenticator.authenticate(host, creds).await
    }

    async fn fetch(&self, session: &Session) -> Result<RawDocument, ListingError> {
        self.fetcher.fetch(session).await
    }
}
