use std::net::IpAddr;
use std::time::Duration;

use configs::ConsoleConfig;
use reqwest::{redirect, Client};

use crate::listing::errors::ListingError;

/// Browser identification; the console mis-serves clients it does not recognise.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/104.0.0.0 Safari/537.36";

pub const LOGIN_PATH: &str = "/ukm/index.php?r=site/login";
pub const LISTING_PATH: &str = "/ukm/index.php?r=pos/index&onlyGrid=1";

/// Plain-HTTP client shared by the authenticator and the fetcher.
///
/// Holds no cookie jar: session cookies travel inside [`crate::listing::domain::Session`]
/// values, never in client state.
#[derive(Debug, Clone)]
pub struct ConsoleHttp {
    client: Client,
    port: u16,
}

impl ConsoleHttp {
    pub fn new(port: u16, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Self { client, port })
    }

    pub fn from_config(cfg: &ConsoleConfig) -> Result<Self, reqwest::Error> {
        Self::new(cfg.port, cfg.timeout())
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    pub(crate) fn url(&self, host: IpAddr, path: &str) -> String {
        match host {
            IpAddr::V4(v4) => format!("http://{}:{}{}", v4, self.port, path),
            IpAddr::V6(v6) => format!("http://[{}]:{}{}", v6, self.port, path),
        }
    }
}

/// Transport failures (refused, timed out, DNS) all surface as `Unreachable`.
pub(crate) fn unreachable(host: IpAddr, err: reqwest::Error) -> ListingError {
    let what = if err.is_timeout() { "timed out" } else { "request failed" };
    ListingError::Unreachable(format!("{host}: {what}: {err}"))
}
