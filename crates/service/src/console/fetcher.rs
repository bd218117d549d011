use reqwest::header::COOKIE;
use tracing::{debug, instrument, warn};

use super::http::{unreachable, ConsoleHttp, LISTING_PATH};
use crate::listing::domain::{RawDocument, Session};
use crate::listing::errors::ListingError;

/// Downloads the listing grid with an established session.
#[derive(Debug, Clone)]
pub struct ListingFetcher {
    http: ConsoleHttp,
}

impl ListingFetcher {
    pub fn new(http: ConsoleHttp) -> Self {
        Self { http }
    }

    /// The console answers unauthenticated requests with a redirect to its
    /// login page; that, like any other non-2xx answer, is `Unreachable`.
    #[instrument(skip(self, session), fields(host = %session.host()))]
    pub async fn fetch(&self, session: &Session) -> Result<RawDocument, ListingError> {
        let host = session.host();
        let url = self.http.url(host, LISTING_PATH);
        let resp = self
            .http
            .client()
            .get(&url)
            .header(COOKIE, session.cookie().header_value())
            .send()
            .await
            .map_err(|e| unreachable(host, e))?;

        let status = resp.status();
        if status.is_redirection() {
            warn!(%status, "listing request redirected; session rejected");
            return Err(ListingError::Unreachable(format!(
                "{host}: session rejected (redirected with {status})"
            )));
        }
        if !status.is_success() {
            warn!(%status, "listing request failed");
            return Err(ListingError::Unreachable(format!("{host}: console answered {status}")));
        }

        let body = resp.text().await.map_err(|e| unreachable(host, e))?;
        debug!(bytes = body.len(), "listing page received");
        Ok(RawDocument::new(body))
    }
}
