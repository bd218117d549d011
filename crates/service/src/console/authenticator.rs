use std::net::IpAddr;

use tracing::{debug, instrument, warn};

use super::http::{unreachable, ConsoleHttp, LOGIN_PATH};
use crate::listing::domain::{Credentials, Session, SessionCookie};
use crate::listing::errors::ListingError;

/// Performs the console's form login.
#[derive(Debug, Clone)]
pub struct SessionAuthenticator {
    http: ConsoleHttp,
}

impl SessionAuthenticator {
    pub fn new(http: ConsoleHttp) -> Self {
        Self { http }
    }

    #[instrument(skip(self, creds), fields(%host))]
    pub async fn authenticate(&self, host: IpAddr, creds: &Credentials) -> Result<Session, ListingError> {
        let url = self.http.url(host, LOGIN_PATH);
        let form = [
            ("LoginForm[username]", creds.username.as_str()),
            ("LoginForm[password]", creds.password.as_str()),
        ];
        let resp = self
            .http
            .client()
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| unreachable(host, e))?;

        let cookies: Vec<SessionCookie> = resp
            .cookies()
            .map(|c| SessionCookie::new(c.name(), c.value()))
            .collect();
        debug!(status = %resp.status(), cookies = cookies.len(), "login response");

        let session = session_from_cookies(host, cookies);
        if session.is_err() {
            warn!("console did not grant a session cookie");
        }
        session
    }
}

/// The console sets at least two cookies on a successful login, the second
/// being the session. Anything less means the credentials were refused.
pub fn session_from_cookies(host: IpAddr, cookies: Vec<SessionCookie>) -> Result<Session, ListingError> {
    cookies
        .into_iter()
        .nth(1)
        .map(|cookie| Session::new(host, cookie))
        .ok_or(ListingError::InvalidCredentials)
}
