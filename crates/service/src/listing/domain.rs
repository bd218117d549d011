use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// Console login, read once from configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Cookie granted by the console on login.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
}

impl SessionCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }

    /// Value for a `Cookie:` request header.
    pub fn header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

impl fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCookie").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Authenticated session against one console host.
///
/// A session is created for a single request and bound to the host it was
/// obtained from; the fetcher derives the listing URL from `host()`, so the
/// cookie can never be replayed against another console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    host: IpAddr,
    cookie: SessionCookie,
}

impl Session {
    pub fn new(host: IpAddr, cookie: SessionCookie) -> Self {
        Self { host, cookie }
    }

    pub fn host(&self) -> IpAddr {
        self.host
    }

    pub fn cookie(&self) -> &SessionCookie {
        &self.cookie
    }

    pub fn token(&self) -> &str {
        &self.cookie.value
    }
}

/// Raw HTML of the listing page.
#[derive(Debug, Clone)]
pub struct RawDocument(String);

impl RawDocument {
    pub fn new(body: impl Into<String>) -> Self {
        Self(body.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One cashbox row of the listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashboxRecord {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ip: String,
    pub online: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    pub open: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cashier: String,
}

/// Body returned to the caller when a listing request fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: bool,
    pub message: String,
    pub code: u16,
}
