use std::net::IpAddr;
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), log_format: default_log_format() }
    }
}

/// Access to the point-of-sale consoles: login credentials plus the
/// addresses of the consoles known to this deployment.
#[derive(Clone, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub servers: Vec<String>,
    #[serde(default = "default_console_port")]
    pub port: u16,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            servers: Vec::new(),
            port: default_console_port(),
            timeout_secs: default_timeout(),
        }
    }
}

// Hand-written so the password never reaches a log line.
impl std::fmt::Debug for ConsoleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .field("servers", &self.servers)
            .field("port", &self.port)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 4433 }
fn default_log_format() -> String { "compact".into() }
fn default_console_port() -> u16 { 80 }
fn default_timeout() -> u64 { 3 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    from_toml_str(&content)
}

pub fn from_toml_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `CONFIG_PATH` (or `config.toml`), fall back to an all-defaults
    /// config driven by the environment when the file is absent.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => AppConfig::from_env(),
            Err(e) => return Err(e),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Defaults with `SERVER_HOST`/`SERVER_PORT` applied.
    pub fn from_env() -> Self {
        let mut cfg = AppConfig::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.console.normalize_from_env();
        self.console.validate()?;
        Ok(())
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        let format = self.log_format.trim().to_ascii_lowercase();
        if !matches!(format.as_str(), "compact" | "json") {
            return Err(anyhow!("server.log_format must be `compact` or `json`, got `{}`", self.log_format));
        }
        self.log_format = format;
        Ok(())
    }
}

impl ConsoleConfig {
    /// Fill empty credentials from `CONSOLE_USERNAME` / `CONSOLE_PASSWORD`.
    pub fn normalize_from_env(&mut self) {
        self.fill_with(|key| std::env::var(key).ok());
    }

    fn fill_with<F: Fn(&str) -> Option<String>>(&mut self, lookup: F) {
        if self.username.is_empty() {
            if let Some(v) = lookup("CONSOLE_USERNAME") {
                self.username = v;
            }
        }
        if self.password.is_empty() {
            if let Some(v) = lookup("CONSOLE_PASSWORD") {
                self.password = v;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(anyhow!(
                "console credentials missing; set console.username/console.password in config.toml or CONSOLE_USERNAME/CONSOLE_PASSWORD"
            ));
        }
        if self.port == 0 {
            return Err(anyhow!("console.port must be in 1..=65535"));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("console.timeout_secs must be a positive number of seconds"));
        }
        for server in &self.servers {
            if server.parse::<IpAddr>().is_err() {
                return Err(anyhow!("console.servers entry `{server}` is not an IP address"));
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[server]
host = "127.0.0.1"
port = 9000

[console]
username = "admin"
password = "secret"
servers = ["10.0.0.5", "fe80::1"]
"#;

    #[test]
    fn parses_sample_and_applies_defaults() {
        let mut cfg = from_toml_str(SAMPLE).expect("parse");
        cfg.normalize_and_validate().expect("valid");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.log_format, "compact");
        assert_eq!(cfg.console.port, 80);
        assert_eq!(cfg.console.timeout(), Duration::from_secs(3));
        assert_eq!(cfg.console.servers, vec!["10.0.0.5", "fe80::1"]);
    }

    #[test]
    fn rejects_server_entry_that_is_not_an_ip() {
        let mut cfg = from_toml_str(SAMPLE).expect("parse");
        cfg.console.servers.push("shop-12".into());
        let err = cfg.console.validate().unwrap_err();
        assert!(err.to_string().contains("shop-12"));
    }

    #[test]
    fn rejects_zero_timeout_and_unknown_log_format() {
        let mut cfg = from_toml_str(SAMPLE).expect("parse");
        cfg.console.timeout_secs = 0;
        assert!(cfg.console.validate().is_err());

        let mut cfg = from_toml_str(SAMPLE).expect("parse");
        cfg.server.log_format = "xml".into();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn empty_credentials_are_filled_from_lookup() {
        let mut console = ConsoleConfig::default();
        console.fill_with(|key| match key {
            "CONSOLE_USERNAME" => Some("env-user".into()),
            "CONSOLE_PASSWORD" => Some("env-pass".into()),
            _ => None,
        });
        assert_eq!(console.username, "env-user");
        assert_eq!(console.password, "env-pass");
        console.validate().expect("valid after fill");
    }

    #[test]
    fn configured_credentials_win_over_lookup() {
        let mut cfg = from_toml_str(SAMPLE).expect("parse");
        cfg.console.fill_with(|_| Some("ignored".into()));
        assert_eq!(cfg.console.username, "admin");
        assert_eq!(cfg.console.password, "secret");
    }

    #[test]
    fn debug_output_hides_password() {
        let cfg = from_toml_str(SAMPLE).expect("parse");
        let dbg = format!("{:?}", cfg.console);
        assert!(!dbg.contains("secret"));
    }

    #[test]
    fn missing_file_is_reported_as_not_found() {
        let err = load_from_file("/nonexistent/listing-config.toml").unwrap_err();
        assert!(is_not_found(&err));
    }
}
