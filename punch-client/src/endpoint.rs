use reqwest::Url;
use std::time::Duration;

use crate::error::ConnectError;

/// Default upper bound for establishing a connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Default upper bound for a single remote call.
pub const CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Where and how to reach the time-clock service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    /// Dial without transport encryption.
    pub insecure: bool,
    /// Expected TLS authority name. Defaults to `host`.
    pub tls_authority: Option<String>,
    pub connect_timeout: Duration,
    pub call_timeout: Duration,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            insecure: false,
            tls_authority: None,
            connect_timeout: CONNECT_TIMEOUT,
            call_timeout: CALL_TIMEOUT,
        }
    }

    pub fn insecure(mut self) -> Self {
        self.insecure = true;
        self
    }

    pub fn with_tls_authority(mut self, authority: impl Into<String>) -> Self {
        self.tls_authority = Some(authority.into());
        self
    }

    pub fn with_timeouts(mut self, connect: Duration, call: Duration) -> Self {
        self.connect_timeout = connect;
        self.call_timeout = call;
        self
    }

    /// The name the server certificate is verified against.
    pub fn authority(&self) -> &str {
        self.tls_authority.as_deref().unwrap_or(&self.host)
    }

    /// `host:port` as dialed.
    pub fn address(&self) -> String {
        format!("{}:{}", bracket_ipv6(&self.host), self.port)
    }

    /// Whether the authority must be pinned to the dialed host's address.
    pub(crate) fn needs_pinning(&self) -> bool {
        !self.insecure && self.authority() != self.host
    }

    pub fn base_url(&self) -> Result<Url, ConnectError> {
        let raw = if self.insecure {
            format!("http://{}/", self.address())
        } else {
            format!("https://{}:{}/", bracket_ipv6(self.authority()), self.port)
        };
        Url::parse(&raw).map_err(|e| ConnectError::InvalidEndpoint(format!("{}: {}", raw, e)))
    }
}

fn bracket_ipv6(host: &str) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{}]", host)
    } else {
        host.to_string()
    }
}
