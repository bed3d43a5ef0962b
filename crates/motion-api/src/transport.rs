// Shared transport configuration for the webcontrol client.
//
// Endpoint identity, TLS policy, credentials and timing knobs live here so
// the request loop in `webctrl::client` stays focused on the protocol.

use std::fmt;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::Error;

const USER_AGENT: &str = concat!("motion-frontend/", env!("CARGO_PKG_VERSION"));

/// How the client talks TLS to the daemon.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Start on plain http and flip scheme once per request when the
    /// daemon hangs up on us.
    #[default]
    Auto,
    /// Plain http only.
    None,
    /// https without certificate validation (self-signed daemons).
    Relaxed,
    /// https with full certificate validation.
    Strict,
}

impl TlsMode {
    /// Scheme used for the first request.
    pub fn initial_scheme(self) -> Scheme {
        match self {
            Self::Auto | Self::None => Scheme::Http,
            Self::Relaxed | Self::Strict => Scheme::Https,
        }
    }

    /// Only strict mode validates certificates, for webctrl and any
    /// auxiliary connection derived from the same endpoint.
    pub fn verifies_certificates(self) -> bool {
        matches!(self, Self::Strict)
    }
}

/// URL scheme of the webcontrol server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn flipped(self) -> Self {
        match self {
            Self::Http => Self::Https,
            Self::Https => Self::Http,
        }
    }
}

/// `(host, port)` identity of a daemon.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Stable identifier derived from host and port.
    pub fn unique_id(&self) -> String {
        format!("{}_{}", self.host, self.port)
    }

    /// Base url for the webcontrol port.
    pub fn url(&self, scheme: Scheme) -> String {
        generate_url(&self.host, self.port, scheme)
    }

    /// Base url for another port on the same host (streams live on their own ports).
    pub fn url_on_port(&self, port: u16, scheme: Scheme) -> String {
        generate_url(&self.host, port, scheme)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

fn generate_url(host: &str, port: u16, scheme: Scheme) -> String {
    format!("{scheme}://{host}:{port}")
}

/// Basic-auth credentials for the webcontrol interface.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    /// Both parts must be present, otherwise requests go out unauthenticated.
    pub fn from_parts(username: Option<String>, password: Option<SecretString>) -> Option<Self> {
        use secrecy::ExposeSecret;

        match (username, password) {
            (Some(username), Some(password))
                if !username.is_empty() && !password.expose_secret().is_empty() =>
            {
                Some(Self { username, password })
            }
            _ => None,
        }
    }
}

/// Transport tuning shared by every request to one endpoint.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Default per-request timeout.
    pub timeout: Duration,
    /// How long a failed endpoint is left alone before we try again.
    pub reconnect_interval: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::Auto,
            timeout: Duration::from_secs(5),
            reconnect_interval: Duration::from_secs(10),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` honouring the TLS policy.
    ///
    /// Timeouts are applied per request, not on the client.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(!self.tls.verifies_certificates())
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tls_mode_parses_case_insensitively() {
        assert_eq!("AUTO".parse::<TlsMode>().ok(), Some(TlsMode::Auto));
        assert_eq!("relaxed".parse::<TlsMode>().ok(), Some(TlsMode::Relaxed));
        assert!("maybe".parse::<TlsMode>().is_err());
        assert_eq!(TlsMode::Strict.to_string(), "strict");
    }

    #[test]
    fn initial_scheme_follows_mode() {
        assert_eq!(TlsMode::Auto.initial_scheme(), Scheme::Http);
        assert_eq!(TlsMode::None.initial_scheme(), Scheme::Http);
        assert_eq!(TlsMode::Relaxed.initial_scheme(), Scheme::Https);
        assert_eq!(TlsMode::Strict.initial_scheme(), Scheme::Https);
    }

    #[test]
    fn endpoint_urls() {
        let ep = Endpoint::new("cam.local", 8080);
        assert_eq!(ep.unique_id(), "cam.local_8080");
        assert_eq!(ep.url(Scheme::Http), "http://cam.local:8080");
        assert_eq!(ep.url(Scheme::Http.flipped()), "https://cam.local:8080");
        assert_eq!(ep.url_on_port(8081, Scheme::Http), "http://cam.local:8081");
    }

    #[test]
    fn credentials_need_both_parts() {
        assert!(Credentials::from_parts(Some("admin".into()), None).is_none());
        assert!(Credentials::from_parts(None, Some("pw".to_string().into())).is_none());
        assert!(Credentials::from_parts(Some(String::new()), Some("pw".to_string().into())).is_none());
        assert!(Credentials::from_parts(Some("admin".into()), Some("pw".to_string().into())).is_some());
    }
}
