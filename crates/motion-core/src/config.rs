// ── Runtime connection configuration ──
//
// Describes *how* to reach one motion daemon. Carries credentials and
// transport tuning but never touches disk; the CLI builds a `ClientConfig`
// from its profile file and hands it in.

use std::time::Duration;

use secrecy::SecretString;

use motion_api::{Credentials, Endpoint, TlsMode, TransportConfig};

pub const DEFAULT_PORT: u16 = 8080;

/// Configuration for connecting to a single daemon.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    /// Webcontrol port.
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub tls: TlsMode,
    /// Default per-request timeout.
    pub timeout: Duration,
    /// Cool-down after a failed request.
    pub reconnect_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let transport = TransportConfig::default();
        Self {
            host: "localhost".into(),
            port: DEFAULT_PORT,
            username: None,
            password: None,
            tls: transport.tls,
            timeout: transport.timeout,
            reconnect_interval: transport.reconnect_interval,
        }
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.host.clone(), self.port)
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls,
            timeout: self.timeout,
            reconnect_interval: self.reconnect_interval,
        }
    }

    /// Basic-auth credentials; `None` unless both username and password are set.
    pub fn credentials(&self) -> Option<Credentials> {
        Credentials::from_parts(self.username.clone(), self.password.clone())
    }
}
