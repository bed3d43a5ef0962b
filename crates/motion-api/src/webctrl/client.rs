// Webcontrol HTTP client
//
// Wraps `reqwest::Client` with the daemon's url scheme negotiation,
// basic auth, and a reconnect cool-down. Endpoint modules (config, action,
// detection) are implemented as inherent methods in separate files.

use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, HeaderMap};
use secrecy::ExposeSecret;
use tracing::{debug, warn};

use crate::error::{ConnectionFailure, Error};
use crate::transport::{Credentials, Endpoint, Scheme, TlsMode, TransportConfig};

/// Raw HTTP client for one motion daemon.
///
/// Tracks the scheme currently believed to work and whether the endpoint
/// is in a failed state. Every method takes `&mut self`: a single owner
/// issues requests one at a time.
pub struct HttpClient {
    http: reqwest::Client,
    owns_session: bool,
    closed: bool,
    endpoint: Endpoint,
    scheme: Scheme,
    tls: TlsMode,
    credentials: Option<Credentials>,
    timeout: Duration,
    reconnect_interval: Duration,
    /// Set when the last request failed; cleared on the next success.
    failed_at: Option<Instant>,
}

enum SendError {
    Status { status: u16, message: String },
    Transport(reqwest::Error),
}

impl HttpClient {
    /// Create a client with its own HTTP session.
    pub fn new(
        endpoint: Endpoint,
        credentials: Option<Credentials>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::build(http, true, endpoint, credentials, transport))
    }

    /// Create a client over a borrowed `reqwest::Client`.
    ///
    /// The session's own TLS settings apply; `close()` leaves it alone.
    pub fn with_client(
        http: reqwest::Client,
        endpoint: Endpoint,
        credentials: Option<Credentials>,
        transport: &TransportConfig,
    ) -> Self {
        Self::build(http, false, endpoint, credentials, transport)
    }

    fn build(
        http: reqwest::Client,
        owns_session: bool,
        endpoint: Endpoint,
        credentials: Option<Credentials>,
        transport: &TransportConfig,
    ) -> Self {
        Self {
            http,
            owns_session,
            closed: false,
            scheme: transport.tls.initial_scheme(),
            endpoint,
            tls: transport.tls,
            credentials,
            timeout: transport.timeout,
            reconnect_interval: transport.reconnect_interval,
            failed_at: None,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn tls_mode(&self) -> TlsMode {
        self.tls
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Scheme currently in use; may have been flipped by auto negotiation.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Force the scheme used by the next request.
    pub fn set_scheme(&mut self, scheme: Scheme) {
        self.scheme = scheme;
    }

    /// Base url of the webcontrol server, e.g. `http://host:8080`.
    pub fn server_url(&self) -> String {
        self.endpoint.url(self.scheme)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `false` while the endpoint is marked failed.
    pub fn is_available(&self) -> bool {
        self.failed_at.is_none()
    }

    /// Close the session if we own it; later requests fail with
    /// `ConnectionFailure::Closed`. Safe to call repeatedly, and a no-op on
    /// borrowed sessions.
    pub fn close(&mut self) {
        if self.owns_session && !self.closed {
            debug!(endpoint = %self.endpoint, "closing HTTP session");
            self.closed = true;
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    // ── Request loop ─────────────────────────────────────────────────

    /// GET `path` with the default timeout.
    pub async fn request(&mut self, path: &str) -> Result<(String, HeaderMap), Error> {
        self.request_with_timeout(path, self.timeout).await
    }

    /// GET `path` (relative to the server url, including any query).
    ///
    /// Fails fast while the endpoint is cooling down after a failure. In
    /// `TlsMode::Auto` a status-less transport error on the first attempt
    /// flips http/https and retries exactly once.
    pub async fn request_with_timeout(
        &mut self,
        path: &str,
        timeout: Duration,
    ) -> Result<(String, HeaderMap), Error> {
        if self.closed {
            return Err(self.connection_error(
                path,
                ConnectionFailure::Closed,
                "HTTP session closed".into(),
                None,
            ));
        }

        if let Some(failed_at) = self.failed_at {
            if failed_at.elapsed() < self.reconnect_interval {
                debug!(path, "endpoint cooling down, request skipped");
                return Err(self.connection_error(
                    path,
                    ConnectionFailure::CoolDown,
                    "Connection failed. Retry in a few seconds".into(),
                    None,
                ));
            }
        }

        let mut flipped = false;
        loop {
            let url = format!("{}{path}", self.server_url());
            debug!("GET {}", url);

            match self.send(&url, timeout).await {
                Ok(response) => {
                    self.failed_at = None;
                    return Ok(response);
                }
                Err(SendError::Status { status, message }) => {
                    self.mark_failed();
                    return Err(Error::Http {
                        url: self.server_url(),
                        path: path.to_owned(),
                        status,
                        message,
                    });
                }
                Err(SendError::Transport(e)) if e.is_timeout() => {
                    self.mark_failed();
                    return Err(self.connection_error(
                        path,
                        ConnectionFailure::Timeout,
                        "Timeout occurred while connecting to motion http interface".into(),
                        Some(e),
                    ));
                }
                Err(SendError::Transport(e))
                    if !flipped && e.status().is_none() && self.tls == TlsMode::Auto =>
                {
                    let next = self.scheme.flipped();
                    warn!(
                        endpoint = %self.endpoint,
                        error = %e,
                        "request failed, retrying with {next}"
                    );
                    self.scheme = next;
                    flipped = true;
                }
                Err(SendError::Transport(e)) => {
                    self.mark_failed();
                    return Err(self.connection_error(
                        path,
                        ConnectionFailure::Transport,
                        format!("Error occurred while communicating with motion server: {e}"),
                        Some(e),
                    ));
                }
            }
        }
    }

    async fn send(&self, url: &str, timeout: Duration) -> Result<(String, HeaderMap), SendError> {
        let mut builder = self.http.get(url).timeout(timeout).header(ACCEPT, "*/*");
        if let Some(ref creds) = self.credentials {
            builder = builder.basic_auth(&creds.username, Some(creds.password.expose_secret()));
        }

        let resp = builder.send().await.map_err(SendError::Transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SendError::Status {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_owned(),
            });
        }

        let headers = resp.headers().clone();
        let body = resp.text().await.map_err(SendError::Transport)?;
        Ok((body, headers))
    }

    fn mark_failed(&mut self) {
        self.failed_at = Some(Instant::now());
    }

    fn connection_error(
        &self,
        path: &str,
        failure: ConnectionFailure,
        message: String,
        source: Option<reqwest::Error>,
    ) -> Error {
        Error::Connection {
            url: self.server_url(),
            path: path.to_owned(),
            message,
            failure,
            source,
        }
    }

    // ── Root page ────────────────────────────────────────────────────

    /// `GET /`: camera inventory and version banner.
    pub async fn root(&mut self) -> Result<String, Error> {
        let (body, _) = self.request("/").await?;
        Ok(body)
    }
}
