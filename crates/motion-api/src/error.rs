use thiserror::Error;

/// Why a request never produced a usable daemon response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionFailure {
    /// The endpoint failed recently and is still inside its reconnect interval.
    CoolDown,
    /// The request did not complete within its timeout.
    Timeout,
    /// Connection refused, DNS failure, TLS handshake failure, broken body, etc.
    Transport,
    /// The owned HTTP session was closed.
    Closed,
}

/// Top-level error type for the `motion-api` crate.
///
/// `Connection` means the daemon could not be reached at all; `Http` means it
/// answered but refused the request. Authentication failures are an `Http`
/// error carrying status 401.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// The daemon is presumed unreachable.
    #[error("Cannot connect to motion daemon at {url} ({path}): {message}")]
    Connection {
        url: String,
        path: String,
        message: String,
        failure: ConnectionFailure,
        #[source]
        source: Option<reqwest::Error>,
    },

    // ── Daemon ──────────────────────────────────────────────────────
    /// The daemon answered with a non-success HTTP status.
    #[error("Motion daemon rejected {path} (HTTP {status}): {message}")]
    Http {
        url: String,
        path: String,
        status: u16,
        message: String,
    },

    // ── Setup ───────────────────────────────────────────────────────
    /// The HTTP session could not be built.
    #[error("TLS error: {0}")]
    Tls(String),
}

impl Error {
    /// The request path (relative to the server url) that failed, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Connection { path, .. } | Self::Http { path, .. } => Some(path),
            Self::Tls(_) => None,
        }
    }

    /// Server url of the endpoint the request was issued against.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Connection { url, .. } | Self::Http { url, .. } => Some(url),
            Self::Tls(_) => None,
        }
    }

    /// HTTP status code, when the daemon produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Connection { source, .. } => source
                .as_ref()
                .and_then(reqwest::Error::status)
                .map(|s| s.as_u16()),
            Self::Tls(_) => None,
        }
    }

    /// Returns `true` for the transport-level failures (timeout, DNS,
    /// refused connection, cool-down short-circuit).
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Returns `true` when the daemon rejected our credentials.
    pub fn is_auth_failure(&self) -> bool {
        self.status() == Some(401)
    }

    /// Returns `true` if retrying later might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Connection { failure, .. } => *failure != ConnectionFailure::Closed,
            Self::Http { status, .. } => *status >= 500,
            Self::Tls(_) => false,
        }
    }

    /// The failure kind for connection errors.
    pub fn connection_failure(&self) -> Option<ConnectionFailure> {
        match self {
            Self::Connection { failure, .. } => Some(*failure),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> Error {
        Error::Http {
            url: "http://cam:8080".into(),
            path: "/0/config/list".into(),
            status,
            message: "nope".into(),
        }
    }

    #[test]
    fn unauthorized_is_an_auth_failure_but_not_a_connection_error() {
        let err = http(401);
        assert!(err.is_auth_failure());
        assert!(!err.is_connection());
        assert_eq!(err.path(), Some("/0/config/list"));
        assert_eq!(err.url(), Some("http://cam:8080"));
    }

    #[test]
    fn cool_down_is_transient_connection_error() {
        let err = Error::Connection {
            url: "http://cam:8080".into(),
            path: "/".into(),
            message: "retry later".into(),
            failure: ConnectionFailure::CoolDown,
            source: None,
        };
        assert!(err.is_connection());
        assert!(err.is_transient());
        assert_eq!(err.status(), None);
        assert_eq!(err.connection_failure(), Some(ConnectionFailure::CoolDown));
    }

    #[test]
    fn server_errors_are_transient() {
        assert!(http(503).is_transient());
        assert!(!http(404).is_transient());
    }
}
