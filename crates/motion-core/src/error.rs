// ── Core error types ──
//
// User-facing errors from motion-core. The `From<motion_api::Error>` impl
// translates transport-layer errors into the two outcomes callers care
// about: the daemon was unreachable, or it answered and refused.

use thiserror::Error;

use motion_api::ConnectionFailure;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    /// The daemon is presumed unreachable (timeout, refused, cooling down).
    #[error("Cannot connect to motion daemon at {url} ({path}): {reason}")]
    ConnectionFailed {
        url: String,
        path: String,
        reason: String,
        failure: ConnectionFailure,
    },

    // ── Daemon errors ────────────────────────────────────────────────
    #[error("Authentication failed at {url}: {message}")]
    AuthenticationFailed { url: String, message: String },

    /// The daemon answered with an error status.
    #[error("Request {path} rejected by motion daemon (HTTP {status}): {message}")]
    Rejected {
        path: String,
        status: u16,
        message: String,
    },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Camera not found: {id}")]
    CameraNotFound { id: String },

    // ── Setup errors ─────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// The daemon could not be reached at all.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. })
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }

    /// Request skipped because the endpoint failed recently.
    pub fn is_cooling_down(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed {
                failure: ConnectionFailure::CoolDown,
                ..
            }
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::AuthenticationFailed { .. } => Some(401),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<motion_api::Error> for CoreError {
    fn from(err: motion_api::Error) -> Self {
        match err {
            motion_api::Error::Connection {
                url,
                path,
                message,
                failure,
                ..
            } => CoreError::ConnectionFailed {
                url,
                path,
                reason: message,
                failure,
            },
            motion_api::Error::Http {
                url,
                status: 401,
                message,
                ..
            } => CoreError::AuthenticationFailed { url, message },
            motion_api::Error::Http {
                path,
                status,
                message,
                ..
            } => CoreError::Rejected {
                path,
                status,
                message,
            },
            motion_api::Error::Tls(message) => CoreError::Config { message },
        }
    }
}
