//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use motion_config::ConfigError;
use motion_core::{ConnectionFailure, CoreError};

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to motion daemon at {url}")]
    #[diagnostic(
        code(motionctl::connection_failed),
        help(
            "Check that motion is running with webcontrol_port set and reachable.\n\
             Reason: {reason}\n\
             Try: motionctl status --tls auto"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request {path} timed out at {url}")]
    #[diagnostic(
        code(motionctl::timeout),
        help("Increase timeout with --timeout or check daemon responsiveness.")
    )]
    Timeout { url: String, path: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed at {url}")]
    #[diagnostic(
        code(motionctl::auth_failed),
        help(
            "Verify webcontrol_authentication on the daemon.\n\
             Pass --username/--password, or set password_env in your profile."
        )
    )]
    AuthFailed { url: String },

    // ── Daemon ───────────────────────────────────────────────────────
    #[error("Daemon rejected {path} (HTTP {status})")]
    #[diagnostic(code(motionctl::rejected), help("{message}"))]
    Rejected {
        path: String,
        status: u16,
        message: String,
    },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(motionctl::not_found),
        help("Run: motionctl {list_command} to see what is available")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(motionctl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(motionctl::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: motionctl profile add <NAME> --host <HOST>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No daemon configured")]
    #[diagnostic(
        code(motionctl::no_config),
        help(
            "Pass --host, or create a profile with: motionctl profile add default --host <HOST>\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(motionctl::config))]
    Config(#[from] ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed {
                url,
                path,
                failure: ConnectionFailure::Timeout,
                ..
            } => CliError::Timeout { url, path },

            CoreError::ConnectionFailed { url, reason, .. } => {
                CliError::ConnectionFailed { url, reason }
            }

            CoreError::AuthenticationFailed { url, .. } => CliError::AuthFailed { url },

            CoreError::Rejected {
                path,
                status,
                message,
            } => CliError::Rejected {
                path,
                status,
                message,
            },

            CoreError::CameraNotFound { id } => CliError::NotFound {
                resource_type: "camera".into(),
                identifier: id,
                list_command: "cameras".into(),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "connection".into(),
                reason: message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_get_their_own_exit_code() {
        let err = CliError::from(CoreError::ConnectionFailed {
            url: "http://cam:8080".into(),
            path: "/0/config/list".into(),
            reason: "timed out".into(),
            failure: ConnectionFailure::Timeout,
        });
        assert!(matches!(err, CliError::Timeout { .. }));
        assert_eq!(err.exit_code(), exit_code::TIMEOUT);
    }

    #[test]
    fn refused_connection_and_bad_auth_are_distinct() {
        let refused = CliError::from(CoreError::ConnectionFailed {
            url: "http://cam:8080".into(),
            path: "/".into(),
            reason: "connection refused".into(),
            failure: ConnectionFailure::Transport,
        });
        let auth = CliError::from(CoreError::AuthenticationFailed {
            url: "http://cam:8080".into(),
            message: "Unauthorized".into(),
        });
        assert_eq!(refused.exit_code(), exit_code::CONNECTION);
        assert_eq!(auth.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn unknown_camera_is_not_found() {
        let err = CliError::from(CoreError::CameraNotFound { id: "9".into() });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert_eq!(err.to_string(), "camera '9' not found");
    }
}
