//! Shared configuration for motion daemon tools.
//!
//! TOML profiles, credential resolution (env + plaintext), and translation
//! to `motion_core::ClientConfig`. The CLI layers its flag overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use motion_core::{ClientConfig, TlsMode};

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "MOTIONCTL_CONFIG";
/// Password used when a profile names no `password_env`.
pub const PASSWORD_ENV: &str = "MOTION_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named daemon profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub tls_mode: TlsMode,

    /// Seconds a failed daemon is left alone before the next attempt.
    #[serde(default = "default_reconnect_interval")]
    pub reconnect_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            tls_mode: TlsMode::default(),
            reconnect_interval: default_reconnect_interval(),
        }
    }
}

fn default_timeout() -> u64 {
    5
}
fn default_reconnect_interval() -> u64 {
    10
}
fn default_port() -> u16 {
    motion_core::config::DEFAULT_PORT
}

/// A named daemon profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Daemon host name or address.
    pub host: String,

    /// Webcontrol port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Username for webcontrol basic auth.
    pub username: Option<String>,

    /// Password (plaintext -- prefer `password_env`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Environment variable name containing the password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    /// Override the default TLS mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_mode: Option<TlsMode>,

    /// Override the default timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Profile {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            username: None,
            password: None,
            password_env: None,
            tls_mode: None,
            timeout: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `MOTIONCTL_CONFIG`, then platform conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("org", "motion-project", "motionctl").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("motionctl");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + `MOTION_*` environment (`__` separates nesting,
/// e.g. `MOTION_DEFAULTS__TIMEOUT`). A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("MOTION_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the webcontrol password for a profile.
///
/// Order: the profile's `password_env` variable, then `MOTION_PASSWORD`,
/// then the plaintext `password`.
pub fn resolve_password(profile: &Profile) -> Option<SecretString> {
    resolve_password_with(profile, |name| std::env::var(name).ok())
}

fn resolve_password_with(
    profile: &Profile,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<SecretString> {
    // 1. Profile's password_env → env var lookup
    if let Some(pw) = profile.password_env.as_deref().and_then(&lookup) {
        return Some(SecretString::from(pw));
    }

    // 2. Shared env var
    if let Some(pw) = lookup(PASSWORD_ENV) {
        return Some(SecretString::from(pw));
    }

    // 3. Plaintext in config
    profile.password.clone().map(SecretString::from)
}

/// Build a `ClientConfig` from a profile and the global defaults.
pub fn profile_to_client_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    if profile.host.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: "must not be empty".into(),
        });
    }
    if profile.port == 0 {
        return Err(ConfigError::Validation {
            field: "port".into(),
            reason: "must be between 1 and 65535".into(),
        });
    }

    Ok(ClientConfig {
        host: profile.host.clone(),
        port: profile.port,
        username: profile.username.clone(),
        password: resolve_password(profile),
        tls: profile.tls_mode.unwrap_or(defaults.tls_mode),
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        reconnect_interval: Duration::from_secs(defaults.reconnect_interval),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "garage"

[defaults]
timeout = 8
tls_mode = "relaxed"

[profiles.garage]
host = "10.0.0.5"
username = "admin"
password = "hunter2"

[profiles.attic]
host = "attic.local"
port = 7999
tls_mode = "none"
timeout = 2
"#;

    fn lookup_in(
        vars: &'static [(&'static str, &'static str)],
    ) -> impl Fn(&str) -> Option<String> {
        move |name: &str| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| (*v).to_owned())
        }
    }

    fn load_sample() -> Config {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        load_config_from(&path).unwrap()
    }

    #[test]
    fn loads_profiles_and_defaults() {
        let cfg = load_sample();
        assert_eq!(cfg.default_profile.as_deref(), Some("garage"));
        assert_eq!(cfg.defaults.timeout, 8);
        assert_eq!(cfg.defaults.tls_mode, TlsMode::Relaxed);
        assert_eq!(cfg.defaults.reconnect_interval, 10);
        assert_eq!(cfg.profiles.keys().collect::<Vec<_>>(), ["attic", "garage"]);
        assert_eq!(cfg.profiles["garage"].port, 8080);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn profile_overrides_defaults() {
        let cfg = load_sample();
        let attic = profile_to_client_config(&cfg.profiles["attic"], &cfg.defaults).unwrap();
        assert_eq!(attic.port, 7999);
        assert_eq!(attic.tls, TlsMode::None);
        assert_eq!(attic.timeout, Duration::from_secs(2));

        let garage = profile_to_client_config(&cfg.profiles["garage"], &cfg.defaults).unwrap();
        assert_eq!(garage.tls, TlsMode::Relaxed);
        assert_eq!(garage.timeout, Duration::from_secs(8));
        assert_eq!(garage.reconnect_interval, Duration::from_secs(10));
    }

    #[test]
    fn rejects_empty_host() {
        let err = profile_to_client_config(&Profile::new(" ", 8080), &Defaults::default());
        assert!(matches!(err, Err(ConfigError::Validation { ref field, .. }) if field == "host"));
    }

    #[test]
    fn password_resolution_order() {
        let mut profile = Profile::new("cam", 8080);
        profile.password = Some("plain".into());
        profile.password_env = Some("GARAGE_PW".into());

        let resolve = |vars: &'static [(&'static str, &'static str)]| {
            resolve_password_with(&profile, lookup_in(vars)).map(|s| s.expose_secret().to_owned())
        };

        assert_eq!(
            resolve(&[("GARAGE_PW", "from-profile-env"), (PASSWORD_ENV, "shared")]),
            Some("from-profile-env".into())
        );
        assert_eq!(resolve(&[(PASSWORD_ENV, "shared")]), Some("shared".into()));
        assert_eq!(resolve(&[]), Some("plain".into()));
    }

    #[test]
    fn save_round_trips_through_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        let mut profile = Profile::new("10.0.0.9", 8088);
        profile.tls_mode = Some(TlsMode::Strict);
        cfg.profiles.insert("lab".into(), profile);
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let lab = &loaded.profiles["lab"];
        assert_eq!(lab.host, "10.0.0.9");
        assert_eq!(lab.port, 8088);
        assert_eq!(lab.tls_mode, Some(TlsMode::Strict));
        assert!(lab.password.is_none());
    }
}
