//! Turns profiles plus global flags into a `ClientConfig`.
//!
//! Flags and `MOTION_*` variables win over the profile; without any
//! profile, `--host` alone is enough.

use std::time::Duration;

use secrecy::SecretString;

use motion_config::{Config, Profile, config_path, profile_to_client_config};
use motion_core::{ClientConfig, TlsMode};

use crate::cli::{GlobalOpts, TlsArg};
use crate::error::CliError;

impl From<TlsArg> for TlsMode {
    fn from(arg: TlsArg) -> Self {
        match arg {
            TlsArg::Auto => Self::Auto,
            TlsArg::None => Self::None,
            TlsArg::Relaxed => Self::Relaxed,
            TlsArg::Strict => Self::Strict,
        }
    }
}

/// `--profile`, then `default_profile`, then "default".
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the connection config for the selected daemon.
pub fn build_client_config(global: &GlobalOpts, cfg: &Config) -> Result<ClientConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut client = if let Some(profile) = cfg.profiles.get(&profile_name) {
        profile_to_client_config(profile, &cfg.defaults)?
    } else if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(cfg),
        });
    } else {
        let host = global.host.as_deref().ok_or_else(|| CliError::NoConfig {
            path: config_path().display().to_string(),
        })?;
        let profile = Profile::new(host, motion_core::config::DEFAULT_PORT);
        profile_to_client_config(&profile, &cfg.defaults)?
    };

    apply_overrides(&mut client, global);
    if client.host.trim().is_empty() {
        return Err(CliError::Validation {
            field: "host".into(),
            reason: "must not be empty".into(),
        });
    }
    Ok(client)
}

fn apply_overrides(client: &mut ClientConfig, global: &GlobalOpts) {
    if let Some(host) = &global.host {
        client.host.clone_from(host);
    }
    if let Some(port) = global.port {
        client.port = port;
    }
    if let Some(username) = &global.username {
        client.username = Some(username.clone());
    }
    if let Some(password) = &global.password {
        client.password = Some(SecretString::from(password.clone()));
    }
    if let Some(tls) = global.tls {
        client.tls = tls.into();
    }
    if let Some(timeout) = global.timeout {
        client.timeout = Duration::from_secs(timeout);
    }
}

fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["motionctl"];
        argv.extend_from_slice(args);
        argv.push("status");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with(name: &str, profile: Profile) -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(name.into(), profile);
        cfg
    }

    #[test]
    fn flags_override_profile() {
        let cfg = config_with("default", Profile::new("garage.local", 8080));
        let client = build_client_config(
            &global(&["--port", "7999", "--tls", "strict", "--timeout", "3"]),
            &cfg,
        )
        .unwrap();
        assert_eq!(client.host, "garage.local");
        assert_eq!(client.port, 7999);
        assert_eq!(client.tls, TlsMode::Strict);
        assert_eq!(client.timeout, Duration::from_secs(3));
    }

    #[test]
    fn host_flag_works_without_profiles() {
        let client = build_client_config(&global(&["--host", "10.0.0.7"]), &Config::default())
            .unwrap();
        assert_eq!(client.host, "10.0.0.7");
        assert_eq!(client.port, 8080);
        assert_eq!(client.tls, TlsMode::Auto);
    }

    #[test]
    fn explicit_missing_profile_is_an_error() {
        let cfg = config_with("garage", Profile::new("garage.local", 8080));
        let err = build_client_config(&global(&["--profile", "attic"]), &cfg).unwrap_err();
        assert!(
            matches!(err, CliError::ProfileNotFound { ref available, .. } if available == "garage")
        );
    }

    #[test]
    fn nothing_configured() {
        let err = build_client_config(&global(&[]), &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }
}
