//! Profile subcommand handlers.

use serde::Serialize;
use tabled::Tabled;

use motion_config::{Config, Profile};
use motion_core::TlsMode;

use crate::cli::{GlobalOpts, ProfileArgs, ProfileCommand};
use crate::error::CliError;
use crate::output;

/// A profile as shown to the user; plaintext passwords are never echoed.
#[derive(Serialize)]
struct ProfileSummary {
    name: String,
    default: bool,
    host: String,
    port: u16,
    username: Option<String>,
    password: Option<String>,
    tls_mode: Option<TlsMode>,
    timeout: Option<u64>,
}

impl ProfileSummary {
    fn new(name: &str, profile: &Profile, cfg: &Config) -> Self {
        let password = match (&profile.password_env, &profile.password) {
            (Some(var), _) => Some(format!("${var}")),
            (None, Some(_)) => Some("****".into()),
            (None, None) => None,
        };
        Self {
            name: name.to_owned(),
            default: cfg.default_profile.as_deref() == Some(name),
            host: profile.host.clone(),
            port: profile.port,
            username: profile.username.clone(),
            password,
            tls_mode: profile.tls_mode,
            timeout: profile.timeout,
        }
    }
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Port")]
    port: u16,
    #[tabled(rename = "User")]
    username: String,
    #[tabled(rename = "Password")]
    password: String,
    #[tabled(rename = "TLS")]
    tls_mode: String,
}

impl From<&ProfileSummary> for ProfileRow {
    fn from(p: &ProfileSummary) -> Self {
        Self {
            marker: if p.default { "*" } else { "" },
            name: p.name.clone(),
            host: p.host.clone(),
            port: p.port,
            username: p.username.clone().unwrap_or_default(),
            password: p.password.clone().unwrap_or_default(),
            tls_mode: p.tls_mode.map(|t| t.to_string()).unwrap_or_default(),
        }
    }
}

pub fn handle(args: ProfileArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ProfileCommand::Add {
            name,
            password_env,
            default,
        } => {
            let host = global.host.clone().ok_or_else(|| CliError::Validation {
                field: "host".into(),
                reason: "profile add needs --host".into(),
            })?;

            let mut cfg = motion_config::load_config()?;
            let port = global.port.unwrap_or(motion_core::config::DEFAULT_PORT);
            let mut profile = Profile::new(host, port);
            profile.username.clone_from(&global.username);
            profile.password_env = password_env;
            profile.tls_mode = global.tls.map(TlsMode::from);
            profile.timeout = global.timeout;

            let replaced = cfg.profiles.insert(name.clone(), profile).is_some();
            if default || cfg.profiles.len() == 1 {
                cfg.default_profile = Some(name.clone());
            }
            motion_config::save_config(&cfg)?;

            let verb = if replaced { "Updated" } else { "Added" };
            output::notice(
                &format!("{verb} profile '{name}' in {}", motion_config::config_path().display()),
                global.quiet,
            );
            Ok(())
        }

        ProfileCommand::List => {
            let cfg = motion_config::load_config()?;
            let profiles: Vec<ProfileSummary> = cfg
                .profiles
                .iter()
                .map(|(name, profile)| ProfileSummary::new(name, profile, &cfg))
                .collect();
            let out = output::render_list(
                global.output,
                &profiles,
                |p| ProfileRow::from(p),
                |p| p.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
