//! Daemon configuration subcommands.

use serde::Serialize;
use tabled::Tabled;
use tracing::warn;

use motion_core::{ConfigTable, GLOBAL_ID, MotionClient, Param, Section, schema};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, SetArgs};
use crate::error::CliError;
use crate::output;

const NOT_DEFINED: &str = "(not defined)";

#[derive(Serialize)]
struct ConfigEntry {
    key: String,
    value: Option<String>,
    section: Option<Section>,
}

impl ConfigEntry {
    fn new(key: &str, value: Option<&Param>) -> Self {
        Self {
            key: key.to_owned(),
            value: value.map(ToString::to_string),
            section: schema::section_of(key),
        }
    }

    fn display_value(&self) -> &str {
        self.value.as_deref().unwrap_or(NOT_DEFINED)
    }
}

#[derive(Tabled)]
struct ConfigRow {
    #[tabled(rename = "Option")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Section")]
    section: String,
}

impl From<&ConfigEntry> for ConfigRow {
    fn from(e: &ConfigEntry) -> Self {
        Self {
            key: e.key.clone(),
            value: e.display_value().to_owned(),
            section: e.section.map(|s| s.to_string()).unwrap_or_default(),
        }
    }
}

pub async fn handle(
    client: &mut MotionClient,
    args: ConfigArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::List { target, section } => {
            let section = section.as_deref().map(parse_section).transpose()?;
            let table = client.config_list(&target.camera).await?;
            let entries: Vec<ConfigEntry> = table
                .iter()
                .map(|(key, value)| ConfigEntry::new(key, value))
                .filter(|e| section.is_none() || e.section == section)
                .collect();

            let out = output::render_list(
                global.output,
                &entries,
                |e| ConfigRow::from(e),
                |e| format!("{}={}", e.key, e.value.as_deref().unwrap_or_default()),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Get { key, target } => {
            let table = client.config_list(&target.camera).await?;
            let entry = lookup(&table, &key)?;
            let out = output::render_single(
                global.output,
                &entry,
                |e| format!("{} = {}", e.key, e.display_value()),
                |e| e.value.clone().unwrap_or_default(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Set(args) => {
            apply(client, &args).await?;
            let pending: Vec<&str> = client.pending_restarts().collect();
            if !pending.is_empty() {
                output::notice(
                    &format!(
                        "Restart needed for: {} (run `motionctl config sync` or `motionctl restart`)",
                        pending.join(", ")
                    ),
                    global.quiet,
                );
            }
            Ok(())
        }

        ConfigCommand::Write => {
            client.config_write().await?;
            output::notice("Configuration written", global.quiet);
            Ok(())
        }

        ConfigCommand::Sync(args) => {
            apply(client, &args).await?;
            client.sync_config().await?;
            output::notice("Configuration written and restarts issued", global.quiet);
            Ok(())
        }
    }
}

/// Validate every assignment up front, then send them in order.
async fn apply(client: &mut MotionClient, args: &SetArgs) -> Result<(), CliError> {
    let camera = args.target.camera.as_str();
    let assignments = args
        .assignments
        .iter()
        .map(|a| parse_assignment(a, camera))
        .collect::<Result<Vec<_>, _>>()?;

    // The cache lets unchanged values be skipped and global values propagate.
    client.refresh(false).await?;

    for (key, value) in assignments {
        client
            .config_set(key, value, camera, args.force, args.persist)
            .await?;
    }
    Ok(())
}

fn parse_assignment<'a>(raw: &'a str, camera: &str) -> Result<(&'a str, &'a str), CliError> {
    let (key, value) = raw
        .split_once('=')
        .map(|(k, v)| (k.trim(), v.trim()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| CliError::Validation {
            field: "assignment".into(),
            reason: format!("expected KEY=VALUE, got '{raw}'"),
        })?;

    if let Some(descriptor) = schema::descriptor(key) {
        descriptor
            .validator
            .check(value)
            .map_err(|reason| CliError::Validation {
                field: key.to_owned(),
                reason,
            })?;
    } else {
        warn!(key, "option not in the known schema, sending as text");
    }

    if camera != GLOBAL_ID && schema::is_global_only(key) {
        return Err(CliError::Validation {
            field: key.to_owned(),
            reason: "global option, set it with --camera 0".into(),
        });
    }
    Ok((key, value))
}

fn parse_section(raw: &str) -> Result<Section, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: "section".into(),
        reason: format!("unknown section '{raw}'"),
    })
}

fn lookup(table: &ConfigTable, key: &str) -> Result<ConfigEntry, CliError> {
    if !table.contains_key(key) {
        return Err(CliError::NotFound {
            resource_type: "option".into(),
            identifier: key.to_owned(),
            list_command: "config list".into(),
        });
    }
    Ok(ConfigEntry::new(key, table.get(key)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_are_validated_against_schema() {
        assert_eq!(
            parse_assignment("framerate = 15", "1").ok(),
            Some(("framerate", "15"))
        );
        assert!(matches!(
            parse_assignment("framerate=fast", "1"),
            Err(CliError::Validation { ref field, .. }) if field == "framerate"
        ));
        assert!(parse_assignment("framerate", "1").is_err());
        assert!(parse_assignment("=15", "1").is_err());
    }

    #[test]
    fn unknown_keys_pass_through() {
        assert_eq!(
            parse_assignment("my_option=x=y", "0").ok(),
            Some(("my_option", "x=y"))
        );
    }

    #[test]
    fn global_only_option_needs_global_target() {
        assert!(parse_assignment("log_file=/var/log/motion.log", "1").is_err());
        assert!(parse_assignment("log_file=/var/log/motion.log", "0").is_ok());
    }

    #[test]
    fn sections_parse_case_insensitively() {
        assert_eq!(parse_section("Stream").ok(), Some(Section::Stream));
        assert!(parse_section("nonsense").is_err());
    }
}
