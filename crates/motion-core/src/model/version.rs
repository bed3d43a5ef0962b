use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static PARTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\.*(\d*)\.*(\d*)").expect("valid version regex"));

/// Daemon version as advertised on the root page (e.g. `4.3.2`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaemonVersion {
    pub raw: String,
    pub major: u32,
    pub minor: u32,
    pub build: u32,
}

impl Default for DaemonVersion {
    fn default() -> Self {
        Self {
            raw: "unknown".into(),
            major: 0,
            minor: 0,
            build: 0,
        }
    }
}

impl DaemonVersion {
    /// Components that are missing or unparseable read as 0.
    pub fn parse(raw: &str) -> Self {
        let mut version = Self {
            raw: raw.to_owned(),
            major: 0,
            minor: 0,
            build: 0,
        };
        if let Some(caps) = PARTS.captures(raw) {
            let part = |i: usize| {
                caps.get(i)
                    .and_then(|m| m.as_str().parse::<u32>().ok())
                    .unwrap_or(0)
            };
            version.major = part(1);
            version.minor = part(2);
            version.build = part(3);
        }
        version
    }
}

impl fmt::Display for DaemonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Capabilities inferred from the daemon's responses during refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Features {
    /// Root page is served as html (`webcontrol_interface` 0/1/2).
    pub webhtml: bool,
    /// Daemon knows `webcontrol_tls` (>= 4.2).
    pub tls: bool,
    /// Stream server accepts `/{id}/stream` style paths.
    pub advanced_stream: bool,
    /// Actions addressed to thread 0 apply to every camera.
    pub global_actions: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_and_partial_versions() {
        let v = DaemonVersion::parse("4.3.2");
        assert_eq!((v.major, v.minor, v.build), (4, 3, 2));

        let v = DaemonVersion::parse("4.1");
        assert_eq!((v.major, v.minor, v.build), (4, 1, 0));

        let v = DaemonVersion::parse("5");
        assert_eq!((v.major, v.minor, v.build), (5, 0, 0));
    }

    #[test]
    fn garbage_yields_zeros_but_keeps_raw() {
        let v = DaemonVersion::parse("git");
        assert_eq!((v.major, v.minor, v.build), (0, 0, 0));
        assert_eq!(v.to_string(), "git");
    }
}
