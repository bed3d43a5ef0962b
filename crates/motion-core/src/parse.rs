// ── Webctrl response parsing ──
//
// The daemon answers either with an html page or with plaintext depending on
// `webcontrol_interface`. Content-Type is not reliable (4.3 sends plaintext
// labelled text/html), so the body prefix decides.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use motion_api::GLOBAL_ID;

use crate::model::param::try_build_value;
use crate::model::{ConfigTable, DaemonVersion, Param};

const HTML_PREFIX: &str = "<!DOCTYPE html>";

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid static regex")
}

static CONFIG_HTML: LazyLock<Regex> = LazyLock::new(|| regex(r">(\w+)</a> = (.*)</li>"));
static CONFIG_TEXT: LazyLock<Regex> = LazyLock::new(|| regex(r"(\w+)\s*=\s*(.*?)\s*\n"));
static TITLE: LazyLock<Regex> = LazyLock::new(|| regex(r"<title>(.*)</title>"));
static CAMERA_CLICK: LazyLock<Regex> = LazyLock::new(|| regex(r"camera_click\('cam_(\d+)'"));
static CAMERA_LINK: LazyLock<Regex> = LazyLock::new(|| regex(r"<a href='/(\d+)/'>Camera"));
static VERSION: LazyLock<Regex> = LazyLock::new(|| regex(r"Motion ([\w.]+)"));
static CONNECTION: LazyLock<Regex> = LazyLock::new(|| regex(r"\s*(\d+).*(OK|Lost).*\n"));
static DETECTION: LazyLock<Regex> = LazyLock::new(|| regex(r"\s*(\d+).*(ACTIVE|PAUSE)"));

/// Which webctrl flavour produced a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    Html,
    Text,
}

impl ResponseShape {
    pub fn detect(body: &str) -> Self {
        if body.starts_with(HTML_PREFIX) {
            Self::Html
        } else {
            Self::Text
        }
    }
}

// ── config/list ─────────────────────────────────────────────────────

/// Parse a `config/list` body into a typed table.
///
/// Values that don't fit their schema are logged and kept as plain text.
/// An empty body yields an empty table.
pub fn parse_config_list(body: &str) -> ConfigTable {
    let pattern = match ResponseShape::detect(body) {
        ResponseShape::Html => &*CONFIG_HTML,
        ResponseShape::Text => &*CONFIG_TEXT,
    };

    let mut table = ConfigTable::new();
    for caps in pattern.captures_iter(body) {
        let (_, [key, raw]) = caps.extract();
        let value = match try_build_value(key, raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, raw, error = %e, "config value does not match its schema");
                Some(Param::text(raw))
            }
        };
        table.insert(key, value);
    }
    table
}

// ── Root page ───────────────────────────────────────────────────────

/// What the root page tells us about the daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    pub shape: ResponseShape,
    pub description: Option<String>,
    /// Internal camera ids, in page order, without duplicates.
    pub camera_ids: Vec<String>,
    pub version: Option<DaemonVersion>,
}

pub fn parse_inventory(body: &str) -> Inventory {
    let shape = ResponseShape::detect(body);
    let mut camera_ids: Vec<String> = Vec::new();
    let mut push = |id: &str| {
        if !camera_ids.iter().any(|known| known == id) {
            camera_ids.push(id.to_owned());
        }
    };

    let description = match shape {
        ResponseShape::Html => {
            for pattern in [&*CAMERA_CLICK, &*CAMERA_LINK] {
                for caps in pattern.captures_iter(body) {
                    let (_, [id]) = caps.extract();
                    push(id);
                }
            }
            TITLE
                .captures(body)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_owned())
        }
        ResponseShape::Text => {
            let mut lines = body.lines();
            let first = lines.next().map(str::to_owned);
            let ids: Vec<&str> = lines.map(str::trim).filter(|id| !id.is_empty()).collect();
            // A lone trailing `0` means a single-thread daemon: thread 0 is the camera.
            for (i, &id) in ids.iter().enumerate() {
                if id != GLOBAL_ID || i + 1 == ids.len() {
                    push(id);
                }
            }
            first
        }
    };

    let version = VERSION
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| DaemonVersion::parse(m.as_str()));

    Inventory {
        shape,
        description,
        camera_ids,
        version,
    }
}

// ── detection/* ─────────────────────────────────────────────────────

/// `(camera_id, connected)` pairs from `detection/connection`.
pub fn parse_connection_status(body: &str) -> Vec<(String, bool)> {
    CONNECTION
        .captures_iter(body)
        .map(|caps| {
            let (_, [id, state]) = caps.extract();
            (id.to_owned(), state == "OK")
        })
        .collect()
}

/// `(camera_id, paused)` pairs from `detection/status`.
pub fn parse_detection_status(body: &str) -> Vec<(String, bool)> {
    DETECTION
        .captures_iter(body)
        .map(|caps| {
            let (_, [id, state]) = caps.extract();
            (id.to_owned(), state == "PAUSE")
        })
        .collect()
}

/// Pause state after `detection/start`. Optimistic: only an explicit
/// "paused" in the reply keeps the camera paused.
pub fn paused_after_start(response: &str) -> bool {
    response.contains("paused")
}

/// Pause state after `detection/pause`, unless the reply says "resumed".
pub fn paused_after_pause(response: &str) -> bool {
    !response.contains("resumed")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::ParamKind;

    const HTML_CONFIG: &str = "<!DOCTYPE html>\n<html><body><ul>\n\
        <li><a href=/0/config/set?framerate>framerate</a> = 15</li>\n\
        <li><a href=/0/config/set?stream_tls>stream_tls</a> = off</li>\n\
        <li><a href=/0/config/set?target_dir>target_dir</a> = (not defined)</li>\n\
        </ul></body></html>";

    #[test]
    fn html_config_list() {
        let table = parse_config_list(HTML_CONFIG);
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("framerate").and_then(Param::as_i64), Some(15));
        assert_eq!(table.get("stream_tls").and_then(Param::as_bool), Some(false));
        assert!(table.contains_key("target_dir"));
        assert!(table.get("target_dir").is_none());
    }

    #[test]
    fn text_config_list_trims_and_later_wins() {
        let body = "camera_id = 101\nlog_type =  evt  \ntext_left = Front door\ncamera_id = 102\n";
        let table = parse_config_list(body);
        assert_eq!(table.keys().collect::<Vec<_>>(), ["camera_id", "log_type", "text_left"]);
        assert_eq!(table.get("camera_id").map(ToString::to_string).as_deref(), Some("102"));
        assert_eq!(table.get("log_type").map(ToString::to_string).as_deref(), Some("EVT"));
        assert_eq!(
            table.get("text_left").map(ToString::to_string).as_deref(),
            Some("Front door")
        );
    }

    #[test]
    fn malformed_values_are_kept_as_text() {
        let table = parse_config_list("framerate = fast\n");
        let value = table.get("framerate").expect("kept");
        assert_eq!(value.kind(), ParamKind::Text);
        assert_eq!(value.as_str(), "fast");
    }

    #[test]
    fn empty_body_is_empty_table() {
        assert!(parse_config_list("").is_empty());
    }

    #[test]
    fn html_inventory() {
        let body = "<!DOCTYPE html>\n<html><head><title>Motion 4.3.2</title></head><body>\
            <a onclick=\"camera_click('cam_1');\">Cam 1</a>\
            <a onclick=\"camera_click('cam_2');\">Cam 2</a>\
            <a onclick=\"camera_click('cam_1');\">Cam 1</a>\
            </body></html>";
        let inv = parse_inventory(body);
        assert_eq!(inv.shape, ResponseShape::Html);
        assert_eq!(inv.description.as_deref(), Some("Motion 4.3.2"));
        assert_eq!(inv.camera_ids, ["1", "2"]);
        let version = inv.version.expect("version");
        assert_eq!((version.major, version.minor, version.build), (4, 3, 2));
    }

    #[test]
    fn legacy_html_inventory_uses_links() {
        let body = "<!DOCTYPE html>\n<html><head><title>Motion 4.1.1</title></head><body>\
            <a href='/1/'>Camera 1</a><br><a href='/2/'>Camera 2</a>";
        assert_eq!(parse_inventory(body).camera_ids, ["1", "2"]);
    }

    #[test]
    fn text_inventory_skips_global_thread() {
        let inv = parse_inventory("Motion 4.3.2 Running [2] Cameras\n0\n1\n3\n");
        assert_eq!(inv.shape, ResponseShape::Text);
        assert_eq!(inv.description.as_deref(), Some("Motion 4.3.2 Running [2] Cameras"));
        assert_eq!(inv.camera_ids, ["1", "3"]);
        assert_eq!(inv.version.map(|v| v.raw), Some("4.3.2".to_owned()));
    }

    #[test]
    fn text_inventory_single_thread_daemon() {
        let inv = parse_inventory("Motion 4.3.2 Running [1] Camera\n0\n");
        assert_eq!(inv.camera_ids, ["0"]);
    }

    #[test]
    fn empty_root_page() {
        let inv = parse_inventory("");
        assert!(inv.description.is_none());
        assert!(inv.camera_ids.is_empty());
        assert!(inv.version.is_none());
    }

    #[test]
    fn connection_status() {
        let body = "Camera 1 Connection OK\nCamera 2 Connection Lost\n";
        assert_eq!(
            parse_connection_status(body),
            vec![("1".to_owned(), true), ("2".to_owned(), false)]
        );
    }

    #[test]
    fn detection_status() {
        let body = "Camera 1 Detection status ACTIVE \nCamera 2 Detection status PAUSE \n";
        assert_eq!(
            parse_detection_status(body),
            vec![("1".to_owned(), false), ("2".to_owned(), true)]
        );
    }

    #[test]
    fn start_pause_inference() {
        assert!(!paused_after_start("Camera 1 Detection resumed\nDone"));
        assert!(paused_after_start("Camera 1 Detection paused\nDone"));
        assert!(paused_after_pause(""));
        assert!(!paused_after_pause("Camera 1 Detection resumed"));
    }
}
