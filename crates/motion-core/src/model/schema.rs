// Motion daemon configuration schema
//
// Static table of (almost) every motion.conf option with its section and
// descriptor. Keys renamed in motion 4.1.1 are kept as deprecated aliases so
// older daemons still parse into typed values.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;
use strum::{Display, EnumIter, EnumString};

use super::param::Descriptor;

/// Keys the client reads or reasons about directly.
pub mod keys {
    pub const CAMERA_ID: &str = "camera_id";
    pub const CAMERA_NAME: &str = "camera_name";
    pub const LOG_FILE: &str = "log_file";
    pub const LOGFILE: &str = "logfile";
    pub const LOG_LEVEL: &str = "log_level";
    pub const LOG_TYPE: &str = "log_type";
    pub const NATIVE_LANGUAGE: &str = "native_language";
    pub const VIDEO_DEVICE: &str = "video_device";
    pub const VIDEODEVICE: &str = "videodevice";
    pub const NETCAM_URL: &str = "netcam_url";
    pub const NETCAM_HIGHRES: &str = "netcam_highres";
    pub const MMALCAM_NAME: &str = "mmalcam_name";
    pub const MMALCAM_CONTROL_PARAMS: &str = "mmalcam_control_params";
    pub const WEBCONTROL_TLS: &str = "webcontrol_tls";
    pub const STREAM_PORT: &str = "stream_port";
    pub const STREAM_AUTHENTICATION: &str = "stream_authentication";
    pub const STREAM_TLS: &str = "stream_tls";
    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";
    pub const ROTATE: &str = "rotate";
    pub const FLIP_AXIS: &str = "flip_axis";
}

use keys::{
    CAMERA_ID, CAMERA_NAME, FLIP_AXIS, HEIGHT, LOG_FILE, LOG_LEVEL, LOG_TYPE, LOGFILE,
    MMALCAM_CONTROL_PARAMS, MMALCAM_NAME, NATIVE_LANGUAGE, NETCAM_HIGHRES, NETCAM_URL, ROTATE,
    STREAM_AUTHENTICATION, STREAM_PORT, STREAM_TLS, VIDEO_DEVICE, VIDEODEVICE, WEBCONTROL_TLS,
    WIDTH,
};

/// Grouping used by the daemon's own documentation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    System,
    V4l2,
    Netcam,
    Mmalcam,
    Webcontrol,
    Stream,
    Image,
    Motion,
    Script,
    Picture,
    Movie,
    Timelapse,
    Database,
    Track,
}

/// One schema row.
#[derive(Debug, Clone, Copy)]
pub struct SchemaEntry {
    pub key: &'static str,
    pub section: Section,
    pub descriptor: Descriptor,
    /// Pre-4.1.1 name, superseded by a newer key.
    pub deprecated: bool,
}

const fn entry(key: &'static str, section: Section, descriptor: Descriptor) -> SchemaEntry {
    SchemaEntry {
        key,
        section,
        descriptor,
        deprecated: false,
    }
}

const fn legacy(key: &'static str, section: Section, descriptor: Descriptor) -> SchemaEntry {
    SchemaEntry {
        key,
        section,
        descriptor,
        deprecated: true,
    }
}

// ── Enumerations ────────────────────────────────────────────────────

pub const LOG_TYPES: &[&str] = &["COR", "STR", "ENC", "NET", "DBL", "EVT", "TRK", "VID", "ALL"];
pub const MOVIE_CODECS: &[&str] = &[
    "mpeg4", "msmpeg4", "swf", "flv", "ffv1", "mov", "mp4", "mkv", "hevc",
];
pub const TIMELAPSE_MODES: &[&str] = &[
    "hourly",
    "daily",
    "weekly-sunday",
    "weekly-monday",
    "monthly",
    "manual",
];
pub const TIMELAPSE_CODECS: &[&str] = &["mpg", "mpeg4"];
pub const PICTURE_TYPES: &[&str] = &["jpeg", "webp", "ppm"];
pub const PICTURE_OUTPUTS: &[&str] = &["off", "on", "first", "best"];
pub const NETCAM_USE_TCP_VALUES: &[&str] = &["on", "off", "force"];
pub const FLIP_AXES: &[&str] = &["none", "v", "h"];
pub const LOCATE_MOTION_MODES: &[&str] = &["off", "on", "preview"];
pub const LOCATE_MOTION_STYLES: &[&str] = &["box", "redbox", "cross", "redcross"];
/// 0 = none, 1 = basic, 2 = digest.
pub const AUTH_MODES: &[i64] = &[0, 1, 2];
pub const ROTATIONS: &[i64] = &[0, 90, 180, 270];
pub const STREAM_PREVIEW_METHODS: &[i64] = &[0, 1, 2, 3, 4];

const STR: Descriptor = Descriptor::TEXT;
const BOOL: Descriptor = Descriptor::BOOLEAN;
const INT: Descriptor = Descriptor::INTEGER;
const POSITIVE: Descriptor = Descriptor::range(Some(0), None);
const PERCENT: Descriptor = Descriptor::range(Some(0), Some(100));
const BYTE: Descriptor = Descriptor::range(Some(0), Some(255));

const fn range(min: i64, max: i64) -> Descriptor {
    Descriptor::range(Some(min), Some(max))
}

// ── Table ───────────────────────────────────────────────────────────

#[rustfmt::skip]
static ENTRIES: &[SchemaEntry] = &[
    // system
    entry("setup_mode", Section::System, BOOL),
    entry("target_dir", Section::System, STR),
    entry(LOG_FILE, Section::System, STR),
    entry(LOG_LEVEL, Section::System, range(1, 9)),
    entry(LOG_TYPE, Section::System, Descriptor::upper_text_set(LOG_TYPES)),
    entry("quiet", Section::System, BOOL),
    entry(NATIVE_LANGUAGE, Section::System, BOOL),
    entry(CAMERA_NAME, Section::System, STR),
    entry(CAMERA_ID, Section::System, POSITIVE),
    legacy(LOGFILE, Section::System, STR),
    // v4l2
    entry(VIDEO_DEVICE, Section::V4l2, STR),
    legacy(VIDEODEVICE, Section::V4l2, STR),
    entry("video_params", Section::V4l2, STR),
    legacy("vid_control_params", Section::V4l2, STR),
    entry("v4l2_palette", Section::V4l2, range(0, 21)),
    legacy("brightness", Section::V4l2, BYTE),
    legacy("contrast", Section::V4l2, BYTE),
    legacy("hue", Section::V4l2, BYTE),
    legacy("power_line_frequency", Section::V4l2, range(-1, 3)),
    legacy("saturation", Section::V4l2, BYTE),
    entry("auto_brightness", Section::V4l2, range(0, 3)),
    entry("tuner_device", Section::V4l2, STR),
    legacy("tunerdevice", Section::V4l2, STR),
    // netcam
    entry(NETCAM_URL, Section::Netcam, STR),
    entry(NETCAM_HIGHRES, Section::Netcam, STR),
    entry("netcam_decoder", Section::Netcam, STR),
    entry("netcam_userpass", Section::Netcam, STR),
    entry("netcam_use_tcp", Section::Netcam, Descriptor::text_set(NETCAM_USE_TCP_VALUES)),
    entry("netcam_keepalive", Section::Netcam, BOOL),
    // mmalcam
    entry(MMALCAM_NAME, Section::Mmalcam, STR),
    entry(MMALCAM_CONTROL_PARAMS, Section::Mmalcam, STR),
    // webcontrol
    entry(WEBCONTROL_TLS, Section::Webcontrol, BOOL),
    // stream
    entry(STREAM_PORT, Section::Stream, POSITIVE),
    entry("stream_auth_method", Section::Stream, Descriptor::integer_set(AUTH_MODES)),
    entry(STREAM_AUTHENTICATION, Section::Stream, STR),
    entry(STREAM_TLS, Section::Stream, BOOL),
    entry("stream_grey", Section::Stream, BOOL),
    entry("stream_maxrate", Section::Stream, POSITIVE),
    entry("stream_motion", Section::Stream, BOOL),
    entry("stream_quality", Section::Stream, range(1, 100)),
    entry("stream_preview_method", Section::Stream, Descriptor::integer_set(STREAM_PREVIEW_METHODS)),
    // image
    entry(WIDTH, Section::Image, POSITIVE),
    entry(HEIGHT, Section::Image, POSITIVE),
    entry("framerate", Section::Image, range(2, 100)),
    entry("minimum_frame_time", Section::Image, POSITIVE),
    entry(ROTATE, Section::Image, Descriptor::integer_set(ROTATIONS)),
    entry(FLIP_AXIS, Section::Image, Descriptor::text_set(FLIP_AXES)),
    entry("locate_motion_mode", Section::Image, Descriptor::text_set(LOCATE_MOTION_MODES)),
    entry("locate_motion_style", Section::Image, Descriptor::text_set(LOCATE_MOTION_STYLES)),
    entry("text_left", Section::Image, STR),
    entry("text_right", Section::Image, STR),
    entry("text_changes", Section::Image, BOOL),
    entry("text_scale", Section::Image, range(1, 10)),
    entry("text_event", Section::Image, STR),
    // motion
    entry("emulate_motion", Section::Motion, BOOL),
    entry("threshold", Section::Motion, Descriptor::range(Some(1), None)),
    entry("threshold_maximum", Section::Motion, POSITIVE),
    entry("threshold_tune", Section::Motion, BOOL),
    entry("noise_level", Section::Motion, range(1, 255)),
    entry("noise_tune", Section::Motion, BOOL),
    entry("despeckle_filter", Section::Motion, STR),
    entry("area_detect", Section::Motion, STR),
    entry("mask_file", Section::Motion, STR),
    entry("mask_privacy", Section::Motion, STR),
    entry("smart_mask_speed", Section::Motion, range(0, 10)),
    entry("lightswitch_percent", Section::Motion, PERCENT),
    legacy("lightswitch", Section::Motion, PERCENT),
    entry("lightswitch_frames", Section::Motion, range(1, 1000)),
    entry("minimum_motion_frames", Section::Motion, range(1, 1000)),
    entry("event_gap", Section::Motion, POSITIVE),
    entry("pre_capture", Section::Motion, range(0, 100)),
    entry("post_capture", Section::Motion, POSITIVE),
    // script
    entry("on_event_start", Section::Script, STR),
    entry("on_event_end", Section::Script, STR),
    entry("on_picture_save", Section::Script, STR),
    entry("on_motion_detected", Section::Script, STR),
    entry("on_area_detected", Section::Script, STR),
    entry("on_movie_start", Section::Script, STR),
    entry("on_movie_end", Section::Script, STR),
    entry("on_camera_lost", Section::Script, STR),
    entry("on_camera_found", Section::Script, STR),
    // picture
    entry("picture_output", Section::Picture, Descriptor::text_set(PICTURE_OUTPUTS)),
    entry("picture_output_motion", Section::Picture, BOOL),
    entry("picture_type", Section::Picture, Descriptor::text_set(PICTURE_TYPES)),
    entry("picture_quality", Section::Picture, PERCENT),
    entry("picture_exif", Section::Picture, STR),
    entry("picture_filename", Section::Picture, STR),
    entry("snapshot_interval", Section::Picture, POSITIVE),
    entry("snapshot_filename", Section::Picture, STR),
    legacy("output_pictures", Section::Picture, Descriptor::text_set(PICTURE_OUTPUTS)),
    legacy("output_debug_pictures", Section::Picture, BOOL),
    legacy("quality", Section::Picture, PERCENT),
    legacy("exif_text", Section::Picture, STR),
    // movie
    entry("movie_output", Section::Movie, BOOL),
    entry("movie_output_motion", Section::Movie, BOOL),
    entry("movie_max_time", Section::Movie, POSITIVE),
    entry("movie_bps", Section::Movie, POSITIVE),
    entry("movie_quality", Section::Movie, PERCENT),
    entry("movie_codec", Section::Movie, Descriptor::text_set(MOVIE_CODECS)),
    entry("movie_duplicate_frames", Section::Movie, BOOL),
    entry("movie_passthrough", Section::Movie, BOOL),
    entry("movie_filename", Section::Movie, STR),
    entry("movie_extpipe_use", Section::Movie, BOOL),
    entry("movie_extpipe", Section::Movie, STR),
    legacy("ffmpeg_output_movies", Section::Movie, BOOL),
    legacy("ffmpeg_output_debug_movies", Section::Movie, BOOL),
    legacy("max_movie_time", Section::Movie, POSITIVE),
    legacy("ffmpeg_bps", Section::Movie, POSITIVE),
    legacy("ffmpeg_variable_bitrate", Section::Movie, PERCENT),
    legacy("ffmpeg_video_codec", Section::Movie, Descriptor::text_set(MOVIE_CODECS)),
    legacy("ffmpeg_duplicate_frames", Section::Movie, BOOL),
    legacy("use_extpipe", Section::Movie, BOOL),
    legacy("extpipe", Section::Movie, STR),
    // timelapse
    entry("timelapse_interval", Section::Timelapse, POSITIVE),
    entry("timelapse_mode", Section::Timelapse, Descriptor::text_set(TIMELAPSE_MODES)),
    entry("timelapse_fps", Section::Timelapse, range(0, 100)),
    entry("timelapse_codec", Section::Timelapse, Descriptor::text_set(TIMELAPSE_CODECS)),
    entry("timelapse_filename", Section::Timelapse, STR),
    // database
    entry("database_type", Section::Database, STR),
    entry("database_dbname", Section::Database, STR),
    entry("database_host", Section::Database, STR),
    entry("database_port", Section::Database, POSITIVE),
    entry("database_user", Section::Database, STR),
    entry("database_password", Section::Database, STR),
    entry("database_busy_timeout", Section::Database, POSITIVE),
    entry("sql_log_picture", Section::Database, BOOL),
    entry("sql_log_snapshot", Section::Database, BOOL),
    entry("sql_log_movie", Section::Database, BOOL),
    entry("sql_log_timelapse", Section::Database, BOOL),
    entry("sql_query", Section::Database, STR),
    entry("sql_query_start", Section::Database, STR),
    entry("sql_query_stop", Section::Database, STR),
    // track
    entry("track_type", Section::Track, INT),
    entry("track_auto", Section::Track, BOOL),
    entry("track_port", Section::Track, STR),
    entry("track_motorx", Section::Track, POSITIVE),
    entry("track_motorx_reverse", Section::Track, BOOL),
    entry("track_motory", Section::Track, POSITIVE),
    entry("track_motory_reverse", Section::Track, BOOL),
    entry("track_maxx", Section::Track, POSITIVE),
    entry("track_minx", Section::Track, POSITIVE),
    entry("track_maxy", Section::Track, POSITIVE),
    entry("track_miny", Section::Track, POSITIVE),
    entry("track_homex", Section::Track, POSITIVE),
    entry("track_homey", Section::Track, POSITIVE),
    entry("track_iomojo_id", Section::Track, POSITIVE),
    entry("track_step_angle_x", Section::Track, POSITIVE),
    entry("track_step_angle_y", Section::Track, POSITIVE),
    entry("track_move_wait", Section::Track, POSITIVE),
    entry("track_speed", Section::Track, POSITIVE),
    entry("track_stepsize", Section::Track, POSITIVE),
    entry("track_generic_move", Section::Track, STR),
];

static INDEX: LazyLock<HashMap<&'static str, &'static SchemaEntry>> =
    LazyLock::new(|| ENTRIES.iter().map(|e| (e.key, e)).collect());

/// Options only meaningful per camera (a global default makes no sense).
pub const CAMERA_ONLY: &[&str] = &[
    CAMERA_ID,
    CAMERA_NAME,
    VIDEO_DEVICE,
    VIDEODEVICE,
    NETCAM_URL,
    NETCAM_HIGHRES,
    MMALCAM_NAME,
    MMALCAM_CONTROL_PARAMS,
];

/// Options only valid in the global motion.conf.
pub const GLOBAL_ONLY: &[&str] = &[
    LOG_FILE,
    LOG_LEVEL,
    LOG_TYPE,
    LOGFILE,
    NATIVE_LANGUAGE,
    WEBCONTROL_TLS,
    STREAM_AUTHENTICATION,
];

/// Options that only take effect after the camera thread restarts.
pub const REQUIRES_RESTART: &[&str] = &[
    WIDTH,
    HEIGHT,
    ROTATE,
    FLIP_AXIS,
    VIDEO_DEVICE,
    VIDEODEVICE,
    NETCAM_URL,
    MMALCAM_NAME,
    MMALCAM_CONTROL_PARAMS,
];

// ── Lookups ─────────────────────────────────────────────────────────

pub fn lookup(key: &str) -> Option<&'static SchemaEntry> {
    INDEX.get(key).copied()
}

pub fn descriptor(key: &str) -> Option<&'static Descriptor> {
    lookup(key).map(|e| &e.descriptor)
}

pub fn section_of(key: &str) -> Option<Section> {
    lookup(key).map(|e| e.section)
}

/// Every schema row, in documentation order.
pub fn entries() -> &'static [SchemaEntry] {
    ENTRIES
}

pub fn section_entries(section: Section) -> impl Iterator<Item = &'static SchemaEntry> {
    ENTRIES.iter().filter(move |e| e.section == section)
}

pub fn requires_restart(key: &str) -> bool {
    REQUIRES_RESTART.contains(&key)
}

pub fn is_camera_only(key: &str) -> bool {
    CAMERA_ONLY.contains(&key)
}

pub fn is_global_only(key: &str) -> bool {
    GLOBAL_ONLY.contains(&key)
}
