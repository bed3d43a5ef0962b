//! Clap derive structures for `motionctl`.
//!
//! Kept free of workspace crates: build.rs includes this file to render
//! man pages.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// motionctl -- drive motion daemons through their webcontrol interface
#[derive(Debug, Parser)]
#[command(
    name = "motionctl",
    version,
    about = "Control motion camera daemons from the command line",
    long_about = "Inspect and reconfigure motion daemons over HTTP webcontrol.\n\n\
        Reads cameras, detection state and configuration, changes options,\n\
        and triggers restarts, snapshots and movies.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Daemon profile to use
    #[arg(long, short = 'p', env = "MOTION_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Daemon host (overrides profile)
    #[arg(long, short = 'H', env = "MOTION_HOST", global = true)]
    pub host: Option<String>,

    /// Webcontrol port (overrides profile)
    #[arg(long, short = 'P', env = "MOTION_PORT", global = true)]
    pub port: Option<u16>,

    /// Webcontrol username
    #[arg(long, short = 'u', env = "MOTION_USERNAME", global = true)]
    pub username: Option<String>,

    /// Webcontrol password
    #[arg(long, env = "MOTION_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// TLS mode for webcontrol
    #[arg(long, env = "MOTION_TLS", global = true)]
    pub tls: Option<TlsArg>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MOTION_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "MOTION_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Shared Enums ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TlsArg {
    /// Try http, flip to https when the daemon hangs up
    Auto,
    /// Plain http only
    None,
    /// https, accept self-signed certificates
    Relaxed,
    /// https with certificate validation
    Strict,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show daemon version, capabilities and urls
    Status,

    /// List cameras with connection and detection state
    #[command(alias = "cams")]
    Cameras,

    /// Read and change daemon configuration
    #[command(alias = "cfg")]
    Config(ConfigArgs),

    /// Start, pause or query motion detection
    #[command(alias = "det")]
    Detection(DetectionArgs),

    /// Restart a camera thread, or the whole daemon
    Restart(CameraTarget),

    /// Take a snapshot on a camera
    Snapshot(CameraId),

    /// Close the current movie and start a new one
    Makemovie(CameraId),

    /// Manage connection profiles
    Profile(ProfileArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Camera selection ─────────────────────────────────────────────────

/// A camera id, `0` addressing the daemon as a whole.
#[derive(Debug, Args)]
pub struct CameraTarget {
    /// Camera thread id (0 = global)
    #[arg(long, short = 'c', default_value = "0")]
    pub camera: String,
}

#[derive(Debug, Args)]
pub struct CameraId {
    /// Camera thread id
    pub camera: String,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// List configuration values
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        target: CameraTarget,

        /// Only show options of this section (e.g. stream, movie)
        #[arg(long, short = 's')]
        section: Option<String>,
    },

    /// Show one configuration value
    Get {
        /// Option name
        key: String,

        #[command(flatten)]
        target: CameraTarget,
    },

    /// Change configuration values
    Set(SetArgs),

    /// Ask the daemon to write its configuration files
    Write,

    /// Change values, write them, and restart whatever needs it
    Sync(SetArgs),
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// One or more KEY=VALUE assignments
    #[arg(required = true, value_name = "KEY=VALUE")]
    pub assignments: Vec<String>,

    #[command(flatten)]
    pub target: CameraTarget,

    /// Send even when the daemon already has the value
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Write configuration files after each change
    #[arg(long)]
    pub persist: bool,
}

// ── Detection ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DetectionArgs {
    #[command(subcommand)]
    pub command: DetectionCommand,
}

#[derive(Debug, Subcommand)]
pub enum DetectionCommand {
    /// Resume motion detection
    Start(CameraTarget),

    /// Pause motion detection
    Pause(CameraTarget),

    /// Show connection and detection state
    Status(CameraTarget),
}

// ── Profiles ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Add or replace a profile from --host, --port, --username, --tls
    /// and --timeout
    Add {
        /// Profile name
        name: String,

        /// Environment variable holding the password
        #[arg(long)]
        password_env: Option<String>,

        /// Make this the default profile
        #[arg(long)]
        default: bool,
    },

    /// List configured profiles
    #[command(alias = "ls")]
    List,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
