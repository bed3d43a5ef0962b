// motion-core: typed configuration model, webctrl response parsing and the
// per-daemon client facade used by the CLI.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod parse;

// ── Primary re-exports ──────────────────────────────────────────────
pub use client::{CameraView, ClientState, MotionClient};
pub use config::ClientConfig;
pub use error::CoreError;

pub use model::{
    Camera, CameraEvent, CameraFactory, CameraListener, ConfigTable, DaemonVersion, Descriptor,
    Features, Param, ParamInput, ParamKind, Section, Validator, build_value, schema,
};

pub use motion_api::{ConnectionFailure, Endpoint, GLOBAL_ID, TlsMode};
