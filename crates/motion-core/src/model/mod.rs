// Domain model for one motion daemon: typed config values, the option
// schema, config tables and camera handles.

pub mod camera;
pub mod param;
pub mod schema;
pub mod table;
pub mod version;

pub use camera::{Camera, CameraEvent, CameraFactory, CameraListener, default_camera_factory};
pub use param::{Descriptor, Param, ParamError, ParamInput, ParamKind, Validator, build_value, try_build_value};
pub use schema::{Section, SchemaEntry};
pub use table::ConfigTable;
pub use version::{DaemonVersion, Features};
