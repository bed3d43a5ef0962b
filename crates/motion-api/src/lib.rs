// motion-api: Async Rust client for the motion daemon's webcontrol interface

pub mod error;
pub mod transport;
pub mod webctrl;

pub use error::{ConnectionFailure, Error};
pub use transport::{Credentials, Endpoint, Scheme, TlsMode, TransportConfig};
pub use webctrl::{GLOBAL_ID, HttpClient};
