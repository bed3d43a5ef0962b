// Webcontrol client modules
//
// Hand-written client for the motion daemon's webctrl endpoints. The daemon
// answers in html or plaintext depending on `webcontrol_interface`; these
// modules hand the raw text back and leave parsing to the caller.

pub mod action;
pub mod client;
pub mod config;
pub mod detection;

pub use client::HttpClient;

/// Path segment addressing the global configuration (thread 0).
pub const GLOBAL_ID: &str = "0";
