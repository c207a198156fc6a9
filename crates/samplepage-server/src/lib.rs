//! Local preview of the deployed samples webpage.
//!
//! Opens the default browser and runs an existing HTTP file server in the
//! deploy directory until it exits or the user interrupts it.

pub mod server;

pub use server::{HostPlatform, Launcher, PageServer, ServerError, SERVE_PORT};
