//! FFI boundary with the host engine
//!
//! - [`exports`] - Extension lifecycle entry points
//! - [`host`] - Host-provided services (configuration, script instance)

pub mod exports;
pub mod host;
