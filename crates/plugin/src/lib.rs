//! discordrich extension - FFI Layer
//!
//! This crate provides the FFI boundary between the host engine's extension
//! lifecycle and the Rust core logic. It compiles to a cdylib (.so/.dll/.dylib)
//! whose exports are declared in the generated `include/discordrich.h`.
//!
//! The extension adopts the host's `lua_State`, so it must share the host's
//! Lua runtime. Build it with the `module` feature for that; the default
//! `vendored` feature bundles LuaJIT and is meant for tests.

#[cfg(all(feature = "module", feature = "vendored"))]
compile_error!("features `module` and `vendored` are mutually exclusive");

pub mod ffi;

pub use ffi::host::{HostCallbacks, HostConfig, HostInstanceContext};
