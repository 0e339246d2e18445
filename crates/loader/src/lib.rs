//! discordrich loader - Library resolution and symbol binding
//!
//! This crate handles:
//! - Locating the discord-rpc shared library relative to the running executable
//! - Opening it and binding its fixed table of entry points
//! - Exposing those entry points through the [`DiscordApi`] trait
//!
//! # Architecture
//!
//! [`paths::resolve_library_dir`] computes the search directory once at
//! extension start. [`SymbolBinder`] opens the library from that directory and
//! implements [`DiscordApi`]; any entry point it could not resolve answers
//! with [`Unbound`] instead of being called.
//!
//! # Failure Model
//!
//! Nothing here is fatal. A missing library or symbol is logged and the
//! affected operations become no-ops.

pub mod api;
pub mod config;
pub mod error;
pub mod loader;
pub mod paths;

pub use api::{ApiResult, DiscordApi, NoopApi};
pub use config::{ConfigSource, EmptyConfig, LIB_PATH_KEY};
pub use error::{LoadError, Unbound};
pub use loader::{SymbolBinder, SymbolTable};
pub use paths::{resolve_library_dir, Platform, LIB_PATH_ENV};
