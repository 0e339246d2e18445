//! discordrich core - Lua bridge for discord-rpc
//!
//! This crate turns the bound vendor API into the `discordrich` Lua module.
//!
//! # Re-exports
//!
//! This crate re-exports the SDK and loader crates for convenience:
//! - [`sdk`] - discord-rpc C ABI types and entry point names
//! - [`loader`] - Library resolution and symbol binding
//!
//! # Event flow
//!
//! ```text
//! Discord_RunCallbacks -> trampoline -> DiscordBridge::dispatch -> Lua handler
//! ```
//!
//! Handlers are kept in a [`CallbackRegistry`] with one slot per
//! [`EventKind`]; each slot pins the Lua function and the script instance
//! that registered it.

pub use discordrich_loader as loader;
pub use discordrich_sdk as sdk;

pub mod bridge;
pub mod callbacks;
pub mod config;
pub mod context;
pub mod error;
pub mod module;
pub mod presence;

#[cfg(test)]
mod testing;

pub use bridge::{DiscordBridge, InitializeOptions};
pub use callbacks::{CallbackHandle, CallbackRegistry, Event, EventKind, User};
pub use config::{ConfigError, ConfigResult, ExtensionConfig};
pub use context::{InstanceContext, RegistryInstanceContext};
pub use error::{coerce_bool, BridgeError, BridgeResult};
pub use module::{create_module, register_module, MODULE_NAME};
pub use presence::{PresenceRecord, RawPresence};
