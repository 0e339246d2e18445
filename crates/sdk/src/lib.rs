//! discordrich SDK - discord-rpc C ABI definitions
//!
//! This crate contains the `#[repr(C)]` mirror of the vendor `discord_rpc.h`
//! header, together with the names the entry points are exported under.
//! Nothing here touches the library itself; binding happens in the loader.
//!
//! # Modules
//!
//! - [`types`] - Structs exchanged with the vendor library
//! - [`symbols`] - The fixed set of exported entry points and their signatures

pub mod symbols;
pub mod types;

pub use symbols::*;
pub use types::*;

/// Base name of the vendor shared library, without platform prefix or extension
pub const LIBRARY_BASE_NAME: &str = "discord-rpc";

/// Reply codes accepted by `Discord_Respond`
pub const DISCORD_REPLY_NO: i32 = 0;
pub const DISCORD_REPLY_YES: i32 = 1;
pub const DISCORD_REPLY_IGNORE: i32 = 2;
