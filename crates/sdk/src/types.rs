//! Structs exchanged with the discord-rpc library
//!
//! Layouts must match `discord_rpc.h` exactly. String fields are borrowed
//! C strings; the vendor library copies them before the call returns.

use std::ffi::{c_char, c_int};
use std::ptr;

/// User record delivered to the ready and join-request handlers
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct DiscordUser {
    pub user_id: *const c_char,
    pub username: *const c_char,
    pub discriminator: *const c_char,
    pub avatar: *const c_char,
}

pub type ReadyHandler = extern "C" fn(request: *const DiscordUser);
pub type DisconnectedHandler = extern "C" fn(error_code: c_int, message: *const c_char);
pub type ErroredHandler = extern "C" fn(error_code: c_int, message: *const c_char);
pub type JoinGameHandler = extern "C" fn(join_secret: *const c_char);
pub type SpectateGameHandler = extern "C" fn(spectate_secret: *const c_char);
pub type JoinRequestHandler = extern "C" fn(request: *const DiscordUser);

/// Event handler table passed to `Discord_Initialize` and `Discord_UpdateHandlers`
///
/// Each slot is nullable on the C side, hence the `Option` wrappers.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscordEventHandlers {
    pub ready: Option<ReadyHandler>,
    pub disconnected: Option<DisconnectedHandler>,
    pub errored: Option<ErroredHandler>,
    pub join_game: Option<JoinGameHandler>,
    pub spectate_game: Option<SpectateGameHandler>,
    pub join_request: Option<JoinRequestHandler>,
}

/// Rich presence payload for `Discord_UpdatePresence`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct DiscordRichPresence {
    /// max 128 bytes
    pub state: *const c_char,
    /// max 128 bytes
    pub details: *const c_char,
    pub start_timestamp: i64,
    pub end_timestamp: i64,
    /// max 32 bytes
    pub large_image_key: *const c_char,
    /// max 128 bytes
    pub large_image_text: *const c_char,
    /// max 32 bytes
    pub small_image_key: *const c_char,
    /// max 128 bytes
    pub small_image_text: *const c_char,
    /// max 128 bytes
    pub party_id: *const c_char,
    pub party_size: c_int,
    pub party_max: c_int,
    /// max 128 bytes
    pub match_secret: *const c_char,
    /// max 128 bytes
    pub join_secret: *const c_char,
    /// max 128 bytes
    pub spectate_secret: *const c_char,
    pub instance: i8,
}

impl Default for DiscordRichPresence {
    /// Zero-initialized presence, equivalent to `memset(&p, 0, sizeof(p))`
    fn default() -> Self {
        Self {
            state: ptr::null(),
            details: ptr::null(),
            start_timestamp: 0,
            end_timestamp: 0,
            large_image_key: ptr::null(),
            large_image_text: ptr::null(),
            small_image_key: ptr::null(),
            small_image_text: ptr::null(),
            party_id: ptr::null(),
            party_size: 0,
            party_max: 0,
            match_secret: ptr::null(),
            join_secret: ptr::null(),
            spectate_secret: ptr::null(),
            instance: 0,
        }
    }
}
