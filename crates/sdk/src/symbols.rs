//! Exported entry points of the discord-rpc library
//!
//! Names must match exactly what the library exports.

use std::ffi::{c_char, c_int};

use crate::types::{DiscordEventHandlers, DiscordRichPresence};

pub type InitializeFn = unsafe extern "C" fn(
    application_id: *const c_char,
    handlers: *mut DiscordEventHandlers,
    auto_register: c_int,
    optional_steam_id: *const c_char,
);
pub type ShutdownFn = unsafe extern "C" fn();
pub type RunCallbacksFn = unsafe extern "C" fn();
pub type UpdatePresenceFn = unsafe extern "C" fn(presence: *const DiscordRichPresence);
pub type ClearPresenceFn = unsafe extern "C" fn();
pub type RespondFn = unsafe extern "C" fn(user_id: *const c_char, reply: c_int);
pub type UpdateHandlersFn = unsafe extern "C" fn(handlers: *mut DiscordEventHandlers);
pub type RegisterFn = unsafe extern "C" fn(application_id: *const c_char, command: *const c_char);
pub type RegisterSteamGameFn =
    unsafe extern "C" fn(application_id: *const c_char, steam_id: *const c_char);

/// The closed set of entry points resolved from the library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Initialize,
    Shutdown,
    RunCallbacks,
    UpdatePresence,
    ClearPresence,
    Respond,
    UpdateHandlers,
    Register,
    RegisterSteamGame,
}

impl Symbol {
    /// Every symbol, in resolution order
    pub const ALL: [Symbol; 9] = [
        Symbol::Initialize,
        Symbol::Shutdown,
        Symbol::RunCallbacks,
        Symbol::UpdatePresence,
        Symbol::ClearPresence,
        Symbol::Respond,
        Symbol::UpdateHandlers,
        Symbol::Register,
        Symbol::RegisterSteamGame,
    ];

    /// Exported symbol name
    pub const fn name(self) -> &'static str {
        match self {
            Symbol::Initialize => "Discord_Initialize",
            Symbol::Shutdown => "Discord_Shutdown",
            Symbol::RunCallbacks => "Discord_RunCallbacks",
            Symbol::UpdatePresence => "Discord_UpdatePresence",
            Symbol::ClearPresence => "Discord_ClearPresence",
            Symbol::Respond => "Discord_Respond",
            Symbol::UpdateHandlers => "Discord_UpdateHandlers",
            Symbol::Register => "Discord_Register",
            Symbol::RegisterSteamGame => "Discord_RegisterSteamGame",
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
