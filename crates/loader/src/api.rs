//! Dispatch interface over the vendor entry points
//!
//! Callers go through [`DiscordApi`] instead of null-checking function
//! pointers: an unbound entry point answers with [`Unbound`] and performs
//! no call.

use std::ffi::{c_int, CStr};
use std::ptr;

use discordrich_sdk::{DiscordEventHandlers, DiscordRichPresence, Symbol};

use crate::error::Unbound;
use crate::loader::SymbolBinder;

pub type ApiResult = Result<(), Unbound>;

/// One method per vendor operation
pub trait DiscordApi {
    /// Check whether an entry point is available
    fn has(&self, symbol: Symbol) -> bool;

    fn initialize(
        &self,
        application_id: &CStr,
        handlers: &mut DiscordEventHandlers,
        auto_register: bool,
        steam_id: Option<&CStr>,
    ) -> ApiResult;

    fn shutdown(&self) -> ApiResult;

    fn run_callbacks(&self) -> ApiResult;

    fn update_presence(&self, presence: &DiscordRichPresence) -> ApiResult;

    fn clear_presence(&self) -> ApiResult;

    fn respond(&self, user_id: &CStr, reply: c_int) -> ApiResult;

    fn update_handlers(&self, handlers: &mut DiscordEventHandlers) -> ApiResult;

    fn register(&self, application_id: &CStr, command: &CStr) -> ApiResult;

    fn register_steam_game(&self, application_id: &CStr, steam_id: &CStr) -> ApiResult;

    /// Release the underlying library, unbinding every entry point
    fn close(&mut self) {}
}

/// API with nothing bound, used when the library is unavailable on this platform
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopApi;

impl DiscordApi for NoopApi {
    fn has(&self, _symbol: Symbol) -> bool {
        false
    }

    fn initialize(
        &self,
        _application_id: &CStr,
        _handlers: &mut DiscordEventHandlers,
        _auto_register: bool,
        _steam_id: Option<&CStr>,
    ) -> ApiResult {
        Err(Unbound(Symbol::Initialize))
    }

    fn shutdown(&self) -> ApiResult {
        Err(Unbound(Symbol::Shutdown))
    }

    fn run_callbacks(&self) -> ApiResult {
        Err(Unbound(Symbol::RunCallbacks))
    }

    fn update_presence(&self, _presence: &DiscordRichPresence) -> ApiResult {
        Err(Unbound(Symbol::UpdatePresence))
    }

    fn clear_presence(&self) -> ApiResult {
        Err(Unbound(Symbol::ClearPresence))
    }

    fn respond(&self, _user_id: &CStr, _reply: c_int) -> ApiResult {
        Err(Unbound(Symbol::Respond))
    }

    fn update_handlers(&self, _handlers: &mut DiscordEventHandlers) -> ApiResult {
        Err(Unbound(Symbol::UpdateHandlers))
    }

    fn register(&self, _application_id: &CStr, _command: &CStr) -> ApiResult {
        Err(Unbound(Symbol::Register))
    }

    fn register_steam_game(&self, _application_id: &CStr, _steam_id: &CStr) -> ApiResult {
        Err(Unbound(Symbol::RegisterSteamGame))
    }
}

// SAFETY (all calls below): entries are only populated while the library
// handle is held, and the signatures mirror discord_rpc.h. String arguments
// are NUL-terminated and outlive the call; the vendor copies what it keeps.
impl DiscordApi for SymbolBinder {
    fn has(&self, symbol: Symbol) -> bool {
        self.table().is_bound(symbol)
    }

    fn initialize(
        &self,
        application_id: &CStr,
        handlers: &mut DiscordEventHandlers,
        auto_register: bool,
        steam_id: Option<&CStr>,
    ) -> ApiResult {
        let f = self.table().initialize.ok_or(Unbound(Symbol::Initialize))?;
        let steam_id = steam_id.map_or(ptr::null(), CStr::as_ptr);
        unsafe {
            f(
                application_id.as_ptr(),
                handlers,
                c_int::from(auto_register),
                steam_id,
            )
        };
        Ok(())
    }

    fn shutdown(&self) -> ApiResult {
        let f = self.table().shutdown.ok_or(Unbound(Symbol::Shutdown))?;
        unsafe { f() };
        Ok(())
    }

    fn run_callbacks(&self) -> ApiResult {
        let f = self
            .table()
            .run_callbacks
            .ok_or(Unbound(Symbol::RunCallbacks))?;
        unsafe { f() };
        Ok(())
    }

    fn update_presence(&self, presence: &DiscordRichPresence) -> ApiResult {
        let f = self
            .table()
            .update_presence
            .ok_or(Unbound(Symbol::UpdatePresence))?;
        unsafe { f(presence) };
        Ok(())
    }

    fn clear_presence(&self) -> ApiResult {
        let f = self
            .table()
            .clear_presence
            .ok_or(Unbound(Symbol::ClearPresence))?;
        unsafe { f() };
        Ok(())
    }

    fn respond(&self, user_id: &CStr, reply: c_int) -> ApiResult {
        let f = self.table().respond.ok_or(Unbound(Symbol::Respond))?;
        unsafe { f(user_id.as_ptr(), reply) };
        Ok(())
    }

    fn update_handlers(&self, handlers: &mut DiscordEventHandlers) -> ApiResult {
        let f = self
            .table()
            .update_handlers
            .ok_or(Unbound(Symbol::UpdateHandlers))?;
        unsafe { f(handlers) };
        Ok(())
    }

    fn register(&self, application_id: &CStr, command: &CStr) -> ApiResult {
        let f = self.table().register.ok_or(Unbound(Symbol::Register))?;
        unsafe { f(application_id.as_ptr(), command.as_ptr()) };
        Ok(())
    }

    fn register_steam_game(&self, application_id: &CStr, steam_id: &CStr) -> ApiResult {
        let f = self
            .table()
            .register_steam_game
            .ok_or(Unbound(Symbol::RegisterSteamGame))?;
        unsafe { f(application_id.as_ptr(), steam_id.as_ptr()) };
        Ok(())
    }

    fn close(&mut self) {
        SymbolBinder::close(self);
    }
}
