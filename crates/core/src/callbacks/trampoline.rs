//! Native handlers installed into the vendor library
//!
//! The vendor library calls these from `Discord_RunCallbacks` on the engine
//! thread. Each one copies its arguments into an [`Event`] and forwards it to
//! the bridge that last installed handlers on this thread.

use std::cell::RefCell;
use std::ffi::{c_char, c_int};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use discordrich_sdk::{DiscordEventHandlers, DiscordUser};

use super::event::{string_from_raw, Event, User};
use crate::bridge::{BridgeInner, DiscordBridge};

thread_local! {
    /// Bridge receiving vendor events
    static TARGET: RefCell<Weak<BridgeInner>> = RefCell::new(Weak::new());
}

/// Route vendor events to `bridge`
pub(crate) fn install(bridge: &Rc<BridgeInner>) {
    TARGET.with(|target| *target.borrow_mut() = Rc::downgrade(bridge));
}

/// Stop routing vendor events to `bridge`, if it is the current target
pub(crate) fn uninstall(bridge: &Rc<BridgeInner>) {
    TARGET.with(|target| {
        let mut target = target.borrow_mut();
        if std::ptr::eq(target.as_ptr(), Rc::as_ptr(bridge)) {
            *target = Weak::new();
        }
    });
}

/// Handler table with every event routed through this module
pub fn event_handlers() -> DiscordEventHandlers {
    DiscordEventHandlers {
        ready: Some(handle_ready),
        disconnected: Some(handle_disconnected),
        errored: Some(handle_errored),
        join_game: Some(handle_join_game),
        spectate_game: Some(handle_spectate_game),
        join_request: Some(handle_join_request),
    }
}

/// Deliver an event to the current target without unwinding into C
fn forward(name: &str, make_event: impl FnOnce() -> Event) {
    let result = catch_unwind(AssertUnwindSafe(|| {
        let target = TARGET.with(|target| target.borrow().upgrade());
        match target {
            Some(inner) => DiscordBridge::from_inner(inner).dispatch(make_event()),
            None => tracing::debug!("Dropping {} event: no bridge installed", name),
        }
    }));
    if result.is_err() {
        tracing::error!("Panic while handling {} event", name);
    }
}

extern "C" fn handle_ready(user: *const DiscordUser) {
    // SAFETY: the vendor passes a valid user record for the duration of the call
    forward("ready", || Event::Ready(unsafe { User::from_raw(user) }));
}

extern "C" fn handle_disconnected(code: c_int, message: *const c_char) {
    forward("disconnected", || Event::Disconnected {
        code,
        message: unsafe { string_from_raw(message) },
    });
}

extern "C" fn handle_errored(code: c_int, message: *const c_char) {
    forward("errored", || Event::Errored {
        code,
        message: unsafe { string_from_raw(message) },
    });
}

extern "C" fn handle_join_game(secret: *const c_char) {
    forward("join_game", || {
        Event::JoinGame(unsafe { string_from_raw(secret) })
    });
}

extern "C" fn handle_spectate_game(secret: *const c_char) {
    forward("spectate_game", || {
        Event::SpectateGame(unsafe { string_from_raw(secret) })
    });
}

extern "C" fn handle_join_request(user: *const DiscordUser) {
    forward("join_request", || {
        Event::JoinRequest(unsafe { User::from_raw(user) })
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_handler_is_installed() {
        let handlers = event_handlers();
        assert!(handlers.ready.is_some());
        assert!(handlers.disconnected.is_some());
        assert!(handlers.errored.is_some());
        assert!(handlers.join_game.is_some());
        assert!(handlers.spectate_game.is_some());
        assert!(handlers.join_request.is_some());
    }

    #[test]
    fn test_handlers_without_target_are_noops() {
        let handlers = event_handlers();
        (handlers.join_game.unwrap())(c"secret".as_ptr());
        (handlers.ready.unwrap())(std::ptr::null());
    }
}
