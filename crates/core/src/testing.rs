//! Recording stand-in for the vendor library

use std::cell::RefCell;
use std::collections::VecDeque;
use std::ffi::{c_int, CStr, CString};
use std::ptr;
use std::rc::Rc;

use discordrich_loader::{ApiResult, DiscordApi, Unbound};
use discordrich_sdk::{DiscordEventHandlers, DiscordRichPresence, DiscordUser, Symbol};

/// Event queued for the next `run_callbacks`
#[derive(Debug, Clone)]
pub enum FakeEvent {
    Ready {
        user_id: &'static str,
        username: &'static str,
        discriminator: &'static str,
    },
    Disconnected(c_int, &'static str),
    Errored(c_int, &'static str),
    JoinGame(&'static str),
    SpectateGame(&'static str),
    JoinRequest {
        user_id: &'static str,
        username: &'static str,
    },
}

#[derive(Default)]
struct State {
    calls: Vec<String>,
    handlers: Option<DiscordEventHandlers>,
    queue: VecDeque<FakeEvent>,
    missing: Vec<Symbol>,
    closed: bool,
}

/// Every entry point bound; calls are recorded and events are delivered
/// through whatever handlers were installed
#[derive(Clone, Default)]
pub struct FakeApi {
    state: Rc<RefCell<State>>,
}

impl FakeApi {
    /// Same fake, built without `symbol`
    pub fn without(self, symbol: Symbol) -> Self {
        self.state.borrow_mut().missing.push(symbol);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    pub fn handlers(&self) -> Option<DiscordEventHandlers> {
        self.state.borrow().handlers
    }

    pub fn push(&self, event: FakeEvent) {
        self.state.borrow_mut().queue.push_back(event);
    }

    fn record(&self, symbol: Symbol, call: String) -> ApiResult {
        let mut state = self.state.borrow_mut();
        if state.closed || state.missing.contains(&symbol) {
            return Err(Unbound(symbol));
        }
        state.calls.push(call);
        Ok(())
    }

    fn deliver(handlers: &DiscordEventHandlers, event: FakeEvent) {
        let c = |s: &str| CString::new(s).unwrap_or_default();
        match event {
            FakeEvent::Ready {
                user_id,
                username,
                discriminator,
            } => {
                let (id, name, disc) = (c(user_id), c(username), c(discriminator));
                let user = DiscordUser {
                    user_id: id.as_ptr(),
                    username: name.as_ptr(),
                    discriminator: disc.as_ptr(),
                    avatar: ptr::null(),
                };
                if let Some(f) = handlers.ready {
                    f(&user);
                }
            }
            FakeEvent::Disconnected(code, message) => {
                if let Some(f) = handlers.disconnected {
                    f(code, c(message).as_ptr());
                }
            }
            FakeEvent::Errored(code, message) => {
                if let Some(f) = handlers.errored {
                    f(code, c(message).as_ptr());
                }
            }
            FakeEvent::JoinGame(secret) => {
                if let Some(f) = handlers.join_game {
                    f(c(secret).as_ptr());
                }
            }
            FakeEvent::SpectateGame(secret) => {
                if let Some(f) = handlers.spectate_game {
                    f(c(secret).as_ptr());
                }
            }
            FakeEvent::JoinRequest { user_id, username } => {
                let (id, name, disc) = (c(user_id), c(username), c("0"));
                let user = DiscordUser {
                    user_id: id.as_ptr(),
                    username: name.as_ptr(),
                    discriminator: disc.as_ptr(),
                    avatar: ptr::null(),
                };
                if let Some(f) = handlers.join_request {
                    f(&user);
                }
            }
        }
    }
}

fn lossy(s: &CStr) -> String {
    s.to_string_lossy().into_owned()
}

impl DiscordApi for FakeApi {
    fn has(&self, symbol: Symbol) -> bool {
        let state = self.state.borrow();
        !state.closed && !state.missing.contains(&symbol)
    }

    fn initialize(
        &self,
        application_id: &CStr,
        handlers: &mut DiscordEventHandlers,
        auto_register: bool,
        steam_id: Option<&CStr>,
    ) -> ApiResult {
        self.record(
            Symbol::Initialize,
            format!(
                "initialize {} auto={} steam={:?}",
                lossy(application_id),
                auto_register,
                steam_id.map(lossy)
            ),
        )?;
        self.state.borrow_mut().handlers = Some(*handlers);
        Ok(())
    }

    fn shutdown(&self) -> ApiResult {
        self.record(Symbol::Shutdown, "shutdown".to_string())?;
        let mut state = self.state.borrow_mut();
        state.handlers = None;
        state.queue.clear();
        Ok(())
    }

    fn run_callbacks(&self) -> ApiResult {
        if !self.has(Symbol::RunCallbacks) {
            return Err(Unbound(Symbol::RunCallbacks));
        }
        // Handlers may call back into the API, so no borrow is held across them
        loop {
            let next = {
                let mut state = self.state.borrow_mut();
                match state.handlers {
                    Some(handlers) => state.queue.pop_front().map(|e| (handlers, e)),
                    None => None,
                }
            };
            match next {
                Some((handlers, event)) => Self::deliver(&handlers, event),
                None => return Ok(()),
            }
        }
    }

    fn update_presence(&self, presence: &DiscordRichPresence) -> ApiResult {
        let state = if presence.state.is_null() {
            String::new()
        } else {
            lossy(unsafe { CStr::from_ptr(presence.state) })
        };
        self.record(Symbol::UpdatePresence, format!("update_presence state={state}"))
    }

    fn clear_presence(&self) -> ApiResult {
        self.record(Symbol::ClearPresence, "clear_presence".to_string())
    }

    fn respond(&self, user_id: &CStr, reply: c_int) -> ApiResult {
        self.record(Symbol::Respond, format!("respond {} {}", lossy(user_id), reply))
    }

    fn update_handlers(&self, handlers: &mut DiscordEventHandlers) -> ApiResult {
        self.record(Symbol::UpdateHandlers, "update_handlers".to_string())?;
        self.state.borrow_mut().handlers = Some(*handlers);
        Ok(())
    }

    fn register(&self, application_id: &CStr, command: &CStr) -> ApiResult {
        self.record(
            Symbol::Register,
            format!("register {} {}", lossy(application_id), lossy(command)),
        )
    }

    fn register_steam_game(&self, application_id: &CStr, steam_id: &CStr) -> ApiResult {
        self.record(
            Symbol::RegisterSteamGame,
            format!(
                "register_steam_game {} {}",
                lossy(application_id),
                lossy(steam_id)
            ),
        )
    }

    fn close(&mut self) {
        let mut state = self.state.borrow_mut();
        if !state.closed {
            state.closed = true;
            state.handlers = None;
            state.calls.push("close".to_string());
        }
    }
}
