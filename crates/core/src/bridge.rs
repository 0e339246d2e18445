//! Discord bridge - the operations exposed to scripts
//!
//! [`DiscordBridge`] owns the vendor API, the callback registry and the
//! initialized flag. It is a cheap handle: clones share the same state, so
//! the Lua module functions and the native trampolines all see one bridge.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized --initialize--> Initialized --shutdown--> Uninitialized
//! ```
//!
//! Calling `initialize` while initialized performs a full `shutdown` first,
//! so no handler from the previous session survives.

use std::cell::{Cell, RefCell};
use std::ffi::{c_int, CString};
use std::rc::Rc;

use mlua::{Lua, Table, Value};

use discordrich_loader::{ApiResult, DiscordApi};
use discordrich_sdk::Symbol;

use crate::callbacks::{trampoline, CallbackRegistry, Event, EventKind};
use crate::context::InstanceContext;
use crate::error::{BridgeError, BridgeResult};
use crate::presence::PresenceRecord;

pub(crate) struct BridgeInner {
    api: RefCell<Box<dyn DiscordApi>>,
    registry: RefCell<CallbackRegistry>,
    context: Box<dyn InstanceContext>,
    initialized: Cell<bool>,
}

impl Drop for BridgeInner {
    fn drop(&mut self) {
        self.registry.get_mut().clear_all();
    }
}

/// Shared handle to the bridge state
#[derive(Clone)]
pub struct DiscordBridge {
    inner: Rc<BridgeInner>,
}

/// Arguments of `initialize`
#[derive(Debug, Clone)]
pub struct InitializeOptions<'a> {
    pub application_id: &'a str,
    pub handlers: Option<Table>,
    pub auto_register: bool,
    pub steam_id: Option<&'a str>,
}

impl<'a> InitializeOptions<'a> {
    pub fn new(application_id: &'a str) -> Self {
        Self {
            application_id,
            handlers: None,
            auto_register: true,
            steam_id: None,
        }
    }
}

fn c_string(field: &'static str, value: &str) -> BridgeResult<CString> {
    CString::new(value).map_err(|_| BridgeError::InteriorNul(field))
}

/// Log a call that could not reach the vendor library
fn skipped(result: ApiResult) {
    if let Err(unbound) = result {
        tracing::debug!("Skipping call: {}", unbound);
    }
}

impl DiscordBridge {
    /// Create a bridge over `api`
    ///
    /// # Arguments
    /// * `api` - Vendor entry points (bound library or [`NoopApi`](discordrich_loader::NoopApi))
    /// * `context` - Access to the host's active script instance
    pub fn new(api: Box<dyn DiscordApi>, context: Box<dyn InstanceContext>) -> Self {
        Self {
            inner: Rc::new(BridgeInner {
                api: RefCell::new(api),
                registry: RefCell::new(CallbackRegistry::new()),
                context,
                initialized: Cell::new(false),
            }),
        }
    }

    pub(crate) fn from_inner(inner: Rc<BridgeInner>) -> Self {
        Self { inner }
    }

    /// Check whether a session is active
    pub fn is_initialized(&self) -> bool {
        self.inner.initialized.get()
    }

    /// Check whether a vendor entry point is available
    pub fn has(&self, symbol: Symbol) -> bool {
        self.inner.api.borrow().has(symbol)
    }

    /// Check whether a script handler is installed for `kind`
    pub fn has_handler(&self, kind: EventKind) -> bool {
        self.inner.registry.borrow().is_set(kind)
    }

    /// Start a session, installing the handlers in `options`
    #[tracing::instrument(skip_all, fields(app_id = options.application_id))]
    pub fn initialize(&self, lua: &Lua, options: InitializeOptions<'_>) -> BridgeResult<()> {
        if self.is_initialized() {
            self.end_session();
        }
        if !self.has(Symbol::Initialize) {
            return Ok(());
        }

        let application_id = c_string("application_id", options.application_id)?;
        let steam_id = options
            .steam_id
            .map(|id| c_string("steam_id", id))
            .transpose()?;

        self.save_handlers(lua, options.handlers.as_ref())?;
        let mut handlers = trampoline::event_handlers();
        trampoline::install(&self.inner);

        skipped(self.inner.api.borrow().initialize(
            &application_id,
            &mut handlers,
            options.auto_register,
            steam_id.as_deref(),
        ));
        self.inner.initialized.set(true);
        tracing::info!("Discord RPC initialized");
        Ok(())
    }

    /// End the session and release every handler
    ///
    /// No-op when not initialized or when the library lacks `Discord_Shutdown`.
    pub fn shutdown(&self) {
        if !self.is_initialized() || !self.has(Symbol::Shutdown) {
            return;
        }

        self.end_session();
    }

    /// Release every handler and leave the session, calling the vendor
    /// shutdown only if it is bound
    fn end_session(&self) {
        if self.has(Symbol::Shutdown) {
            skipped(self.inner.api.borrow().shutdown());
        }
        self.inner.registry.borrow_mut().clear_all();
        self.inner.initialized.set(false);
        trampoline::uninstall(&self.inner);
        tracing::info!("Discord RPC shut down");
    }

    /// Replace every handler of the running session
    pub fn update_handlers(&self, lua: &Lua, handlers: Option<&Table>) -> BridgeResult<()> {
        if !self.is_initialized() || !self.has(Symbol::UpdateHandlers) {
            return Ok(());
        }

        self.inner.registry.borrow_mut().clear_all();
        self.save_handlers(lua, handlers)?;

        let mut handlers = trampoline::event_handlers();
        skipped(self.inner.api.borrow().update_handlers(&mut handlers));
        Ok(())
    }

    pub fn update_presence(&self, presence: &PresenceRecord) -> BridgeResult<()> {
        let raw = presence.to_raw()?;
        skipped(self.inner.api.borrow().update_presence(raw.as_raw()));
        Ok(())
    }

    pub fn clear_presence(&self) {
        skipped(self.inner.api.borrow().clear_presence());
    }

    /// Answer a join request with one of the `REPLY_*` codes
    ///
    /// No-op outside a session.
    pub fn respond(&self, user_id: &str, reply: c_int) -> BridgeResult<()> {
        if !self.is_initialized() {
            return Ok(());
        }
        let user_id = c_string("user_id", user_id)?;
        skipped(self.inner.api.borrow().respond(&user_id, reply));
        Ok(())
    }

    /// Register a launch command for `application_id`
    pub fn register(&self, application_id: &str, command: &str) -> BridgeResult<()> {
        let application_id = c_string("application_id", application_id)?;
        let command = c_string("command", command)?;
        skipped(self.inner.api.borrow().register(&application_id, &command));
        Ok(())
    }

    /// Register `application_id` as launched through Steam
    pub fn register_steam_game(&self, application_id: &str, steam_id: &str) -> BridgeResult<()> {
        let application_id = c_string("application_id", application_id)?;
        let steam_id = c_string("steam_id", steam_id)?;
        skipped(
            self.inner
                .api
                .borrow()
                .register_steam_game(&application_id, &steam_id),
        );
        Ok(())
    }

    /// Pump the vendor callback queue; called once per engine frame
    pub fn run_callbacks(&self) {
        // Checked up front so an unbound pump does not log every frame
        if self.has(Symbol::RunCallbacks) {
            skipped(self.inner.api.borrow().run_callbacks());
        }
    }

    /// Shut down and release the vendor library
    ///
    /// Every operation is a no-op afterwards.
    pub fn close(&self) {
        self.shutdown();
        self.inner.registry.borrow_mut().clear_all();
        self.inner.initialized.set(false);
        trampoline::uninstall(&self.inner);
        match self.inner.api.try_borrow_mut() {
            Ok(mut api) => api.close(),
            Err(_) => tracing::warn!("Cannot unload the library from inside an event handler"),
        }
    }

    /// Install a handler for every kind present in `handlers`
    ///
    /// `None` leaves the registry untouched. On a type error every slot is
    /// cleared so no partial set survives.
    fn save_handlers(&self, lua: &Lua, handlers: Option<&Table>) -> BridgeResult<()> {
        let Some(handlers) = handlers else {
            return Ok(());
        };

        // Table reads may run `__index` metamethods that re-enter the bridge,
        // so all values are fetched before the registry is borrowed
        let mut values = Vec::with_capacity(EventKind::COUNT);
        for kind in EventKind::ALL {
            match handlers.get::<Value>(kind.key()) {
                Ok(value) => values.push((kind, value)),
                Err(e) => {
                    self.inner.registry.borrow_mut().clear_all();
                    return Err(e.into());
                }
            }
        }

        let mut registry = self.inner.registry.borrow_mut();
        for (kind, value) in values {
            if let Err(e) = registry.set(kind, lua, value, self.inner.context.as_ref()) {
                registry.clear_all();
                return Err(e);
            }
        }
        Ok(())
    }

    /// Deliver a vendor event to its script handler
    ///
    /// An errored event also ends the session.
    pub(crate) fn dispatch(&self, event: Event) {
        self.invoke(&event);
        if let Event::Errored { code, ref message } = event {
            tracing::error!(
                "Discord error ({}: {})",
                code,
                message.as_deref().unwrap_or_default()
            );
            self.shutdown();
        }
    }

    /// Call the handler for `event`, logging and swallowing any failure
    fn invoke(&self, event: &Event) {
        let kind = event.kind();
        // Resolve under a short borrow: the handler may re-enter the bridge
        let resolved = match self.inner.registry.borrow().get(kind) {
            Some(handle) => handle.resolve(),
            None => return,
        };

        let result = resolved.and_then(|(lua, function, receiver)| {
            let context = self.inner.context.as_ref();
            let previous = context.current(&lua)?;
            context.restore(&lua, receiver)?;
            let called = event
                .to_args(&lua)
                .and_then(|args| function.call::<()>(args));
            let restored = context.restore(&lua, previous);
            called.and(restored)
        });

        if let Err(e) = result {
            tracing::error!("Error running event handler: {}", e);
        }
    }
}
