//! Script callback registry
//!
//! One slot per [`EventKind`]. Each slot owns a [`CallbackHandle`]: durable
//! Lua registry references to the handler function and to the script
//! instance it was registered from. Installing a handler always releases the
//! previous one first, so a slot never leaks or shares a reference.
//!
//! The vendor library only ever sees the fixed functions in [`trampoline`],
//! which look the slot up and invoke it through the active
//! [`DiscordBridge`](crate::DiscordBridge).

pub mod event;
pub mod trampoline;

use mlua::{Function, Lua, RegistryKey, Value};

pub use event::{Event, EventKind, User};

use crate::context::InstanceContext;
use crate::error::{BridgeError, BridgeResult};

/// Durable reference to a script handler and its receiver instance
pub struct CallbackHandle {
    lua: Lua,
    function: RegistryKey,
    receiver: RegistryKey,
}

impl CallbackHandle {
    /// Pin `function` and the currently active instance in the Lua registry
    pub fn retain(lua: &Lua, function: Function, context: &dyn InstanceContext) -> mlua::Result<Self> {
        let function = lua.create_registry_value(function)?;
        let receiver = match context.current(lua).and_then(|v| lua.create_registry_value(v)) {
            Ok(key) => key,
            Err(e) => {
                let _ = lua.remove_registry_value(function);
                return Err(e);
            }
        };

        Ok(Self {
            lua: lua.clone(),
            function,
            receiver,
        })
    }

    /// Drop both registry references
    pub fn release(self) {
        let Self {
            lua,
            function,
            receiver,
        } = self;
        if let Err(e) = lua.remove_registry_value(function) {
            tracing::debug!("Failed to release handler: {}", e);
        }
        if let Err(e) = lua.remove_registry_value(receiver) {
            tracing::debug!("Failed to release handler instance: {}", e);
        }
    }

    /// Fetch the Lua state, handler and receiver for a call
    pub(crate) fn resolve(&self) -> mlua::Result<(Lua, Function, Value)> {
        let function = self.lua.registry_value::<Function>(&self.function)?;
        let receiver = self.lua.registry_value::<Value>(&self.receiver)?;
        Ok((self.lua.clone(), function, receiver))
    }
}

/// Fixed-size mapping from event kind to installed handler
#[derive(Default)]
pub struct CallbackRegistry {
    slots: [Option<CallbackHandle>; EventKind::COUNT],
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the handler for `kind`
    ///
    /// Any existing handler is released first. `nil` leaves the slot empty;
    /// any other non-function value is a type error and also leaves it empty.
    pub fn set(
        &mut self,
        kind: EventKind,
        lua: &Lua,
        value: Value,
        context: &dyn InstanceContext,
    ) -> BridgeResult<()> {
        self.clear(kind);

        let function = match value {
            Value::Nil => return Ok(()),
            Value::Function(f) => f,
            other => return Err(BridgeError::type_mismatch("function", &other)),
        };

        self.slots[kind.index()] = Some(CallbackHandle::retain(lua, function, context)?);
        Ok(())
    }

    /// Release the handler for `kind`, if any
    pub fn clear(&mut self, kind: EventKind) {
        if let Some(handle) = self.slots[kind.index()].take() {
            handle.release();
        }
    }

    /// Release every handler
    pub fn clear_all(&mut self) {
        for kind in EventKind::ALL {
            self.clear(kind);
        }
    }

    pub fn get(&self, kind: EventKind) -> Option<&CallbackHandle> {
        self.slots[kind.index()].as_ref()
    }

    pub fn is_set(&self, kind: EventKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    /// Number of installed handlers
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
