//! Script instance context
//!
//! The host runs each script with an active "instance" (the `self` a script
//! callback belongs to). A handler registered from one script must run with
//! that script's instance active, even when the event arrives while another
//! instance is current.

use mlua::{Lua, Value};

/// Access to the host's active script instance
pub trait InstanceContext {
    /// The instance active right now
    fn current(&self, lua: &Lua) -> mlua::Result<Value>;

    /// Make `instance` the active instance
    fn restore(&self, lua: &Lua, instance: Value) -> mlua::Result<()>;
}

/// Keeps the active instance in a named Lua registry slot
///
/// Used when the host has no instance concept of its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegistryInstanceContext;

impl RegistryInstanceContext {
    pub const REGISTRY_KEY: &'static str = "discordrich.instance";
}

impl InstanceContext for RegistryInstanceContext {
    fn current(&self, lua: &Lua) -> mlua::Result<Value> {
        lua.named_registry_value(Self::REGISTRY_KEY)
    }

    fn restore(&self, lua: &Lua, instance: Value) -> mlua::Result<()> {
        lua.set_named_registry_value(Self::REGISTRY_KEY, instance)
    }
}
