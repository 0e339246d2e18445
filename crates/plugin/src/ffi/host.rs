//! Adapters over the host callback table

use std::ffi::{c_char, CStr, CString};

use mlua::ffi::lua_State;
use mlua::{Lua, Value};

use discordrich_core::InstanceContext;
use discordrich_loader::ConfigSource;

/// Reads a project configuration string; returns `default` (or null) when unset
pub type GetConfigStringFn =
    unsafe extern "C" fn(key: *const c_char, default: *const c_char) -> *const c_char;

/// Pushes the active script instance onto the stack of `state`
pub type GetInstanceFn = unsafe extern "C" fn(state: *mut lua_State);

/// Pops a value from the stack of `state` and makes it the active script instance
pub type SetInstanceFn = unsafe extern "C" fn(state: *mut lua_State);

/// Services the host provides to the extension
///
/// Every entry is optional. Without `get_config_string` the extension reads
/// `discordrich.toml` next to the executable; without the instance pair it
/// tracks the active instance itself.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct HostCallbacks {
    pub get_config_string: Option<GetConfigStringFn>,
    pub get_instance: Option<GetInstanceFn>,
    pub set_instance: Option<SetInstanceFn>,
}

/// Project configuration read through the host getter
#[derive(Debug, Clone, Copy)]
pub struct HostConfig {
    get: GetConfigStringFn,
}

impl HostConfig {
    pub fn new(get: GetConfigStringFn) -> Self {
        Self { get }
    }
}

impl ConfigSource for HostConfig {
    fn get_string(&self, key: &str) -> Option<String> {
        let key = CString::new(key).ok()?;
        // SAFETY: the host getter takes NUL-terminated strings and returns a
        // string it owns for at least the duration of this call
        let value = unsafe { (self.get)(key.as_ptr(), std::ptr::null()) };
        if value.is_null() {
            return None;
        }
        let value = unsafe { CStr::from_ptr(value) }.to_string_lossy().into_owned();
        (!value.is_empty()).then_some(value)
    }
}

/// Script instance managed by the host
#[derive(Debug, Clone, Copy)]
pub struct HostInstanceContext {
    get: GetInstanceFn,
    set: SetInstanceFn,
}

impl HostInstanceContext {
    /// Build from the host table, if it provides both instance functions
    pub fn from_host(host: &HostCallbacks) -> Option<Self> {
        Some(Self {
            get: host.get_instance?,
            set: host.set_instance?,
        })
    }
}

impl InstanceContext for HostInstanceContext {
    fn current(&self, lua: &Lua) -> mlua::Result<Value> {
        let get = self.get;
        // SAFETY: the host pushes exactly one value
        unsafe { lua.exec_raw::<Value>((), |state| get(state)) }
    }

    fn restore(&self, lua: &Lua, instance: Value) -> mlua::Result<()> {
        let set = self.set;
        // SAFETY: `instance` is pushed by exec_raw and the host pops it
        unsafe { lua.exec_raw::<()>(instance, |state| set(state)) }
    }
}
