//! The `discordrich` Lua module
//!
//! ```lua
//! discordrich.initialize("123456789", {
//!     ready = function(user) print("connected as " .. user.username) end,
//!     errored = function(code, message) print(code, message) end,
//! })
//! discordrich.update_presence({ state = "In Queue", party_size = 1, party_max = 4 })
//! ```

use mlua::{Lua, Table, Value};

use discordrich_sdk::{DISCORD_REPLY_IGNORE, DISCORD_REPLY_NO, DISCORD_REPLY_YES};

use crate::bridge::{DiscordBridge, InitializeOptions};
use crate::error::{coerce_bool, BridgeError, BridgeResult};
use crate::presence::PresenceRecord;

/// Global and `package.loaded` name of the module
pub const MODULE_NAME: &str = "discordrich";

fn optional_table(value: Value) -> BridgeResult<Option<Table>> {
    match value {
        Value::Nil => Ok(None),
        Value::Table(t) => Ok(Some(t)),
        other => Err(BridgeError::type_mismatch("table", &other)),
    }
}

/// Build the module table, with every function bound to `bridge`
pub fn create_module(lua: &Lua, bridge: &DiscordBridge) -> mlua::Result<Table> {
    let module = lua.create_table()?;

    let b = bridge.clone();
    module.set(
        "initialize",
        lua.create_function(
            move |lua, (app_id, handlers, auto_register, steam_id): (String, Value, Value, Option<String>)| {
                let auto_register = match auto_register {
                    Value::Nil => true,
                    other => coerce_bool(&other)?,
                };
                let options = InitializeOptions {
                    application_id: &app_id,
                    handlers: optional_table(handlers)?,
                    auto_register,
                    steam_id: steam_id.as_deref(),
                };
                Ok(b.initialize(lua, options)?)
            },
        )?,
    )?;

    let b = bridge.clone();
    module.set(
        "shutdown",
        lua.create_function(move |_, ()| {
            b.shutdown();
            Ok(())
        })?,
    )?;

    let b = bridge.clone();
    module.set(
        "update_presence",
        lua.create_function(move |_, presence: Value| {
            let table = match presence {
                Value::Table(t) => t,
                other => return Err(BridgeError::type_mismatch("table", &other).into()),
            };
            let record = PresenceRecord::from_table(&table)?;
            Ok(b.update_presence(&record)?)
        })?,
    )?;

    let b = bridge.clone();
    module.set(
        "clear_presence",
        lua.create_function(move |_, ()| {
            b.clear_presence();
            Ok(())
        })?,
    )?;

    let b = bridge.clone();
    module.set(
        "respond",
        lua.create_function(move |_, (user_id, reply): (String, f64)| {
            Ok(b.respond(&user_id, reply as i32)?)
        })?,
    )?;

    let b = bridge.clone();
    module.set(
        "update_handlers",
        lua.create_function(move |lua, handlers: Value| {
            let handlers = optional_table(handlers)?;
            Ok(b.update_handlers(lua, handlers.as_ref())?)
        })?,
    )?;

    let b = bridge.clone();
    module.set(
        "register",
        lua.create_function(move |_, (app_id, command): (String, String)| {
            Ok(b.register(&app_id, &command)?)
        })?,
    )?;

    let b = bridge.clone();
    module.set(
        "register_steam_game",
        lua.create_function(move |_, (app_id, steam_id): (String, String)| {
            Ok(b.register_steam_game(&app_id, &steam_id)?)
        })?,
    )?;

    module.set("REPLY_NO", DISCORD_REPLY_NO)?;
    module.set("REPLY_YES", DISCORD_REPLY_YES)?;
    module.set("REPLY_IGNORE", DISCORD_REPLY_IGNORE)?;

    Ok(module)
}

/// Expose the module as a global and through `require`
pub fn register_module(lua: &Lua, bridge: &DiscordBridge) -> mlua::Result<Table> {
    let module = create_module(lua, bridge)?;
    lua.globals().set(MODULE_NAME, module.clone())?;

    let package: Option<Table> = lua.globals().get("package")?;
    if let Some(package) = package {
        let loaded: Table = package.get("loaded")?;
        loaded.set(MODULE_NAME, module.clone())?;
    }

    tracing::debug!("Registered Lua module '{}'", MODULE_NAME);
    Ok(module)
}
