//! Vendor events and their Lua argument lists

use std::ffi::{c_char, CStr};

use mlua::{IntoLuaMulti, Lua, MultiValue, Table};

use discordrich_sdk::DiscordUser;

/// Event kinds a script can register a handler for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Ready,
    Disconnected,
    Errored,
    JoinGame,
    SpectateGame,
    JoinRequest,
}

impl EventKind {
    pub const COUNT: usize = 6;

    pub const ALL: [EventKind; Self::COUNT] = [
        EventKind::Ready,
        EventKind::Disconnected,
        EventKind::Errored,
        EventKind::JoinGame,
        EventKind::SpectateGame,
        EventKind::JoinRequest,
    ];

    /// Key of this handler in the handlers table passed from Lua
    pub const fn key(self) -> &'static str {
        match self {
            EventKind::Ready => "ready",
            EventKind::Disconnected => "disconnected",
            EventKind::Errored => "errored",
            EventKind::JoinGame => "join_game",
            EventKind::SpectateGame => "spectate_game",
            EventKind::JoinRequest => "join_request",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// User record delivered with ready and join-request events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub discriminator: Option<String>,
    pub avatar: Option<String>,
}

impl User {
    /// Copy a vendor user record
    ///
    /// # Safety
    /// `user` must be null or point to a valid `DiscordUser` whose string
    /// fields are null or NUL-terminated.
    pub unsafe fn from_raw(user: *const DiscordUser) -> Self {
        match user.as_ref() {
            Some(user) => Self {
                user_id: string_from_raw(user.user_id),
                username: string_from_raw(user.username),
                discriminator: string_from_raw(user.discriminator),
                avatar: string_from_raw(user.avatar),
            },
            None => Self::default(),
        }
    }

    /// Build the Lua table, omitting fields that are not set
    fn to_table(&self, lua: &Lua) -> mlua::Result<Table> {
        let table = lua.create_table()?;
        if let Some(ref v) = self.user_id {
            table.set("user_id", v.as_str())?;
        }
        if let Some(ref v) = self.username {
            table.set("username", v.as_str())?;
        }
        if let Some(ref v) = self.discriminator {
            table.set("discriminator", v.as_str())?;
        }
        if let Some(ref v) = self.avatar {
            table.set("avatar", v.as_str())?;
        }
        Ok(table)
    }
}

/// Copy a borrowed C string, mapping null to `None`
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string.
pub unsafe fn string_from_raw(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
    }
}

/// An event delivered by the vendor callback pump
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Ready(User),
    Disconnected {
        code: i32,
        message: Option<String>,
    },
    Errored {
        code: i32,
        message: Option<String>,
    },
    JoinGame(Option<String>),
    SpectateGame(Option<String>),
    JoinRequest(User),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Ready(_) => EventKind::Ready,
            Event::Disconnected { .. } => EventKind::Disconnected,
            Event::Errored { .. } => EventKind::Errored,
            Event::JoinGame(_) => EventKind::JoinGame,
            Event::SpectateGame(_) => EventKind::SpectateGame,
            Event::JoinRequest(_) => EventKind::JoinRequest,
        }
    }

    /// Positional arguments passed to the script handler
    pub fn to_args(&self, lua: &Lua) -> mlua::Result<MultiValue> {
        match self {
            Event::Ready(user) | Event::JoinRequest(user) => user.to_table(lua)?.into_lua_multi(lua),
            Event::Disconnected { code, message } | Event::Errored { code, message } => {
                (f64::from(*code), message.as_deref()).into_lua_multi(lua)
            }
            Event::JoinGame(secret) | Event::SpectateGame(secret) => {
                secret.as_deref().into_lua_multi(lua)
            }
        }
    }
}
