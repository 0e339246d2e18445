//! Rich presence marshaling
//!
//! Converts the table passed to `discordrich.update_presence` into the
//! vendor's `DiscordRichPresence`. Every field is optional; keys that are
//! absent or `nil` leave the zero-initialized default in place and unknown
//! keys are ignored.

use std::ffi::{c_char, c_int, CString};
use std::ptr;

use mlua::Table;

use discordrich_sdk::DiscordRichPresence;

use crate::error::{BridgeError, BridgeResult};

/// Presence fields as read from Lua
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresenceRecord {
    pub state: Option<String>,
    pub details: Option<String>,
    pub start_timestamp: Option<f64>,
    pub end_timestamp: Option<f64>,
    pub large_image_key: Option<String>,
    pub large_image_text: Option<String>,
    pub small_image_key: Option<String>,
    pub small_image_text: Option<String>,
    pub party_id: Option<String>,
    pub party_size: Option<f64>,
    pub party_max: Option<f64>,
    pub match_secret: Option<String>,
    pub join_secret: Option<String>,
    pub spectate_secret: Option<String>,
    pub instance: Option<f64>,
}

impl PresenceRecord {
    /// Read every known key from `table`
    ///
    /// String keys accept strings and numbers; numeric keys accept numbers and
    /// numeric strings. Other types are conversion errors.
    pub fn from_table(table: &Table) -> mlua::Result<Self> {
        Ok(Self {
            state: table.get("state")?,
            details: table.get("details")?,
            start_timestamp: table.get("start_timestamp")?,
            end_timestamp: table.get("end_timestamp")?,
            large_image_key: table.get("large_image_key")?,
            large_image_text: table.get("large_image_text")?,
            small_image_key: table.get("small_image_key")?,
            small_image_text: table.get("small_image_text")?,
            party_id: table.get("party_id")?,
            party_size: table.get("party_size")?,
            party_max: table.get("party_max")?,
            match_secret: table.get("match_secret")?,
            join_secret: table.get("join_secret")?,
            spectate_secret: table.get("spectate_secret")?,
            instance: table.get("instance")?,
        })
    }

    /// Build the vendor struct
    ///
    /// The returned value owns the C strings the struct points into.
    pub fn to_raw(&self) -> BridgeResult<RawPresence> {
        let mut strings = Vec::new();
        let mut c_str = |field: &'static str, value: &Option<String>| -> BridgeResult<*const c_char> {
            match value {
                None => Ok(ptr::null()),
                Some(s) => {
                    let s = CString::new(s.as_str()).map_err(|_| BridgeError::InteriorNul(field))?;
                    let ptr = s.as_ptr();
                    strings.push(s);
                    Ok(ptr)
                }
            }
        };

        let raw = DiscordRichPresence {
            state: c_str("state", &self.state)?,
            details: c_str("details", &self.details)?,
            start_timestamp: self.start_timestamp.map_or(0, |n| n as i64),
            end_timestamp: self.end_timestamp.map_or(0, |n| n as i64),
            large_image_key: c_str("large_image_key", &self.large_image_key)?,
            large_image_text: c_str("large_image_text", &self.large_image_text)?,
            small_image_key: c_str("small_image_key", &self.small_image_key)?,
            small_image_text: c_str("small_image_text", &self.small_image_text)?,
            party_id: c_str("party_id", &self.party_id)?,
            party_size: self.party_size.map_or(0, |n| n as c_int),
            party_max: self.party_max.map_or(0, |n| n as c_int),
            match_secret: c_str("match_secret", &self.match_secret)?,
            join_secret: c_str("join_secret", &self.join_secret)?,
            spectate_secret: c_str("spectate_secret", &self.spectate_secret)?,
            instance: self.instance.map_or(0, |n| n as i8),
        };

        Ok(RawPresence {
            raw,
            _strings: strings,
        })
    }
}

/// `DiscordRichPresence` together with the strings it borrows
pub struct RawPresence {
    raw: DiscordRichPresence,
    // CString heap buffers do not move when the Vec does
    _strings: Vec<CString>,
}

impl RawPresence {
    pub fn as_raw(&self) -> &DiscordRichPresence {
        &self.raw
    }
}
