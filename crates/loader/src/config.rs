//! Host configuration lookup
//!
//! The loader only needs one value from the host project configuration: the
//! project-relative library directory used when running from the editor.

use std::collections::HashMap;

/// Project configuration key holding the project-relative library path
pub const LIB_PATH_KEY: &str = "discordrich.lib_path";

/// Read-only view of the host project configuration
///
/// Keys are `section.name` pairs, as in `discordrich.lib_path`.
pub trait ConfigSource {
    /// Look up a string value, returning `None` if the key is not set
    fn get_string(&self, key: &str) -> Option<String>;
}

impl ConfigSource for HashMap<String, String> {
    fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl ConfigSource for toml::Table {
    fn get_string(&self, key: &str) -> Option<String> {
        let (section, name) = key.split_once('.')?;
        let value = self.get(section)?.as_table()?.get(name)?;
        match value {
            toml::Value::String(s) => Some(s.clone()),
            toml::Value::Integer(i) => Some(i.to_string()),
            toml::Value::Float(f) => Some(f.to_string()),
            toml::Value::Boolean(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// Configuration with no values set
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyConfig;

impl ConfigSource for EmptyConfig {
    fn get_string(&self, _key: &str) -> Option<String> {
        None
    }
}

/// Read `discordrich.lib_path`, defaulting to empty with a warning
pub fn lib_path(config: &dyn ConfigSource) -> String {
    match config.get_string(LIB_PATH_KEY) {
        Some(path) if !path.is_empty() => path,
        _ => {
            tracing::warn!(
                "{} not set in the project configuration, loading from the project root",
                LIB_PATH_KEY
            );
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_dotted_lookup() {
        let table: toml::Table = toml::from_str(
            r#"
            [discordrich]
            lib_path = "bin/rpc"
            retries = 3
            "#,
        )
        .unwrap();

        assert_eq!(table.get_string(LIB_PATH_KEY).as_deref(), Some("bin/rpc"));
        assert_eq!(
            table.get_string("discordrich.retries").as_deref(),
            Some("3")
        );
        assert_eq!(table.get_string("discordrich.missing"), None);
        assert_eq!(table.get_string("nosection"), None);
    }

    #[test]
    fn test_lib_path_defaults_to_empty() {
        assert_eq!(lib_path(&EmptyConfig), "");

        let mut map = HashMap::new();
        map.insert(LIB_PATH_KEY.to_string(), String::new());
        assert_eq!(lib_path(&map), "");

        map.insert(LIB_PATH_KEY.to_string(), "native".to_string());
        assert_eq!(lib_path(&map), "native");
    }
}
