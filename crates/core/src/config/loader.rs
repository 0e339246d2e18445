//! Config path resolution

use std::path::PathBuf;

use super::{ConfigError, ConfigResult};

/// File name of the standalone extension config
pub const CONFIG_FILE_NAME: &str = "discordrich.toml";

/// Returns the path of `discordrich.toml` next to the running executable.
pub fn config_path() -> ConfigResult<PathBuf> {
    let exe = std::env::current_exe().map_err(ConfigError::IoError)?;
    exe.parent()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .ok_or(ConfigError::NoConfigDirectory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_is_next_to_executable() {
        let path = config_path().unwrap();
        let exe = std::env::current_exe().unwrap();

        assert_eq!(path.file_name().unwrap(), CONFIG_FILE_NAME);
        assert_eq!(path.parent(), exe.parent());
    }
}
