//! Library directory resolution
//!
//! The vendor library is searched for, in order:
//! 1. The directory named by `DEFOLD_DISCORD_RPC_LIB_PATH`
//! 2. The project library directory, when the executable is the editor's
//!    development engine (`<project>/build/<arch>-<os>/dmengine`)
//! 3. The directory containing the running executable
//!
//! Paths are handled as strings with an explicit [`Platform`] so that all
//! three OS conventions can be exercised from any host.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::{self, ConfigSource};

/// Environment variable overriding the library search directory
pub const LIB_PATH_ENV: &str = "DEFOLD_DISCORD_RPC_LIB_PATH";

/// Name of the development engine binary the editor launches
const DEV_ENGINE_NAME: &str = "dmengine";

/// OS and architecture naming used by the engine's build tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// Canonical OS directory name (e.g., "linux", "win32", "osx")
    pub os: &'static str,
    /// Alternate spellings of the OS directory name
    pub os_aliases: &'static [&'static str],
    /// Architecture directory name, `None` if the build tree has no layout for it
    pub arch: Option<&'static str>,
    /// Executable file extension including the dot, or empty
    pub exe_suffix: &'static str,
    /// Path separator
    pub separator: char,
    /// Libraries live inside an app bundle (`Contents/MacOS`)
    pub app_bundle: bool,
}

impl Platform {
    pub const fn linux(arch: Option<&'static str>) -> Self {
        Self {
            os: "linux",
            os_aliases: &[],
            arch,
            exe_suffix: "",
            separator: '/',
            app_bundle: false,
        }
    }

    pub const fn windows(arch: Option<&'static str>) -> Self {
        Self {
            os: "win32",
            os_aliases: &[],
            arch,
            exe_suffix: ".exe",
            separator: '\\',
            app_bundle: false,
        }
    }

    pub const fn macos(arch: Option<&'static str>) -> Self {
        Self {
            os: "osx",
            os_aliases: &["darwin", "macos"],
            arch,
            exe_suffix: "",
            separator: '/',
            app_bundle: true,
        }
    }

    /// The platform this binary was compiled for
    pub const fn current() -> Self {
        #[cfg(target_arch = "x86_64")]
        const ARCH: Option<&str> = Some("x86_64");
        #[cfg(target_arch = "x86")]
        const ARCH: Option<&str> = Some("x86");
        #[cfg(target_arch = "aarch64")]
        const ARCH: Option<&str> = Some("arm64");
        #[cfg(not(any(target_arch = "x86_64", target_arch = "x86", target_arch = "aarch64")))]
        const ARCH: Option<&str> = None;

        #[cfg(target_os = "windows")]
        return Self::windows(ARCH);
        #[cfg(target_os = "macos")]
        return Self::macos(ARCH);
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        return Self::linux(ARCH);
    }

    /// Executable path suffixes that identify the editor's development engine
    fn dev_engine_suffixes(&self) -> Vec<String> {
        let Some(arch) = self.arch else {
            return Vec::new();
        };
        let sep = self.separator;
        std::iter::once(self.os)
            .chain(self.os_aliases.iter().copied())
            .map(|os| {
                format!(
                    "{sep}build{sep}{arch}-{os}{sep}{DEV_ENGINE_NAME}{}",
                    self.exe_suffix
                )
            })
            .collect()
    }

    /// Check whether `exe` is the development engine inside a project build tree
    pub fn is_dev_engine(&self, exe: &str) -> bool {
        self.dev_engine_suffixes()
            .iter()
            .any(|suffix| exe.ends_with(suffix.as_str()))
    }

    /// Directory holding the executable, `.` if it has no parent component
    pub fn dirname<'a>(&self, path: &'a str) -> &'a str {
        match path.rfind(self.separator) {
            Some(0) => &path[..1],
            Some(i) => &path[..i],
            None => ".",
        }
    }

    /// Project library directory for a development engine executable
    ///
    /// Walks three levels up from `exe` to the project root and appends the
    /// configured relative path plus the per-platform subdirectory.
    pub fn project_library_dir(&self, exe: &str, lib_path: &str) -> String {
        let sep = self.separator;
        let project = self.dirname(self.dirname(self.dirname(exe)));
        let relative = lib_path.trim_end_matches(|c: char| c == '/' || c == sep);

        let mut dir = String::with_capacity(project.len() + relative.len() + 32);
        dir.push_str(project);
        if !relative.is_empty() {
            if !relative.starts_with('/') {
                dir.push(sep);
            }
            dir.extend(relative.chars().map(|c| if c == '/' { sep } else { c }));
        }

        dir.push(sep);
        dir.push_str(self.arch.unwrap_or_default());
        dir.push('-');
        dir.push_str(self.os);
        if self.app_bundle {
            dir.push(sep);
            dir.push_str("Contents");
            dir.push(sep);
            dir.push_str("MacOS");
        }
        dir
    }
}

/// Resolve the directory to load the vendor library from
///
/// Reads the environment override and the running executable's path.
pub fn resolve_library_dir(config: &dyn ConfigSource) -> PathBuf {
    let env_override = std::env::var_os(LIB_PATH_ENV);
    let exe = std::env::current_exe()
        .map_err(|e| tracing::warn!("Could not determine executable path: {}", e))
        .ok();
    resolve_with(&Platform::current(), env_override, exe.as_deref(), config)
}

/// Resolve the library directory from explicit inputs
///
/// # Arguments
/// * `platform` - Naming conventions to apply
/// * `env_override` - Value of [`LIB_PATH_ENV`], if set
/// * `exe` - Absolute path of the running executable, if known
/// * `config` - Project configuration, only consulted for the editor layout
pub fn resolve_with(
    platform: &Platform,
    env_override: Option<OsString>,
    exe: Option<&Path>,
    config: &dyn ConfigSource,
) -> PathBuf {
    if let Some(dir) = env_override.filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }

    let Some(exe) = exe else {
        return PathBuf::from(".");
    };
    let exe = exe.to_string_lossy();

    if platform.is_dev_engine(&exe) {
        tracing::info!("Running in the editor. Will attempt to load libraries from project");
        let lib_path = config::lib_path(config);
        return PathBuf::from(platform.project_library_dir(&exe, &lib_path));
    }

    PathBuf::from(platform.dirname(&exe))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::config::{EmptyConfig, LIB_PATH_KEY};

    fn lib_config(path: &str) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert(LIB_PATH_KEY.to_string(), path.to_string());
        map
    }

    #[test]
    fn test_env_override_takes_precedence() {
        let platform = Platform::linux(Some("x86_64"));
        let dir = resolve_with(
            &platform,
            Some(OsString::from("/opt/rpc")),
            Some(Path::new("/home/u/proj/build/x86_64-linux/dmengine")),
            &lib_config("bin/rpc"),
        );
        assert_eq!(dir, PathBuf::from("/opt/rpc"));
    }

    #[test]
    fn test_empty_env_override_is_ignored() {
        let platform = Platform::linux(Some("x86_64"));
        let dir = resolve_with(
            &platform,
            Some(OsString::new()),
            Some(Path::new("/usr/games/mygame/mygame.x86_64")),
            &EmptyConfig,
        );
        assert_eq!(dir, PathBuf::from("/usr/games/mygame"));
    }

    #[test]
    fn test_unknown_exe_falls_back_to_cwd() {
        let platform = Platform::linux(Some("x86_64"));
        let dir = resolve_with(&platform, None, None, &EmptyConfig);
        assert_eq!(dir, PathBuf::from("."));
    }

    #[test]
    fn test_linux_editor_layout() {
        let platform = Platform::linux(Some("x86_64"));
        let dir = resolve_with(
            &platform,
            None,
            Some(Path::new("/home/u/proj/build/x86_64-linux/dmengine")),
            &lib_config("bin/rpc"),
        );
        assert_eq!(dir, PathBuf::from("/home/u/proj/bin/rpc/x86_64-linux"));
    }

    #[test]
    fn test_macos_editor_layout_matches_alternate_names() {
        let platform = Platform::macos(Some("x86_64"));
        let expected = "/Users/u/proj/bin/rpc/x86_64-osx/Contents/MacOS";

        for exe in [
            "/Users/u/proj/build/x86_64-osx/dmengine",
            "/Users/u/proj/build/x86_64-darwin/dmengine",
            "/Users/u/proj/build/x86_64-macos/dmengine",
        ] {
            assert!(platform.is_dev_engine(exe), "{}", exe);
            assert_eq!(platform.project_library_dir(exe, "bin/rpc"), expected);
        }
    }

    #[test]
    fn test_windows_editor_layout_normalizes_separators() {
        let platform = Platform::windows(Some("x86_64"));
        let exe = r"C:\Users\u\proj\build\x86_64-win32\dmengine.exe";

        assert!(platform.is_dev_engine(exe));
        assert_eq!(
            platform.project_library_dir(exe, "bin/rpc/"),
            r"C:\Users\u\proj\bin\rpc\x86_64-win32"
        );
        assert!(!platform.is_dev_engine(r"C:\Games\proj\build\x86_64-win32\dmengine"));
    }

    #[test]
    fn test_packaged_build_is_not_editor() {
        let platform = Platform::linux(Some("x86_64"));
        assert!(!platform.is_dev_engine("/home/u/proj/build/x86-linux/dmengine"));
        assert!(!platform.is_dev_engine("/home/u/game/dmengine"));
    }

    #[test]
    fn test_unknown_arch_skips_editor_detection() {
        let platform = Platform::linux(None);
        assert!(!platform.is_dev_engine("/home/u/proj/build/x86_64-linux/dmengine"));
    }

    #[test]
    fn test_unset_lib_path_uses_project_root() {
        let platform = Platform::linux(Some("x86"));
        let dir = resolve_with(
            &platform,
            None,
            Some(Path::new("/p/build/x86-linux/dmengine")),
            &EmptyConfig,
        );
        assert_eq!(dir, PathBuf::from("/p/x86-linux"));
    }

    #[test]
    fn test_absolute_lib_path_keeps_single_separator() {
        let platform = Platform::linux(Some("x86_64"));
        assert_eq!(
            platform.project_library_dir("/p/build/x86_64-linux/dmengine", "/native"),
            "/p/native/x86_64-linux"
        );
    }

    #[test]
    fn test_dirname() {
        let platform = Platform::linux(None);
        assert_eq!(platform.dirname("/a/b/c"), "/a/b");
        assert_eq!(platform.dirname("/a"), "/");
        assert_eq!(platform.dirname("a"), ".");
    }
}
