//! C-compatible exports called by the host extension lifecycle

use std::cell::RefCell;
use std::ffi::c_int;
use std::panic::{catch_unwind, AssertUnwindSafe};

use mlua::ffi::lua_State;
use mlua::Lua;
use tracing::instrument;
use tracing_subscriber::EnvFilter;

use discordrich_core::{
    register_module, DiscordBridge, ExtensionConfig, InstanceContext, RegistryInstanceContext,
};
use discordrich_loader::{resolve_library_dir, ConfigSource, SymbolBinder};

use super::host::{HostCallbacks, HostConfig, HostInstanceContext};

/// Lifecycle call succeeded
pub const DISCORDRICH_RESULT_OK: c_int = 0;
/// Lifecycle call failed; the extension stays inert
pub const DISCORDRICH_RESULT_INIT_ERROR: c_int = -1;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "DISCORDRICH_LOG";

/// Whether this build carries its own Lua runtime instead of the host's
const BUNDLED_LUA: bool = cfg!(feature = "vendored");

struct Extension {
    _lua: Lua,
    bridge: DiscordBridge,
}

thread_local! {
    static EXTENSION: RefCell<Option<Extension>> = const { RefCell::new(None) };
}

fn init_logging(debug: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Tear down the running extension, if any
fn finalize() {
    if let Some(extension) = EXTENSION.with(|e| e.borrow_mut().take()) {
        extension.bridge.close();
        tracing::info!("discordrich finalized");
    }
}

fn initialize(state: *mut lua_State, host: HostCallbacks) -> mlua::Result<()> {
    let host_config = host.get_config_string.map(HostConfig::new);
    let mut load_error = None;
    let file_config;
    let config: &dyn ConfigSource = match &host_config {
        Some(host_config) => host_config,
        None => {
            file_config = ExtensionConfig::load().unwrap_or_else(|e| {
                load_error = Some(e);
                ExtensionConfig::default()
            });
            &file_config
        }
    };
    let settings = ExtensionConfig::from_source(config);
    init_logging(settings.discordrich.debug);
    if let Some(e) = load_error {
        tracing::warn!("Failed to load config, using defaults: {}", e);
    }

    finalize();

    if BUNDLED_LUA {
        tracing::warn!(
            "Built with a bundled LuaJIT; the host state belongs to another runtime, rebuild with the `module` feature"
        );
    }

    // SAFETY: the host hands over a live state that outlives the extension
    let lua = unsafe { Lua::init_from_ptr(state) };

    let mut binder = SymbolBinder::new();
    if binder.open(&resolve_library_dir(config)) {
        tracing::info!(
            "Bound {} discord-rpc entry points",
            binder.table().bound_count()
        );
    }

    let context: Box<dyn InstanceContext> = match HostInstanceContext::from_host(&host) {
        Some(context) => Box::new(context),
        None => Box::new(RegistryInstanceContext),
    };

    let bridge = DiscordBridge::new(Box::new(binder), context);
    if let Err(e) = register_module(&lua, &bridge) {
        bridge.close();
        return Err(e);
    }

    EXTENSION.with(|e| *e.borrow_mut() = Some(Extension { _lua: lua, bridge }));
    Ok(())
}

/// Called once when the host loads the extension
///
/// Calling it again tears the previous instance down first.
///
/// # Safety
/// - `state` must be the host's main `lua_State`, valid until finalize
/// - `host` must be null or point to a valid [`HostCallbacks`]
#[no_mangle]
#[instrument(skip_all)]
pub unsafe extern "C" fn discordrich_initialize_extension(
    state: *mut lua_State,
    host: *const HostCallbacks,
) -> c_int {
    if state.is_null() {
        return DISCORDRICH_RESULT_INIT_ERROR;
    }
    let host = if host.is_null() {
        HostCallbacks::default()
    } else {
        *host
    };

    match catch_unwind(AssertUnwindSafe(|| initialize(state, host))) {
        Ok(Ok(())) => {
            tracing::info!("discordrich initialized");
            DISCORDRICH_RESULT_OK
        }
        Ok(Err(e)) => {
            tracing::error!("Failed to register Lua module: {}", e);
            DISCORDRICH_RESULT_INIT_ERROR
        }
        Err(_) => {
            tracing::error!("Panic during initialize");
            DISCORDRICH_RESULT_INIT_ERROR
        }
    }
}

/// Called by the host every frame
#[no_mangle]
pub extern "C" fn discordrich_update_extension() -> c_int {
    let result = catch_unwind(|| {
        let bridge = EXTENSION.with(|e| e.borrow().as_ref().map(|ext| ext.bridge.clone()));
        if let Some(bridge) = bridge {
            bridge.run_callbacks();
        }
    });
    match result {
        Ok(()) => DISCORDRICH_RESULT_OK,
        Err(_) => {
            tracing::error!("Panic during update");
            DISCORDRICH_RESULT_INIT_ERROR
        }
    }
}

/// Called once when the host unloads the extension
#[no_mangle]
#[instrument(skip_all)]
pub extern "C" fn discordrich_finalize_extension() -> c_int {
    match catch_unwind(finalize) {
        Ok(()) => DISCORDRICH_RESULT_OK,
        Err(_) => {
            tracing::error!("Panic during finalize");
            DISCORDRICH_RESULT_INIT_ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_without_extension_is_noop() {
        assert_eq!(discordrich_update_extension(), DISCORDRICH_RESULT_OK);
        assert_eq!(discordrich_finalize_extension(), DISCORDRICH_RESULT_OK);
    }

    #[test]
    fn test_linkage_matches_features() {
        assert_eq!(BUNDLED_LUA, !cfg!(feature = "module"));
    }

    #[test]
    fn test_null_state_is_rejected() {
        let result =
            unsafe { discordrich_initialize_extension(std::ptr::null_mut(), std::ptr::null()) };
        assert_eq!(result, DISCORDRICH_RESULT_INIT_ERROR);
    }
}
