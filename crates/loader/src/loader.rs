//! discord-rpc library loading and symbol binding

use std::path::{Path, PathBuf};

use libloading::Library;

use discordrich_sdk::{
    ClearPresenceFn, InitializeFn, RegisterFn, RegisterSteamGameFn, RespondFn, RunCallbacksFn,
    ShutdownFn, Symbol, UpdateHandlersFn, UpdatePresenceFn, LIBRARY_BASE_NAME,
};

use crate::error::LoadError;

/// Resolved entry points of the vendor library
///
/// Each entry is independently optional so that partial SDK builds still
/// expose whatever they do export.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymbolTable {
    pub initialize: Option<InitializeFn>,
    pub shutdown: Option<ShutdownFn>,
    pub run_callbacks: Option<RunCallbacksFn>,
    pub update_presence: Option<UpdatePresenceFn>,
    pub clear_presence: Option<ClearPresenceFn>,
    pub respond: Option<RespondFn>,
    pub update_handlers: Option<UpdateHandlersFn>,
    pub register: Option<RegisterFn>,
    pub register_steam_game: Option<RegisterSteamGameFn>,
}

impl SymbolTable {
    /// Resolve every entry point, logging each one that is missing
    ///
    /// # Safety
    /// `library` must be the discord-rpc library so that the exported
    /// symbols have the declared signatures.
    unsafe fn resolve(library: &Library) -> Self {
        Self {
            initialize: resolve(library, Symbol::Initialize),
            shutdown: resolve(library, Symbol::Shutdown),
            run_callbacks: resolve(library, Symbol::RunCallbacks),
            update_presence: resolve(library, Symbol::UpdatePresence),
            clear_presence: resolve(library, Symbol::ClearPresence),
            respond: resolve(library, Symbol::Respond),
            update_handlers: resolve(library, Symbol::UpdateHandlers),
            register: resolve(library, Symbol::Register),
            register_steam_game: resolve(library, Symbol::RegisterSteamGame),
        }
    }

    /// Check whether an entry point is bound
    pub fn is_bound(&self, symbol: Symbol) -> bool {
        match symbol {
            Symbol::Initialize => self.initialize.is_some(),
            Symbol::Shutdown => self.shutdown.is_some(),
            Symbol::RunCallbacks => self.run_callbacks.is_some(),
            Symbol::UpdatePresence => self.update_presence.is_some(),
            Symbol::ClearPresence => self.clear_presence.is_some(),
            Symbol::Respond => self.respond.is_some(),
            Symbol::UpdateHandlers => self.update_handlers.is_some(),
            Symbol::Register => self.register.is_some(),
            Symbol::RegisterSteamGame => self.register_steam_game.is_some(),
        }
    }

    /// Number of bound entry points
    pub fn bound_count(&self) -> usize {
        Symbol::ALL.iter().filter(|s| self.is_bound(**s)).count()
    }
}

unsafe fn resolve<T: Copy>(library: &Library, symbol: Symbol) -> Option<T> {
    match library.get::<T>(symbol.name().as_bytes()) {
        Ok(sym) => Some(*sym),
        Err(source) => {
            tracing::error!("{}", LoadError::Symbol { symbol, source });
            None
        }
    }
}

/// Open a shared library with its symbols visible to later loads
#[cfg(unix)]
unsafe fn open_global(path: &Path) -> Result<Library, libloading::Error> {
    libloading::os::unix::Library::open(Some(path), libc::RTLD_NOW | libc::RTLD_GLOBAL)
        .map(Library::from)
}

#[cfg(not(unix))]
unsafe fn open_global(path: &Path) -> Result<Library, libloading::Error> {
    Library::new(path)
}

/// Owner of the vendor library handle and its symbol table
///
/// Symbols are only reachable while the library is held; [`close`](Self::close)
/// clears the table before releasing the handle.
#[derive(Default)]
pub struct SymbolBinder {
    library: Option<Library>,
    table: SymbolTable,
}

impl SymbolBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full path of the vendor library inside `dir`
    ///
    /// e.g. `dir/libdiscord-rpc.so`, `dir/libdiscord-rpc.dylib`, `dir\discord-rpc.dll`
    pub fn library_path(dir: &Path) -> PathBuf {
        dir.join(libloading::library_filename(LIBRARY_BASE_NAME))
    }

    /// Open the vendor library from `dir` and bind its entry points
    ///
    /// No-op if a library is already held. Returns whether a library is held
    /// afterwards.
    #[tracing::instrument(skip_all, fields(dir = %dir.display()))]
    pub fn open(&mut self, dir: &Path) -> bool {
        self.open_file(&Self::library_path(dir))
    }

    /// Open a specific library file and bind its entry points
    ///
    /// Failure to open is logged and leaves every entry point unbound.
    pub fn open_file(&mut self, path: &Path) -> bool {
        if self.library.is_some() {
            return true;
        }

        // SAFETY: loading runs the library's initializers; the path is the
        // vendor library selected by the resolver or the host.
        let library = match unsafe { open_global(path) } {
            Ok(library) => library,
            Err(source) => {
                tracing::warn!(
                    "{}",
                    LoadError::Open {
                        path: path.to_path_buf(),
                        source
                    }
                );
                return false;
            }
        };

        // SAFETY: the signatures in discordrich_sdk mirror discord_rpc.h.
        self.table = unsafe { SymbolTable::resolve(&library) };
        self.library = Some(library);

        tracing::info!(
            "Loaded {:?} ({}/{} symbols bound)",
            path,
            self.table.bound_count(),
            Symbol::ALL.len()
        );
        true
    }

    /// Unbind every entry point and release the library
    ///
    /// Safe to call repeatedly and without a prior `open`.
    pub fn close(&mut self) {
        self.table = SymbolTable::default();
        if let Some(library) = self.library.take() {
            if let Err(e) = library.close() {
                tracing::warn!("Failed to close library: {}", e);
            }
        }
    }

    /// Check whether a library handle is held
    pub fn is_loaded(&self) -> bool {
        self.library.is_some()
    }

    /// Currently bound entry points
    pub fn table(&self) -> &SymbolTable {
        &self.table
    }
}

impl Drop for SymbolBinder {
    fn drop(&mut self) {
        self.close();
    }
}
