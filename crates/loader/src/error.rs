//! Error types for library loading and symbol binding

use std::path::PathBuf;

use discordrich_sdk::Symbol;

/// Error type for library loading operations
///
/// None of these are fatal: they are logged and the affected operations
/// degrade to no-ops.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The shared library could not be opened
    #[error("Failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    /// A single entry point could not be resolved
    #[error("dlsym(\"{symbol}\"): {source}")]
    Symbol {
        symbol: Symbol,
        #[source]
        source: libloading::Error,
    },
}

/// Returned by a [`DiscordApi`](crate::DiscordApi) call whose entry point is not bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{0} is not bound")]
pub struct Unbound(pub Symbol);
