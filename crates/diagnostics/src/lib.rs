//! Lightweight, configurable logging shared by the nwshim crates.
//!
//! Usage:
//! - Set NWSHIM_LOG=off (default) - no logs
//! - Set NWSHIM_LOG=info - basic operation logs
//! - Set NWSHIM_LOG=debug - detailed diagnostic logs

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

static INIT: Once = Once::new();

/// Initialize diagnostics based on the NWSHIM_LOG environment variable.
///
/// This should be called once at host startup. It's safe to call
/// multiple times - subsequent calls will be ignored.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let log_level = std::env::var("NWSHIM_LOG").unwrap_or_else(|_| "off".to_string());

        let rt = match log_level.as_str() {
            "off" => return, // No setup needed
            "debug" => emit::setup()
                .emit_to(emit_term::stderr())
                .emit_when(emit::level::min_filter(emit::Level::Debug))
                .init(),
            "info" => emit::setup()
                .emit_to(emit_term::stderr())
                .emit_when(emit::level::min_filter(emit::Level::Info))
                .init(),
            "warn" => emit::setup()
                .emit_to(emit_term::stderr())
                .emit_when(emit::level::min_filter(emit::Level::Warn))
                .init(),
            "error" => emit::setup()
                .emit_to(emit_term::stderr())
                .emit_when(emit::level::min_filter(emit::Level::Error))
                .init(),
            _ => {
                let rt = emit::setup()
                    .emit_to(emit_term::stderr())
                    .emit_when(emit::level::min_filter(emit::Level::Info))
                    .init();
                eprintln!(
                    "Warning: Unknown NWSHIM_LOG value '{}', using 'info'",
                    log_level
                );
                rt
            }
        };

        // The runtime must outlive every emit call site.
        std::mem::forget(rt);
    });
}

/// Log basic operations (bootstrap progress, backend calls, etc.)
///
/// Use this for operations that users might want to see in normal usage.
/// Examples: "Resolved base directory", "Listed 3 save files"
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log detailed diagnostics (cache transitions, URL rewrites, internal state)
///
/// Use this for detailed information useful for debugging.
/// Examples: "Cache hit for path", "Rewrote path to asset URL"
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log warning conditions (swallowed bootstrap failures, fallbacks)
///
/// Use this for issues that don't prevent operation but should be noted.
/// Examples: "Save directory listing failed", "Falling back to placeholder stat"
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log error conditions (rejected backend operations, missing backend)
///
/// Use this for problems that trigger a rollback or drop an operation.
/// Examples: "Write failed, rolling back", "Host backend not installed"
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

/// Re-export the init function for convenience
pub use init_diagnostics as init;
