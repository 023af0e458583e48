//! Centralized reader for the environment variables dialogbridge consults.
//!
//! Environment variable names are defined as private constants here;
//! external code accesses values through the `EnvVars` struct.

const BACKEND: &str = "DIALOGBRIDGE_BACKEND";
const LOG: &str = "DIALOGBRIDGE_LOG";
const CURRENT_DESKTOP: &str = "XDG_CURRENT_DESKTOP";
const DESKTOP_SESSION: &str = "DESKTOP_SESSION";

/// Snapshot of the relevant environment variables at load time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVars {
    /// Preferred backend name, consulted when both binaries are installed.
    pub backend_override: Option<String>,

    /// Desktop environment identifier: `XDG_CURRENT_DESKTOP`, else `DESKTOP_SESSION`.
    pub desktop: Option<String>,

    /// Log filter directive for the CLI (e.g. "debug", "dialogbridge=trace").
    pub log_filter: Option<String>,
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

impl EnvVars {
    /// Read all relevant environment variables from the current process.
    pub fn load() -> Self {
        Self {
            backend_override: non_empty_var(BACKEND),
            desktop: non_empty_var(CURRENT_DESKTOP).or_else(|| non_empty_var(DESKTOP_SESSION)),
            log_filter: non_empty_var(LOG),
        }
    }

    /// Returns the env var name for the backend override (used in warnings).
    pub fn backend_name() -> &'static str {
        BACKEND
    }
}
