//! Dashboard Configuration Module
//!
//! Server, upload-service and well-catalog settings loaded from TOML.
//!
//! ## Loading Order
//!
//! 1. `--config` on the command line
//! 2. `DEEPBIT_CONFIG` environment variable (path to TOML file)
//! 3. `deepbit.toml` in the current working directory
//! 4. Built-in defaults
//!
//! `DEEPBIT_SERVER_ADDR`, `DEEPBIT_UPLOAD_URL` and `DEEPBIT_CORS_ORIGINS`
//! override the loaded values.
//!
//! ## Usage
//!
//! The binary calls `config::init()` once at startup; library code takes a
//! `&DashboardConfig` explicitly so tests can run with their own values.
//!
//! ```ignore
//! config::init(DashboardConfig::load()?);
//! let addr = &config::get().server.addr;
//! ```

mod dashboard_config;
pub mod defaults;
pub mod validation;

pub use dashboard_config::*;

use std::sync::OnceLock;

/// Global dashboard configuration, initialized once at startup.
static DASHBOARD_CONFIG: OnceLock<DashboardConfig> = OnceLock::new();

/// Initialize the global configuration. Later calls are ignored.
pub fn init(config: DashboardConfig) {
    if DASHBOARD_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// Get the global configuration, or the built-in defaults if `init()` was
/// never called.
pub fn get() -> &'static DashboardConfig {
    DASHBOARD_CONFIG.get_or_init(DashboardConfig::default)
}

