//! Application-level utilities for the Zencrypt CLI.
//!
//! This module provides:
//! - Path resolution for the config, key file and store
//! - The per-invocation application context
//! - Store login for per-user commands

mod context;
mod resolver;
mod session;

// Re-export public API
pub use context::AppContext;
pub use resolver::{resolve_config_path, resolve_keyfile_path, resolve_store_path};
pub use session::UserSession;
