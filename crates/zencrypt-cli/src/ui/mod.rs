//! UI primitives for the Zencrypt CLI.
//!
//! This module provides:
//! - **Context**: TTY/color/unicode detection and json/plain/pretty mode
//! - **Theme**: Badges and ANSI styling
//! - **Render**: Tables, receipts, errors
//! - **Progress**: Spinner for slow operations

mod context;
pub mod progress;
pub mod render;
pub mod theme;

// Re-export core types at module level
pub use context::{OutputMode, UiContext};
pub use theme::Badge;

// Re-export commonly used render functions
pub use render::{badge, print_error, print_json, receipt, simple_table, Column};
