//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init) and shared utilities (open_db, open_service)
//! - `reports` - Window-based spending reports
//! - `serve` - Web server command
//! - `transactions` - Transaction commands (list, add, delete)

pub mod core;
pub mod reports;
pub mod serve;
pub mod transactions;

// Re-export command functions for main.rs
pub use core::*;
pub use reports::*;
pub use serve::*;
pub use transactions::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
