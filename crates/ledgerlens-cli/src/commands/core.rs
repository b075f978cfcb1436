//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `open_service` - The ledger service over an opened database
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use ledgerlens_core::db::{Database, DB_KEY_ENV};
use ledgerlens_core::LedgerService;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

pub fn open_service(db_path: &Path, no_encrypt: bool) -> Result<LedgerService<Database>> {
    Ok(LedgerService::new(open_db(db_path, no_encrypt)?))
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, no_encrypt)?;

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else if db.is_encrypted() {
        println!("   🔒 Encryption: ENABLED ({})", DB_KEY_ENV);
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Record a transaction: ledgerlens transactions add --type expense --category Food --amount 12.50");
    println!("  2. Start the API: ledgerlens serve");

    Ok(())
}
