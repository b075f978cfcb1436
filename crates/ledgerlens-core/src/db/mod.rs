//! SQLite ledger store
//!
//! - `transactions` - Owner-scoped transaction CRUD (implements [`LedgerStore`](crate::ledger::LedgerStore))
//! - `transaction_filter` - Dynamic WHERE/ORDER/LIMIT builder
//!
//! Files are SQLCipher-encrypted with a key stretched from `LEDGERLENS_DB_KEY`
//! unless opened through [`Database::new_unencrypted`].

use std::sync::atomic::{AtomicU64, Ordering};

use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::{debug, info};

use crate::error::{Error, Result};

mod transaction_filter;
mod transactions;

pub use transaction_filter::{FilterResult, TransactionFilter, DEFAULT_PAGE_SIZE};

type SqlitePool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Environment variable holding the database passphrase
pub const DB_KEY_ENV: &str = "LEDGERLENS_DB_KEY";

const MAX_CONNECTIONS: u32 = 10;

/// Argon2 salt. Part of the on-disk key format: a different salt cannot open
/// files written with this one.
const KEY_SALT: &[u8; 16] = b"ledgerlens-salt1";

/// Hex-encoded raw SQLCipher key for `passphrase`
fn sqlcipher_key(passphrase: &str) -> Result<String> {
    let salt = SaltString::encode_b64(KEY_SALT)
        .map_err(|e| Error::Encryption(format!("Invalid key salt: {}", e)))?;

    let hashed = Argon2::default()
        .hash_password(passphrase.as_bytes(), &salt)
        .map_err(|e| Error::Encryption(format!("Key derivation failed: {}", e)))?;

    let output = hashed
        .hash
        .ok_or_else(|| Error::Encryption("Key derivation produced no output".to_string()))?;
    Ok(hex::encode(output.as_bytes()))
}

/// Pooled handle to one ledger file
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    encrypted: bool,
}

impl Database {
    /// Open (or create) an encrypted ledger keyed by `LEDGERLENS_DB_KEY`
    pub fn new(path: &str) -> Result<Self> {
        let passphrase = std::env::var(DB_KEY_ENV).map_err(|_| {
            Error::Encryption(format!(
                "Database encryption required. Set {} environment variable with your passphrase, \
                or use --no-encrypt for unencrypted databases (not recommended for production).",
                DB_KEY_ENV
            ))
        })?;
        Self::new_with_key(path, Some(&passphrase))
    }

    /// Open (or create) a plaintext ledger
    pub fn new_unencrypted(path: &str) -> Result<Self> {
        Self::new_with_key(path, None)
    }

    /// Open (or create) a ledger, encrypted when `passphrase` is given
    ///
    /// A wrong passphrase for an existing file fails here, on the first
    /// schema statement.
    pub fn new_with_key(path: &str, passphrase: Option<&str>) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let builder = Pool::builder().max_size(MAX_CONNECTIONS);

        let pool = match passphrase {
            Some(passphrase) => {
                let pragma = format!("PRAGMA key = \"x'{}'\";", sqlcipher_key(passphrase)?);
                // SQLCipher keys are per connection
                builder.build(manager.with_init(move |conn| conn.execute_batch(&pragma)))?
            }
            None => builder.build(manager)?,
        };

        let db = Self {
            pool,
            encrypted: passphrase.is_some(),
        };
        db.run_migrations()?;
        debug!(path, encrypted = db.encrypted, "Opened ledger database");

        Ok(db)
    }

    /// Fresh plaintext ledger in the system temp dir (tests and demos)
    ///
    /// Not `:memory:`: each pooled connection would get its own empty database.
    pub fn in_memory() -> Result<Self> {
        static NEXT: AtomicU64 = AtomicU64::new(0);

        let file = std::env::temp_dir().join(format!(
            "ledgerlens_scratch_{}_{}.db",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed)
        ));
        if file.exists() {
            std::fs::remove_file(&file)?;
        }

        Self::new_unencrypted(&file.to_string_lossy())
    }

    /// Whether this handle was opened with a SQLCipher key
    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;

            CREATE TABLE IF NOT EXISTS transactions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                category TEXT NOT NULL CHECK (length(trim(category)) > 0),
                amount REAL NOT NULL CHECK (amount > 0),
                note TEXT,
                date DATE NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Every read is owner-scoped and date-ordered
            CREATE INDEX IF NOT EXISTS idx_transactions_owner_date ON transactions(user_id, date);
            CREATE INDEX IF NOT EXISTS idx_transactions_owner_category ON transactions(user_id, category);
            "#,
        )?;

        info!("Database schema initialized");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
