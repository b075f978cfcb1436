//! Server command implementation

use std::path::Path;

use anyhow::Result;

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_auth: bool,
    no_encrypt: bool,
) -> Result<()> {
    println!("🚀 Starting LedgerLens API server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);

    // Parse API keys from environment (comma-separated key:owner pairs)
    let api_keys = ledgerlens_server::parse_api_keys(
        &std::env::var("LEDGERLENS_API_KEYS").unwrap_or_default(),
    );

    let jwt_secret = std::env::var("LEDGERLENS_JWT_SECRET")
        .ok()
        .filter(|s| !s.is_empty());

    let allowed_origins: Vec<String> = std::env::var("LEDGERLENS_ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if no_auth {
        println!();
        println!(
            "   ⚠️  Authentication DISABLED - every request acts as '{}'",
            ledgerlens_server::LOCAL_DEV_OWNER
        );
    } else {
        if !api_keys.is_empty() {
            println!(
                "   🔑 API keys: {} configured (LEDGERLENS_API_KEYS)",
                api_keys.len()
            );
        }
        if jwt_secret.is_some() {
            println!("   🔐 Bearer JWTs: HS256 (LEDGERLENS_JWT_SECRET)");
        }
        if api_keys.is_empty() && jwt_secret.is_none() {
            println!("   ⛔ No credentials configured - every API request will be rejected");
            println!("      Set LEDGERLENS_API_KEYS or LEDGERLENS_JWT_SECRET, or use --no-auth");
        }
    }
    if !allowed_origins.is_empty() {
        println!("   🌐 CORS origins: {}", allowed_origins.join(", "));
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;

    let config = ledgerlens_server::ServerConfig {
        require_auth: !no_auth,
        allowed_origins,
        api_keys,
        jwt_secret,
    };

    ledgerlens_server::serve_with_config(db, host, port, config).await?;

    Ok(())
}
