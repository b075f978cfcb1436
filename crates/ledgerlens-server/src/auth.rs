//! Bearer credential providers
//!
//! - `ApiKeyIdentity` - static keys, each bound to an owner id
//! - `JwtIdentity` - HS256 tokens whose `sub` claim is the owner id

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use ledgerlens_core::identity::{ChainedIdentity, IdentityProvider, SingleOwner};
use ledgerlens_core::{Error, Result};

use crate::ServerConfig;

/// Owner id used for every request when authentication is disabled
pub const LOCAL_DEV_OWNER: &str = "local-dev";

fn missing_token() -> Error {
    Error::Unauthenticated(
        "Access token required. Please provide a valid Bearer token.".to_string(),
    )
}

fn invalid_token() -> Error {
    Error::Unauthenticated("Invalid or expired token. Please log in again.".to_string())
}

/// An API key and the owner it authenticates as
#[derive(Clone)]
pub struct ApiKey {
    pub key: String,
    pub owner_id: String,
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey")
            .field("key", &"<redacted>")
            .field("owner_id", &self.owner_id)
            .finish()
    }
}

/// Parse `key:owner` pairs separated by commas
///
/// Examples:
/// - "s3cret:alice" - one key for owner `alice`
/// - "k1:alice,k2:bob" - two owners
pub fn parse_api_keys(input: &str) -> Vec<ApiKey> {
    input
        .split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                return None;
            }
            match entry.split_once(':') {
                Some((key, owner)) if !key.trim().is_empty() && !owner.trim().is_empty() => {
                    Some(ApiKey {
                        key: key.trim().to_string(),
                        owner_id: owner.trim().to_string(),
                    })
                }
                _ => {
                    warn!("Ignoring API key entry without an owner (expected key:owner)");
                    None
                }
            }
        })
        .collect()
}

/// Static API keys, compared in constant time
pub struct ApiKeyIdentity {
    keys: Vec<ApiKey>,
}

impl ApiKeyIdentity {
    pub fn new(keys: Vec<ApiKey>) -> Self {
        Self { keys }
    }
}

impl IdentityProvider for ApiKeyIdentity {
    fn resolve(&self, credential: Option<&str>) -> Result<String> {
        let provided = credential.ok_or_else(missing_token)?.as_bytes();

        for key in &self.keys {
            let key_bytes = key.key.as_bytes();
            // Only compare if lengths match (constant-time for same-length keys)
            if provided.len() == key_bytes.len() && bool::from(provided.ct_eq(key_bytes)) {
                return Ok(key.owner_id.clone());
            }
        }
        Err(invalid_token())
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
}

/// HS256 JWTs signed with a shared secret; `exp` is required
pub struct JwtIdentity {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentity {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

impl IdentityProvider for JwtIdentity {
    fn resolve(&self, credential: Option<&str>) -> Result<String> {
        let token = credential.ok_or_else(missing_token)?;

        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            debug!(error = %e, "JWT validation failed");
            invalid_token()
        })?;

        let owner = data.claims.sub.trim();
        if owner.is_empty() {
            return Err(invalid_token());
        }
        Ok(owner.to_string())
    }
}

/// Build the provider chain for a server configuration
///
/// With auth disabled every caller becomes [`LOCAL_DEV_OWNER`]. Otherwise API
/// keys are tried before JWTs; with neither configured every request is rejected.
pub fn identity_from_config(config: &ServerConfig) -> Box<dyn IdentityProvider> {
    if !config.require_auth {
        return Box::new(SingleOwner(LOCAL_DEV_OWNER.to_string()));
    }

    let mut providers: Vec<Box<dyn IdentityProvider>> = Vec::new();
    if !config.api_keys.is_empty() {
        providers.push(Box::new(ApiKeyIdentity::new(config.api_keys.clone())));
    }
    if let Some(secret) = config.jwt_secret.as_deref().filter(|s| !s.is_empty()) {
        providers.push(Box::new(JwtIdentity::new(secret)));
    }

    let chain = ChainedIdentity::new(providers);
    if chain.is_empty() {
        warn!("Authentication required but no API keys or JWT secret configured - all requests will be rejected");
    }
    Box::new(chain)
}
