//! Credential to owner resolution
//!
//! The core never inspects credentials. Transports hand the raw credential
//! (for HTTP, the bearer token) to an [`IdentityProvider`] and pass the
//! resulting owner id into every [`LedgerService`](crate::service::LedgerService) call.

use crate::error::{Error, Result};

pub trait IdentityProvider: Send + Sync {
    /// The owner id for `credential`, or `Error::Unauthenticated`
    fn resolve(&self, credential: Option<&str>) -> Result<String>;
}

/// Maps every caller to one fixed owner (local development only)
#[derive(Debug, Clone)]
pub struct SingleOwner(pub String);

impl IdentityProvider for SingleOwner {
    fn resolve(&self, _credential: Option<&str>) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Tries each provider in turn and returns the first owner resolved
pub struct ChainedIdentity {
    providers: Vec<Box<dyn IdentityProvider>>,
}

impl ChainedIdentity {
    pub fn new(providers: Vec<Box<dyn IdentityProvider>>) -> Self {
        Self { providers }
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl IdentityProvider for ChainedIdentity {
    fn resolve(&self, credential: Option<&str>) -> Result<String> {
        let mut last_err = Error::Unauthenticated("Authentication required".to_string());
        for provider in &self.providers {
            match provider.resolve(credential) {
                Ok(owner) => return Ok(owner),
                Err(e @ Error::Unauthenticated(_)) => last_err = e,
                Err(e) => return Err(e),
            }
        }
        Err(last_err)
    }
}
