//! Bearer-token authentication.
//!
//! Tokens are opaque strings issued once at registration (or via the CLI);
//! only their SHA-256 hash is stored. The HTTP layer exchanges a bearer
//! token for a [`crate::ids::UserUuid`] through [`AuthService`].

use sha2::{Digest, Sha256};
use uuid::Uuid;

pub mod errors;
pub(crate) mod repository;
pub mod service;

pub use errors::AuthServiceError;
pub use service::*;

/// Generate a fresh raw API token. Shown to the caller once, never stored.
#[must_use]
pub fn generate_token() -> String {
    format!("kt_{}{}", Uuid::now_v7().simple(), Uuid::now_v7().simple())
}

/// Hash a raw token for storage and lookup.
#[must_use]
pub fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_unique_and_prefixed() {
        let a = generate_token();
        let b = generate_token();

        assert_ne!(a, b);
        assert!(a.starts_with("kt_"), "unexpected token format: {a}");
    }

    #[test]
    fn hashing_is_deterministic() {
        assert_eq!(hash_token("abc"), hash_token("abc"));
        assert_ne!(hash_token("abc"), hash_token("abd"));
        assert_eq!(hash_token("abc").len(), 64);
    }
}
