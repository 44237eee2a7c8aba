//! Credential lookup and session tokens.
//!
//! Authentication is a stateless lookup against a fixed set of registered
//! credentials (demo scale; a real deployment delegates to an external
//! credential store). A successful login mints a signed session token whose
//! claims carry the full `Identity`, so every subsequent operation receives
//! the identity explicitly instead of reading ambient session state.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

use reelcheck_core::{Identity, ReviewError, Role, UserId};

/// A registered user: identity plus the sha256 digest of their password.
/// Plaintext passwords are hashed at registration and never kept.
#[derive(Clone)]
struct RegisteredUser {
    identity: Identity,
    password_digest: [u8; 32],
}

/// Fixed set of registered credentials.
#[derive(Clone, Default)]
pub struct CredentialStore {
    users: Vec<RegisteredUser>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user. Later registrations with the same email shadow
    /// earlier ones (lookup takes the first match).
    pub fn register(&mut self, identity: Identity, password: &str) {
        self.users.insert(
            0,
            RegisteredUser {
                identity,
                password_digest: sha256(password),
            },
        );
    }

    /// Resolve an identity from an email/password pair.
    ///
    /// The same error is returned for an unknown email and a wrong password,
    /// so a caller cannot probe which emails are registered.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<Identity, ReviewError> {
        let digest = sha256(password);
        self.users
            .iter()
            .find(|u| u.identity.email == email && u.password_digest == digest)
            .map(|u| u.identity.clone())
            .ok_or(ReviewError::InvalidCredentials)
    }
}

fn sha256(input: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hasher.finalize().into()
}

/// Claims embedded in a session token.
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    /// User id.
    sub: u64,
    email: String,
    role: Role,
    name: String,
    iat: u64,
    exp: u64,
}

/// Signing/verification keys for session tokens (HS256).
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

impl SessionKeys {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Mint a session token for an authenticated identity.
    pub fn issue(&self, identity: &Identity) -> Result<String, ReviewError> {
        let now = unix_now();
        let claims = SessionClaims {
            sub: identity.id.0,
            email: identity.email.clone(),
            role: identity.role,
            name: identity.display_name.clone(),
            iat: now,
            exp: now + self.ttl_secs,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ReviewError::Unauthorized(format!("failed to encode session token: {e}")))
    }

    /// Recover the identity from a session token; rejects bad signatures
    /// and expired tokens.
    pub fn verify(&self, token: &str) -> Result<Identity, ReviewError> {
        let data = decode::<SessionClaims>(token, &self.decoding, &Validation::default())
            .map_err(|_| ReviewError::Unauthorized("invalid or expired session token".to_string()))?;
        let claims = data.claims;
        Ok(Identity {
            id: UserId(claims.sub),
            email: claims.email,
            role: claims.role,
            display_name: claims.name,
        })
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
