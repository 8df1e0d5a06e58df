//! Password hashing and bearer-token issuance
//!
//! Passwords are hashed with Argon2id through the password-hash API; the
//! salt is random per hash and encoded into the PHC string, so verification
//! needs no separate salt storage. API tokens are HS256 JWTs carrying the
//! user id, email, and role, expiring after 24 hours.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Role, User};

/// Environment variable holding the token signing secret
pub const TOKEN_SECRET_ENV: &str = "TALLY_TOKEN_SECRET";

/// Token lifetime in hours
const TOKEN_TTL_HOURS: i64 = 24;

/// Claims carried by an API token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i64,
    pub email: String,
    pub role: Role,
    /// Expiry as a unix timestamp
    pub exp: i64,
}

/// Hash a password with Argon2id and a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::PasswordHash(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash string
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| Error::PasswordHash(format!("Invalid stored hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Issue a signed token for a user
pub fn issue_token(secret: &[u8], user: &User) -> Result<String> {
    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        exp: (Utc::now() + chrono::Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )?;
    Ok(token)
}

/// Decode and validate a token, returning its claims
///
/// Fails on a bad signature or an expired token.
pub fn verify_token(secret: &[u8], token: &str) -> Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )?;
    Ok(data.claims)
}
