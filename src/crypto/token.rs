use chrono::{Duration, Utc};

use jwt::{SignWithKey, VerifyWithKey};

use serde::{Deserialize, Serialize};

use uuid::Uuid;

use crate::domain::AdminRole;
use crate::model::AdminAccount;

use super::SigningKey;

/// Various errors that can occur when handling admin tokens
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token signature does not match")]
    SignatureMismatch,
    #[error("Token is expired")]
    Expired,
    #[error("Token is of invalid format")]
    InvalidFormat,
    #[error("Failed to sign token")]
    Signing(#[source] jwt::Error),
}

/// Wrapper for token results
pub type TokenResult<T> = Result<T, TokenError>;

/// Claims carried by an admin bearer token (HS256 JWT)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Admin account ID
    pub sub: Uuid,
    pub email: String,
    pub role: AdminRole,
    /// Issued-at, UTC unix timestamp
    pub iat: i64,
    /// Expiration, UTC unix timestamp
    pub exp: i64,
}

impl AdminClaims {
    /// Claims for `admin` valid for `ttl` from now
    pub fn new(admin: &AdminAccount, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: admin.id,
            email: admin.email.clone(),
            role: admin.role,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Issue a token for `admin` with the key's configured lifetime
    pub fn issue(admin: &AdminAccount, key: &SigningKey) -> TokenResult<String> {
        Self::new(admin, key.token_ttl()).sign(key)
    }

    /// Sign the claims into a compact JWT
    pub fn sign(&self, key: &SigningKey) -> TokenResult<String> {
        self.sign_with_key(key.as_ref())
            .map_err(TokenError::Signing)
    }

    /// Verify a compact JWT and return its claims if it is signed by `key` and unexpired
    pub fn verify(key: &SigningKey, token: &str) -> TokenResult<Self> {
        let claims: Self = token.verify_with_key(key.as_ref()).map_err(|e| match e {
            jwt::Error::InvalidSignature => TokenError::SignatureMismatch,
            _ => TokenError::InvalidFormat,
        })?;

        if claims.is_expired() {
            Err(TokenError::Expired)
        } else {
            Ok(claims)
        }
    }

    fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}
