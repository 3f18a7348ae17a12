use anyhow::Context;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use secrecy::{ExposeSecret, Secret};

use unicode_segmentation::UnicodeSegmentation;

use crate::error::{RestError, RestResult};
use crate::telemetry::spawn_blocking_with_tracing;

const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 128;
const INVALID_CREDENTIALS: &str = "Invalid email or password";
/// Verified in place of a stored hash when no account matches, with the default Argon2 cost
const DUMMY_PASSWORD_HASH: &str = "$argon2id$v=19$m=4096,t=3,p=1$gZiV/M1gPc22ElAH/Jh1Hw$CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno";

/// Check password length bounds before hashing
pub fn check_password_policy(password: &Secret<String>) -> Result<(), String> {
    let len = password.expose_secret().graphemes(true).count();
    if len < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        ));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(format!(
            "Password must be at most {} characters",
            MAX_PASSWORD_LEN
        ));
    }
    Ok(())
}

/// Hash a password into an Argon2 PHC string on the blocking pool
#[tracing::instrument("Hash password", skip(password))]
pub async fn hash_password(password: Secret<String>) -> RestResult<String> {
    let hash = spawn_blocking_with_tracing(move || compute_password_hash(password))
        .await
        .context("Failed to spawn blocking task")??;
    Ok(hash)
}

/// Verify a password against a stored PHC string on the blocking pool
#[tracing::instrument("Verify password", skip(password, password_hash))]
pub async fn verify_password(password: Secret<String>, password_hash: Secret<String>) -> RestResult<()> {
    spawn_blocking_with_tracing(move || verify_password_hash(password, password_hash))
        .await
        .context("Failed to spawn blocking task")?
}

/// Check login credentials against the matching account's hash, if there is one.
/// Unknown accounts still pay for a full Argon2 verification.
#[tracing::instrument("Verify credentials", skip(password, password_hash))]
pub async fn verify_credentials(
    password: Secret<String>,
    password_hash: Option<Secret<String>>,
) -> RestResult<()> {
    let known_account = password_hash.is_some();
    let password_hash = password_hash.unwrap_or_else(|| Secret::new(DUMMY_PASSWORD_HASH.into()));

    verify_password(password, password_hash).await?;
    if known_account {
        Ok(())
    } else {
        Err(RestError::Unauthorized(INVALID_CREDENTIALS.into()))
    }
}

fn compute_password_hash(password: Secret<String>) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();
    Ok(hash)
}

fn verify_password_hash(password: Secret<String>, password_hash: Secret<String>) -> RestResult<()> {
    let password_hash = PasswordHash::new(password_hash.expose_secret())
        .map_err(|e| anyhow::anyhow!("Failed to parse stored password hash: {}", e))?;

    Argon2::default()
        .verify_password(password.expose_secret().as_bytes(), &password_hash)
        .map_err(|_| RestError::Unauthorized(INVALID_CREDENTIALS.into()))
}
