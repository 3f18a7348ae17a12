use chrono::Duration;

use hmac::{Hmac, Mac};

use sha2::Sha256;

use secrecy::Secret;

/// HMAC-SHA256 key used to sign admin tokens, together with their lifetime
#[derive(Clone)]
pub struct SigningKey {
    hmac: Hmac<Sha256>,
    token_ttl: Duration,
}

impl SigningKey {
    pub fn new(key: &Secret<String>, token_ttl: Duration) -> anyhow::Result<Self> {
        use secrecy::ExposeSecret;

        let hmac = Hmac::new_from_slice(key.expose_secret().as_bytes())?;

        Ok(Self { hmac, token_ttl })
    }
    /// How long freshly issued tokens stay valid
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }
}

impl AsRef<Hmac<Sha256>> for SigningKey {
    fn as_ref(&self) -> &Hmac<Sha256> {
        &self.hmac
    }
}
