mod signing_key;
mod token;

pub use signing_key::SigningKey;
pub use token::{AdminClaims, TokenError, TokenResult};
