use actix_web::http::header::{self, HeaderMap};

const BEARER_AUTH_PREFIX: &str = "Bearer ";

/// Extract the token from an `Authorization: Bearer <token>` header.
/// `None` when the header is missing, not text, uses another scheme or is empty.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_AUTH_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
