use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use serde_json::json;

use thiserror::Error;

use crate::crypto::TokenError;
use crate::repo::StoreError;

pub type RestResult<T> = Result<T, RestError>;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("{0}")]
    ParseError(String),

    #[error("Not authorized, no token")]
    MissingToken,

    #[error("Not authorized, token failed")]
    InvalidToken(#[source] TokenError),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Server error")]
    InternalError(String),

    #[error("Server error")]
    Other(#[from] anyhow::Error),
}

impl RestError {
    pub fn not_found(label: &str) -> Self {
        Self::NotFound(format!("{} not found", label))
    }
}

impl From<StoreError> for RestError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict { collection, field } => {
                tracing::debug!("Unique constraint {} violated in {}", field, collection);
                Self::Conflict("A record with the same unique value already exists".into())
            }
            e => {
                tracing::error!(error.cause_chain = ?e, "Document store failure");
                Self::InternalError("Database error".into())
            }
        }
    }
}

impl From<TokenError> for RestError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Signing(_) => {
                tracing::error!(error.cause_chain = ?e, "Failed to sign admin token");
                Self::InternalError("Failed to sign token".into())
            }
            e => Self::InvalidToken(e),
        }
    }
}

impl ResponseError for RestError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ParseError(_) => StatusCode::BAD_REQUEST,
            Self::MissingToken | Self::InvalidToken(_) | Self::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InternalError(_) | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let Self::Other(e) = self {
            tracing::error!(error.cause_chain = ?e, "Unexpected failure");
        }
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "message": self.to_string(),
        }))
    }
}
