use std::future::Future;
use std::pin::Pin;

use actix_web::{dev, web, FromRequest, HttpRequest};

use uuid::Uuid;

use crate::auth::bearer_token;
use crate::crypto::{AdminClaims, SigningKey};
use crate::domain::AdminRole;
use crate::error::RestError;
use crate::model::AdminAccount;
use crate::repo::Store;

/// Guard for admin endpoints: a verified bearer token of an existing admin account
#[derive(Debug)]
pub struct Administrator(AdminClaims);

impl Administrator {
    pub fn id(&self) -> Uuid {
        self.0.sub
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn role(&self) -> AdminRole {
        self.0.role
    }
}

impl FromRequest for Administrator {
    type Error = RestError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            // NOTE: Both must be registered with the application at startup
            let store = req
                .app_data::<web::Data<Store>>()
                .ok_or_else(|| RestError::InternalError("Store not registered".into()))?;
            let signing_key = req
                .app_data::<web::Data<SigningKey>>()
                .ok_or_else(|| RestError::InternalError("Signing key not registered".into()))?;
            // Pull the token from the headers
            let token = bearer_token(req.headers()).ok_or(RestError::MissingToken)?;
            // Check signature and expiry
            let claims = AdminClaims::verify(signing_key, token)?;
            // The account may have been removed since the token was issued
            if store.get::<AdminAccount>(claims.sub).await?.is_none() {
                tracing::warn!("Rejected token of a removed admin account {}", claims.sub);
                return Err(RestError::Unauthorized(
                    "Not authorized, account no longer exists".into(),
                ));
            }

            Ok(Administrator(claims))
        })
    }
}
