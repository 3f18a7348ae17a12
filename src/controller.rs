use actix_web::dev::HttpServiceFactory;
use actix_web::http::StatusCode;
use actix_web::{error, web, HttpResponse};

use serde::Serialize;

use crate::error::RestError;
use crate::repo::{Page, PageInfo};

pub mod admin;
pub mod blog;
pub mod lead_admin;
pub mod leads;
pub mod newsletter;
pub mod offers;

/// Success envelope shared by every endpoint
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pagination: Option<PageInfo>,
}

impl<T: Serialize> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            pagination: None,
        }
    }

    pub fn page(page: Page<T>) -> Envelope<Vec<T>> {
        Envelope {
            success: true,
            message: None,
            data: Some(page.items),
            pagination: Some(page.info),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn respond(self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }
}

impl Envelope<()> {
    /// Envelope without a payload
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            pagination: None,
        }
    }
}

/// JSON body errors answer with the failure envelope
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = match &err {
            error::JsonPayloadError::ContentType => "Expected a JSON body".to_string(),
            err => format!("Invalid JSON body: {}", err),
        };
        RestError::ParseError(message).into()
    })
}

/// Query string errors answer with the failure envelope
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        RestError::ParseError(format!("Invalid query string: {}", err)).into()
    })
}

/// Path segments that do not parse (ids that are not UUIDs) cannot name a record
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|_err, _req| RestError::NotFound("Resource not found".into()).into())
}

/// Every endpoint under `/api`
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/api")
        .configure(leads::configure)
        .service(newsletter::scope())
        .service(blog::scope())
        .service(offers::scope())
        .service(admin::scope())
}
