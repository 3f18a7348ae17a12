use actix_web::dev::HttpServiceFactory;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};

use serde::Deserialize;

use uuid::Uuid;

use crate::auth::Administrator;
use crate::controller::Envelope;
use crate::domain::parse_optional;
use crate::error::{RestError, RestResult};
use crate::model::{
    ContactLead, Lead, NewsletterSubscription, QuoteRequest, ServiceBooking, SpecRequest,
    TestDriveRequest,
};
use crate::repo::{Filter, Pagination, Sort, Store};

/// Query string of admin listings
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    page: Option<u64>,
    limit: Option<u64>,
    status: Option<String>,
}

/// List records of one kind, newest first
#[tracing::instrument(name = "List leads", skip(store), fields(collection = L::COLLECTION))]
async fn list<L: Lead + 'static>(
    _admin: Administrator,
    query: web::Query<ListQuery>,
    store: web::Data<Store>,
) -> RestResult<HttpResponse> {
    let query = query.into_inner();
    let status = parse_optional::<L::Status>(query.status).map_err(RestError::ParseError)?;
    let filter = Filter::new().eq_opt("status", status.map(|s| s.as_ref().to_owned()));

    let page = store
        .list::<L>(
            &filter,
            Sort::newest_first("createdAt"),
            Pagination::new(query.page, query.limit),
        )
        .await?;

    Ok(Envelope::page(page).respond(StatusCode::OK))
}

#[tracing::instrument(name = "Fetch lead", skip(store), fields(collection = L::COLLECTION))]
async fn get<L: Lead + 'static>(
    _admin: Administrator,
    path: web::Path<Uuid>,
    store: web::Data<Store>,
) -> RestResult<HttpResponse> {
    let lead = store
        .get::<L>(path.into_inner())
        .await?
        .ok_or_else(|| RestError::not_found(L::LABEL))?;

    Ok(Envelope::data(lead).respond(StatusCode::OK))
}

#[tracing::instrument(name = "Delete lead", skip(store), fields(collection = L::COLLECTION))]
async fn delete<L: Lead + 'static>(
    admin: Administrator,
    path: web::Path<Uuid>,
    store: web::Data<Store>,
) -> RestResult<HttpResponse> {
    let id = path.into_inner();
    if !store.delete::<L>(id).await? {
        return Err(RestError::not_found(L::LABEL));
    }
    tracing::info!("{} {} deleted by admin {}", L::LABEL, id, admin.id());

    Ok(Envelope::message(format!("{} deleted", L::LABEL)).respond(StatusCode::OK))
}

/// Register list, read and delete routes for one record kind under `path`
pub fn register<L: Lead + 'static>(cfg: &mut web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::get().to(list::<L>)))
        .service(
            web::resource(format!("{}/{{id}}", path))
                .route(web::get().to(get::<L>))
                .route(web::delete().to(delete::<L>)),
        );
}

/// Admin lead endpoints, one sub-path per lead kind
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/leads").configure(|cfg| {
        register::<ContactLead>(cfg, "/contact");
        register::<TestDriveRequest>(cfg, "/test-drive");
        register::<QuoteRequest>(cfg, "/quote");
        register::<ServiceBooking>(cfg, "/service-booking");
        register::<SpecRequest>(cfg, "/specs");
    })
}

/// Newsletter subscriptions share the lead routes, publishing lives in `newsletter`
pub fn configure_newsletter(cfg: &mut web::ServiceConfig) {
    register::<NewsletterSubscription>(cfg, "");
}
