use actix_web::dev::HttpServiceFactory;
use actix_web::http::StatusCode;
use actix_web::{delete, get, post, put, web, HttpResponse};

use chrono::Utc;

use serde::Deserialize;

use uuid::Uuid;

use crate::auth::Administrator;
use crate::controller::Envelope;
use crate::domain::{optional, optional_date, required, required_date};
use crate::error::{RestError, RestResult};
use crate::model::{check_validity, Offer};
use crate::repo::{Filter, Pagination, Sort, Store};

const LABEL: &str = "Offer";

#[derive(Debug, Deserialize)]
pub struct AdminQuery {
    page: Option<u64>,
    limit: Option<u64>,
    active: Option<bool>,
}

/// Offer body for both create and partial update
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferBody {
    title: Option<String>,
    description: Option<String>,
    image_urls: Option<Vec<String>>,
    terms: Option<String>,
    valid_from: Option<String>,
    valid_until: Option<String>,
    active: Option<bool>,
}

fn clean_urls(urls: Vec<String>) -> Vec<String> {
    urls.into_iter().filter_map(|url| optional(Some(url))).collect()
}

impl TryFrom<OfferBody> for Offer {
    type Error = String;

    fn try_from(body: OfferBody) -> Result<Self, Self::Error> {
        let valid_from = required_date("validFrom", body.valid_from)?;
        let valid_until = optional_date("validUntil", body.valid_until)?;
        check_validity(valid_from, valid_until)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            title: required("title", body.title)?,
            description: required("description", body.description)?,
            image_urls: clean_urls(body.image_urls.unwrap_or_default()),
            terms: optional(body.terms),
            valid_from,
            valid_until,
            active: body.active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        })
    }
}

impl OfferBody {
    /// Apply the fields present in the body. A blank `validUntil` makes the offer open ended.
    fn apply_to(self, offer: &mut Offer) -> Result<(), String> {
        if self.title.is_some() {
            offer.title = required("title", self.title)?;
        }
        if self.description.is_some() {
            offer.description = required("description", self.description)?;
        }
        if let Some(urls) = self.image_urls {
            offer.image_urls = clean_urls(urls);
        }
        if let Some(terms) = self.terms {
            offer.terms = optional(Some(terms));
        }
        if self.valid_from.is_some() {
            offer.valid_from = required_date("validFrom", self.valid_from)?;
        }
        if let Some(valid_until) = self.valid_until {
            offer.valid_until = optional_date("validUntil", Some(valid_until))?;
        }
        if let Some(active) = self.active {
            offer.active = active;
        }
        check_validity(offer.valid_from, offer.valid_until)?;

        offer.updated_at = Utc::now();
        Ok(())
    }
}

#[tracing::instrument(name = "List current offers", skip(store))]
#[get("")]
async fn list_current(store: web::Data<Store>) -> RestResult<HttpResponse> {
    let today = Utc::now().date_naive();
    let offers: Vec<Offer> = store
        .find_all::<Offer>(&Filter::new().eq("active", true), Sort::newest_first("createdAt"))
        .await?
        .into_iter()
        .filter(|offer| offer.is_current(today))
        .collect();

    Ok(Envelope::data(offers).respond(StatusCode::OK))
}

#[tracing::instrument(name = "List offers", skip(store))]
#[get("")]
async fn list(
    _admin: Administrator,
    query: web::Query<AdminQuery>,
    store: web::Data<Store>,
) -> RestResult<HttpResponse> {
    let query = query.into_inner();
    let filter = Filter::new().eq_opt("active", query.active);

    let page = store
        .list::<Offer>(
            &filter,
            Sort::newest_first("createdAt"),
            Pagination::new(query.page, query.limit),
        )
        .await?;

    Ok(Envelope::page(page).respond(StatusCode::OK))
}

#[tracing::instrument(name = "Create offer", skip(body, store))]
#[post("")]
async fn create(
    _admin: Administrator,
    body: web::Json<OfferBody>,
    store: web::Data<Store>,
) -> RestResult<HttpResponse> {
    let offer: Offer = body.into_inner().try_into().map_err(RestError::ParseError)?;
    store.insert(&offer).await?;

    Ok(Envelope::data(offer)
        .with_message("Offer created")
        .respond(StatusCode::CREATED))
}

#[tracing::instrument(name = "Fetch offer", skip(store))]
#[get("/{id}")]
async fn show(
    _admin: Administrator,
    path: web::Path<Uuid>,
    store: web::Data<Store>,
) -> RestResult<HttpResponse> {
    let offer = store
        .get::<Offer>(path.into_inner())
        .await?
        .ok_or_else(|| RestError::not_found(LABEL))?;

    Ok(Envelope::data(offer).respond(StatusCode::OK))
}

#[tracing::instrument(name = "Update offer", skip(body, store))]
#[put("/{id}")]
async fn update(
    _admin: Administrator,
    path: web::Path<Uuid>,
    body: web::Json<OfferBody>,
    store: web::Data<Store>,
) -> RestResult<HttpResponse> {
    let mut offer = store
        .get::<Offer>(path.into_inner())
        .await?
        .ok_or_else(|| RestError::not_found(LABEL))?;

    body.into_inner()
        .apply_to(&mut offer)
        .map_err(RestError::ParseError)?;
    if !store.replace(&offer).await? {
        return Err(RestError::not_found(LABEL));
    }

    Ok(Envelope::data(offer)
        .with_message("Offer updated")
        .respond(StatusCode::OK))
}

#[tracing::instrument(name = "Delete offer", skip(store))]
#[delete("/{id}")]
async fn remove(
    _admin: Administrator,
    path: web::Path<Uuid>,
    store: web::Data<Store>,
) -> RestResult<HttpResponse> {
    if !store.delete::<Offer>(path.into_inner()).await? {
        return Err(RestError::not_found(LABEL));
    }

    Ok(Envelope::message("Offer deleted").respond(StatusCode::OK))
}

/// Public offer endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/offers").service(list_current)
}

/// Admin offer endpoints
pub fn admin_scope() -> impl HttpServiceFactory {
    web::scope("/offers")
        .service(list)
        .service(create)
        .service(show)
        .service(update)
        .service(remove)
}
