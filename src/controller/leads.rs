use actix_web::http::StatusCode;
use actix_web::{post, web, HttpResponse};

use chrono::Utc;

use serde::Deserialize;

use uuid::Uuid;

use crate::client::LeadNotifier;
use crate::controller::Envelope;
use crate::domain::{
    optional, optional_date, parse_optional, parse_required, required, required_date,
    EmailAddress, EnquiryType, LeadStatus, PersonName,
};
use crate::error::{RestError, RestResult};
use crate::model::{
    Attribution, ContactLead, QuoteRequest, ServiceBooking, SpecRequest, TestDriveRequest,
};
use crate::repo::Store;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    subject: Option<String>,
    message: Option<String>,
    enquiry_type: Option<String>,
}

impl TryFrom<ContactForm> for ContactLead {
    type Error = String;

    fn try_from(form: ContactForm) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: parse_required::<PersonName>("name", form.name)?.into(),
            email: parse_required::<EmailAddress>("email", form.email)?.into(),
            phone: optional(form.phone),
            subject: optional(form.subject),
            message: required("message", form.message)?,
            enquiry_type: parse_optional::<EnquiryType>(form.enquiry_type)?.unwrap_or_default(),
            status: LeadStatus::New,
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDriveForm {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    model: Option<String>,
    location: Option<String>,
    preferred_date: Option<String>,
    preferred_time: Option<String>,
    message: Option<String>,
    #[serde(flatten)]
    attribution: Attribution,
}

impl TryFrom<TestDriveForm> for TestDriveRequest {
    type Error = String;

    fn try_from(form: TestDriveForm) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: parse_required::<PersonName>("name", form.name)?.into(),
            email: parse_required::<EmailAddress>("email", form.email)?.into(),
            phone: required("phone", form.phone)?,
            model: required("model", form.model)?,
            location: optional(form.location),
            preferred_date: optional_date("preferredDate", form.preferred_date)?,
            preferred_time: optional(form.preferred_time),
            message: optional(form.message),
            attribution: trimmed(form.attribution),
            status: LeadStatus::New,
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteForm {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    model: Option<String>,
    variant: Option<String>,
    location: Option<String>,
    financing: Option<bool>,
    message: Option<String>,
}

impl TryFrom<QuoteForm> for QuoteRequest {
    type Error = String;

    fn try_from(form: QuoteForm) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: parse_required::<PersonName>("name", form.name)?.into(),
            email: parse_required::<EmailAddress>("email", form.email)?.into(),
            phone: required("phone", form.phone)?,
            model: required("model", form.model)?,
            variant: optional(form.variant),
            location: optional(form.location),
            financing: form.financing.unwrap_or(false),
            message: optional(form.message),
            status: LeadStatus::New,
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBookingForm {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    vehicle_model: Option<String>,
    registration_number: Option<String>,
    service_type: Option<String>,
    preferred_date: Option<String>,
    preferred_time: Option<String>,
    service_center: Option<String>,
    notes: Option<String>,
}

impl TryFrom<ServiceBookingForm> for ServiceBooking {
    type Error = String;

    fn try_from(form: ServiceBookingForm) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: parse_required::<PersonName>("name", form.name)?.into(),
            email: parse_required::<EmailAddress>("email", form.email)?.into(),
            phone: required("phone", form.phone)?,
            vehicle_model: required("vehicleModel", form.vehicle_model)?,
            registration_number: optional(form.registration_number),
            service_type: required("serviceType", form.service_type)?,
            preferred_date: required_date("preferredDate", form.preferred_date)?,
            preferred_time: optional(form.preferred_time),
            service_center: optional(form.service_center),
            notes: optional(form.notes),
            status: LeadStatus::New,
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecForm {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    model: Option<String>,
    #[serde(flatten)]
    attribution: Attribution,
}

impl TryFrom<SpecForm> for SpecRequest {
    type Error = String;

    fn try_from(form: SpecForm) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: parse_required::<PersonName>("name", form.name)?.into(),
            email: parse_required::<EmailAddress>("email", form.email)?.into(),
            phone: required("phone", form.phone)?,
            model: required("model", form.model)?,
            attribution: trimmed(form.attribution),
            status: LeadStatus::New,
            created_at: Utc::now(),
        })
    }
}

/// Drop blank attribution values
fn trimmed(attribution: Attribution) -> Attribution {
    Attribution {
        utm_source: optional(attribution.utm_source),
        utm_medium: optional(attribution.utm_medium),
        utm_campaign: optional(attribution.utm_campaign),
        utm_term: optional(attribution.utm_term),
        utm_content: optional(attribution.utm_content),
        campaign: optional(attribution.campaign),
        referrer: optional(attribution.referrer),
    }
}

#[tracing::instrument(name = "Submit contact form", skip(body, store))]
#[post("/contact")]
async fn contact(body: web::Json<ContactForm>, store: web::Data<Store>) -> RestResult<HttpResponse> {
    let lead: ContactLead = body.into_inner().try_into().map_err(RestError::ParseError)?;
    store.insert(&lead).await?;

    Ok(Envelope::data(lead)
        .with_message("Thank you for contacting us. We will get back to you soon.")
        .respond(StatusCode::CREATED))
}

#[tracing::instrument(name = "Request a test drive", skip(body, store, notifier))]
#[post("/test-drive")]
async fn test_drive(
    body: web::Json<TestDriveForm>,
    store: web::Data<Store>,
    notifier: web::Data<LeadNotifier>,
) -> RestResult<HttpResponse> {
    let lead: TestDriveRequest = body.into_inner().try_into().map_err(RestError::ParseError)?;
    store.insert(&lead).await?;
    // Best effort, the request is already recorded
    notifier.test_drive_requested(&lead).await;

    Ok(Envelope::data(lead)
        .with_message("Test drive request received. Our team will contact you to confirm.")
        .respond(StatusCode::CREATED))
}

#[tracing::instrument(name = "Request a quote", skip(body, store))]
#[post("/quote")]
async fn quote(body: web::Json<QuoteForm>, store: web::Data<Store>) -> RestResult<HttpResponse> {
    let lead: QuoteRequest = body.into_inner().try_into().map_err(RestError::ParseError)?;
    store.insert(&lead).await?;

    Ok(Envelope::data(lead)
        .with_message("Quote request received. We will send you a quote shortly.")
        .respond(StatusCode::CREATED))
}

#[tracing::instrument(name = "Book a service", skip(body, store))]
#[post("/service-booking")]
async fn service_booking(
    body: web::Json<ServiceBookingForm>,
    store: web::Data<Store>,
) -> RestResult<HttpResponse> {
    let lead: ServiceBooking = body.into_inner().try_into().map_err(RestError::ParseError)?;
    store.insert(&lead).await?;

    Ok(Envelope::data(lead)
        .with_message("Service booking received. We will confirm your appointment.")
        .respond(StatusCode::CREATED))
}

#[tracing::instrument(name = "Request a spec sheet", skip(body, store, notifier))]
#[post("/specs")]
async fn spec_sheet(
    body: web::Json<SpecForm>,
    store: web::Data<Store>,
    notifier: web::Data<LeadNotifier>,
) -> RestResult<HttpResponse> {
    let lead: SpecRequest = body.into_inner().try_into().map_err(RestError::ParseError)?;
    store.insert(&lead).await?;
    notifier.spec_sheet_requested(&lead).await;

    Ok(Envelope::data(lead)
        .with_message("Spec sheet request received.")
        .respond(StatusCode::CREATED))
}

/// Public lead capture endpoints
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(contact)
        .service(test_drive)
        .service(quote)
        .service(service_booking)
        .service(spec_sheet);
}
