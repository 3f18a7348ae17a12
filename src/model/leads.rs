use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};

use serde::{Deserialize, Serialize};

use uuid::Uuid;

use crate::domain::{EnquiryType, LeadStatus};
use crate::repo::Document;

/// A customer-submitted record the admin panel lists, shows and deletes
pub trait Lead: Document {
    /// Human readable name used in API messages
    const LABEL: &'static str;
    /// Workflow state the admin listing can filter on, stored under `status`
    type Status: FromStr<Err = String> + AsRef<str>;
}

/// Campaign attribution captured alongside marketing leads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribution {
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_term: Option<String>,
    pub utm_content: Option<String>,
    pub campaign: Option<String>,
    pub referrer: Option<String>,
}

/// Contact form submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactLead {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub enquiry_type: EnquiryType,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
}

impl Document for ContactLead {
    const COLLECTION: &'static str = "contact_leads";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Lead for ContactLead {
    const LABEL: &'static str = "Contact lead";
    type Status = LeadStatus;
}

/// Test drive booking request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDriveRequest {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub model: String,
    pub location: Option<String>,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_time: Option<String>,
    pub message: Option<String>,
    pub attribution: Attribution,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
}

impl Document for TestDriveRequest {
    const COLLECTION: &'static str = "test_drive_requests";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Lead for TestDriveRequest {
    const LABEL: &'static str = "Test drive request";
    type Status = LeadStatus;
}

/// Price quote request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub model: String,
    pub variant: Option<String>,
    pub location: Option<String>,
    pub financing: bool,
    pub message: Option<String>,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
}

impl Document for QuoteRequest {
    const COLLECTION: &'static str = "quote_requests";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Lead for QuoteRequest {
    const LABEL: &'static str = "Quote request";
    type Status = LeadStatus;
}

/// Workshop service booking
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBooking {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub vehicle_model: String,
    pub registration_number: Option<String>,
    pub service_type: String,
    pub preferred_date: NaiveDate,
    pub preferred_time: Option<String>,
    pub service_center: Option<String>,
    pub notes: Option<String>,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
}

impl Document for ServiceBooking {
    const COLLECTION: &'static str = "service_bookings";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Lead for ServiceBooking {
    const LABEL: &'static str = "Service booking";
    type Status = LeadStatus;
}

/// Request for a model's specification sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecRequest {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub model: String,
    pub attribution: Attribution,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
}

impl Document for SpecRequest {
    const COLLECTION: &'static str = "spec_requests";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Lead for SpecRequest {
    const LABEL: &'static str = "Spec sheet request";
    type Status = LeadStatus;
}
