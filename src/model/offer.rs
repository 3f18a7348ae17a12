use chrono::{DateTime, NaiveDate, Utc};

use serde::{Deserialize, Serialize};

use uuid::Uuid;

use crate::repo::Document;

/// Promotional offer shown on the offers page while active and in its validity window
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_urls: Vec<String>,
    pub terms: Option<String>,
    pub valid_from: NaiveDate,
    /// Open ended when `None`
    pub valid_until: Option<NaiveDate>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Offer {
    /// Whether the offer should be shown on `today`
    pub fn is_current(&self, today: NaiveDate) -> bool {
        self.active
            && self.valid_from <= today
            && self.valid_until.map_or(true, |until| today <= until)
    }
}

impl Document for Offer {
    const COLLECTION: &'static str = "offers";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Validity windows must not end before they start
pub fn check_validity(from: NaiveDate, until: Option<NaiveDate>) -> Result<(), String> {
    match until {
        Some(until) if until < from => Err("validUntil cannot be before validFrom".into()),
        _ => Ok(()),
    }
}
