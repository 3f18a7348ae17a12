use chrono::{DateTime, Utc};

use serde::{Deserialize, Serialize};

use uuid::Uuid;

use crate::domain::{EmailAddress, SubscriptionStatus};
use crate::model::Lead;
use crate::repo::Document;

/// Stored newsletter subscription.
/// The email is unique within the collection and is reused when a reader
/// unsubscribes and later subscribes again.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterSubscription {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub source: Option<String>,
    pub status: SubscriptionStatus,
    pub subscribed_at: DateTime<Utc>,
    pub unsubscribed_at: Option<DateTime<Utc>>,
    pub emails_sent: u64,
    pub last_email_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewsletterSubscription {
    pub fn new(email: EmailAddress, name: Option<String>, source: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            name,
            source,
            status: SubscriptionStatus::Active,
            subscribed_at: now,
            unsubscribed_at: None,
            emails_sent: 0,
            last_email_sent_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }

    /// Move an unsubscribed reader back to active
    pub fn reactivate(&mut self) {
        let now = Utc::now();
        self.status = SubscriptionStatus::Active;
        self.subscribed_at = now;
        self.unsubscribed_at = None;
        self.updated_at = now;
    }

    pub fn unsubscribe(&mut self) {
        let now = Utc::now();
        self.status = SubscriptionStatus::Unsubscribed;
        self.unsubscribed_at = Some(now);
        self.updated_at = now;
    }

    /// Account for one newsletter delivered to this reader
    pub fn record_email_sent(&mut self) {
        let now = Utc::now();
        self.emails_sent += 1;
        self.last_email_sent_at = Some(now);
        self.updated_at = now;
    }
}

impl Document for NewsletterSubscription {
    const COLLECTION: &'static str = "newsletter_subscriptions";
    const UNIQUE: &'static [&'static str] = &["email"];

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Lead for NewsletterSubscription {
    const LABEL: &'static str = "Newsletter subscription";
    type Status = SubscriptionStatus;
}
