use html_escape::encode_text;

use crate::domain::EmailAddress;
use crate::model::{SpecRequest, TestDriveRequest};

use super::{CrmClient, CrmLead, Email, EmailClient};

/// Best-effort follow-up of captured leads.
/// The stored record is the source of truth: failures here are logged and dropped.
#[derive(Debug, Clone)]
pub struct LeadNotifier {
    email_client: EmailClient,
    sales_inbox: EmailAddress,
    crm_client: Option<CrmClient>,
}

impl LeadNotifier {
    pub fn new(
        email_client: EmailClient,
        sales_inbox: EmailAddress,
        crm_client: Option<CrmClient>,
    ) -> Self {
        Self {
            email_client,
            sales_inbox,
            crm_client,
        }
    }

    pub fn email_client(&self) -> &EmailClient {
        &self.email_client
    }

    /// Email the sales inbox and push the lead to the CRM
    #[tracing::instrument(name = "Notify test drive request", skip(self, lead), fields(lead_id = %lead.id))]
    pub async fn test_drive_requested(&self, lead: &TestDriveRequest) {
        let email = test_drive_email(self.sales_inbox.clone(), lead);
        if let Err(error) = self.email_client.send(&email).await {
            tracing::warn!(error.cause_chain = ?error, "Failed to email sales about a test drive request");
        }
        self.push_to_crm(CrmLead::from(lead)).await;
    }

    /// Push the lead to the CRM
    #[tracing::instrument(name = "Notify spec sheet request", skip(self, lead), fields(lead_id = %lead.id))]
    pub async fn spec_sheet_requested(&self, lead: &SpecRequest) {
        self.push_to_crm(CrmLead::from(lead)).await;
    }

    async fn push_to_crm(&self, lead: CrmLead) {
        let Some(crm_client) = &self.crm_client else {
            tracing::debug!("No CRM endpoint configured, skipping {} lead", lead.source);
            return;
        };
        if let Err(error) = crm_client.push(&lead).await {
            tracing::warn!(error.cause_chain = ?error, "Failed to push {} lead to CRM", lead.source);
        }
    }
}

fn test_drive_email(recipient: EmailAddress, lead: &TestDriveRequest) -> Email {
    let when = match (&lead.preferred_date, &lead.preferred_time) {
        (Some(date), Some(time)) => format!("{} {}", date, time),
        (Some(date), None) => date.to_string(),
        (None, Some(time)) => time.clone(),
        (None, None) => "no preference".into(),
    };
    let location = lead.location.as_deref().unwrap_or("not given");

    let subject = format!("New test drive request: {}", lead.model);
    let text_body = format!(
        "Name: {}\nEmail: {}\nPhone: {}\nModel: {}\nLocation: {}\nPreferred: {}",
        lead.name, lead.email, lead.phone, lead.model, location, when
    );
    // Every value comes from the public form
    let html_body = format!(
        "<h1>New test drive request</h1><ul><li>Name: {}</li><li>Email: {}</li><li>Phone: {}</li><li>Model: {}</li><li>Location: {}</li><li>Preferred: {}</li></ul>",
        encode_text(&lead.name),
        encode_text(&lead.email),
        encode_text(&lead.phone),
        encode_text(&lead.model),
        encode_text(location),
        encode_text(&when)
    );

    Email {
        recipient,
        subject,
        html_body,
        text_body,
    }
}
