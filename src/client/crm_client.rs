use std::time::Duration;

use anyhow::Context;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;

use secrecy::Secret;

use url::Url;

use crate::model::{Attribution, SpecRequest, TestDriveRequest};

const CRM_API_KEY_HEADER: &str = "X-Api-Key";
const LEAD_HEADER_PREFIX: &str = "x-lead-";

/// Lead fields forwarded to the CRM, one header per field
#[derive(Debug, Clone, PartialEq)]
pub struct CrmLead {
    pub source: &'static str,
    fields: Vec<(&'static str, String)>,
}

impl CrmLead {
    pub fn new(source: &'static str) -> Self {
        Self {
            source,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.fields.push((name, value.into()));
        self
    }

    /// Add a field only when it has a value
    pub fn field_opt(self, name: &'static str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.field(name, value),
            None => self,
        }
    }

    fn attribution(self, attribution: &Attribution) -> Self {
        self.field_opt("utm-source", attribution.utm_source.clone())
            .field_opt("utm-medium", attribution.utm_medium.clone())
            .field_opt("utm-campaign", attribution.utm_campaign.clone())
            .field_opt("utm-term", attribution.utm_term.clone())
            .field_opt("utm-content", attribution.utm_content.clone())
            .field_opt("campaign", attribution.campaign.clone())
            .field_opt("referrer", attribution.referrer.clone())
    }

    /// Render the lead as `X-Lead-*` headers
    pub fn headers(&self) -> anyhow::Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-lead-source"),
            HeaderValue::from_static(self.source),
        );
        for (name, value) in &self.fields {
            let name = HeaderName::from_bytes(format!("{}{}", LEAD_HEADER_PREFIX, name).as_bytes())
                .with_context(|| format!("Invalid CRM header name for field {}", name))?;
            headers.insert(name, header_value(value)?);
        }
        Ok(headers)
    }
}

/// Header text as-is when it is valid header text, otherwise form-url-encoded
fn header_value(value: &str) -> anyhow::Result<HeaderValue> {
    if value.is_ascii() {
        if let Ok(value) = HeaderValue::from_str(value) {
            return Ok(value);
        }
    }
    let encoded: String = url::form_urlencoded::byte_serialize(value.as_bytes()).collect();
    HeaderValue::from_str(&encoded).context("Failed to encode CRM header value")
}

impl From<&TestDriveRequest> for CrmLead {
    fn from(lead: &TestDriveRequest) -> Self {
        CrmLead::new("test-drive")
            .field("name", lead.name.clone())
            .field("email", lead.email.clone())
            .field("phone", lead.phone.clone())
            .field("model", lead.model.clone())
            .field_opt("location", lead.location.clone())
            .field_opt("preferred-date", lead.preferred_date.map(|d| d.to_string()))
            .field_opt("preferred-time", lead.preferred_time.clone())
            .attribution(&lead.attribution)
    }
}

impl From<&SpecRequest> for CrmLead {
    fn from(lead: &SpecRequest) -> Self {
        CrmLead::new("spec-sheet")
            .field("name", lead.name.clone())
            .field("email", lead.email.clone())
            .field("phone", lead.phone.clone())
            .field("model", lead.model.clone())
            .attribution(&lead.attribution)
    }
}

/// Client for the distributor's CRM lead intake endpoint
#[derive(Debug, Clone)]
pub struct CrmClient {
    client: Client,
    endpoint: Url,
    api_key: Secret<String>,
}

impl CrmClient {
    pub fn new(endpoint: Url, api_key: Secret<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build http client")?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    /// Post one lead to the CRM
    #[tracing::instrument(name = "Push lead to CRM", skip(self, lead), fields(source = lead.source))]
    pub async fn push(&self, lead: &CrmLead) -> anyhow::Result<()> {
        use secrecy::ExposeSecret;

        self.client
            .post(self.endpoint.clone())
            .header(CRM_API_KEY_HEADER, self.api_key.expose_secret())
            .headers(lead.headers()?)
            .send()
            .await
            .context("Failed to reach CRM")?
            .error_for_status()
            .context("CRM rejected lead")?;
        Ok(())
    }
}
