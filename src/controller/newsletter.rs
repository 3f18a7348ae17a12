use actix_web::dev::HttpServiceFactory;
use actix_web::http::StatusCode;
use actix_web::{post, web, HttpResponse};

use serde::{Deserialize, Serialize};

use crate::auth::Administrator;
use crate::client::{Email, EmailClient, LeadNotifier};
use crate::controller::{lead_admin, Envelope};
use crate::domain::{optional, parse_required, required, EmailAddress, SubscriptionStatus};
use crate::error::{RestError, RestResult};
use crate::model::NewsletterSubscription;
use crate::repo::{Filter, Sort, Store};

#[derive(Debug, Deserialize)]
pub struct SubscribeBody {
    email: Option<String>,
    name: Option<String>,
    source: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UnsubscribeBody {
    email: Option<String>,
}

/// Newsletter issue sent to every active subscriber
#[derive(Debug, Deserialize)]
pub struct PublishBody {
    subject: Option<String>,
    html: Option<String>,
    text: Option<String>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct PublishReport {
    sent: u64,
    failed: u64,
}

fn by_email(email: &EmailAddress) -> Filter {
    Filter::new().eq("email", email.as_ref())
}

#[tracing::instrument(name = "Subscribe to the newsletter", skip(body, store))]
#[post("")]
async fn subscribe(
    body: web::Json<SubscribeBody>,
    store: web::Data<Store>,
) -> RestResult<HttpResponse> {
    let body = body.into_inner();
    let email: EmailAddress = parse_required("email", body.email).map_err(RestError::ParseError)?;
    let name = optional(body.name);
    let source = optional(body.source);

    match store
        .find_one::<NewsletterSubscription>(&by_email(&email))
        .await?
    {
        None => {
            let subscription = NewsletterSubscription::new(email, name, source);
            store.insert(&subscription).await?;

            Ok(Envelope::data(subscription)
                .with_message("Subscribed to the newsletter")
                .respond(StatusCode::CREATED))
        }
        Some(subscription) if subscription.is_active() => Err(RestError::Conflict(
            "This email is already subscribed".into(),
        )),
        Some(mut subscription) => {
            subscription.reactivate();
            if name.is_some() {
                subscription.name = name;
            }
            if source.is_some() {
                subscription.source = source;
            }
            store.replace(&subscription).await?;

            Ok(Envelope::data(subscription)
                .with_message("Welcome back! Your subscription has been reactivated")
                .respond(StatusCode::OK))
        }
    }
}

#[tracing::instrument(name = "Unsubscribe from the newsletter", skip(body, store))]
#[post("/unsubscribe")]
async fn unsubscribe(
    body: web::Json<UnsubscribeBody>,
    store: web::Data<Store>,
) -> RestResult<HttpResponse> {
    let email: EmailAddress =
        parse_required("email", body.into_inner().email).map_err(RestError::ParseError)?;

    let mut subscription = store
        .find_one::<NewsletterSubscription>(&by_email(&email))
        .await?
        .ok_or_else(|| RestError::not_found("Subscription"))?;

    if !subscription.is_active() {
        return Ok(Envelope::message("Already unsubscribed").respond(StatusCode::OK));
    }

    subscription.unsubscribe();
    store.replace(&subscription).await?;

    Ok(Envelope::message("Unsubscribed from the newsletter").respond(StatusCode::OK))
}

/// Validated newsletter content
#[derive(Debug)]
struct Issue {
    subject: String,
    html_body: String,
    text_body: String,
}

impl Issue {
    fn addressed_to(&self, recipient: EmailAddress) -> Email {
        Email {
            recipient,
            subject: self.subject.clone(),
            html_body: self.html_body.clone(),
            text_body: self.text_body.clone(),
        }
    }
}

impl TryFrom<PublishBody> for Issue {
    type Error = String;

    fn try_from(body: PublishBody) -> Result<Self, Self::Error> {
        Ok(Self {
            subject: required("subject", body.subject)?,
            html_body: required("html", body.html)?,
            text_body: required("text", body.text)?,
        })
    }
}

/// Send `issue` to each subscription in turn. A delivery that cannot be recorded
/// still counts as sent, since the reader already has the email.
async fn deliver(
    issue: &Issue,
    subscriptions: Vec<NewsletterSubscription>,
    store: &Store,
    email_client: &EmailClient,
) -> PublishReport {
    let mut report = PublishReport { sent: 0, failed: 0 };
    for mut subscription in subscriptions {
        let recipient = match subscription.email.parse() {
            Ok(recipient) => recipient,
            Err(error) => {
                tracing::warn!(
                    "Skipping subscription {} with an invalid email: {}",
                    subscription.id,
                    error
                );
                report.failed += 1;
                continue;
            }
        };

        if let Err(error) = email_client.send(&issue.addressed_to(recipient)).await {
            tracing::warn!(
                error.cause_chain = ?error,
                "Failed to deliver newsletter to subscription {}",
                subscription.id
            );
            report.failed += 1;
            continue;
        }
        report.sent += 1;

        subscription.record_email_sent();
        if let Err(error) = store.replace(&subscription).await {
            tracing::error!(
                error.cause_chain = ?error,
                "Failed to record newsletter delivery for subscription {}",
                subscription.id
            );
        }
    }
    report
}

#[tracing::instrument(name = "Publish a newsletter issue", skip(body, store, notifier))]
#[post("/publish")]
async fn publish(
    admin: Administrator,
    body: web::Json<PublishBody>,
    store: web::Data<Store>,
    notifier: web::Data<LeadNotifier>,
) -> RestResult<HttpResponse> {
    let issue: Issue = body.into_inner().try_into().map_err(RestError::ParseError)?;

    let active = Filter::new().eq("status", SubscriptionStatus::Active.as_ref());
    let subscriptions = store
        .find_all::<NewsletterSubscription>(&active, Sort::oldest_first("subscribedAt"))
        .await?;

    let report = deliver(&issue, subscriptions, &store, notifier.email_client()).await;
    tracing::info!(
        "Newsletter published by admin {}: {} sent, {} failed",
        admin.id(),
        report.sent,
        report.failed
    );

    Ok(Envelope::data(report)
        .with_message("Newsletter published")
        .respond(StatusCode::OK))
}

/// Public newsletter endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/newsletter")
        .service(subscribe)
        .service(unsubscribe)
}

/// Admin newsletter endpoints
pub fn admin_scope() -> impl HttpServiceFactory {
    // `/publish` must be registered before `/{id}` captures it
    web::scope("/newsletter")
        .service(publish)
        .configure(lead_admin::configure_newsletter)
}
