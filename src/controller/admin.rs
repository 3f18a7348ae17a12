use actix_web::dev::HttpServiceFactory;
use actix_web::http::StatusCode;
use actix_web::{get, post, web, HttpResponse};

use chrono::Utc;

use secrecy::Secret;

use serde::{Deserialize, Serialize};

use crate::auth::{check_password_policy, hash_password, verify_credentials, Administrator};
use crate::controller::{blog, lead_admin, newsletter, offers, Envelope};
use crate::crypto::{AdminClaims, SigningKey};
use crate::domain::{
    parse_optional, parse_required, AdminRole, EmailAddress, LeadStatus, PersonName, PostStatus,
    SubscriptionStatus,
};
use crate::error::{RestError, RestResult};
use crate::model::{
    AdminAccount, AdminProfile, BlogPost, ContactLead, NewsletterSubscription, Offer,
    QuoteRequest, ServiceBooking, SpecRequest, TestDriveRequest,
};
use crate::repo::{Document, Filter, Store};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Deserialize)]
pub struct AccountBody {
    email: Option<String>,
    password: Option<Secret<String>>,
    name: Option<String>,
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    email: Option<String>,
    password: Option<Secret<String>>,
}

/// Token issued on setup and login
#[derive(Debug, Serialize)]
pub struct Session {
    token: String,
    admin: AdminProfile,
}

fn required_password(password: Option<Secret<String>>) -> RestResult<Secret<String>> {
    password.ok_or_else(|| RestError::ParseError("Missing required field: password".into()))
}

impl AccountBody {
    /// Validate the body and hash its password into a new account
    async fn into_account(self, default_role: AdminRole) -> RestResult<AdminAccount> {
        let email: EmailAddress =
            parse_required("email", self.email).map_err(RestError::ParseError)?;
        let name: PersonName = parse_required("name", self.name).map_err(RestError::ParseError)?;
        let role = parse_optional::<AdminRole>(self.role)
            .map_err(RestError::ParseError)?
            .unwrap_or(default_role);
        let password = required_password(self.password)?;
        check_password_policy(&password).map_err(RestError::ParseError)?;

        let password_hash = hash_password(password).await?;
        Ok(AdminAccount::new(email, name, role, password_hash))
    }
}

/// Create the first admin account. Closed as soon as any admin exists.
#[tracing::instrument(name = "Set up the first admin", skip(body, store, signing_key))]
#[post("/setup")]
async fn setup(
    body: web::Json<AccountBody>,
    store: web::Data<Store>,
    signing_key: web::Data<SigningKey>,
) -> RestResult<HttpResponse> {
    if store.count::<AdminAccount>(&Filter::new()).await? > 0 {
        return Err(RestError::Forbidden(
            "Setup already completed, ask an existing admin for an account".into(),
        ));
    }

    let account = body.into_inner().into_account(AdminRole::SuperAdmin).await?;
    store.insert(&account).await?;
    tracing::info!("First admin account {} created", account.id);

    let token = AdminClaims::issue(&account, &signing_key)?;
    let session = Session {
        token,
        admin: account.profile(),
    };
    Ok(Envelope::data(session)
        .with_message("Admin account created")
        .respond(StatusCode::CREATED))
}

#[tracing::instrument(name = "Admin login", skip(body, store, signing_key))]
#[post("/login")]
async fn login(
    body: web::Json<LoginBody>,
    store: web::Data<Store>,
    signing_key: web::Data<SigningKey>,
) -> RestResult<HttpResponse> {
    let body = body.into_inner();
    let email: EmailAddress =
        parse_required("email", body.email).map_err(RestError::ParseError)?;
    let password = required_password(body.password)?;

    let account = store
        .find_one::<AdminAccount>(&Filter::new().eq("email", email.as_ref()))
        .await?;
    verify_credentials(password, account.as_ref().map(AdminAccount::password_hash)).await?;
    let mut account =
        account.ok_or_else(|| RestError::Unauthorized(INVALID_CREDENTIALS.into()))?;

    account.last_login_at = Some(Utc::now());
    store.replace(&account).await?;

    let token = AdminClaims::issue(&account, &signing_key)?;
    let session = Session {
        token,
        admin: account.profile(),
    };
    Ok(Envelope::data(session).respond(StatusCode::OK))
}

#[tracing::instrument(name = "Register an admin", skip(body, store))]
#[post("/register")]
async fn register(
    admin: Administrator,
    body: web::Json<AccountBody>,
    store: web::Data<Store>,
) -> RestResult<HttpResponse> {
    let account = body.into_inner().into_account(AdminRole::Admin).await?;
    if account.role == AdminRole::SuperAdmin && admin.role() != AdminRole::SuperAdmin {
        return Err(RestError::Forbidden(
            "Only a superadmin can create another superadmin".into(),
        ));
    }

    store.insert(&account).await?;
    tracing::info!("Admin account {} created by {}", account.id, admin.id());

    Ok(Envelope::data(account.profile())
        .with_message("Admin account created")
        .respond(StatusCode::CREATED))
}

#[tracing::instrument(name = "Fetch own admin profile", skip(store))]
#[get("/me")]
async fn me(admin: Administrator, store: web::Data<Store>) -> RestResult<HttpResponse> {
    let account = store
        .get::<AdminAccount>(admin.id())
        .await?
        .ok_or_else(|| RestError::not_found("Admin"))?;

    Ok(Envelope::data(account.profile()).respond(StatusCode::OK))
}

/// Counts shown on the admin dashboard
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    contact_leads: LeadCounts,
    test_drive_requests: LeadCounts,
    quote_requests: LeadCounts,
    service_bookings: LeadCounts,
    spec_requests: LeadCounts,
    newsletter: NewsletterCounts,
    blog_posts: BlogCounts,
    offers: OfferCounts,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadCounts {
    total: u64,
    new: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterCounts {
    total: u64,
    active: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogCounts {
    total: u64,
    published: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferCounts {
    total: u64,
    active: u64,
}

async fn lead_counts<D: Document>(store: &Store) -> RestResult<LeadCounts> {
    let new = Filter::new().eq("status", LeadStatus::New.as_ref());
    Ok(LeadCounts {
        total: store.count::<D>(&Filter::new()).await?,
        new: store.count::<D>(&new).await?,
    })
}

#[tracing::instrument(name = "Build admin dashboard", skip(store))]
#[get("/dashboard")]
async fn dashboard(_admin: Administrator, store: web::Data<Store>) -> RestResult<HttpResponse> {
    let all = Filter::new();
    let active_subscriptions = Filter::new().eq("status", SubscriptionStatus::Active.as_ref());
    let published = Filter::new().eq("status", PostStatus::Published.as_ref());
    let active_offers = Filter::new().eq("active", true);

    let dashboard = Dashboard {
        contact_leads: lead_counts::<ContactLead>(&store).await?,
        test_drive_requests: lead_counts::<TestDriveRequest>(&store).await?,
        quote_requests: lead_counts::<QuoteRequest>(&store).await?,
        service_bookings: lead_counts::<ServiceBooking>(&store).await?,
        spec_requests: lead_counts::<SpecRequest>(&store).await?,
        newsletter: NewsletterCounts {
            total: store.count::<NewsletterSubscription>(&all).await?,
            active: store
                .count::<NewsletterSubscription>(&active_subscriptions)
                .await?,
        },
        blog_posts: BlogCounts {
            total: store.count::<BlogPost>(&all).await?,
            published: store.count::<BlogPost>(&published).await?,
        },
        offers: OfferCounts {
            total: store.count::<Offer>(&all).await?,
            active: store.count::<Offer>(&active_offers).await?,
        },
    };

    Ok(Envelope::data(dashboard).respond(StatusCode::OK))
}

/// Admin API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/admin")
        .service(setup)
        .service(login)
        .service(register)
        .service(me)
        .service(dashboard)
        .service(lead_admin::scope())
        .service(newsletter::admin_scope())
        .service(blog::admin_scope())
        .service(offers::admin_scope())
}
