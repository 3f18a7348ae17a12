use std::net::TcpListener;

use anyhow::Context;

use sqlx::PgPool;

use showroom::app;
use showroom::client::{CrmClient, EmailClient, LeadNotifier};
use showroom::crypto::SigningKey;
use showroom::repo::Store;
use showroom::settings::{Settings, StoreBackend};
use showroom::telemetry::{create_subscriber, set_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    set_subscriber(create_subscriber(env_filter, std::io::stdout))?;

    let settings = Settings::load()?;

    let store = match settings.database.backend {
        StoreBackend::Postgres => {
            let pool = PgPool::connect_with(settings.database.with_db())
                .await
                .context("Failed to connect to the database")?;
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            Store::postgres(pool)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store, records are lost on shutdown");
            Store::in_memory()
        }
    };

    let signing_key = SigningKey::new(settings.app.secret_key(), settings.app.token_ttl())
        .context("Failed to create token signing key")?;

    let email_client = EmailClient::new(
        settings.email.sender()?,
        settings.email.api_timeout(),
        settings.email.api_base_url()?,
        settings.email.api_auth_token(),
    )?;
    let crm_client = match settings.crm.endpoint()? {
        Some(endpoint) => Some(CrmClient::new(
            endpoint,
            settings.crm.api_key(),
            settings.crm.timeout(),
        )?),
        None => {
            tracing::info!("No CRM endpoint configured, leads will not be forwarded");
            None
        }
    };
    let notifier = LeadNotifier::new(email_client, settings.email.sales_inbox()?, crm_client);

    let listener = TcpListener::bind(settings.app.addr())?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    app::run(listener, store, signing_key, notifier)?
        .await
        .context("Failed to run app")
}
