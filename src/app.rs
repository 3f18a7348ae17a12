use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{get, HttpResponse, Responder};
use actix_web::{web, App, HttpServer};

use tracing_actix_web::TracingLogger;

use crate::client::LeadNotifier;
use crate::controller;
use crate::crypto::SigningKey;
use crate::repo::Store;

/// Simple health-check endpoint
#[tracing::instrument(name = "Health check")]
#[get("/health_check")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().finish()
}

/// Run the application on a specified TCP listener
pub fn run(
    listener: TcpListener,
    store: Store,
    signing_key: SigningKey,
    notifier: LeadNotifier,
) -> anyhow::Result<Server> {
    // Wrap application data
    let store = web::Data::new(store);
    let signing_key = web::Data::new(signing_key);
    let notifier = web::Data::new(notifier);

    // Start the server
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(store.clone())
            .app_data(signing_key.clone())
            .app_data(notifier.clone())
            .app_data(controller::json_config())
            .app_data(controller::query_config())
            .app_data(controller::path_config())
            .service(health_check)
            .service(controller::scope())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
