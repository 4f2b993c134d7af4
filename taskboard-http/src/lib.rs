mod api;
mod common;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use poem::listener::TcpListener;
use poem::middleware::Cors;
use poem::session::{CookieConfig, CookieSession};
use poem::{EndpointExt, Route, Server};
use poem_openapi::OpenApiService;
use tracing::*;
use taskboard_core::Services;

pub use crate::common::SESSION_COOKIE_NAME;

pub fn make_app(services: &Services) -> impl poem::Endpoint {
    let api_service = OpenApiService::new(
        api::get(),
        "Taskboard",
        env!("CARGO_PKG_VERSION"),
    )
    .server("/api");

    let spec = api_service.spec_endpoint();

    Route::new()
        .nest("/api/openapi.json", spec)
        .nest("/api", api_service)
        .with(Cors::new())
        .with(CookieSession::new(
            CookieConfig::default()
                .secure(false)
                .name(SESSION_COOKIE_NAME),
        ))
        .data(services.clone())
}

pub async fn run_server(services: &Services, address: SocketAddr) -> Result<()> {
    let app = make_app(services);

    info!(?address, "Listening");
    Server::new(TcpListener::bind(address))
        .run(app)
        .await
        .context("Failed to start HTTP server")
}
