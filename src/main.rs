//! Precious metals dashboard backend
//!
//! Fetches gold (XAU) and silver (XAG) spot prices from the quote provider
//! and serves them as a server-rendered dashboard page plus a JSON API.
//! Data source: Alpha Vantage currency-exchange-rate endpoint.

mod config;     // configuration loading
mod handlers;   // HTTP request handlers
mod middleware; // middleware
mod models;     // data model definitions
mod services;   // business logic services

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use crate::config::AppConfig;
use crate::middleware::AccessKeyMiddleware;
use crate::services::quote_service::{QuoteService, API_KEY_ENV};

/// Application entry point
///
/// Starts the HTTP server on the configured address (default 0.0.0.0:8080).
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Config is loaded before the logger exists, so its own messages are
    // dropped; the effective settings are logged right after instead.
    let config = AppConfig::load();
    env_logger::init_from_env(Env::default().default_filter_or(&config.log.level));

    log::info!("starting metals dashboard backend on {}", config.bind_addr());

    // Provider API key, read once at startup
    let api_key = config.resolve_api_key();
    match &api_key {
        Some(_) => log::info!("quote provider API key resolved"),
        None => log::warn!(
            "{} not set; the dashboard will show setup instructions",
            API_KEY_ENV
        ),
    }

    let service = QuoteService::new(&config.provider, api_key)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    let service = web::Data::new(service);

    let access_key = config.api.access_key.clone();
    let workers = config.server.workers;

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default()) // request log middleware
            .wrap(AccessKeyMiddleware::new(access_key.clone()))
            .app_data(service.clone())
            .configure(handlers::config) // route configuration
    });

    let server = if workers > 0 {
        server.workers(workers)
    } else {
        server
    };

    server.bind(config.bind_addr())?.run().await
}
