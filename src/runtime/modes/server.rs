//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::warn;

use crate::api::middleware::SessionAuth;
use crate::api::services::configure_routes;
use crate::config::{SiteConfig, StaticConfig};
use crate::runtime::lifetime;

/// Validate CORS configuration at startup (runs once)
fn validate_cors_config(site: &SiteConfig) {
    if site.cors_allowed_origins.iter().any(|o| o == "*") {
        warn!("CORS allows any origin; the dashboard API is reachable from every website");
    }
}

/// Build CORS middleware from configuration
fn build_cors_middleware(site: &SiteConfig) -> Cors {
    // 未配置时保持浏览器同源策略
    if site.cors_allowed_origins.is_empty() {
        return Cors::default();
    }

    let mut cors = if site.cors_allowed_origins.iter().any(|o| o == "*") {
        Cors::default().allow_any_origin()
    } else {
        site.cors_allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors = cors
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec!["Authorization", "Content-Type", "Accept"])
        .expose_headers(vec!["Content-Disposition"])
        .max_age(3600);
    cors
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: &StaticConfig) -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup(config)
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {:#}", e))?;

    let auth = SessionAuth::new(startup.jwt.clone(), startup.profile_service.clone());
    let site = config.site.clone();
    validate_cors_config(&site);

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let db_for_shutdown = startup.storage.get_db().clone();
    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        let auth = auth.clone();
        App::new()
            .wrap(build_cors_middleware(&site))
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .app_data(web::Data::new(startup.profile_service.clone()))
            .app_data(web::Data::new(startup.invitation_service.clone()))
            .app_data(web::Data::new(startup.analytics_service.clone()))
            .app_data(web::Data::new(startup.recorder.clone()))
            .app_data(web::JsonConfig::default().limit(256 * 1024))
            .configure(|cfg| configure_routes(cfg, auth))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .workers(cpu_count)
    .disable_signals()
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?;

    warn!("Starting server at http://{}", bind_address);
    let server = server.run();
    let handle = server.handle();

    tokio::select! {
        res = server => {
            res.context("HTTP server error")?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(handle, db_for_shutdown) => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}
