use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use allserve_auth::auth::keys::KeyMaterial;
use allserve_auth::auth::password::Argon2Encoder;
use allserve_auth::auth::policy::AccessPolicy;
use allserve_auth::auth::tokens::{TokenIssuer, TokenValidator};
use allserve_auth::config::ServerConfig;
use allserve_auth::handlers::{self, AuthContext};
use allserve_auth::storage::MemoryUserDirectory;

#[tokio::main]
async fn main() {
    // Initialize env
    match dotenvy::dotenv() {
        Ok(_) => info!("Environment variables loaded from .env file"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    // Initialize logging
    env_logger::init();

    // Load config from .env
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Configuration: host={}, port={}, access_ttl={}s, refresh_ttl={}s",
        config.host,
        config.port,
        config.access_token_ttl.as_secs(),
        config.refresh_token_ttl.as_secs()
    );

    // Generate the process-lifetime signing key before accepting traffic.
    // The service cannot run without one, so failure is fatal.
    let key_material = match KeyMaterial::generate() {
        Ok(material) => Arc::new(material),
        Err(e) => {
            error!("Signing key generation failed: {}", e);
            std::process::exit(1);
        }
    };
    info!("Signing key ready, kid={}", key_material.key_id());

    let issuer = Arc::new(TokenIssuer::new(
        &key_material,
        config.access_token_ttl,
        config.refresh_token_ttl,
    ));
    let validator = Arc::new(TokenValidator::new(&key_material));

    let ctx = AuthContext {
        directory: Arc::new(MemoryUserDirectory::new()),
        encoder: Arc::new(Argon2Encoder::new()),
        key_material,
        issuer,
        validator,
        policy: Arc::new(AccessPolicy::permissive()),
        dashboard_url: config.dashboard_url.clone(),
    };

    // A single allowed origin; credentials permitted
    let cors = warp::cors()
        .allow_origin(config.allowed_origin.as_str())
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allow_headers(vec![
            "authorization",
            "content-type",
            "accept",
            "origin",
            "x-requested-with",
        ])
        .allow_credentials(true);

    let health_route = warp::path("health").map(|| "OK");

    let routes = handlers::enforce_policy(ctx.clone())
        .and(
            handlers::oauth::routes(ctx.clone())
                .or(handlers::login::routes(ctx))
                .or(health_route),
        )
        .recover(handlers::handle_rejection)
        .with(cors);

    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting AllServe auth server on {}", addr);

    warp::serve(routes).run(addr).await;
}
