use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use rusty_gate::auth::{AuthService, TokenManager};
use rusty_gate::config::ServerConfig;
use rusty_gate::handlers::{auth_routes, AuthContext};
use rusty_gate::security_logger::init_security_logger;
use rusty_gate::storage::{MemoryUserStore, UserStore};

#[tokio::main]
async fn main() {
    // Initialize env
    match dotenvy::dotenv() {
        Ok(_) => info!("Environment variables loaded from .env file"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    // Initialize logging
    env_logger::init();

    // Load config from the environment
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Configuration: host={}, port={}", config.host, config.port);

    if config.development_mode {
        warn!("Development mode is enabled; do not use this setting in production");
    }

    // Track authentication events process-wide
    init_security_logger();

    // Wire the service: store, token issuer, orchestrator
    let store: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
    let tokens = Arc::new(TokenManager::new(
        &config.jwt_secret,
        config.access_token_ttl,
    ));
    let service = Arc::new(AuthService::new(
        store,
        tokens.clone(),
        config.refresh_token_ttl,
    ));

    let ctx = AuthContext { service, tokens };

    // Create health check route
    let health_route = warp::path("health").map(|| "OK");

    // Combine routes
    let routes = auth_routes(ctx).or(health_route);

    // Build the server address
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    // Start the server
    info!("Starting Rusty Gate server on {}", addr);

    warp::serve(routes).run(addr).await;
}
