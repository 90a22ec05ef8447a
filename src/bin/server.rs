use log::{error, info, warn};
use std::net::SocketAddr;

use fundlink::config::ServerConfig;
use fundlink::context::AppContext;
use fundlink::routes::api_routes;

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
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Configuration: host={}, port={}", config.host, config.port);

    let ctx = AppContext::in_memory(&config.jwt_secret);

    // Out-of-band admin provisioning; registration can never yield admin
    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        if let Err(e) = ctx.ensure_admin(email, password).await {
            error!("Failed to provision admin account: {}", e);
            std::process::exit(1);
        }
    }

    let routes = api_routes(ctx);

    // Build the server address
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting Fundlink server on {}", addr);

    warp::serve(routes).run(addr).await;
}
