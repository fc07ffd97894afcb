mod api;
mod config;
mod middleware;
mod static_assets;
mod ws;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use api::admin::verify_admin;
use api::locker::{get_locker, landing, update_locker};
use axum::{
    Router,
    http::{Method, header},
    middleware::from_fn_with_state,
    routing::{get, post},
};
use config::ServerConfig;
use lockwatch_core::AppCore;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[derive(serde::Serialize)]
struct Health {
    status: String,
}

async fn health() -> axum::Json<Health> {
    axum::Json(Health {
        status: "lockwatch is working!".to_string(),
    })
}

#[tokio::main]
async fn main() {
    // Initialize tracing logger
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,lockwatch_server=debug".into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting Lockwatch server");

    let config = ServerConfig::load().expect("Failed to load server configuration");
    let core = Arc::new(
        AppCore::new(&config.db_path, config.admin_secret.as_deref())
            .expect("Failed to initialize app core"),
    );

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let shared_state = core.clone();

    let app = Router::new()
        .route("/health", get(health))
        // Landing page (seeds the store from a digits-only `locker` query)
        .route("/", get(landing))
        // Shared locker value (writes guarded by the admin middleware)
        .route("/api/locker", get(get_locker).put(update_locker))
        // Admin password check
        .route("/api/admin/verify", post(verify_admin))
        // Live viewer stream
        .route("/api/locker/ws", get(ws::viewer_ws_handler))
        .layer(from_fn_with_state(
            shared_state.clone(),
            middleware::auth::require_admin,
        ))
        .fallback(static_assets::static_handler)
        .layer(cors)
        .with_state(shared_state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port))
        .await
        .expect("Failed to bind server address");

    tracing::info!(
        "Lockwatch running on http://{}:{}",
        config.host,
        config.port
    );

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
