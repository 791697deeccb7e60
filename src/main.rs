use axum::{
    http::{HeaderValue, Method},
    response::Json,
    routing::get,
    Router,
};
use once_cell::sync::Lazy;
use serde_json::json;
use std::{sync::Arc, time::Instant};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

mod config;
mod controllers;
mod db;
mod models;
mod routes;
mod state;
mod utils;

use config::{Config, StoreConfig};
use db::{memory_store::MemoryStore, mongo_store::MongoStore};
use state::AppState;

#[tokio::main]
async fn main() {
    Lazy::force(&START_TIME);

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app_state = match &config.store {
        StoreConfig::Mongo { uri, db_name } => match db::connection::init_db(uri, db_name).await {
            Ok(db) => {
                let store = Arc::new(MongoStore::new(db));
                AppState::new(store.clone(), store, config.missing_work_policy)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to initialize database");
                std::process::exit(1);
            }
        },
        StoreConfig::Memory => {
            tracing::warn!("using the in-memory store; data is lost on exit");
            let store = Arc::new(MemoryStore::new());
            AppState::new(store.clone(), store, config.missing_work_policy)
        }
    };

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
            axum::http::header::HeaderName::from_static("x-requested-with"),
        ]);

    let cors = match &config.cors_origin {
        Some(cors_origin) => {
            let origin = cors_origin.parse::<HeaderValue>().unwrap_or_else(|_| {
                tracing::error!(%cors_origin, "failed to parse CORS origin");
                std::process::exit(1);
            });
            cors.allow_origin(origin)
        }
        None => cors.allow_origin(Any),
    };

    let app = Router::new()
        .route("/", get(root))
        .merge(routes::app_router(app_state))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = match tokio::net::TcpListener::bind(config.server_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %config.server_addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!(
        addr = %config.server_addr,
        cors_origin = config.cors_origin.as_deref().unwrap_or("*"),
        "server running"
    );

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": format!("Backend is running! Uptime: {}", format_uptime(START_TIME.elapsed().as_secs()))
    }))
}

fn format_uptime(seconds: u64) -> String {
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{}d {}h {}m {}s", days, hours % 24, minutes % 60, seconds % 60)
    } else if hours > 0 {
        format!("{}h {}m {}s", hours, minutes % 60, seconds % 60)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}
