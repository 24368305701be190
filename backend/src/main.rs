use dotenvy::dotenv;
use axum::{
    routing::{get, post},
    Json, Router,
};
use axum::http::{HeaderValue, Method};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::EnvFilter;

mod handlers {
    pub mod client_ip;
    pub mod contact_handlers;
}
mod config;
mod contact;
mod error;
mod rate_limit;
mod telegram;

use config::Config;
use handlers::contact_handlers;
use rate_limit::RateLimiter;
use telegram::{LeadNotifier, TelegramNotifier};

pub struct AppState {
    pub rate_limiter: Arc<RateLimiter>,
    pub notifier: Arc<dyn LeadNotifier>,
}

#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    pub static_dir: Option<PathBuf>,
    pub cors_origin: Option<String>,
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub fn app(state: Arc<AppState>, options: &RouterOptions) -> Router {
    let allow_origin = match options
        .cors_origin
        .as_deref()
        .and_then(|o| HeaderValue::from_str(o).ok())
    {
        Some(origin) => AllowOrigin::exact(origin),
        None => AllowOrigin::from(Any),
    };

    let mut router = Router::new()
        .route("/api/health", get(health_check))
        .route("/api/contact", post(contact_handlers::submit_contact))
        .with_state(state);

    // Everything that isn't an API route belongs to the compiled frontend.
    if let Some(dir) = &options.static_dir {
        let index = dir.join("index.html");
        router = router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
    }

    router
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_origin(allow_origin)
                .allow_headers([axum::http::header::CONTENT_TYPE]),
        )
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let _sentry_guard = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let notifier = TelegramNotifier::new(config.telegram.clone(), config.site_url.clone())?;
    let state = Arc::new(AppState {
        rate_limiter: Arc::new(RateLimiter::new(config.rate_limit)),
        notifier: Arc::new(notifier),
    });

    let options = RouterOptions {
        static_dir: Some(config.static_dir.clone()),
        cors_origin: config.cors_origin.clone().or_else(|| config.site_url.clone()),
    };
    let app = app(state, &options);

    tracing::info!(
        "Rate limit: {} requests per {} seconds per client",
        config.rate_limit.max_requests,
        config.rate_limit.window.as_secs()
    );
    tracing::info!("Serving frontend from {}", config.static_dir.display());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Listening on http://{}", config.bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}
