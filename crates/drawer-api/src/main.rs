//! drawer-api - HTTP API server for Drawer

mod handlers;
mod middleware;
mod services;
mod uploads;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, services::ServeDir,
    trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use drawer_core::{defaults, GenerationBackend};
use drawer_db::{seed_database, Database};
use drawer_inference::GeminiBackend;

use handlers::{
    calendar::get_calendar_events,
    chat::{clear_messages, get_messages, ghost_message, send_message},
    documents::{delete_document, get_document, list_documents, upload_document},
    notes::{create_note, delete_note, list_notes, update_note},
    stats::{get_monthly_flow, get_stats, get_storage_by_category},
};
use services::GhostFeed;
use uploads::UploadStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    /// Generation backend (opaque external capability).
    pub ai: Arc<dyn GenerationBackend>,
    /// On-disk upload store.
    pub uploads: Arc<UploadStore>,
    /// Simulated-event feed state (last-choice index).
    pub ghost: Arc<Mutex<GhostFeed>>,
    /// Shared password; `None` disables the auth gate.
    pub password: Option<String>,
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    Core(drawer_core::Error),
    Unauthorized(String),
    NotFound(String),
    BadRequest(String),
}

impl From<drawer_core::Error> for ApiError {
    fn from(err: drawer_core::Error) -> Self {
        match err {
            drawer_core::Error::NotFound(msg) => ApiError::NotFound(msg),
            drawer_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            drawer_core::Error::Unauthorized(msg) => ApiError::Unauthorized(msg),
            other => ApiError::Core(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Core(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

// =============================================================================
// STARTUP
// =============================================================================

/// Initialize tracing with configurable output.
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional, enables file logging)
///   LOG_ANSI    - "true"/"false" override ANSI colors
///   RUST_LOG    - standard env filter (default: "drawer_api=debug,tower_http=debug")
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "drawer_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("drawer-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false), // no ANSI in files
                )
                .init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    }
}

/// Build the application router.
fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/documents", get(list_documents))
        .route(
            "/api/documents/:id",
            get(get_document).delete(delete_document),
        )
        .route("/api/upload", post(upload_document))
        .route("/api/stats", get(get_stats))
        .route("/api/stats/monthly-flow", get(get_monthly_flow))
        .route("/api/stats/storage", get(get_storage_by_category))
        .route("/api/notes", get(list_notes).post(create_note))
        .route("/api/notes/:id", patch(update_note).delete(delete_note))
        .route(
            "/api/chat/messages",
            get(get_messages).delete(clear_messages),
        )
        .route("/api/chat/send", post(send_message))
        .route("/api/chat/ghost", post(ghost_message))
        .route("/api/calendar", get(get_calendar_events))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_password,
        ));

    // 10 MB uploads plus multipart framing slack.
    let body_limit = defaults::MAX_UPLOAD_BYTES as usize + 1024 * 1024;
    let upload_dir = state.uploads.dir().to_path_buf();

    Router::new()
        .merge(api)
        .route("/health", get(health))
        .nest_service(defaults::UPLOAD_URL_PREFIX, ServeDir::new(upload_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let _log_guard = init_tracing();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL is not set"))?;

    let db = Database::connect(&database_url).await?;
    db.migrate().await?;
    seed_database(&db).await?;

    let uploads = UploadStore::new(defaults::UPLOAD_DIR);
    uploads.ensure_ready().await?;

    let ai = GeminiBackend::from_env()?;
    info!(
        subsystem = "api",
        model = ai.model_name(),
        "generation backend ready"
    );

    let state = AppState {
        db,
        ai: Arc::new(ai),
        uploads: Arc::new(uploads),
        ghost: Arc::new(Mutex::new(GhostFeed::new())),
        password: std::env::var("DRAWER_PASSWORD").ok().filter(|p| !p.is_empty()),
    };

    let app = build_router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(defaults::SERVER_PORT);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!(subsystem = "api", %addr, "Drawer API listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
