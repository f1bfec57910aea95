use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod ownership;
pub mod query;
pub mod store;

use config::{AppConfig, StoreBackend};
use store::{MemoryStore, PgStore, StoreError, TaskStore, UserStore};

/// Shared handler state: the injected store traits.
#[derive(Clone)]
pub struct AppState {
    pub tasks: Arc<dyn TaskStore>,
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    pub async fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        match config.store {
            StoreBackend::Postgres => {
                let store = Arc::new(PgStore::connect(config).await?);
                Ok(Self { tasks: store.clone(), users: store })
            }
            StoreBackend::Memory => {
                let store = Arc::new(MemoryStore::new());
                Ok(Self { tasks: store.clone(), users: store })
            }
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes
        .merge(auth_public_routes())
        // Protected API
        .merge(auth_protected_routes())
        .merge(task_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

fn auth_protected_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/auth/me", get(auth::me))
        .route_layer(axum::middleware::from_fn(middleware::jwt_auth_middleware))
}

fn task_routes() -> Router<AppState> {
    use handlers::tasks;

    Router::new()
        // Collection operations
        .route("/tasks", get(tasks::list).post(tasks::create))
        // Aggregation before the id route so "stats" is not read as an id
        .route("/tasks/stats", get(tasks::stats))
        // Single-record operations
        .route(
            "/tasks/:id",
            get(tasks::get_one).put(tasks::update).delete(tasks::delete),
        )
        .route_layer(axum::middleware::from_fn(middleware::jwt_auth_middleware))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Task API (Rust)",
            "version": version,
            "description": "Multi-user task-list backend API built with Rust (Axum)",
            "endpoints": {
                "health": "/health (public)",
                "auth": "/auth/register, /auth/login (public), /auth/me (protected)",
                "tasks": "/tasks, /tasks/stats, /tasks/:id (protected)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.tasks.ping().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "message": "store unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "store_error": e.to_string()
                }
            })),
        ),
    }
}
