//! HTTP API for planning events: events with their tasks, vendors, guests,
//! and a dashboard summary, all held in memory.

use std::path::Path;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir};

pub mod config;
pub mod dashboard;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod patch;
pub mod seed;
pub mod store;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use store::{PlannerStore, SharedStore};

use handlers::*;

/// Builds the API router. Paths outside `/api` are served from `static_dir`.
pub fn router(store: SharedStore, static_dir: impl AsRef<Path>) -> Router {
    let app = Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route(
            "/api/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/api/events/:id/tasks", post(add_task))
        .route("/api/events/:id/tasks/:task_id", put(update_task))
        .route("/api/vendors", get(list_vendors).post(create_vendor))
        .route("/api/guests", get(list_guests).post(create_guest))
        .route("/api/guests/:id", put(update_guest))
        .route("/api/dashboard/stats", get(dashboard_stats))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(CorsLayer::permissive());

    middleware::with_request_tracing(app).with_state(store)
}
