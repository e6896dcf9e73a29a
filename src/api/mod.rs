mod error;
mod handlers;

pub use error::ApiError;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::db::Database;
use crate::files::{FileStore, MAX_UPLOAD_BYTES};

/// Shared state injected into every handler: the database and the file
/// store, both cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub files: FileStore,
}

pub fn create_router(db: Database, files: FileStore) -> Router {
    let uploads = ServeDir::new(files.root());
    let state = AppState { db, files };

    let api = Router::new()
        // Ideas
        .route("/ideas", get(handlers::list_ideas))
        .route("/ideas", post(handlers::create_idea))
        .route("/ideas/{id}", get(handlers::get_idea))
        .route("/ideas/{id}/vote", post(handlers::vote_idea))
        .route("/ideas/{id}/downvote", post(handlers::downvote_idea))
        // Notes
        .route("/ideas/{id}/notes", post(handlers::add_note))
        // Attachments
        .route("/ideas/{id}/attachments", post(handlers::add_attachments))
        .route("/attachments/{id}", get(handlers::download_attachment))
        // Aggregates
        .route("/stats", get(handlers::stats))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api)
        .nest_service("/uploads", uploads)
        // Bounds the whole request body. The 10 MiB limit is per file and
        // enforced per part in the handlers, so leave room for several
        // maximum-size files plus multipart framing.
        .layer(DefaultBodyLimit::max(16 * MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
