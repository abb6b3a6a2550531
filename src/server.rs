//! HTTP server and routes.

mod handlers;
mod state;

pub use state::AppState;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/books", get(handlers::api_books))
        .route("/stats", get(handlers::api_stats));

    Router::new()
        .route("/", get(handlers::index))
        .route("/best", get(handlers::list_best))
        .route("/newest", get(handlers::list_newest))
        .route("/oldest", get(handlers::list_oldest))
        .route("/find-page", get(handlers::find_page))
        .route("/find-book", post(handlers::find_book))
        .route("/add-page", post(handlers::add_page))
        .route("/add-book", post(handlers::add_book))
        .route("/edit-page", post(handlers::edit_page))
        .route("/edit-book", post(handlers::edit_book))
        .route("/delete-book", post(handlers::delete_book))
        .route("/search-book", post(handlers::search_book))
        .route("/read-page", post(handlers::read_page))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
