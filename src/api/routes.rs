//! API route configuration.

use crate::api::handlers::{
    create_link_handler, delete_link_handler, get_link_handler, list_links_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Link management routes, nested under `/api`.
///
/// # Endpoints
///
/// - `GET    /links`            - List all links
/// - `POST   /links`            - Create a short link
/// - `GET    /links/{hash_id}`  - Show a link without counting a view
/// - `DELETE /links/{hash_id}`  - Delete a link
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route(
            "/links/{hash_id}",
            get(get_link_handler).delete(delete_link_handler),
        )
}
