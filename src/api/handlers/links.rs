//! Handlers for link management endpoints (create, list, show, delete).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, LinkListResponse, LinkResponse};
use crate::domain::entities::Link;
use crate::error::AppError;
use crate::state::AppState;

fn to_response(state: &AppState, link: Link) -> LinkResponse {
    let short_url = state.link_service.short_url(&state.base_url, &link.hash_id);
    LinkResponse::from_link(link, short_url)
}

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// { "url": "http://example.com", "hash_id": "my-link" }
/// ```
///
/// `hash_id` is optional; without it the id is derived from the URL.
///
/// # Errors
///
/// - 400 Bad Request if validation fails
/// - 409 Conflict if the backend refuses an existing short id
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_link(payload.url, payload.hash_id)
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(&state, link))))
}

/// Lists every stored link.
///
/// # Endpoint
///
/// `GET /api/links`
pub async fn list_links_handler(
    State(state): State<AppState>,
) -> Result<Json<LinkListResponse>, AppError> {
    let links = state.link_service.list_links().await?;

    let items: Vec<LinkResponse> = links
        .into_iter()
        .map(|link| to_response(&state, link))
        .collect();

    Ok(Json(LinkListResponse {
        total: items.len(),
        items,
    }))
}

/// Shows a link and its view counter without counting a visit.
///
/// # Endpoint
///
/// `GET /api/links/{hash_id}`
///
/// # Errors
///
/// Returns 404 Not Found if the short id doesn't exist.
pub async fn get_link_handler(
    Path(hash_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get_link(&hash_id).await?;
    Ok(Json(to_response(&state, link)))
}

/// Deletes a link.
///
/// # Endpoint
///
/// `DELETE /api/links/{hash_id}`
///
/// # Response Codes
///
/// - **204 No Content**: Link removed
/// - **404 Not Found**: Nothing to remove
pub async fn delete_link_handler(
    Path(hash_id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete_link(&hash_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
