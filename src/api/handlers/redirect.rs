//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short id to its original URL.
///
/// # Endpoint
///
/// `GET /{hash_id}`
///
/// Each successful redirect counts one view on the stored link and answers
/// 307 Temporary Redirect.
///
/// # Errors
///
/// Returns 404 Not Found if the short id doesn't exist.
/// Returns 500 if the stored URL cannot be sent as a `Location` header; no
/// view is counted then.
pub async fn redirect_handler(
    Path(hash_id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let link = state.link_service.get_link(&hash_id).await?;

    let location = HeaderValue::from_str(&link.url).map_err(|_| {
        AppError::internal(
            "Stored URL is not a valid redirect target",
            json!({ "hash_id": hash_id }),
        )
    })?;

    let link = state.link_service.count_view(link).await?;

    debug!("Redirecting {} -> {}", hash_id, link.url);
    Ok((StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]))
}
