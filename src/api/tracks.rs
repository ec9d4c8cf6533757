use axum::{
    Json,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};

use crate::{api::authorize, error::Result, server::AppState, warning};

/// Popular tracks of the user's top artists, as an ordered array of URIs.
pub async fn top_artists_tracks(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response> {
    let token = match authorize(&state, &headers).await {
        Ok(token) => token,
        Err(redirect) => return Ok(redirect),
    };

    let uris = state
        .builder
        .discover(&token.access_token)
        .await
        .inspect_err(|e| warning!("Track discovery failed: {}", e))?;

    Ok(Json(uris).into_response())
}
