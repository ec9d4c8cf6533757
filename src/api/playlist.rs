use axum::{
    Json,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};

use crate::{api::authorize, error::Result, server::AppState, success, warning};

/// Builds the personalized playlist and answers with its id.
pub async fn create_playlist(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    let token = match authorize(&state, &headers).await {
        Ok(token) => token,
        Err(redirect) => return Ok(redirect),
    };

    let created = state
        .builder
        .build(&token.access_token)
        .await
        .inspect_err(|e| warning!("Playlist creation failed: {}", e))?;

    success!("Playlist {} created", created.playlist_id);
    Ok(Json(created).into_response())
}
