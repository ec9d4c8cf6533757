use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};

use crate::{api::found, error::AppError, server::AppState, success, utils, warning};

/// Refreshes the session's access token and resumes at `/create-playlist`.
///
/// Without a stored refresh token, or when Spotify rejects it, the browser is
/// sent to `/login`.
pub async fn refresh_token(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session_id = utils::session_id_from_headers(&headers);

    match state.tokens.refresh(session_id.as_deref()).await {
        Ok(_) => {
            success!("Access token refreshed");
            found("/create-playlist")
        }
        Err(AppError::SessionMissing) => found("/login"),
        Err(e) => {
            warning!("Refreshing the access token failed: {}", e);
            e.into_response()
        }
    }
}
