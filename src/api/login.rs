use axum::{
    extract::State,
    http::{
        HeaderMap, StatusCode,
        header::{LOCATION, SET_COOKIE},
    },
    response::{IntoResponse, Response},
};

use crate::{config, error::Result, server::AppState, types::SessionData, utils};

/// Redirects to the consent screen.
///
/// Reuses the browser's session only if this server issued it, otherwise starts
/// a new one, and remembers a fresh OAuth `state` in it for `/callback` to
/// verify. A cookie id the store has never seen is not adopted.
pub async fn login(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    let known = match utils::session_id_from_headers(&headers) {
        Some(id) => state.sessions.get(&id).await.map(|session| (id, session)),
        None => None,
    };
    let (session_id, mut session) =
        known.unwrap_or_else(|| (utils::generate_session_id(), SessionData::default()));

    let oauth_state = utils::generate_oauth_state();

    let auth_url = utils::build_authorize_url(
        &state.config.auth_url,
        &state.config.client_id,
        &state.config.redirect_uri,
        config::SCOPE,
        &oauth_state,
    )?;

    session.oauth_state = Some(oauth_state);
    state.sessions.set(&session_id, session).await;

    Ok((
        StatusCode::FOUND,
        [
            (LOCATION, auth_url),
            (SET_COOKIE, utils::session_cookie(&session_id)),
        ],
    )
        .into_response())
}
