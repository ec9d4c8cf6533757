use axum::{
    Json,
    extract::{Query, State},
    http::{
        HeaderMap, StatusCode,
        header::{LOCATION, SET_COOKIE},
    },
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{server::AppState, success, utils, warning};

#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Moves the data under `old_id` to a new session id and returns that id.
async fn rotate_session(state: &AppState, old_id: &str) -> String {
    let new_id = utils::generate_session_id();
    let data = state.sessions.get(old_id).await.unwrap_or_default();
    state.sessions.remove(old_id).await;
    state.sessions.set(&new_id, data).await;
    new_id
}

fn bad_request(error: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": error }))).into_response()
}

/// OAuth redirect target.
///
/// A provider-reported error is echoed back as JSON and leaves the session
/// alone. Otherwise the `state` must match the one `/login` stored; the code is
/// then exchanged and the browser moves on to `/create-playlist`.
///
/// A successful sign-in moves the session to a freshly generated id and drops
/// the old one, so an id known before login never carries the token.
///
/// Exchange failures are answered with `502` rather than a redirect to
/// `/login`, which would bounce straight back here through the consent screen.
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Response {
    if let Some(error) = params.error {
        warning!("Authorization was not granted: {}", error);
        return Json(json!({ "error": error })).into_response();
    }

    let Some(code) = params.code else {
        return bad_request("missing_code");
    };

    let Some(session_id) = utils::session_id_from_headers(&headers) else {
        return bad_request("state_mismatch");
    };

    let Some(mut session) = state.sessions.get(&session_id).await else {
        return bad_request("state_mismatch");
    };

    // single use, whatever the outcome
    let expected = session.oauth_state.take();
    state.sessions.set(&session_id, session).await;
    if expected.is_none() || expected != params.state {
        return bad_request("state_mismatch");
    }

    match state.tokens.exchange_code(&session_id, &code).await {
        Ok(_) => {
            success!("Authorization code exchanged");
            let new_id = rotate_session(&state, &session_id).await;
            (
                StatusCode::FOUND,
                [
                    (LOCATION, "/create-playlist".to_string()),
                    (SET_COOKIE, utils::session_cookie(&new_id)),
                ],
            )
                .into_response()
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "Failed to exchange authorization code" })),
            )
                .into_response()
        }
    }
}
