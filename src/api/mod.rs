//! # API Module
//!
//! HTTP endpoints of the tophits web service.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] - sends the browser to Spotify's consent screen and hands out
//!   the session cookie
//! - [`callback`] - OAuth redirect target; exchanges the authorization code
//!   for tokens and stores them in the session
//! - [`refresh_token`] - swaps the stored refresh token for a new access token
//!
//! ### Playlist
//!
//! - [`top_artists_tracks`] - popular tracks of the user's top artists, as URIs
//! - [`create_playlist`] - the whole pipeline: discovery, playlist creation and
//!   track insertion
//!
//! ### Misc
//!
//! - [`index`] - landing page with the login link
//! - [`health`] - status and version for monitoring
//!
//! ## Session Handling
//!
//! Protected endpoints consult the [`crate::management::TokenManager`] before
//! talking to Spotify. A session without tokens is redirected to `/login`, a
//! session with an expired access token to `/refresh_token`.

use axum::{
    http::{HeaderMap, StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};

use crate::{management::TokenStatus, server::AppState, types::Token, utils};

mod callback;
mod health;
mod index;
mod login;
mod playlist;
mod refresh;
mod tracks;

pub use callback::{CallbackParams, callback};
pub use health::health;
pub use index::index;
pub use login::login;
pub use playlist::create_playlist;
pub use refresh::refresh_token;
pub use tracks::top_artists_tracks;

/// A `302 Found` redirect to `location`.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}

/// Yields the session's token if it may be used, or the redirect to send instead.
async fn authorize(state: &AppState, headers: &HeaderMap) -> Result<Token, Response> {
    let session_id = utils::session_id_from_headers(headers);

    match state.tokens.check(session_id.as_deref()).await {
        TokenStatus::Valid(token) => Ok(token),
        TokenStatus::NeedsLogin => Err(found("/login")),
        TokenStatus::NeedsRefresh => Err(found("/refresh_token")),
    }
}
