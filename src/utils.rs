use axum::http::{HeaderMap, header::COOKIE};
use rand::{Rng, distr::Alphanumeric};
use reqwest::Url;

use crate::{
    error::{AppError, Result},
    types::Track,
};

pub const SESSION_COOKIE: &str = "tophits_session";

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn generate_session_id() -> String {
    random_alphanumeric(48)
}

pub fn generate_oauth_state() -> String {
    random_alphanumeric(24)
}

/// URIs of the tracks whose popularity is strictly above `threshold`, in order.
pub fn filter_popular_tracks(tracks: &[Track], threshold: u32) -> Vec<String> {
    tracks
        .iter()
        .filter(|track| track.popularity > threshold)
        .map(|track| track.uri.clone())
        .collect()
}

/// Builds the consent screen URL the browser is sent to by `/login`.
pub fn build_authorize_url(
    auth_url: &str,
    client_id: &str,
    redirect_uri: &str,
    scope: &str,
    state: &str,
) -> Result<String> {
    let url = Url::parse_with_params(
        auth_url,
        &[
            ("client_id", client_id),
            ("response_type", "code"),
            ("scope", scope),
            ("redirect_uri", redirect_uri),
            ("state", state),
        ],
    )
    .map_err(|e| AppError::Config(format!("invalid authorization URL {}: {}", auth_url, e)))?;

    Ok(url.to_string())
}

/// Finds the session id in the `Cookie` headers of a request.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// `Set-Cookie` value binding the browser to `session_id`.
pub fn session_cookie(session_id: &str) -> String {
    format!(
        "{name}={id}; Path=/; HttpOnly; SameSite=Lax",
        name = SESSION_COOKIE,
        id = session_id
    )
}
