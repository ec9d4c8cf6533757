//! # Spotify Integration Module
//!
//! The HTTP layer between tophits and Spotify. It covers the two halves of the
//! integration:
//!
//! - [`auth`] - the accounts service token endpoint (authorization-code
//!   exchange and refresh-token exchange)
//! - [`artists`] - top artists of the current user and an artist's top tracks
//! - [`playlist`] - current user profile, playlist creation and track insertion
//!
//! All calls go through [`SpotifyApi`], so the token lifecycle, the playlist
//! builder and the route handlers never see `reqwest` directly. [`SpotifyClient`]
//! is the real implementation; tests plug in their own.
//!
//! ## API Coverage
//!
//! - `POST /api/token` - token exchange and refresh
//! - `GET /me` - current user profile
//! - `GET /me/top/artists` - the user's top artists
//! - `GET /artists/{id}/top-tracks` - an artist's top tracks in a market
//! - `POST /users/{user_id}/playlists` - create a playlist
//! - `POST /playlists/{playlist_id}/tracks` - add tracks to a playlist
//!
//! ## Error Mapping
//!
//! - token endpoint failures of any kind become [`AppError::AuthExchange`]
//! - non-success statuses from the resource API become [`AppError::Upstream`]
//!   carrying the status code
//! - transport failures stay [`AppError::Http`]

use async_trait::async_trait;
use reqwest::{Client, Response, Url};

use crate::{
    config::Config,
    error::{AppError, Result},
    types::{Artist, CreatePlaylistRequest, Playlist, TokenGrant, Track, UserProfile},
};

pub mod artists;
pub mod auth;
pub mod playlist;

/// The slice of the Spotify Web API this service uses.
#[async_trait]
pub trait SpotifyApi: Send + Sync {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant>;

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenGrant>;

    async fn top_artists(&self, token: &str, time_range: &str, limit: u32) -> Result<Vec<Artist>>;

    async fn artist_top_tracks(&self, token: &str, artist_id: &str, market: &str)
    -> Result<Vec<Track>>;

    async fn current_user(&self, token: &str) -> Result<UserProfile>;

    async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<Playlist>;

    async fn add_tracks(&self, token: &str, playlist_id: &str, uris: &[String]) -> Result<()>;
}

/// `reqwest`-backed [`SpotifyApi`].
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    token_url: String,
    api_url: Url,
}

impl SpotifyClient {
    /// Builds a client with the configured endpoints, credentials and timeout.
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder().timeout(config.http_timeout).build()?;
        let api_url = Url::parse(&config.api_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| {
                AppError::Config(format!("SPOTIFY_API_URL is not a base URL: {}", config.api_url))
            })?;

        Ok(SpotifyClient {
            http,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            token_url: config.token_url.clone(),
            api_url,
        })
    }

    /// Appends `segments` to the API base, percent-encoding each one, so an id
    /// containing `/` or `?` stays a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Passes successful responses through and turns everything else into
/// [`AppError::Upstream`].
async fn expect_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    Err(AppError::upstream(
        status,
        format!("Spotify responded with {}", status),
    ))
}

#[async_trait]
impl SpotifyApi for SpotifyClient {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant> {
        self.exchange_code_for_token(code).await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenGrant> {
        self.refresh_access_token(refresh_token).await
    }

    async fn top_artists(&self, token: &str, time_range: &str, limit: u32) -> Result<Vec<Artist>> {
        self.get_top_artists(token, time_range, limit).await
    }

    async fn artist_top_tracks(
        &self,
        token: &str,
        artist_id: &str,
        market: &str,
    ) -> Result<Vec<Track>> {
        self.get_artist_top_tracks(token, artist_id, market).await
    }

    async fn current_user(&self, token: &str) -> Result<UserProfile> {
        self.get_current_user(token).await
    }

    async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<Playlist> {
        self.create_user_playlist(token, user_id, request).await
    }

    async fn add_tracks(&self, token: &str, playlist_id: &str, uris: &[String]) -> Result<()> {
        self.add_tracks_to_playlist(token, playlist_id, uris).await
    }
}
