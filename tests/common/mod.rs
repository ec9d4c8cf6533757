#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc, sync::Mutex};

use async_trait::async_trait;
use axum::{
    body::to_bytes,
    http::{
        HeaderMap, HeaderValue,
        header::{COOKIE, SET_COOKIE},
    },
    response::Response,
};
use serde_json::Value;

use tophits::{
    config::Config,
    error::{AppError, Result},
    management::{ManualClock, MemorySessionStore, SessionStore},
    server::AppState,
    spotify::SpotifyApi,
    types::{Artist, CreatePlaylistRequest, Playlist, SessionData, Token, TokenGrant, Track, UserProfile},
    utils::SESSION_COOKIE,
};

pub const NOW: f64 = 1_700_000_000.0;
pub const SESSION_IDLE_SECS: u64 = 3600;

pub fn grant(access: &str, refresh: Option<&str>, expires_in: u64) -> TokenGrant {
    TokenGrant {
        access_token: access.to_string(),
        refresh_token: refresh.map(str::to_string),
        expires_in,
        scope: None,
        token_type: Some("Bearer".to_string()),
    }
}

pub fn artist(id: &str) -> Artist {
    Artist {
        id: id.to_string(),
        name: format!("Artist {}", id),
    }
}

pub fn track(uri: &str, popularity: u32) -> Track {
    Track {
        uri: uri.to_string(),
        popularity,
        name: uri.to_string(),
    }
}

fn upstream(status: u16) -> AppError {
    AppError::Upstream {
        status,
        message: format!("Spotify responded with {}", status),
    }
}

/// Scripted stand-in for Spotify. `Err(status)` entries fail with that status.
pub struct FakeSpotify {
    pub exchange: std::result::Result<TokenGrant, u16>,
    pub refresh: std::result::Result<TokenGrant, u16>,
    pub top_artists: std::result::Result<Vec<Artist>, u16>,
    pub tracks: HashMap<String, std::result::Result<Vec<Track>, u16>>,
    pub user_id: String,
    pub playlist_id: String,
    pub current_user_status: Option<u16>,
    pub create_playlist_status: Option<u16>,
    pub add_tracks_status: u16,
    pub calls: Mutex<Vec<String>>,
    pub added: Mutex<Vec<(String, Vec<String>)>>,
    pub created: Mutex<Vec<(String, CreatePlaylistRequest)>>,
}

impl FakeSpotify {
    /// Two artists: `a1` with tracks A (80) and B (70), `a2` with track C (90).
    pub fn new() -> Self {
        let mut tracks = HashMap::new();
        tracks.insert(
            "a1".to_string(),
            Ok(vec![track("spotify:track:A", 80), track("spotify:track:B", 70)]),
        );
        tracks.insert("a2".to_string(), Ok(vec![track("spotify:track:C", 90)]));

        FakeSpotify {
            exchange: Ok(grant("T1", Some("R1"), 3600)),
            refresh: Ok(grant("T2", None, 3600)),
            top_artists: Ok(vec![artist("a1"), artist("a2")]),
            tracks,
            user_id: "user-1".to_string(),
            playlist_id: "pl-1".to_string(),
            current_user_status: None,
            create_playlist_status: None,
            add_tracks_status: 201,
            calls: Mutex::new(Vec::new()),
            added: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn added(&self) -> Vec<(String, Vec<String>)> {
        self.added.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpotifyApi for FakeSpotify {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant> {
        self.record(format!("exchange_code:{}", code));
        self.exchange
            .clone()
            .map_err(|status| AppError::AuthExchange {
                status: Some(status),
                message: "rejected".to_string(),
            })
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenGrant> {
        self.record(format!("refresh_token:{}", refresh_token));
        self.refresh
            .clone()
            .map_err(|status| AppError::AuthExchange {
                status: Some(status),
                message: "rejected".to_string(),
            })
    }

    async fn top_artists(&self, token: &str, time_range: &str, limit: u32) -> Result<Vec<Artist>> {
        self.record(format!("top_artists:{}:{}:{}", token, time_range, limit));
        self.top_artists.clone().map_err(upstream)
    }

    async fn artist_top_tracks(
        &self,
        token: &str,
        artist_id: &str,
        market: &str,
    ) -> Result<Vec<Track>> {
        self.record(format!("artist_top_tracks:{}:{}:{}", token, artist_id, market));
        self.tracks
            .get(artist_id)
            .cloned()
            .unwrap_or(Ok(Vec::new()))
            .map_err(upstream)
    }

    async fn current_user(&self, token: &str) -> Result<UserProfile> {
        self.record(format!("current_user:{}", token));
        if let Some(status) = self.current_user_status {
            return Err(upstream(status));
        }
        Ok(UserProfile {
            id: self.user_id.clone(),
            display_name: None,
        })
    }

    async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<Playlist> {
        self.record(format!("create_playlist:{}:{}", token, user_id));
        if let Some(status) = self.create_playlist_status {
            return Err(upstream(status));
        }
        self.created
            .lock()
            .unwrap()
            .push((user_id.to_string(), request.clone()));
        Ok(Playlist {
            id: self.playlist_id.clone(),
            name: request.name.clone(),
            description: Some(request.description.clone()),
            public: Some(request.public),
        })
    }

    async fn add_tracks(&self, token: &str, playlist_id: &str, uris: &[String]) -> Result<()> {
        self.record(format!("add_tracks:{}:{}", token, playlist_id));
        self.added
            .lock()
            .unwrap()
            .push((playlist_id.to_string(), uris.to_vec()));
        match self.add_tracks_status {
            200 | 201 => Ok(()),
            status => Err(upstream(status)),
        }
    }
}

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "SPOTIFY_API_AUTH_CLIENT_ID" => Some("client-id".to_string()),
        "SPOTIFY_API_AUTH_CLIENT_SECRET" => Some("client-secret".to_string()),
        "TOPHITS_TOKEN_SKEW_SECS" => Some("0".to_string()),
        _ => None,
    })
    .unwrap()
}

pub struct Harness {
    pub state: AppState,
    pub api: Arc<FakeSpotify>,
    pub sessions: Arc<MemorySessionStore>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new(api: FakeSpotify) -> Self {
        let api = Arc::new(api);
        let clock = Arc::new(ManualClock::new(NOW));
        let sessions = Arc::new(MemorySessionStore::new(clock.clone(), SESSION_IDLE_SECS));
        let state = AppState::new(
            test_config(),
            api.clone(),
            sessions.clone(),
            clock.clone(),
        );

        Harness {
            state,
            api,
            sessions,
            clock,
        }
    }

    /// Stores a token for `session_id` expiring `expires_in` seconds from now.
    pub async fn sign_in(&self, session_id: &str, expires_in: f64) {
        let data = SessionData {
            token: Some(Token {
                access_token: "T1".to_string(),
                refresh_token: "R1".to_string(),
                expires_at: NOW + expires_in,
            }),
            oauth_state: None,
        };
        self.sessions.set(session_id, data).await;
    }

    pub async fn token(&self, session_id: &str) -> Option<Token> {
        self.sessions.get(session_id).await.and_then(|s| s.token)
    }
}

pub fn cookie(session_id: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        COOKIE,
        HeaderValue::from_str(&format!("theme=dark; {}={}", SESSION_COOKIE, session_id)).unwrap(),
    );
    headers
}

pub fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// The session id a response hands to the browser, if any.
pub fn set_cookie_id(response: &Response) -> Option<String> {
    response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .and_then(|pair| pair.strip_prefix(&format!("{}=", SESSION_COOKIE)))
        .map(str::to_string)
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
