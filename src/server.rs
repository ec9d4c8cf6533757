use axum::{Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};

use crate::{
    api,
    config::Config,
    error::{AppError, Result},
    info,
    management::{Clock, MemorySessionStore, PlaylistBuilder, SessionStore, SystemClock, TokenManager},
    spotify::{SpotifyApi, SpotifyClient},
};

/// Everything a request handler needs, injected through axum's `State`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<dyn SessionStore>,
    pub tokens: TokenManager,
    pub builder: PlaylistBuilder,
}

impl AppState {
    pub fn new(
        config: Config,
        api: Arc<dyn SpotifyApi>,
        sessions: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let tokens = TokenManager::new(
            Arc::clone(&sessions),
            clock,
            Arc::clone(&api),
            config.token_skew,
        );
        let builder = PlaylistBuilder::new(api, config.market.clone(), config.popularity_threshold);

        AppState {
            config: Arc::new(config),
            sessions,
            tokens,
            builder,
        }
    }

    /// Production wiring: real Spotify client, in-memory sessions, wall clock.
    pub fn from_config(config: Config) -> Result<Self> {
        let api = Arc::new(SpotifyClient::new(&config)?);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let sessions = Arc::new(MemorySessionStore::new(
            Arc::clone(&clock),
            config.session_idle_secs,
        ));
        Ok(Self::new(config, api, sessions, clock))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/health", get(api::health))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/refresh_token", get(api::refresh_token))
        .route("/top-artists-tracks", get(api::top_artists_tracks))
        .route("/create-playlist", get(api::create_playlist))
        .with_state(state)
}

pub fn parse_addr(addr: &str) -> Result<SocketAddr> {
    SocketAddr::from_str(addr)
        .map_err(|e| AppError::Config(format!("Failed to parse server address {}: {}", addr, e)))
}

/// Binds `addr` and serves until the process is stopped.
pub async fn start_api_server(state: AppState, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
