use std::sync::Arc;

use crate::{
    error::Result,
    spotify::SpotifyApi,
    types::{CreatePlaylistRequest, PlaylistCreated, Track},
    utils, warning,
};

pub const PLAYLIST_NAME: &str = "Your Personalized Playlist";
pub const PLAYLIST_DESCRIPTION: &str = "Playlist created based on your top artists";
pub const PLAYLIST_CREATED_MESSAGE: &str = "Playlist Created Successfully";

const TOP_ARTISTS_TIME_RANGE: &str = "medium_term";
const TOP_ARTISTS_LIMIT: u32 = 10;

/// Turns a user's top artists into a playlist of their popular tracks.
#[derive(Clone)]
pub struct PlaylistBuilder {
    api: Arc<dyn SpotifyApi>,
    market: String,
    popularity_threshold: u32,
}

impl PlaylistBuilder {
    pub fn new(api: Arc<dyn SpotifyApi>, market: String, popularity_threshold: u32) -> Self {
        PlaylistBuilder {
            api,
            market,
            popularity_threshold,
        }
    }

    /// Collects the URIs of popular tracks by the user's top artists.
    ///
    /// Artists are visited one after another in the order Spotify ranks them,
    /// and each artist's tracks keep Spotify's order. A failing top-artists
    /// call aborts; a failing top-tracks call for one artist is logged and
    /// that artist contributes nothing.
    pub async fn discover(&self, token: &str) -> Result<Vec<String>> {
        let artists = self
            .api
            .top_artists(token, TOP_ARTISTS_TIME_RANGE, TOP_ARTISTS_LIMIT)
            .await
            .map_err(|e| e.context("Failed to fetch top artists"))?;

        let mut uris = Vec::new();
        for artist in &artists {
            let tracks: Result<Vec<Track>> = self
                .api
                .artist_top_tracks(token, &artist.id, &self.market)
                .await;

            match tracks {
                Ok(tracks) => {
                    uris.extend(utils::filter_popular_tracks(&tracks, self.popularity_threshold))
                }
                Err(e) => warning!(
                    "Skipping top tracks of artist {} ({}): {}",
                    artist.name,
                    artist.id,
                    e
                ),
            }
        }

        Ok(uris)
    }

    /// Runs discovery, creates the playlist under the current user and fills it.
    ///
    /// Tracks are submitted in one request. When discovery finds nothing the
    /// playlist is created empty and no insertion request is made.
    pub async fn build(&self, token: &str) -> Result<PlaylistCreated> {
        let uris = self.discover(token).await?;

        let user = self
            .api
            .current_user(token)
            .await
            .map_err(|e| e.context("Failed to fetch user profile"))?;

        let request = CreatePlaylistRequest {
            name: PLAYLIST_NAME.to_string(),
            description: PLAYLIST_DESCRIPTION.to_string(),
            public: true,
        };
        let playlist = self
            .api
            .create_playlist(token, &user.id, &request)
            .await
            .map_err(|e| e.context("Failed to create playlist"))?;

        if uris.is_empty() {
            warning!("No track passed the popularity threshold, playlist stays empty");
        } else {
            self.api
                .add_tracks(token, &playlist.id, &uris)
                .await
                .map_err(|e| e.context("Failed to add tracks to playlist"))?;
        }

        Ok(PlaylistCreated {
            message: PLAYLIST_CREATED_MESSAGE.to_string(),
            playlist_id: playlist.id,
        })
    }
}
