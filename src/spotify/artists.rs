use crate::{
    error::Result,
    types::{Artist, ArtistTopTracksResponse, TopArtistsResponse, Track},
};

use super::{SpotifyClient, expect_success};

impl SpotifyClient {
    /// Retrieves the current user's top artists.
    ///
    /// # Arguments
    ///
    /// * `token` - Valid access token with the `user-top-read` scope
    /// * `time_range` - `short_term`, `medium_term` or `long_term`
    /// * `limit` - Maximum number of artists to return (1-50)
    ///
    /// # Errors
    ///
    /// A non-success status is returned as [`crate::error::AppError::Upstream`]
    /// with that status; network failures as [`crate::error::AppError::Http`].
    pub async fn get_top_artists(
        &self,
        token: &str,
        time_range: &str,
        limit: u32,
    ) -> Result<Vec<Artist>> {
        let limit = limit.to_string();
        let response = self
            .http
            .get(self.endpoint(&["me", "top", "artists"]))
            .bearer_auth(token)
            .query(&[("time_range", time_range), ("limit", limit.as_str())])
            .send()
            .await?;

        let res = expect_success(response)
            .await?
            .json::<TopArtistsResponse>()
            .await?;

        Ok(res.items)
    }

    /// Retrieves an artist's top tracks in the given market, in Spotify's order.
    pub async fn get_artist_top_tracks(
        &self,
        token: &str,
        artist_id: &str,
        market: &str,
    ) -> Result<Vec<Track>> {
        let response = self
            .http
            .get(self.endpoint(&["artists", artist_id, "top-tracks"]))
            .bearer_auth(token)
            .query(&[("market", market)])
            .send()
            .await?;

        let res = expect_success(response)
            .await?
            .json::<ArtistTopTracksResponse>()
            .await?;

        Ok(res.tracks)
    }
}
