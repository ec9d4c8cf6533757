use crate::{
    error::{AppError, Result},
    types::{AddTrackToPlaylistRequest, CreatePlaylistRequest, Playlist, UserProfile},
};

use super::{SpotifyClient, expect_success};

impl SpotifyClient {
    pub async fn get_current_user(&self, token: &str) -> Result<UserProfile> {
        let response = self
            .http
            .get(self.endpoint(&["me"]))
            .bearer_auth(token)
            .send()
            .await?;

        Ok(expect_success(response).await?.json::<UserProfile>().await?)
    }

    /// Creates a playlist owned by `user_id`.
    pub async fn create_user_playlist(
        &self,
        token: &str,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<Playlist> {
        let response = self
            .http
            .post(self.endpoint(&["users", user_id, "playlists"]))
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;

        Ok(expect_success(response).await?.json::<Playlist>().await?)
    }

    /// Appends `uris` to a playlist in a single request.
    ///
    /// Only `200 OK` and `201 Created` count as success; any other status is
    /// reported as [`AppError::Upstream`] with that status.
    pub async fn add_tracks_to_playlist(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<()> {
        let body = AddTrackToPlaylistRequest {
            uris: uris.to_vec(),
        };

        let response = self
            .http
            .post(self.endpoint(&["playlists", playlist_id, "tracks"]))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() != 200 && status.as_u16() != 201 {
            return Err(AppError::upstream(
                status,
                format!("Spotify responded with {}", status),
            ));
        }

        Ok(())
    }
}
