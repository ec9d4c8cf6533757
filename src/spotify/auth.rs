use reqwest::Response;

use crate::{
    error::{AppError, Result},
    types::TokenGrant,
};

use super::SpotifyClient;

impl SpotifyClient {
    /// Exchanges an authorization code for an access and refresh token.
    ///
    /// Sends the code together with the redirect URI and the client
    /// credentials to the token endpoint using the `authorization_code` grant.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AuthExchange`] when the request cannot be sent, the
    /// endpoint answers with a non-success status, the body is not a token
    /// response, or the response carries no refresh token.
    pub async fn exchange_code_for_token(&self, code: &str) -> Result<TokenGrant> {
        let res = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::auth_exchange(e.status(), e.to_string()))?;

        let grant = read_grant(res).await?;
        if grant.refresh_token.is_none() {
            return Err(AppError::auth_exchange(
                None,
                "token response did not include a refresh token",
            ));
        }

        Ok(grant)
    }

    /// Exchanges a refresh token for a fresh access token.
    ///
    /// Spotify may rotate the refresh token; the returned grant carries the new
    /// one in that case and `None` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AuthExchange`] under the same conditions as
    /// [`SpotifyClient::exchange_code_for_token`], minus the refresh token check.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenGrant> {
        let res = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::auth_exchange(e.status(), e.to_string()))?;

        read_grant(res).await
    }
}

async fn read_grant(res: Response) -> Result<TokenGrant> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(AppError::auth_exchange(
            Some(status),
            format!("token endpoint responded with {}: {}", status, body),
        ));
    }

    res.json::<TokenGrant>()
        .await
        .map_err(|e| AppError::auth_exchange(Some(status), format!("malformed token response: {}", e)))
}
