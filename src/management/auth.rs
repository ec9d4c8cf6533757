use std::sync::Arc;

use crate::{
    error::{AppError, Result},
    spotify::SpotifyApi,
    types::{Token, TokenGrant},
};

use super::{Clock, SessionStore};

/// Outcome of [`TokenManager::check`].
#[derive(Debug, Clone, PartialEq)]
pub enum TokenStatus {
    Valid(Token),
    NeedsLogin,
    NeedsRefresh,
}

/// Owns the token triple of every session: judges freshness, and writes the
/// results of code exchanges and refreshes back into the session store.
#[derive(Clone)]
pub struct TokenManager {
    sessions: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    api: Arc<dyn SpotifyApi>,
    skew: f64,
}

impl TokenManager {
    /// `skew_secs` is shaved off every token lifetime when judging freshness.
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
        api: Arc<dyn SpotifyApi>,
        skew_secs: u64,
    ) -> Self {
        TokenManager {
            sessions,
            clock,
            api,
            skew: skew_secs as f64,
        }
    }

    /// Tells a caller whether it may use the session's access token.
    pub async fn check(&self, session_id: Option<&str>) -> TokenStatus {
        let Some(id) = session_id else {
            return TokenStatus::NeedsLogin;
        };

        match self.sessions.get(id).await.and_then(|s| s.token) {
            None => TokenStatus::NeedsLogin,
            Some(token) if self.is_expired(&token) => TokenStatus::NeedsRefresh,
            Some(token) => TokenStatus::Valid(token),
        }
    }

    fn is_expired(&self, token: &Token) -> bool {
        self.clock.now() + self.skew > token.expires_at
    }

    fn expires_at(&self, grant: &TokenGrant) -> f64 {
        self.clock.now() + grant.expires_in as f64
    }

    /// Trades an authorization code for tokens and stores them in the session.
    ///
    /// The session is left untouched when the exchange fails.
    pub async fn exchange_code(&self, session_id: &str, code: &str) -> Result<Token> {
        let grant = self.api.exchange_code(code).await?;
        let expires_at = self.expires_at(&grant);
        let refresh_token = grant.refresh_token.ok_or_else(|| {
            AppError::auth_exchange(None, "token response did not include a refresh token")
        })?;

        let token = Token {
            access_token: grant.access_token,
            refresh_token,
            expires_at,
        };

        let mut session = self.sessions.get(session_id).await.unwrap_or_default();
        session.token = Some(token.clone());
        self.sessions.set(session_id, session).await;

        Ok(token)
    }

    /// Obtains a new access token with the session's refresh token.
    ///
    /// The stored refresh token is kept unless Spotify hands out a new one. A
    /// failed refresh drops the token from the session so the next request
    /// starts over at `/login`.
    ///
    /// # Errors
    ///
    /// [`AppError::SessionMissing`] when the session holds no refresh token,
    /// otherwise whatever the token endpoint reported.
    pub async fn refresh(&self, session_id: Option<&str>) -> Result<Token> {
        let id = session_id.ok_or(AppError::SessionMissing)?;
        let mut session = self.sessions.get(id).await.ok_or(AppError::SessionMissing)?;
        let current = session.token.clone().ok_or(AppError::SessionMissing)?;

        match self.api.refresh_token(&current.refresh_token).await {
            Ok(grant) => {
                let expires_at = self.expires_at(&grant);
                let token = Token {
                    access_token: grant.access_token,
                    refresh_token: grant.refresh_token.unwrap_or(current.refresh_token),
                    expires_at,
                };
                session.token = Some(token.clone());
                self.sessions.set(id, session).await;
                Ok(token)
            }
            Err(e) => {
                session.token = None;
                self.sessions.set(id, session).await;
                Err(e)
            }
        }
    }
}
