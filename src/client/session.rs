// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client session state machine.
//!
//! ```text
//!            login ok / restore(unexpired)
//! LoggedOut ────────────────────────────────▶ LoggedIn
//!     ▲                                          │
//!     └──────── logout / restore(expired) ───────┘
//! ```

use chrono::Utc;
use serde::Deserialize;

use super::{AuthApi, ClientError, SessionStorage, TOKEN_KEY};
use crate::models::LoginRequest;

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn,
}

#[derive(Debug, Clone)]
struct ClientSession {
    token: String,
}

#[derive(Deserialize)]
struct ExpiryClaim {
    exp: i64,
}

/// Read `exp` without verifying the signature. Only the server verifies.
fn token_expiry(token: &str) -> Option<i64> {
    jsonwebtoken::dangerous::insecure_decode::<ExpiryClaim>(token)
        .ok()
        .map(|data| data.claims.exp)
}

/// Holds the current session and persists its token.
pub struct SessionClient<S, A> {
    storage: S,
    api: A,
    session: Option<ClientSession>,
}

impl<S: SessionStorage, A: AuthApi> SessionClient<S, A> {
    /// Create a logged-out client. Call [`restore`](Self::restore) to pick up
    /// a previously stored token.
    pub fn new(storage: S, api: A) -> Self {
        Self {
            storage,
            api,
            session: None,
        }
    }

    /// Load the stored token, if any, and enter LoggedIn when it has not
    /// expired. Expired or unreadable tokens are removed from storage.
    pub fn restore(&mut self) -> SessionState {
        self.session = None;

        let token = match self.storage.get(TOKEN_KEY) {
            Ok(Some(token)) => token,
            Ok(None) => return SessionState::LoggedOut,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored session");
                return SessionState::LoggedOut;
            }
        };

        match token_expiry(&token) {
            Some(exp) if exp > Utc::now().timestamp() => {
                self.session = Some(ClientSession { token });
                SessionState::LoggedIn
            }
            expiry => {
                tracing::info!(
                    expired = expiry.is_some(),
                    "Discarding stored session token"
                );
                self.discard_stored_token();
                SessionState::LoggedOut
            }
        }
    }

    /// Submit credentials. On success the token is stored and the session
    /// enters LoggedIn; on failure the session is left as it was.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ClientError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self.api.login(&request).await?;
        self.storage.set(TOKEN_KEY, &response.token)?;
        self.session = Some(ClientSession {
            token: response.token,
        });
        Ok(())
    }

    /// Clear the session and remove the stored token. Never fails.
    pub fn logout(&mut self) {
        self.session = None;
        self.discard_stored_token();
    }

    pub fn state(&self) -> SessionState {
        if self.session.is_some() {
            SessionState::LoggedIn
        } else {
            SessionState::LoggedOut
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.state() == SessionState::LoggedIn
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    /// `Authorization` header value for authenticated requests.
    pub fn authorization_header(&self) -> Option<String> {
        self.token().map(|token| format!("Bearer {token}"))
    }

    fn discard_stored_token(&self) {
        if let Err(e) = self.storage.remove(TOKEN_KEY) {
            tracing::warn!(error = %e, "Could not remove stored session token");
        }
    }
}
