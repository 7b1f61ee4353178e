// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use thiserror::Error;

use super::storage::StorageFailure;

/// Message shown when no more specific one is available.
pub const FALLBACK_MESSAGE: &str = "Authentication failed. Please try again.";

/// Errors surfaced by the session client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected the email/password pair.
    #[error("{0}")]
    InvalidCredentials(String),

    /// The server refused the request for another client-side reason.
    #[error("request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The server failed to process the request.
    #[error("server error: {0}")]
    Server(String),

    #[error("request timed out")]
    RequestTimedOut,

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response: {0}")]
    InvalidResponse(String),

    #[error("session storage error: {0}")]
    Storage(#[from] StorageFailure),
}

impl ClientError {
    /// Message suitable for showing to the person logging in.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::InvalidCredentials(message)
            | ClientError::Rejected { message, .. }
            | ClientError::Server(message)
                if !message.is_empty() =>
            {
                message.clone()
            }
            _ => FALLBACK_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::RequestTimedOut
        } else if e.is_decode() {
            ClientError::InvalidResponse(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}
