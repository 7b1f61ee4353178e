// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Message returned for every failed credential check.
///
/// Unknown emails and wrong passwords share it so responses do not reveal
/// which emails are registered.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Message returned for infrastructure failures. Details go to the log only.
pub const UNAVAILABLE_MESSAGE: &str =
    "Authentication is temporarily unavailable. Please try again later.";

/// Authentication error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Email not registered or password does not match
    InvalidCredentials,
    /// Registration input failed validation (one message per field)
    InvalidRegistration(Vec<String>),
    /// Registration email already has an account
    EmailTaken,
    /// No authorization header present
    MissingAuthHeader,
    /// Invalid authorization header format
    InvalidAuthHeader,
    /// Token is malformed
    MalformedToken,
    /// Token signature is invalid
    InvalidSignature,
    /// Token has expired
    TokenExpired,
    /// Token subject no longer has a credential record
    UnknownSubject,
    /// Credential store could not be read or written
    StoreUnavailable(String),
    /// Token could not be signed (missing secret or encoder failure)
    SigningError(String),
    /// Internal error
    InternalError(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    message: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::InvalidRegistration(_) => "invalid_registration",
            AuthError::EmailTaken => "email_taken",
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::UnknownSubject => "unknown_subject",
            AuthError::StoreUnavailable(_) => "store_unavailable",
            AuthError::SigningError(_) => "signing_error",
            AuthError::InternalError(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials | AuthError::InvalidRegistration(_) => {
                StatusCode::BAD_REQUEST
            }
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::UnknownSubject => StatusCode::UNAUTHORIZED,
            AuthError::StoreUnavailable(_)
            | AuthError::SigningError(_)
            | AuthError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this is an infrastructure failure rather than a client mistake.
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Message safe to show to the end user.
    pub fn public_message(&self) -> String {
        if self.is_server_error() {
            UNAVAILABLE_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::InvalidCredentials => f.write_str(INVALID_CREDENTIALS_MESSAGE),
            AuthError::InvalidRegistration(problems) => write!(f, "{}", problems.join("; ")),
            AuthError::EmailTaken => write!(f, "An account with this email already exists"),
            AuthError::MissingAuthHeader => write!(f, "Authorization header is required"),
            AuthError::InvalidAuthHeader => {
                write!(f, "Invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::MalformedToken => write!(f, "Token is malformed"),
            AuthError::InvalidSignature => write!(f, "Token signature is invalid"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::UnknownSubject => write!(f, "Token does not belong to a known account"),
            AuthError::StoreUnavailable(msg) => write!(f, "Credential store unavailable: {msg}"),
            AuthError::SigningError(msg) => write!(f, "Token signing failed: {msg}"),
            AuthError::InternalError(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if self.is_server_error() {
            tracing::error!(error_code = self.error_code(), error = %self, "Authentication failure");
        }
        let body = Json(AuthErrorBody {
            message: self.public_message(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(error: AuthError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body_bytes).unwrap())
    }

    #[tokio::test]
    async fn invalid_credentials_returns_400_with_message() {
        let (status, body) = body_of(AuthError::InvalidCredentials).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], INVALID_CREDENTIALS_MESSAGE);
        assert_eq!(body["error_code"], "invalid_credentials");
    }

    #[tokio::test]
    async fn store_failure_hides_details() {
        let (status, body) =
            body_of(AuthError::StoreUnavailable("disk /dev/sda1 on fire".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], UNAVAILABLE_MESSAGE);
        assert!(!body.to_string().contains("sda1"));
    }

    #[tokio::test]
    async fn missing_auth_returns_401() {
        let (status, body) = body_of(AuthError::MissingAuthHeader).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error_code"], "missing_auth_header");
    }

    #[test]
    fn registration_problems_are_joined() {
        let error = AuthError::InvalidRegistration(vec![
            "Username is required".into(),
            "Password too weak".into(),
        ]);
        assert_eq!(error.to_string(), "Username is required; Password too weak");
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::EmailTaken.status_code(), StatusCode::CONFLICT);
    }
}
