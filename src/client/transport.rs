// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transport between the session client and the authentication endpoint.

use std::{future::Future, time::Duration};

use reqwest::StatusCode;
use serde::Deserialize;

use super::ClientError;
use crate::models::{LoginRequest, LoginResponse};

/// Upper bound on a login round trip.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const LOGIN_PATH: &str = "/api/auth/login";

/// Submits credentials to the Authentication Service.
pub trait AuthApi: Send + Sync {
    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = Result<LoginResponse, ClientError>> + Send;
}

/// `AuthApi` over HTTP(S) with reqwest.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: reqwest::Client,
    base_url: String,
}

/// Error code the server attaches to rejected credentials.
const INVALID_CREDENTIALS_CODE: &str = "invalid_credentials";

#[derive(Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    error_code: String,
}

impl HttpAuthApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl AuthApi for HttpAuthApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        let url = format!("{}{}", self.base_url, LOGIN_PATH);
        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<LoginResponse>().await?);
        }

        // Non-JSON bodies (e.g. extractor rejections) leave both fields empty.
        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        let message = body.message;

        tracing::debug!(status = status.as_u16(), error_code = %body.error_code, "Login request rejected");

        Err(match status {
            StatusCode::BAD_REQUEST if body.error_code == INVALID_CREDENTIALS_CODE => {
                ClientError::InvalidCredentials(message)
            }
            s if s.is_server_error() => ClientError::Server(message),
            s => ClientError::Rejected {
                status: s.as_u16(),
                message,
            },
        })
    }
}
