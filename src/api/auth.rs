// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication endpoints.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    auth::{Auth, AuthError, AuthService, AuthenticatedUser},
    models::{AccountResponse, LoginRequest, LoginResponse, RegisterRequest},
    state::AppState,
};

/// Response for GET /api/auth/me
#[derive(Debug, Serialize, ToSchema)]
pub struct UserMeResponse {
    /// Credential record id (the token subject)
    pub user_id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Token expiry (unix seconds)
    pub expires_at: i64,
}

impl From<AuthenticatedUser> for UserMeResponse {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email,
            username: user.username,
            expires_at: user.expires_at,
        }
    }
}

/// Run an `AuthService` call on the blocking pool.
async fn blocking<T, F>(auth: AuthService, f: F) -> Result<T, AuthError>
where
    T: Send + 'static,
    F: FnOnce(&AuthService) -> Result<T, AuthError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&auth))
        .await
        .map_err(|e| AuthError::InternalError(e.to_string()))?
}

/// Exchange an email and password for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Invalid email or password"),
        (status = 500, description = "Authentication temporarily unavailable"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let response = blocking(state.auth.clone(), move |auth| {
        auth.login(&request.email, &request.password)
    })
    .await?;
    Ok(Json(response))
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    tag = "Auth",
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Invalid registration fields"),
        (status = 409, description = "Email already registered"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AuthError> {
    let record = blocking(state.auth.clone(), move |auth| auth.register(&request)).await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// Identity behind the presented bearer token.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = UserMeResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn me(Auth(user): Auth) -> Json<UserMeResponse> {
    Json(user.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::test_state;

    fn login_request(email: &str, password: &str) -> Json<LoginRequest> {
        Json(LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
    }

    #[tokio::test]
    async fn login_handler_issues_token() {
        let (state, record) = test_state();
        let Json(response) = login(State(state.clone()), login_request("a@x.com", "secret"))
            .await
            .unwrap();

        let claims = state.auth.issuer().verify(&response.token).unwrap();
        assert_eq!(claims.sub, record.id);
    }

    #[tokio::test]
    async fn login_handler_rejects_wrong_password() {
        let (state, _) = test_state();
        let result = login(State(state), login_request("a@x.com", "nope")).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn register_handler_returns_created() {
        let (state, _) = test_state();
        let (status, Json(account)) = register(
            State(state),
            Json(RegisterRequest {
                username: "Ada".into(),
                email: "ada@bic.example".into(),
                password: "Sup3rSecret".into(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(account.email, "ada@bic.example");
        assert_eq!(account.username.as_deref(), Some("Ada"));
    }

    #[test]
    fn user_me_response_from_authenticated_user() {
        let user = AuthenticatedUser {
            user_id: "user_123".to_string(),
            email: "a@x.com".to_string(),
            username: Some("Ada".to_string()),
            expires_at: 42,
        };

        let response: UserMeResponse = user.into();
        assert_eq!(response.user_id, "user_123");
        assert_eq!(response.email, "a@x.com");
        assert_eq!(response.expires_at, 42);
    }
}
