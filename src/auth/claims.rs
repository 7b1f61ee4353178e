// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storage::CredentialRecord;

/// Claims carried by a bearer token issued by this server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the credential record id
    pub sub: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
}

/// Authenticated user information resolved from a verified token.
///
/// This is the primary type used throughout the application to represent
/// the authenticated user making a request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Credential record id (token `sub` claim)
    pub user_id: String,
    /// Login email
    pub email: String,
    /// Display name, if registered with one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Token expiration (Unix timestamp)
    pub expires_at: i64,
}

impl AuthenticatedUser {
    /// Combine verified claims with the record they point at.
    pub fn from_claims(claims: TokenClaims, record: CredentialRecord) -> Self {
        Self {
            user_id: claims.sub,
            email: record.email,
            username: record.username,
            expires_at: claims.exp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_claims_takes_identity_from_record() {
        let record = CredentialRecord::new("a@x.com", Some("Ada".into()), "hash".into());
        let claims = TokenClaims {
            sub: record.id.clone(),
            iat: 1_700_000_000,
            exp: 1_700_003_600,
        };

        let user = AuthenticatedUser::from_claims(claims, record.clone());
        assert_eq!(user.user_id, record.id);
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.username.as_deref(), Some("Ada"));
        assert_eq!(user.expires_at, 1_700_003_600);
    }

    #[test]
    fn username_is_omitted_when_absent() {
        let user = AuthenticatedUser {
            user_id: "u1".into(),
            email: "a@x.com".into(),
            username: None,
            expires_at: 0,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("username").is_none());
    }
}
