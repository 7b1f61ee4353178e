// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential login and account creation.
//!
//! ## Login
//!
//! 1. Look up the credential record by email
//! 2. Verify the password against the stored Argon2 hash
//! 3. Issue a bearer token keyed by the record id
//!
//! Unknown emails and wrong passwords both yield
//! [`AuthError::InvalidCredentials`]. Nothing is written, so a login can be
//! retried freely.
//!
//! These methods do CPU-heavy hashing and blocking store reads; async callers
//! run them on the blocking pool.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use super::{AuthError, AuthenticatedUser, PasswordHasher, TokenIssuer};
use crate::models::{LoginResponse, RegisterRequest};
use crate::storage::{CredentialRecord, CredentialStore, StorageError};

/// Minimum password strength score accepted at registration (0-4 scale).
const MIN_PASSWORD_STRENGTH: u8 = 3;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is valid"));

/// Verifies credentials against the store and issues tokens.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    issuer: TokenIssuer,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("hasher", &self.hasher)
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, hasher: PasswordHasher, issuer: TokenIssuer) -> Self {
        Self {
            store,
            hasher,
            issuer,
        }
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    /// Verify an email/password pair and issue a token.
    pub fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let record = self.store.find_by_email(email).map_err(store_unavailable)?;

        let Some(record) = record else {
            self.hasher.verify_dummy(password);
            tracing::info!("Login rejected: no account for email");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &record.password_hash)? {
            tracing::info!(user_id = %record.id, "Login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issuer.issue(&record.id)?;
        tracing::info!(user_id = %record.id, "Login succeeded");
        Ok(LoginResponse { token })
    }

    /// Create an account after validating the registration form.
    pub fn register(&self, request: &RegisterRequest) -> Result<CredentialRecord, AuthError> {
        validate_registration(request)?;

        let password_hash = self.hasher.hash(&request.password)?;
        let record = CredentialRecord::new(
            request.email.clone(),
            Some(request.username.trim().to_string()),
            password_hash,
        );

        match self.store.create(&record) {
            Ok(()) => {
                tracing::info!(user_id = %record.id, "Account created");
                Ok(record)
            }
            Err(StorageError::AlreadyExists(_)) => Err(AuthError::EmailTaken),
            Err(e) => Err(store_unavailable(e)),
        }
    }

    /// Create an account without form validation unless the email exists.
    ///
    /// Used for the startup seed account. Returns `false` if it already existed.
    pub fn ensure_account(&self, email: &str, password: &str) -> Result<bool, AuthError> {
        if self
            .store
            .find_by_email(email)
            .map_err(store_unavailable)?
            .is_some()
        {
            return Ok(false);
        }

        let record = CredentialRecord::new(email, None, self.hasher.hash(password)?);
        match self.store.create(&record) {
            Ok(()) => Ok(true),
            Err(StorageError::AlreadyExists(_)) => Ok(false),
            Err(e) => Err(store_unavailable(e)),
        }
    }

    /// Verify a bearer token and resolve the account it belongs to.
    pub fn authenticate_token(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.issuer.verify(token)?;
        let record = self
            .store
            .get(&claims.sub)
            .map_err(store_unavailable)?
            .ok_or(AuthError::UnknownSubject)?;
        Ok(AuthenticatedUser::from_claims(claims, record))
    }
}

fn store_unavailable(e: StorageError) -> AuthError {
    AuthError::StoreUnavailable(e.to_string())
}

/// Score a password 0-4: one point each for length >= 8, an uppercase letter,
/// a lowercase letter, a digit, and a symbol, capped at 4.
pub fn password_strength(password: &str) -> u8 {
    let checks = [
        password.chars().count() >= 8,
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    checks.iter().filter(|passed| **passed).count().min(4) as u8
}

fn validate_registration(request: &RegisterRequest) -> Result<(), AuthError> {
    let mut problems = Vec::new();
    if request.username.trim().is_empty() {
        problems.push("Username is required".to_string());
    }
    if !EMAIL_PATTERN.is_match(&request.email) {
        problems.push("Invalid email address".to_string());
    }
    if password_strength(&request.password) < MIN_PASSWORD_STRENGTH {
        problems.push("Password too weak".to_string());
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(AuthError::InvalidRegistration(problems))
    }
}
